use engine::{
    text_width_px, wrap_text, Camera2D, Rect, RenderFrame, Rgba, Vec2, ZOrder, GLYPH_ADVANCE_PX,
    LINE_HEIGHT_PX,
};

use super::battle::{BattlePhase, BattleSession, MenuOption};
use super::collision::{PLAYER_HEIGHT, PLAYER_WIDTH};
use super::creature::Creature;
use super::inventory::Item;
use super::maps::{InteractableKind, MapDefinition};
use super::session::{PlayerState, SessionState};
use super::{VIEW_HEIGHT, VIEW_WIDTH};

const BLACK: Rgba = [0, 0, 0, 255];
const WHITE: Rgba = [255, 255, 255, 255];
const PANEL: Rgba = [248, 248, 240, 235];
const SHADE: Rgba = [16, 16, 24, 160];
const HIGHLIGHT: Rgba = [216, 64, 48, 255];
const PLAYER_FALLBACK: Rgba = [200, 48, 48, 255];
const NPC_FALLBACK: Rgba = [120, 96, 168, 255];

const DEBUG_BARRIER: Rgba = [255, 0, 0, 255];
const DEBUG_LEDGE: Rgba = [255, 216, 0, 255];
const DEBUG_PORTAL: Rgba = [0, 120, 255, 255];
const DEBUG_GRASS: Rgba = [0, 200, 80, 255];
const DEBUG_FEET: Rgba = [255, 0, 255, 255];

const PADDING: f32 = 10.0;
const DIALOGUE_HEIGHT: f32 = 100.0;

pub(crate) fn world_rect(camera: &Camera2D, rect: Rect) -> Rect {
    let origin = camera.to_screen(rect.origin());
    Rect::new(origin.x, origin.y, rect.w, rect.h)
}

pub(crate) fn draw_map(frame: &mut RenderFrame, camera: &Camera2D, map: &MapDefinition) {
    let background = &map.background;
    frame.sprite(
        ZOrder::BACKGROUND,
        background.sprite.clone(),
        world_rect(camera, background.rect),
        background.fallback,
    );
    for interactable in &map.interactables {
        if let InteractableKind::Npc { sprite, .. } = &interactable.kind {
            frame.sprite(
                ZOrder::ACTORS,
                sprite.clone(),
                world_rect(camera, interactable.rect),
                NPC_FALLBACK,
            );
        }
    }
}

pub(crate) fn draw_player(frame: &mut RenderFrame, camera: &Camera2D, player: &PlayerState) {
    let rect = Rect::new(
        player.position.x,
        player.position.y,
        PLAYER_WIDTH,
        PLAYER_HEIGHT,
    );
    frame.sprite(
        ZOrder::ACTORS,
        player.sprite_id(),
        world_rect(camera, rect),
        PLAYER_FALLBACK,
    );
}

pub(crate) fn draw_debug(
    frame: &mut RenderFrame,
    camera: &Camera2D,
    map: &MapDefinition,
    player: &PlayerState,
) {
    let layers: [(&[Rect], Rgba); 3] = [
        (&map.barriers, DEBUG_BARRIER),
        (&map.ledges, DEBUG_LEDGE),
        (&map.grass_zones, DEBUG_GRASS),
    ];
    for (rects, color) in layers {
        for rect in rects {
            frame.outline(ZOrder::DEBUG, world_rect(camera, *rect), color);
        }
    }
    for portal in &map.portals {
        frame.outline(ZOrder::DEBUG, world_rect(camera, portal.rect), DEBUG_PORTAL);
    }
    for interactable in &map.interactables {
        if let InteractableKind::Npc { name, .. } = &interactable.kind {
            let label = camera.to_screen(interactable.rect.origin());
            frame.text(
                ZOrder::DEBUG,
                label.x,
                label.y - LINE_HEIGHT_PX as f32,
                name.clone(),
                WHITE,
            );
        }
    }
    frame.outline(
        ZOrder::DEBUG,
        world_rect(camera, super::collision::feet_rect(player.position)),
        DEBUG_FEET,
    );
    frame.fill(
        ZOrder::OVERLAY,
        Rect::new(0.0, 0.0, 200.0, LINE_HEIGHT_PX as f32 + 8.0),
        SHADE,
    );
    frame.text(
        ZOrder::OVERLAY_TEXT,
        4.0,
        4.0,
        format!("X:{:.0} Y:{:.0}", player.position.x, player.position.y),
        WHITE,
    );
}

fn max_chars(width: f32) -> usize {
    ((width - PADDING * 2.0) / GLYPH_ADVANCE_PX as f32).max(1.0) as usize
}

fn draw_lines(frame: &mut RenderFrame, origin: Vec2, lines: &[String], color: Rgba) {
    for (row, line) in lines.iter().enumerate() {
        frame.text(
            ZOrder::OVERLAY_TEXT,
            origin.x,
            origin.y + row as f32 * LINE_HEIGHT_PX as f32,
            line.clone(),
            color,
        );
    }
}

fn panel(frame: &mut RenderFrame, rect: Rect) {
    frame.fill(ZOrder::OVERLAY, rect, PANEL);
    frame.outline(ZOrder::OVERLAY, rect, BLACK);
}

pub(crate) fn draw_dialogue(frame: &mut RenderFrame, text: &str) {
    let rect = Rect::new(0.0, VIEW_HEIGHT - DIALOGUE_HEIGHT, VIEW_WIDTH, DIALOGUE_HEIGHT);
    panel(frame, rect);
    let lines = wrap_text(text, max_chars(rect.w));
    draw_lines(
        frame,
        Vec2::new(rect.x + PADDING, rect.y + PADDING + 5.0),
        &lines,
        BLACK,
    );
}

pub(crate) fn draw_bag(frame: &mut RenderFrame, session: &SessionState) {
    let rect = Rect::new(40.0, 40.0, VIEW_WIDTH - 80.0, VIEW_HEIGHT - 80.0);
    panel(frame, rect);
    frame.text(
        ZOrder::OVERLAY_TEXT,
        rect.x + PADDING,
        rect.y + PADDING,
        "BAG",
        BLACK,
    );

    let mut y = rect.y + PADDING + LINE_HEIGHT_PX as f32 * 2.0;
    for item in Item::ALL {
        frame.sprite(
            ZOrder::OVERLAY_TEXT,
            item.sprite_id(),
            Rect::new(rect.x + PADDING, y - 2.0, 16.0, 16.0),
            HIGHLIGHT,
        );
        frame.text(
            ZOrder::OVERLAY_TEXT,
            rect.x + PADDING + 24.0,
            y,
            format!("{} x{}", item.name(), session.inventory.display_count(item)),
            BLACK,
        );
        y += LINE_HEIGHT_PX as f32 + 6.0;
    }

    y += LINE_HEIGHT_PX as f32;
    frame.text(ZOrder::OVERLAY_TEXT, rect.x + PADDING, y, "POKEMON", BLACK);
    y += LINE_HEIGHT_PX as f32 + 6.0;
    for creature in session.party.iter().take(super::session::MAX_PARTY_SIZE) {
        frame.sprite(
            ZOrder::OVERLAY_TEXT,
            creature.species.sprite_id(),
            Rect::new(rect.x + PADDING, y - 4.0, 20.0, 20.0),
            creature.species.placeholder_color(),
        );
        frame.text(
            ZOrder::OVERLAY_TEXT,
            rect.x + PADDING + 28.0,
            y,
            creature_summary(creature),
            BLACK,
        );
        y += LINE_HEIGHT_PX as f32 + 10.0;
    }
}

fn creature_summary(creature: &Creature) -> String {
    format!(
        "{} LV{} HP {}/{}",
        creature.name,
        creature.level,
        creature.current_hp(),
        creature.max_hp
    )
}

pub(crate) fn draw_title(frame: &mut RenderFrame, prompt_visible: bool) {
    frame.sprite(
        ZOrder::BACKGROUND,
        "title/background",
        Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT),
        [40, 64, 136, 255],
    );
    let title = "PALLET";
    frame.text(
        ZOrder::OVERLAY_TEXT,
        centered_x(title),
        VIEW_HEIGHT * 0.3,
        title,
        WHITE,
    );
    if prompt_visible {
        let prompt = "Press Enter to start";
        frame.text(
            ZOrder::OVERLAY_TEXT,
            centered_x(prompt),
            VIEW_HEIGHT * 0.7,
            prompt,
            WHITE,
        );
    }
}

fn centered_x(text: &str) -> f32 {
    (VIEW_WIDTH - text_width_px(text) as f32) / 2.0
}

pub(crate) fn draw_battle(frame: &mut RenderFrame, battle: &BattleSession, party: &[Creature]) {
    frame.fill(
        ZOrder::OVERLAY,
        Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT),
        [232, 240, 224, 255],
    );

    let wild = battle.wild();
    frame.sprite(
        ZOrder::OVERLAY_TEXT,
        wild.species.sprite_id(),
        Rect::new(330.0, 50.0, 96.0, 96.0),
        wild.species.placeholder_color(),
    );
    frame.text(
        ZOrder::OVERLAY_TEXT,
        30.0,
        40.0,
        format!("WILD {}", creature_summary(wild)),
        BLACK,
    );

    if let Some(active) = party.first() {
        frame.sprite(
            ZOrder::OVERLAY_TEXT,
            active.species.sprite_id(),
            Rect::new(80.0, 170.0, 96.0, 96.0),
            active.species.placeholder_color(),
        );
        frame.text(
            ZOrder::OVERLAY_TEXT,
            230.0,
            200.0,
            creature_summary(active),
            BLACK,
        );
    }

    let menu = Rect::new(0.0, VIEW_HEIGHT - 150.0, VIEW_WIDTH, 150.0);
    panel(frame, menu);
    let message = wrap_text(battle.message(), max_chars(menu.w));
    draw_lines(
        frame,
        Vec2::new(menu.x + PADDING, menu.y + PADDING),
        &message,
        BLACK,
    );

    if battle.is_waiting() {
        return;
    }
    let options_y = menu.y + PADDING + LINE_HEIGHT_PX as f32 * 3.0;
    let lines = match battle.phase() {
        BattlePhase::MainMenu => {
            draw_main_menu(frame, battle.selection(), Vec2::new(menu.x + PADDING, options_y));
            return;
        }
        BattlePhase::MoveSelect => party
            .first()
            .map(|active| {
                let mut lines = active
                    .known_moves()
                    .iter()
                    .enumerate()
                    .map(|(index, mv)| {
                        format!("{} {} PP {}/{}", index + 1, mv.name, mv.pp_remaining, mv.pp_max)
                    })
                    .collect::<Vec<_>>();
                lines.push("C WAIT  B BACK".to_string());
                lines
            })
            .unwrap_or_default(),
        BattlePhase::BagOpen => Item::ALL
            .iter()
            .enumerate()
            .map(|(index, item)| format!("{} {}", index + 1, item.name()))
            .chain(std::iter::once("B BACK".to_string()))
            .collect(),
        BattlePhase::PokemonSelect => party
            .iter()
            .enumerate()
            .map(|(index, creature)| format!("{} {}", index + 1, creature_summary(creature)))
            .chain(std::iter::once("B BACK".to_string()))
            .collect(),
        BattlePhase::Resolving | BattlePhase::Ending(_) => Vec::new(),
    };
    draw_lines(frame, Vec2::new(menu.x + PADDING, options_y), &lines, BLACK);
}

fn draw_main_menu(frame: &mut RenderFrame, selection: MenuOption, origin: Vec2) {
    for (row, options) in MenuOption::GRID.iter().enumerate() {
        for (col, option) in options.iter().enumerate() {
            let marker = if *option == selection { ">" } else { " " };
            frame.text(
                ZOrder::OVERLAY_TEXT,
                origin.x + col as f32 * 160.0,
                origin.y + row as f32 * (LINE_HEIGHT_PX as f32 + 8.0),
                format!("{marker}{}", option.label()),
                if *option == selection { HIGHLIGHT } else { BLACK },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_rect_is_offset_by_camera() {
        let camera = Camera2D {
            origin: Vec2::new(100.0, 50.0),
        };
        assert_eq!(
            world_rect(&camera, Rect::new(150.0, 80.0, 10.0, 20.0)),
            Rect::new(50.0, 30.0, 10.0, 20.0)
        );
    }

    #[test]
    fn dialogue_wraps_long_text() {
        let mut frame = RenderFrame::default();
        draw_dialogue(
            &mut frame,
            "You can choose one from three Poké Balls as your initial Pokémon in Laboratory.",
        );
        let texts = frame.texts().collect::<Vec<_>>();
        assert!(texts.len() >= 2);
        assert!(texts.iter().all(|line| line.chars().count() <= max_chars(VIEW_WIDTH)));
    }

    #[test]
    fn title_prompt_blinks() {
        let mut shown = RenderFrame::default();
        draw_title(&mut shown, true);
        assert!(shown.texts().any(|text| text == "Press Enter to start"));

        let mut hidden = RenderFrame::default();
        draw_title(&mut hidden, false);
        assert!(!hidden.texts().any(|text| text == "Press Enter to start"));
    }
}
