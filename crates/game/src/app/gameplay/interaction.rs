use engine::{Rect, Vec2};

use super::collision::feet_rect;
use super::containers::ContainerBox;
use super::inventory::Item;
use super::maps::{BoardReach, InteractableKind, MapDefinition};
use super::movement::Direction;
use super::scenes::SceneId;
use super::session::PlayerState;

pub(crate) const INTERACTION_RADIUS: f32 = 25.0;
pub(crate) const BOX_EMPTY_TEXT: &str = "Box is empty";
const NPC_REACH_X: f32 = 25.0;
const NPC_REACH_Y: f32 = 50.0;
/// Point on the player sprite used for radius checks.
const PLAYER_POINT_X: f32 = 17.0;
const PLAYER_POINT_Y: f32 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InteractionResult {
    OpenDialogue(Vec<String>),
    StartStarterSelection,
    ChangeScene(SceneId),
    GrantItem { item: Item, quantity: u32 },
    StartBattle(usize),
    None,
}

/// Player stands just below the NPC and faces it.
pub(crate) fn npc_in_reach(player: &PlayerState, npc: Vec2) -> bool {
    let dx = player.position.x - npc.x;
    let dy = player.position.y - npc.y;
    player.facing == Direction::Up && dx.abs() < NPC_REACH_X && dy > 0.0 && dy < NPC_REACH_Y
}

pub(crate) fn within_radius(player_position: Vec2, target: &Rect) -> bool {
    let point = player_position.offset(PLAYER_POINT_X, PLAYER_POINT_Y);
    point.distance(target.center()) <= INTERACTION_RADIUS + target.w / 2.0
}

pub(crate) fn board_in_reach(player_position: Vec2, board: &Rect, reach: BoardReach) -> bool {
    match reach {
        BoardReach::Radius => within_radius(player_position, board),
        BoardReach::Expanded(margin) => feet_rect(player_position).intersects(&board.expanded(margin)),
    }
}

pub(crate) fn portal_at(player_position: Vec2, map: &MapDefinition) -> Option<SceneId> {
    let feet = feet_rect(player_position);
    map.portals
        .iter()
        .find(|portal| feet.intersects(&portal.rect))
        .map(|portal| portal.target)
}

/// Confirm-key interaction. Boxes are opened in place, so a second call on
/// the same box reports it empty.
pub(crate) fn try_interact(
    player: &PlayerState,
    map: &MapDefinition,
    boxes: &mut [ContainerBox],
) -> InteractionResult {
    for interactable in &map.interactables {
        if let InteractableKind::Npc { lines, .. } = &interactable.kind {
            if npc_in_reach(player, interactable.rect.origin()) {
                return InteractionResult::OpenDialogue(lines.clone());
            }
        }
    }
    for interactable in &map.interactables {
        if let InteractableKind::BulletinBoard { reach, lines } = &interactable.kind {
            if board_in_reach(player.position, &interactable.rect, *reach) {
                return InteractionResult::OpenDialogue(lines.clone());
            }
        }
    }
    if let Some(table) = &map.starter_table {
        if table.rect.contains(player.position) {
            return InteractionResult::StartStarterSelection;
        }
    }
    if let Some(container) = boxes
        .iter_mut()
        .find(|container| within_radius(player.position, &container.rect()))
    {
        return match container.open() {
            Some(item) => InteractionResult::GrantItem { item, quantity: 1 },
            None => InteractionResult::OpenDialogue(vec![BOX_EMPTY_TEXT.to_string()]),
        };
    }
    InteractionResult::None
}

/// Automatic triggers checked after every committed step and on the scene tick.
pub(crate) fn passive_trigger(player: &PlayerState, map: &MapDefinition) -> InteractionResult {
    match portal_at(player.position, map) {
        Some(target) => InteractionResult::ChangeScene(target),
        None => InteractionResult::None,
    }
}

/// First hitbox under the player's feet, as `StartBattle` with its index.
pub(crate) fn wild_contact(
    player: &PlayerState,
    hitboxes: impl IntoIterator<Item = (usize, Rect)>,
) -> InteractionResult {
    let feet = feet_rect(player.position);
    hitboxes
        .into_iter()
        .find(|(_, hitbox)| feet.intersects(hitbox))
        .map_or(InteractionResult::None, |(index, _)| {
            InteractionResult::StartBattle(index)
        })
}
