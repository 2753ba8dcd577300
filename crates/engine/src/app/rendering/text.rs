use super::raster::Canvas;
use crate::app::Rgba;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
pub const TEXT_SCALE: i32 = 2;
pub const GLYPH_ADVANCE_PX: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
pub const LINE_HEIGHT_PX: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;

type Rows = [u8; GLYPH_HEIGHT as usize];

// Lowercase input is folded to these uppercase shapes.
const GLYPHS: &[(char, Rows)] = &[
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
    ('K', [0b101, 0b101, 0b110, 0b101, 0b101]),
    ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b110, 0b001, 0b010, 0b100, 0b111]),
    ('3', [0b110, 0b001, 0b010, 0b001, 0b110]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b110, 0b001, 0b110]),
    ('6', [0b011, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b010, 0b010, 0b010]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b110]),
    ('!', [0b010, 0b010, 0b010, 0b000, 0b010]),
    ('?', [0b110, 0b001, 0b010, 0b000, 0b010]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    (',', [0b000, 0b000, 0b000, 0b010, 0b100]),
    (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    ('\'', [0b010, 0b010, 0b000, 0b000, 0b000]),
    ('"', [0b101, 0b101, 0b000, 0b000, 0b000]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    ('+', [0b000, 0b010, 0b111, 0b010, 0b000]),
    ('=', [0b000, 0b111, 0b000, 0b111, 0b000]),
    ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
    ('(', [0b001, 0b010, 0b010, 0b010, 0b001]),
    (')', [0b100, 0b010, 0b010, 0b010, 0b100]),
    ('<', [0b001, 0b010, 0b100, 0b010, 0b001]),
    ('>', [0b100, 0b010, 0b001, 0b010, 0b100]),
    ('%', [0b101, 0b001, 0b010, 0b100, 0b101]),
    ('#', [0b101, 0b111, 0b101, 0b111, 0b101]),
];

const BLANK: Rows = [0; GLYPH_HEIGHT as usize];

fn fold_char(ch: char) -> char {
    match ch {
        'é' | 'É' | 'è' | 'ê' => 'E',
        other => other.to_ascii_uppercase(),
    }
}

fn glyph_rows(ch: char) -> Option<Rows> {
    let folded = fold_char(ch);
    GLYPHS
        .iter()
        .find(|(glyph, _)| *glyph == folded)
        .map(|(_, rows)| *rows)
}

pub fn text_width_px(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE_PX
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a
/// line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let current_len = current.chars().count();
        let needed = if current.is_empty() {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) fn draw_text(canvas: &mut Canvas<'_>, x: i32, y: i32, text: &str, color: Rgba) {
    let mut pen_x = x;
    for ch in text.chars() {
        let rows = glyph_rows(ch).unwrap_or(BLANK);
        draw_glyph(canvas, pen_x, y, rows, color);
        pen_x += GLYPH_ADVANCE_PX;
    }
}

fn draw_glyph(canvas: &mut Canvas<'_>, x: i32, y: i32, rows: Rows, color: Rgba) {
    for (row_index, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            canvas.fill_rect(
                x + col * TEXT_SCALE,
                y + row_index as i32 * TEXT_SCALE,
                TEXT_SCALE,
                TEXT_SCALE,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_glyph_fits_in_three_columns() {
        for (ch, rows) in GLYPHS {
            assert!(rows.iter().all(|row| *row < 0b1000), "glyph {ch:?} too wide");
        }
    }

    #[test]
    fn lowercase_and_accents_fold_to_known_glyphs() {
        for ch in "poké ball".chars().filter(|ch| *ch != ' ') {
            assert!(glyph_rows(ch).is_some(), "missing glyph for {ch:?}");
        }
        assert_eq!(glyph_rows('a'), glyph_rows('A'));
    }

    #[test]
    fn unknown_character_draws_nothing() {
        let mut buffer = vec![0u8; 16 * 16 * 4];
        let mut canvas = Canvas::new(&mut buffer, 16, 16);
        draw_text(&mut canvas, 0, 0, "~", [255, 255, 255, 255]);
        assert!(buffer.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn draw_text_is_clipped_at_canvas_edges() {
        let mut buffer = vec![0u8; 8 * 8 * 4];
        let mut canvas = Canvas::new(&mut buffer, 8, 8);
        draw_text(&mut canvas, -3, -3, "WWWW", [255, 0, 0, 255]);
        draw_text(&mut canvas, 6, 6, "WWWW", [255, 0, 0, 255]);
        assert!(buffer.iter().any(|byte| *byte == 255));
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        let lines = wrap_text("This is Pallet Town. Begin your adventure!", 20);
        assert_eq!(
            lines,
            vec!["This is Pallet Town.", "Begin your", "adventure!"]
        );
    }

    #[test]
    fn wrap_text_splits_overlong_words() {
        let lines = wrap_text("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn text_width_counts_characters() {
        assert_eq!(text_width_px("abc"), 3 * GLYPH_ADVANCE_PX);
    }
}
