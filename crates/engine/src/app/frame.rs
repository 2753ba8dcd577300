use super::Rect;

pub type Rgba = [u8; 4];

/// Draw ordering. Higher layers are painted later; commands on the same
/// layer keep submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZOrder(pub i32);

impl ZOrder {
    pub const BACKGROUND: ZOrder = ZOrder(0);
    pub const PROPS: ZOrder = ZOrder(10);
    pub const ACTORS: ZOrder = ZOrder(20);
    pub const DEBUG: ZOrder = ZOrder(80);
    pub const OVERLAY: ZOrder = ZOrder(90);
    pub const OVERLAY_TEXT: ZOrder = ZOrder(95);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Sprite scaled into `dest`. Missing sprites draw `fallback` instead.
    Sprite {
        sprite_id: String,
        dest: Rect,
        fallback: Rgba,
    },
    Fill {
        rect: Rect,
        color: Rgba,
    },
    Outline {
        rect: Rect,
        color: Rgba,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Rgba,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub z: ZOrder,
    pub command: DrawCommand,
}

/// Per-frame draw list in viewport pixels. The game fills it, the renderer
/// paints it.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    items: Vec<DrawItem>,
    clear_color: Rgba,
}

impl RenderFrame {
    pub fn new(clear_color: Rgba) -> Self {
        Self {
            items: Vec::new(),
            clear_color,
        }
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }

    pub fn sprite(&mut self, z: ZOrder, sprite_id: impl Into<String>, dest: Rect, fallback: Rgba) {
        self.push(
            z,
            DrawCommand::Sprite {
                sprite_id: sprite_id.into(),
                dest,
                fallback,
            },
        );
    }

    pub fn fill(&mut self, z: ZOrder, rect: Rect, color: Rgba) {
        self.push(z, DrawCommand::Fill { rect, color });
    }

    pub fn outline(&mut self, z: ZOrder, rect: Rect, color: Rgba) {
        self.push(z, DrawCommand::Outline { rect, color });
    }

    pub fn text(&mut self, z: ZOrder, x: f32, y: f32, text: impl Into<String>, color: Rgba) {
        self.push(
            z,
            DrawCommand::Text {
                x,
                y,
                text: text.into(),
                color,
            },
        );
    }

    pub fn push(&mut self, z: ZOrder, command: DrawCommand) {
        self.items.push(DrawItem { z, command });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Items in paint order.
    pub fn sorted_items(&self) -> Vec<&DrawItem> {
        let mut sorted: Vec<&DrawItem> = self.items.iter().collect();
        sorted.sort_by_key(|item| item.z);
        sorted
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match &item.command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn sprite_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match &item.command {
            DrawCommand::Sprite { sprite_id, .. } => Some(sprite_id.as_str()),
            _ => None,
        })
    }
}
