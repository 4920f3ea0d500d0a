// Render module - drawable primitives and the drawing backend seam
// The editor draws through a RenderPool, which recycles backend items between frames

pub mod pool;
pub mod retained;

pub use pool::RenderPool;
pub use retained::{CanvasItem, RetainedCanvas};

/// Stable identifier of a drawable owned by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(pub u64);

/// Kind of drawable primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Rectangle,
    Line,
    Label,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Rectangle, ItemKind::Line, ItemKind::Label];

    /// Slot of this kind in per-kind arrays
    pub fn index(self) -> usize {
        match self {
            ItemKind::Rectangle => 0,
            ItemKind::Line => 1,
            ItemKind::Label => 2,
        }
    }
}

/// RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Text anchor for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Center,
    /// Vertically centred, text starts at the position
    West,
    /// Vertically centred, text ends at the position
    East,
}

/// Axis-aligned rectangle given by two corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// Straight line between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Segment {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Geometry of a drawable, one variant per kind
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rect),
    Line(Segment),
    Label { x: f32, y: f32, text: String },
}

impl Shape {
    pub fn kind(&self) -> ItemKind {
        match self {
            Shape::Rectangle(_) => ItemKind::Rectangle,
            Shape::Line(_) => ItemKind::Line,
            Shape::Label { .. } => ItemKind::Label,
        }
    }

    pub fn label(x: f32, y: f32, text: impl Into<String>) -> Self {
        Shape::Label {
            x,
            y,
            text: text.into(),
        }
    }

    /// All coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Rectangle(r) => [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()),
            Shape::Line(s) => [s.x0, s.y0, s.x1, s.y1].iter().all(|v| v.is_finite()),
            Shape::Label { x, y, .. } => x.is_finite() && y.is_finite(),
        }
    }
}

/// Visual attributes of a drawable
///
/// A style always replaces the previous one as a whole: fields left at `None`
/// are unset on the item, never inherited from an earlier use.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub outline: Option<Rgb>,
    pub width: Option<f32>,
    pub anchor: Option<Anchor>,
}

impl Style {
    pub fn filled(fill: Rgb) -> Self {
        Self {
            fill: Some(fill),
            ..Self::default()
        }
    }

    pub fn with_outline(mut self, outline: Rgb) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Errors raised by a drawing or synthesis backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("Backend rejected arguments: {0}")]
    Rejected(String),

    #[error("Unknown item handle: {0:?}")]
    UnknownHandle(ItemHandle),
}

/// Retained-mode drawing surface consumed by the render pool
///
/// Implementations own the drawables; the core never deletes one.
pub trait DrawingBackend {
    fn create_rectangle(&mut self, rect: Rect, style: &Style) -> Result<ItemHandle, BackendError>;

    fn create_line(&mut self, segment: Segment, style: &Style) -> Result<ItemHandle, BackendError>;

    fn create_label(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        style: &Style,
    ) -> Result<ItemHandle, BackendError>;

    fn set_visibility(&mut self, handle: ItemHandle, visible: bool) -> Result<(), BackendError>;

    /// Replace geometry and style of an existing item
    fn reconfigure(
        &mut self,
        handle: ItemHandle,
        shape: &Shape,
        style: &Style,
    ) -> Result<(), BackendError>;

    /// Move an item above every other item
    fn raise_to_top(&mut self, handle: ItemHandle) -> Result<(), BackendError>;
}
