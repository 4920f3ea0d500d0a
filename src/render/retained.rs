// Retained canvas - in-memory drawing backend
// Keeps every drawable with its visibility and stacking position; the desktop
// host paints the visible items each frame in stacking order.

use crate::render::{BackendError, DrawingBackend, ItemHandle, Rect, Segment, Shape, Style};

/// A drawable stored by the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasItem {
    pub handle: ItemHandle,
    pub shape: Shape,
    pub style: Style,
    pub visible: bool,
    /// Stacking stamp, higher draws above lower
    z: u64,
}

/// Drawing backend that records items instead of rasterising them
#[derive(Debug, Default)]
pub struct RetainedCanvas {
    /// Indexed by handle value; handles are issued sequentially
    items: Vec<CanvasItem>,
    next_z: u64,
}

impl RetainedCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawables ever created
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, handle: ItemHandle) -> Option<&CanvasItem> {
        self.items.get(handle.0 as usize)
    }

    /// Stacking position of an item (higher is drawn later)
    pub fn z_index(&self, handle: ItemHandle) -> Option<u64> {
        self.item(handle).map(|item| item.z)
    }

    /// Visible items from bottom to top
    pub fn visible_items(&self) -> Vec<&CanvasItem> {
        let mut visible: Vec<&CanvasItem> = self.items.iter().filter(|i| i.visible).collect();
        visible.sort_by_key(|item| item.z);
        visible
    }

    fn validate(shape: &Shape, style: &Style) -> Result<(), BackendError> {
        if !shape.is_finite() {
            return Err(BackendError::Rejected(format!(
                "non-finite coordinates in {:?}",
                shape
            )));
        }
        if let Some(width) = style.width
            && !(width.is_finite() && width >= 0.0)
        {
            return Err(BackendError::Rejected(format!(
                "invalid stroke width {}",
                width
            )));
        }
        Ok(())
    }

    fn insert(&mut self, shape: Shape, style: &Style) -> Result<ItemHandle, BackendError> {
        Self::validate(&shape, style)?;

        let handle = ItemHandle(self.items.len() as u64);
        let z = self.bump_z();
        self.items.push(CanvasItem {
            handle,
            shape,
            style: style.clone(),
            visible: true,
            z,
        });
        Ok(handle)
    }

    fn item_mut(&mut self, handle: ItemHandle) -> Result<&mut CanvasItem, BackendError> {
        self.items
            .get_mut(handle.0 as usize)
            .ok_or(BackendError::UnknownHandle(handle))
    }

    fn bump_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }
}

impl DrawingBackend for RetainedCanvas {
    fn create_rectangle(&mut self, rect: Rect, style: &Style) -> Result<ItemHandle, BackendError> {
        self.insert(Shape::Rectangle(rect), style)
    }

    fn create_line(&mut self, segment: Segment, style: &Style) -> Result<ItemHandle, BackendError> {
        self.insert(Shape::Line(segment), style)
    }

    fn create_label(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        style: &Style,
    ) -> Result<ItemHandle, BackendError> {
        self.insert(Shape::label(x, y, text), style)
    }

    fn set_visibility(&mut self, handle: ItemHandle, visible: bool) -> Result<(), BackendError> {
        self.item_mut(handle)?.visible = visible;
        Ok(())
    }

    fn reconfigure(
        &mut self,
        handle: ItemHandle,
        shape: &Shape,
        style: &Style,
    ) -> Result<(), BackendError> {
        Self::validate(shape, style)?;

        let item = self.item_mut(handle)?;
        if item.shape.kind() != shape.kind() {
            return Err(BackendError::Rejected(format!(
                "cannot turn a {:?} into a {:?}",
                item.shape.kind(),
                shape.kind()
            )));
        }

        item.shape = shape.clone();
        item.style = style.clone();
        Ok(())
    }

    fn raise_to_top(&mut self, handle: ItemHandle) -> Result<(), BackendError> {
        let z = self.bump_z();
        self.item_mut(handle)?.z = z;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Rgb;

    #[test]
    fn test_create_and_lookup() {
        let mut canvas = RetainedCanvas::new();
        let handle = canvas
            .create_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), &Style::default())
            .unwrap();

        let item = canvas.item(handle).unwrap();
        assert!(item.visible);
        assert_eq!(item.shape, Shape::Rectangle(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_visible_items_in_stacking_order() {
        let mut canvas = RetainedCanvas::new();
        let a = canvas
            .create_line(Segment::new(0.0, 0.0, 1.0, 1.0), &Style::default())
            .unwrap();
        let b = canvas
            .create_label(0.0, 0.0, "C4", &Style::default())
            .unwrap();
        let c = canvas
            .create_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), &Style::default())
            .unwrap();

        canvas.raise_to_top(a).unwrap();
        canvas.set_visibility(b, false).unwrap();

        let order: Vec<ItemHandle> = canvas.visible_items().iter().map(|i| i.handle).collect();
        assert_eq!(order, vec![c, a]);
    }

    #[test]
    fn test_reconfigure_replaces_style() {
        let mut canvas = RetainedCanvas::new();
        let style = Style::filled(Rgb(1, 2, 3)).with_outline(Rgb(4, 5, 6));
        let handle = canvas
            .create_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), &style)
            .unwrap();

        canvas
            .reconfigure(
                handle,
                &Shape::Rectangle(Rect::new(2.0, 2.0, 3.0, 3.0)),
                &Style::default(),
            )
            .unwrap();

        assert_eq!(canvas.item(handle).unwrap().style, Style::default());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let mut canvas = RetainedCanvas::new();
        assert!(
            canvas
                .create_line(
                    Segment::new(0.0, f32::INFINITY, 1.0, 1.0),
                    &Style::default()
                )
                .is_err()
        );
        assert!(
            canvas
                .create_line(
                    Segment::new(0.0, 0.0, 1.0, 1.0),
                    &Style::default().with_width(-1.0)
                )
                .is_err()
        );

        let label = canvas
            .create_label(0.0, 0.0, "x", &Style::default())
            .unwrap();
        assert!(matches!(
            canvas.reconfigure(
                label,
                &Shape::Line(Segment::new(0.0, 0.0, 1.0, 1.0)),
                &Style::default()
            ),
            Err(BackendError::Rejected(_))
        ));
        assert!(matches!(
            canvas.set_visibility(ItemHandle(99), true),
            Err(BackendError::UnknownHandle(_))
        ));
    }
}
