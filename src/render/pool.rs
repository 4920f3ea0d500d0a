// Render Pool - Reuse of drawable primitives across redraws
//
// Redrawing the whole editor on every pointer event would otherwise create and
// destroy hundreds of backend items per frame. The pool hides the items of the
// previous frame and hands them back out, reconfigured, on the next one.

use crate::render::{BackendError, DrawingBackend, ItemHandle, ItemKind, Shape, Style};

/// A backend item tracked by the pool, with the arguments of its current use
#[derive(Debug, Clone)]
struct PooledItem {
    handle: ItemHandle,
    shape: Shape,
    style: Style,
}

/// Active and hidden items of a single kind
#[derive(Debug, Default)]
struct KindLists {
    /// Items shown in the current frame
    active: Vec<PooledItem>,
    /// Hidden items available for reuse (most recently hidden at the back)
    inactive: Vec<PooledItem>,
    /// Number of backend items ever created for this kind
    allocated: usize,
}

/// Cache of reusable drawables on top of a drawing backend
///
/// Items are never freed. Each redraw starts with [`RenderPool::begin_frame`]
/// and then issues [`RenderPool::create`] calls in draw order.
pub struct RenderPool<B: DrawingBackend> {
    backend: B,
    lists: [KindLists; 3],
}

impl<B: DrawingBackend> RenderPool<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            lists: Default::default(),
        }
    }

    /// Hide every active item and make it available for reuse
    ///
    /// Must run once per redraw, before the first `create` of that frame.
    pub fn begin_frame(&mut self) -> Result<(), BackendError> {
        for lists in &self.lists {
            for item in &lists.active {
                self.backend.set_visibility(item.handle, false)?;
            }
        }

        for lists in &mut self.lists {
            let mut hidden = std::mem::take(&mut lists.active);
            lists.inactive.append(&mut hidden);
        }

        Ok(())
    }

    /// Show a drawable, recycling a hidden one of the same kind when possible
    ///
    /// A recycled item gets the new geometry and style in full and is raised
    /// above everything drawn before it.
    pub fn create(&mut self, shape: Shape, style: Style) -> Result<ItemHandle, BackendError> {
        let kind = shape.kind();
        let backend = &mut self.backend;
        let lists = &mut self.lists[kind.index()];

        if let Some(mut item) = lists.inactive.pop() {
            if let Err(e) = recycle(backend, item.handle, &shape, &style) {
                lists.inactive.push(item);
                return Err(e);
            }

            item.shape = shape;
            item.style = style;
            let handle = item.handle;
            lists.active.push(item);
            return Ok(handle);
        }

        let handle = match &shape {
            Shape::Rectangle(rect) => backend.create_rectangle(*rect, &style)?,
            Shape::Line(segment) => backend.create_line(*segment, &style)?,
            Shape::Label { x, y, text } => backend.create_label(*x, *y, text, &style)?,
        };

        lists.allocated += 1;
        tracing::trace!(?kind, ?handle, allocated = lists.allocated, "allocated render item");

        lists.active.push(PooledItem {
            handle,
            shape,
            style,
        });
        Ok(handle)
    }

    /// Items shown in the current frame
    pub fn active_count(&self, kind: ItemKind) -> usize {
        self.lists[kind.index()].active.len()
    }

    /// Hidden items waiting for reuse
    pub fn inactive_count(&self, kind: ItemKind) -> usize {
        self.lists[kind.index()].inactive.len()
    }

    /// Backend items ever created for a kind (never decreases)
    pub fn allocated(&self, kind: ItemKind) -> usize {
        self.lists[kind.index()].allocated
    }

    /// Handles shown in the current frame, in creation order
    pub fn active_handles(&self, kind: ItemKind) -> impl Iterator<Item = ItemHandle> + '_ {
        self.lists[kind.index()].active.iter().map(|item| item.handle)
    }

    /// Geometry and style an active item was last created with
    pub fn active_item(&self, handle: ItemHandle) -> Option<(&Shape, &Style)> {
        self.lists
            .iter()
            .flat_map(|lists| lists.active.iter())
            .find(|item| item.handle == handle)
            .map(|item| (&item.shape, &item.style))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn recycle<B: DrawingBackend>(
    backend: &mut B,
    handle: ItemHandle,
    shape: &Shape,
    style: &Style,
) -> Result<(), BackendError> {
    backend.reconfigure(handle, shape, style)?;
    backend.set_visibility(handle, true)?;
    // Later items may need to sit above earlier ones (note labels over note bodies)
    backend.raise_to_top(handle)
}
