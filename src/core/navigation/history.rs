use crate::core::data::viewport::Viewport;

/// Viewports left behind by zooming in, most recent last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportHistory {
    stack: Vec<Viewport>,
}

impl ViewportHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, viewport: Viewport) {
        self.stack.push(viewport);
    }

    pub fn pop(&mut self) -> Option<Viewport> {
        self.stack.pop()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }
}
