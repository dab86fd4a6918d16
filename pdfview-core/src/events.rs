/// A change notification. Carries no payload; listeners re-read state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEvent {
    SourceChanged,
    PageNumberChanged,
    StatusChanged,
    PanChanged,
    ZoomChanged,
    PageOrientationChanged,
    CoverZoomChanged,
    MaxZoomChanged,
    ViewportResized,
}

impl ViewEvent {
    /// Events after which the document-to-screen mapping is no longer a pure
    /// translation of what the framebuffer holds.
    pub fn invalidates_framebuffer(self) -> bool {
        matches!(
            self,
            ViewEvent::SourceChanged
                | ViewEvent::PageNumberChanged
                | ViewEvent::StatusChanged
                | ViewEvent::ZoomChanged
                | ViewEvent::PageOrientationChanged
                | ViewEvent::ViewportResized
        )
    }
}

/// Ordered queue of pending notifications.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<ViewEvent>,
}

impl EventQueue {
    pub fn emit(&mut self, event: ViewEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.pending)
    }
}
