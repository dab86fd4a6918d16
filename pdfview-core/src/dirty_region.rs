use crate::geometry::{IPoint, IRect, ISize};

/// Framebuffer areas whose pixels do not match the current view yet.
///
/// Rectangles never overlap, so each pixel is rasterized at most once per
/// present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyRegion {
    rects: Vec<IRect>,
}

impl DirtyRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn covered_area(&self) -> u64 {
        self.rects.iter().map(IRect::area).sum()
    }

    /// Mark the whole viewport dirty, replacing anything pending.
    pub fn invalidate_all(&mut self, size: ISize) {
        self.rects.clear();
        if !size.is_empty() {
            self.rects.push(size.bounds());
        }
    }

    /// Add `rect`, clipped to `bounds`, without overlapping pending rects.
    pub fn add(&mut self, rect: IRect, bounds: IRect) {
        let rect = rect.intersect(&bounds);
        if rect.is_empty() {
            return;
        }
        // Anything the new rect swallows whole is redundant.
        self.rects.retain(|pending| !rect.contains_rect(pending));

        let mut pieces = vec![rect];
        for pending in &self.rects {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| piece.subtract(pending))
                .collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Move pending rects along with scrolled framebuffer content.
    pub fn translate(&mut self, offset: IPoint, bounds: IRect) {
        self.rects = self
            .rects
            .iter()
            .map(|rect| rect.translated(offset).intersect(&bounds))
            .filter(|rect| !rect.is_empty())
            .collect();
    }

    pub fn take(&mut self) -> Vec<IRect> {
        std::mem::take(&mut self.rects)
    }
}
