//! Scroll position to fragmentation intensity.

use crate::constants::SCROLL_OVERSHOOT;
use crate::easing::{clamp01, ease_in_out_cubic};

/// Normalised document scroll in \[0, 1\]; zero when nothing can scroll.
pub fn scroll_fraction(scroll_y: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let scrollable = scroll_height - viewport_height;
    let raw = if scrollable > 0.0 {
        scroll_y / scrollable
    } else {
        0.0
    };
    clamp01(raw)
}

/// Fragmentation intensity for a scroll fraction. Saturates before the end
/// of the document so the second half of the page stays fully exploded.
pub fn fragment_intensity(scroll_progress: f32) -> f32 {
    ease_in_out_cubic(clamp01(scroll_progress * SCROLL_OVERSHOOT))
}

/// A virtual scrolling document for hosts that have no real page.
#[derive(Clone, Debug)]
pub struct ScrollState {
    offset: f32,
    content_height: f32,
    viewport_height: f32,
}

impl ScrollState {
    pub fn new(content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset: 0.0,
            content_height,
            viewport_height,
        }
    }

    fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.offset + dy);
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.offset = y.clamp(0.0, self.max_offset());
    }

    /// Keep the content `pages` viewports tall when the window resizes.
    pub fn resize(&mut self, viewport_height: f32, pages: f32) {
        let progress = self.progress();
        self.viewport_height = viewport_height;
        self.content_height = viewport_height * pages;
        self.offset = progress * self.max_offset();
    }

    pub fn progress(&self) -> f32 {
        scroll_fraction(self.offset, self.content_height, self.viewport_height)
    }

    pub fn intensity(&self) -> f32 {
        fragment_intensity(self.progress())
    }
}
