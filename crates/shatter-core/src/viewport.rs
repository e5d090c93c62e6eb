use crate::constants::{DESKTOP_CAPACITY, MOBILE_BREAKPOINT_PX, MOBILE_CAPACITY};

/// Capacity tier picked from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportClass {
    Mobile,
    Desktop,
}

impl ViewportClass {
    pub fn classify(width_px: f32, breakpoint_px: f32) -> Self {
        if width_px < breakpoint_px {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }

    pub fn from_width(width_px: f32) -> Self {
        Self::classify(width_px, MOBILE_BREAKPOINT_PX)
    }

    pub fn capacity(self) -> usize {
        match self {
            ViewportClass::Mobile => MOBILE_CAPACITY,
            ViewportClass::Desktop => DESKTOP_CAPACITY,
        }
    }
}
