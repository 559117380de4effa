//! Front/back orientation, driven by CVC focus.

use crate::ids::ElementId;
use crate::surface::Surface;

pub const FLIPPED_MARKER: &str = "jp-card-flipped";

#[derive(Debug, Default)]
pub struct FlipState {
    flipped: bool,
}

impl FlipState {
    #[inline]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self, surface: &mut dyn Surface, card: ElementId) {
        surface.add_class(card, FLIPPED_MARKER);
        self.flipped = true;
    }

    pub fn unflip(&mut self, surface: &mut dyn Surface, card: ElementId) {
        surface.remove_class(card, FLIPPED_MARKER);
        self.flipped = false;
    }
}
