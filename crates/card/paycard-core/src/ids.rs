//! Element handles issued by a [`Surface`](crate::Surface).

use serde::{Deserialize, Serialize};

/// Opaque handle to one host element. Only meaningful to the surface that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Self {
        ElementId(index as u32)
    }
}
