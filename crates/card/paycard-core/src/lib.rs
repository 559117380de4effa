//! paycard-core: the live binding & validation engine behind the card preview.
//!
//! The engine never touches a DOM directly. Hosts implement [`Surface`]
//! (element lookup, value/text access, marker toggling, event emission) and
//! feed user input through [`Card::handle`]. [`MemorySurface`] is a complete
//! in-memory host used by tests and non-browser embedders; the wasm adapter
//! crate provides the browser one.

pub mod binding;
pub mod card;
pub mod error;
pub mod flip;
pub mod formatting;
pub mod ids;
pub mod memory;
pub mod options;
pub mod pipeline;
pub mod surface;
pub mod template;
pub mod tracker;

// Re-exports for adapters
pub use binding::{BindConfig, Field, FieldBinding, JoinRule};
pub use card::{Card, MountTargets, INITIALIZED_ATTR};
pub use error::{MountError, OptionsError};
pub use flip::{FlipState, FLIPPED_MARKER};
pub use formatting::Formatter;
pub use ids::ElementId;
pub use memory::MemorySurface;
pub use options::{
    CardOptions, CardSelectors, FormSelectors, Masks, Messages, Placeholders, ValidityClasses,
};
pub use pipeline::{Filter, FilterPipeline, Phase, StageCtx, ValidityKind};
pub use surface::{CardEvent, EventKind, InputEvent, Surface};
pub use template::{CardMarkup, MarkupNode};
pub use tracker::{network_marker, CardTypeTracker, IDENTIFIED_MARKER, UNKNOWN_MARKER};
pub use paycard_payment::Network;
