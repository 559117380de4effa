//! Error types. Only construction can fail; validation results are markers, not errors.

use crate::binding::Field;

/// Why a card could not be mounted. The page is left untouched except where noted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MountError {
    #[error("please provide a form")]
    MissingForm,

    #[error("please provide a container")]
    MissingContainer,

    /// The container already hosts a card; mounting again is a no-op.
    #[error("container is already initialized")]
    AlreadyMounted,

    #[error("can't find a {field} input in the form (selector `{selector}`)")]
    MissingInput { field: Field, selector: String },

    /// The rendered markup has no card element. The markup stays, nothing is wired.
    #[error("no card element matches `{selector}`")]
    MissingCard { selector: String },
}

impl MountError {
    /// `false` for the idempotent re-mount case, which callers may ignore.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MountError::AlreadyMounted)
    }

    /// Short category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            MountError::MissingForm | MountError::MissingContainer => "target",
            MountError::AlreadyMounted => "duplicate",
            MountError::MissingInput { .. } | MountError::MissingCard { .. } => "selector",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("invalid card options: {reason}")]
    Invalid { reason: String },
}

impl From<serde_json::Error> for OptionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Invalid {
            reason: err.to_string(),
        }
    }
}
