use swatch_tokens::RegistryError;
use thiserror::Error;

/// Errors surfaced by the theme controller
///
/// Only construction can fail with a real error. Runtime problems (unknown
/// theme names, storage or media query failures) are logged and absorbed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid theme config: {0}")]
    InvalidConfig(String),

    /// A [`ThemeHandle`](crate::ThemeHandle) was used after its provider unmounted
    #[error("theme handle used outside an active ThemeProvider")]
    Detached,
}
