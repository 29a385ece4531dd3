//! Error types for the parsing surface
//!
//! The hot-path entry points (mix, scale, silence fill) never return
//! errors: contract violations there are caller bugs and panic, while
//! encodings the scaler cannot handle degrade to a logged no-op. The
//! only fallible operations are the string conversions used when specs
//! come from configuration.

use thiserror::Error;

/// Errors produced when parsing sample formats and specs from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The format name is not one of the supported encodings.
    #[error("unknown sample format name `{0}`")]
    UnknownFormat(String),

    /// A sample spec string did not match `<format> <N>ch <N>Hz`.
    #[error("malformed sample spec `{0}`, expected `<format> <N>ch <N>Hz`")]
    MalformedSpec(String),

    /// The spec parsed but its rate or channel count is out of range.
    #[error("sample spec out of range: {0}")]
    InvalidSpec(String),
}
