//! Error types for incremental font resolution.

use std::result;

use read_fonts::{ReadError, types::Tag};

use crate::{SubsetDefinition, patch::CompatibilityId};

/// Errors raised by a [`Decoder`](crate::Decoder) while unwrapping a transfer envelope.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    Malformed(String),

    #[error("decoded data exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("I/O error while decoding: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing a patch or applying it to a font snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("failed to read font data: {0}")]
    Read(#[from] ReadError),

    #[error("unknown patch format '{0}'")]
    UnknownFormat(Tag),

    #[error("patch data is truncated at offset {0}")]
    Truncated(usize),

    #[error("invalid flags {flags:#04x} for table '{tag}'")]
    InvalidTableFlags { tag: Tag, flags: u8 },

    #[error("unexpected data after patch end at offset {0}")]
    TrailingData(usize),

    #[error("axis '{0}' listed more than once in patch coverage")]
    DuplicateAxis(Tag),

    #[error("invalid code point U+{0:X} in patch coverage")]
    InvalidCodepoint(u32),

    #[error("base font has no 'IFT ' table")]
    NotIncremental,

    #[error("unsupported 'IFT ' table format {0}")]
    UnsupportedIftFormat(u8),

    #[error("patch expects base font {expected}, snapshot is {actual}")]
    IncompatibleBase { expected: CompatibilityId, actual: CompatibilityId },
}

/// Errors reported by [`IftState::resolve`](crate::IftState::resolve).
///
/// None of these are retried inside the client; a failed resolution leaves
/// the previously committed font untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no patch can satisfy {gap} for font '{font_id}'")]
    UnsatisfiableRequest { font_id: String, gap: SubsetDefinition },

    #[error("failed to decode patch: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to apply patch: {0}")]
    PatchApply(#[from] PatchError),

    #[error("font '{font_id}' still incomplete after {limit} patches")]
    ResolutionLimitExceeded { font_id: String, limit: usize },

    #[error("failed to fetch patch for font '{font_id}': {cause:#}")]
    Fetch { font_id: String, cause: anyhow::Error },
}

pub type Result<T> = result::Result<T, Error>;
