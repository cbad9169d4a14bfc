//! Transfer envelope selection.

use clap::ValueEnum;
use ift_brotli_envelope::BrotliDecoder;
use ift_client_core::{DecodeError, Decoder, IdentityDecoder};

/// Envelope the patch files are wrapped in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Envelope {
    /// Patches are stored as-is.
    #[default]
    Identity,
    /// Patches are Brotli-compressed.
    Brotli,
}

impl Decoder for Envelope {
    fn decode(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError> {
        match self {
            Envelope::Identity => IdentityDecoder.decode(envelope),
            Envelope::Brotli => BrotliDecoder::new().decode(envelope),
        }
    }
}
