//! Transfer-envelope decoders.

use crate::error::DecodeError;

/// Unwraps a transfer envelope (e.g. a compressed stream) into raw patch bytes.
///
/// Implementations must be deterministic. Closures of the form
/// `Fn(&[u8]) -> Result<Vec<u8>, DecodeError>` implement this trait.
pub trait Decoder {
    fn decode(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError>;
}

impl<F> Decoder for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, DecodeError>,
{
    fn decode(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError> {
        self(envelope)
    }
}

/// Decoder for patches served without an envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDecoder;

impl Decoder for IdentityDecoder {
    fn decode(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(envelope.to_vec())
    }
}
