//! Brotli transfer envelopes.
//!
//! Patches and fonts are commonly served Brotli-compressed. [`BrotliDecoder`]
//! plugs into the resolution loop as its [`Decoder`].
//!
//! # Example
//!
//! ```
//! use ift_brotli_envelope::{BrotliDecoder, compress};
//! use ift_client_core::Decoder;
//!
//! let envelope = compress(b"patch bytes").unwrap();
//! assert_eq!(BrotliDecoder::new().decode(&envelope).unwrap(), b"patch bytes");
//! ```

use std::io::{Read, Write};

use ift_client_core::{DecodeError, Decoder};
use log::debug;

/// Buffer size used by the Brotli streams.
const BUFFER_SIZE: usize = 4096;

/// Compression quality used by [`compress`].
const QUALITY: u32 = 11;

/// Base-2 logarithm of the sliding window used by [`compress`].
const WINDOW_LOG: u32 = 22;

/// Decodes Brotli envelopes, optionally bounding the decoded size.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrotliDecoder {
    max_decoded_len: Option<usize>,
}

impl BrotliDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects envelopes that expand past `limit` bytes.
    pub fn max_decoded_len(mut self, limit: usize) -> Self {
        self.max_decoded_len = Some(limit);
        self
    }
}

impl Decoder for BrotliDecoder {
    fn decode(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let reader = brotli::Decompressor::new(envelope, BUFFER_SIZE);
        let mut decoded = Vec::new();
        let read = match self.max_decoded_len {
            Some(limit) => {
                let read = reader.take(limit as u64 + 1).read_to_end(&mut decoded);
                if decoded.len() > limit {
                    return Err(DecodeError::TooLarge { limit });
                }
                read
            }
            None => {
                let mut reader = reader;
                reader.read_to_end(&mut decoded)
            }
        };
        read.map_err(|e| DecodeError::Malformed(format!("invalid Brotli stream: {e}")))?;
        debug!("Decoded {} byte envelope into {} bytes", envelope.len(), decoded.len());
        Ok(decoded)
    }
}

/// Wraps `data` in a Brotli envelope.
pub fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut out, BUFFER_SIZE, QUALITY, WINDOW_LOG);
        writer.write_all(data)?;
        writer.flush()?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use ift_client_core::{
        CompatibilityId, FontRequest, IftClient, PatchCatalog, PatchBuilder, ResolveOptions,
        SubsetDefinition, Tag, config::IFT_TABLE_TAG,
    };

    use super::*;

    #[test]
    fn test_round_trip() {
        let data: Vec<u8> = (0..10_000u32).flat_map(|i| (i % 251).to_be_bytes()).collect();
        let envelope = compress(&data).unwrap();
        assert!(envelope.len() < data.len());
        assert_eq!(BrotliDecoder::new().decode(&envelope).unwrap(), data);
    }

    #[test]
    fn test_rejects_truncated_stream() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
        let envelope = compress(&data).unwrap();
        let result = BrotliDecoder::new().decode(&envelope[..envelope.len() / 2]);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_size_limit() {
        let envelope = compress(&[0u8; 1024]).unwrap();
        assert_eq!(BrotliDecoder::new().max_decoded_len(1024).decode(&envelope).unwrap().len(), 1024);
        assert!(matches!(
            BrotliDecoder::new().max_decoded_len(1023).decode(&envelope),
            Err(DecodeError::TooLarge { limit: 1023 })
        ));
    }

    #[tokio::test]
    async fn test_resolves_compressed_patches() -> anyhow::Result<()> {
        let patch = PatchBuilder::new(CompatibilityId::NONE)
            .replace_table(IFT_TABLE_TAG, CompatibilityId::new([1, 0, 0, 0]).to_ift_table())
            .replace_table(Tag::new(b"glyf"), vec![0; 64])
            .coverage(SubsetDefinition::from_text("brotli"))
            .build();

        let decoder = BrotliDecoder::new();
        let mut catalog = PatchCatalog::new();
        catalog.insert("initial.iftk.br", compress(&patch)?, &decoder)?;

        let client = IftClient::new(ResolveOptions::default());
        let font = client
            .request_font(&FontRequest::new("Compressed").text("brr"), &decoder, &catalog)
            .await?;
        assert_eq!(CompatibilityId::of_snapshot(Some(&font[..]))?, CompatibilityId::new([1, 0, 0, 0]));
        Ok(())
    }
}
