//! Encoding of table-keyed patches.

use read_fonts::types::{Fixed, Scalar, Tag};

use super::{CompatibilityId, DROP_TABLE, REPLACE_TABLE};
use crate::{SubsetDefinition, config::PATCH_FORMAT_TAG};

/// Builds the binary form of a patch.
///
/// # Example
///
/// ```
/// use ift_client_core::{CompatibilityId, Patch, PatchBuilder, SubsetDefinition, Tag};
///
/// let data = PatchBuilder::new(CompatibilityId::NONE)
///     .replace_table(Tag::new(b"glyf"), vec![0; 4])
///     .coverage(SubsetDefinition::from_text("abc"))
///     .build();
/// let patch = Patch::parse(&data).unwrap();
/// assert_eq!(patch.coverage().codepoints().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    compatibility_id: CompatibilityId,
    edits: Vec<(Tag, u8, Vec<u8>)>,
    coverage: SubsetDefinition,
}

impl PatchBuilder {
    /// Starts a patch that applies to the font carrying `base`.
    pub fn new(base: CompatibilityId) -> Self {
        Self { compatibility_id: base, ..Default::default() }
    }

    pub fn replace_table(mut self, tag: Tag, data: impl Into<Vec<u8>>) -> Self {
        self.edits.push((tag, REPLACE_TABLE, data.into()));
        self
    }

    pub fn drop_table(mut self, tag: Tag) -> Self {
        self.edits.push((tag, DROP_TABLE, Vec::new()));
        self
    }

    /// Sets the coverage the patched font will have. Replaces any previous coverage.
    pub fn coverage(mut self, coverage: SubsetDefinition) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&PATCH_FORMAT_TAG.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        for word in self.compatibility_id.words() {
            out.extend_from_slice(&word.to_be_bytes());
        }

        out.extend_from_slice(&(self.edits.len() as u16).to_be_bytes());
        for (tag, flags, data) in &self.edits {
            out.extend_from_slice(&tag.to_be_bytes());
            out.push(*flags);
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(data);
        }

        let coverage = &self.coverage;
        out.extend_from_slice(&(coverage.codepoints().len() as u32).to_be_bytes());
        for codepoint in coverage.codepoints() {
            out.extend_from_slice(&codepoint.to_be_bytes());
        }
        out.extend_from_slice(&(coverage.features().len() as u16).to_be_bytes());
        for tag in coverage.features() {
            out.extend_from_slice(&tag.to_be_bytes());
        }
        out.extend_from_slice(&(coverage.design_space().len() as u16).to_be_bytes());
        for (tag, range) in coverage.design_space() {
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&Fixed::from_f64(range.min() as f64).to_raw());
            out.extend_from_slice(&Fixed::from_f64(range.max() as f64).to_raw());
        }
        out
    }
}
