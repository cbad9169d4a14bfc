//! Protocol constants and resolution options.

use read_fonts::types::Tag;

/// Tag of the table carrying the incremental font metadata.
pub const IFT_TABLE_TAG: Tag = Tag::new(b"IFT ");

/// Format tag at the start of every table-keyed patch.
pub const PATCH_FORMAT_TAG: Tag = Tag::new(b"iftk");

/// `IFT ` table formats this client understands.
pub const SUPPORTED_IFT_FORMATS: &[u8] = &[1, 2];

/// Upper bound on patches applied by a single resolution.
pub const DEFAULT_MAX_PATCH_ITERATIONS: usize = 32;

/// Options controlling the patch-resolution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of patches one `resolve` call may apply.
    pub max_iterations: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_iterations: DEFAULT_MAX_PATCH_ITERATIONS }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
