//! Patch sources.

use std::path::Path;

use anyhow::{Context, Result};
use glob::glob;
use log::{debug, warn};

use crate::{
    Decoder, SubsetDefinition,
    patch::{CompatibilityId, Patch},
};

/// Supplies the next patch needed to move a snapshot towards a gap.
///
/// Returning `Ok(None)` means no patch can make progress on `gap`.
#[allow(async_fn_in_trait)]
pub trait PatchChannel {
    async fn next_patch(
        &self,
        snapshot: Option<&[u8]>,
        gap: &SubsetDefinition,
    ) -> Result<Option<Vec<u8>>>;
}

/// A patch held by a [`PatchCatalog`], indexed by its decoded header.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    name: String,
    encoded: Vec<u8>,
    base: CompatibilityId,
    coverage: SubsetDefinition,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coverage(&self) -> &SubsetDefinition {
        &self.coverage
    }
}

/// In-memory set of patches that picks the best candidate for a gap.
#[derive(Debug, Clone, Default)]
pub struct PatchCatalog {
    entries: Vec<CatalogEntry>,
}

impl PatchCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every file in `dir` matching `pattern` (e.g. `"*.iftk"`).
    pub fn from_dir(dir: &Path, pattern: &str, decoder: &impl Decoder) -> Result<Self> {
        let pattern = dir.join(pattern);
        let pattern_str = pattern.to_str().context("Invalid pattern path")?;
        let mut paths: Vec<_> = glob(pattern_str)
            .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
            .filter_map(std::result::Result::ok)
            .collect();
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            let encoded = std::fs::read(&path)
                .with_context(|| format!("Failed to read patch: {}", path.display()))?;
            let name = path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            catalog
                .insert(name, encoded, decoder)
                .with_context(|| format!("Invalid patch: {}", path.display()))?;
        }
        debug!("Loaded {} patches from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Adds an encoded patch, decoding it once to index its header.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        encoded: Vec<u8>,
        decoder: &impl Decoder,
    ) -> crate::Result<()> {
        let decoded = decoder.decode(&encoded)?;
        let patch = Patch::parse(&decoded)?;
        self.entries.push(CatalogEntry {
            name: name.into(),
            base: patch.compatibility_id(),
            coverage: patch.coverage().clone(),
            encoded,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks the patch applicable to `snapshot` that covers the most of `gap`.
    ///
    /// Without a snapshot any patch built from nothing qualifies, even for an
    /// empty gap. Ties go to the earliest inserted entry.
    pub fn select(&self, snapshot: Option<&[u8]>, gap: &SubsetDefinition) -> Option<&CatalogEntry> {
        let base = match CompatibilityId::of_snapshot(snapshot) {
            Ok(base) => base,
            Err(e) => {
                warn!("Snapshot cannot be patched: {e}");
                return None;
            }
        };

        let mut best: Option<(&CatalogEntry, usize)> = None;
        for entry in self.entries.iter().filter(|entry| entry.base == base) {
            let score = entry.coverage.intersection(gap).len();
            if score == 0 && snapshot.is_some() {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((entry, score));
            }
        }
        best.map(|(entry, _)| entry)
    }
}

impl PatchChannel for PatchCatalog {
    async fn next_patch(
        &self,
        snapshot: Option<&[u8]>,
        gap: &SubsetDefinition,
    ) -> Result<Option<Vec<u8>>> {
        Ok(self.select(snapshot, gap).map(|entry| {
            debug!("Selected patch {} for {gap}", entry.name);
            entry.encoded.clone()
        }))
    }
}
