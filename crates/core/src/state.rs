//! Per-font incremental subsetting state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::{
    Coverage, Decoder, Error, PatchChannel, Result, SubsetDefinition, config::ResolveOptions,
    patch::Patch,
};

/// Immutable font binary shared between the state and its callers.
pub type FontBinary = Arc<[u8]>;

/// Observable lifecycle phase of an [`IftState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No font snapshot has been committed yet.
    Empty,
    /// A resolution is in flight.
    Resolving,
    /// The committed snapshot satisfies the target.
    Current,
    /// The target has grown past what the committed snapshot covers.
    Pending,
}

/// Snapshot and coverage pair; only ever replaced as a whole.
#[derive(Debug, Clone, Default)]
struct Committed {
    snapshot: Option<FontBinary>,
    coverage: Coverage,
}

/// State for one logical font: the cumulative target and the font binary
/// known to cover part (or all) of it.
#[derive(Debug)]
pub struct IftState {
    font_id: String,
    options: ResolveOptions,
    target: Mutex<SubsetDefinition>,
    committed: Mutex<Committed>,
    resolving: tokio::sync::Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl IftState {
    pub fn new(font_id: impl Into<String>, options: ResolveOptions) -> Self {
        Self {
            font_id: font_id.into(),
            options,
            target: Mutex::default(),
            committed: Mutex::default(),
            resolving: tokio::sync::Mutex::new(()),
        }
    }

    pub fn font_id(&self) -> &str {
        &self.font_id
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Cumulative requirements ever requested for this font.
    pub fn target(&self) -> SubsetDefinition {
        lock(&self.target).clone()
    }

    /// Part of the target the committed snapshot is known to cover.
    pub fn satisfied(&self) -> SubsetDefinition {
        let target = self.target();
        lock(&self.committed).coverage.satisfied(&target)
    }

    /// Everything the committed snapshot is known to cover, requested or not.
    pub fn coverage(&self) -> Coverage {
        lock(&self.committed).coverage.clone()
    }

    /// Last committed font binary, if any.
    pub fn snapshot(&self) -> Option<FontBinary> {
        lock(&self.committed).snapshot.clone()
    }

    /// Requirements still missing from the committed snapshot.
    pub fn gap(&self) -> SubsetDefinition {
        let target = self.target();
        lock(&self.committed).coverage.gap(&target)
    }

    pub fn phase(&self) -> Phase {
        if self.resolving.try_lock().is_err() {
            return Phase::Resolving;
        }
        let gap = self.gap();
        match lock(&self.committed).snapshot {
            None => Phase::Empty,
            Some(_) if gap.is_empty() => Phase::Current,
            Some(_) => Phase::Pending,
        }
    }

    /// Merges `delta` into the target. Returns `false` when nothing new was
    /// requested, in which case no patch work is needed on its account.
    ///
    /// May be called while a resolution is in flight; the running loop picks
    /// up the enlarged target at its next gap computation.
    pub fn accumulate(&self, delta: &SubsetDefinition) -> bool {
        let mut target = lock(&self.target);
        let changed = target.merge(delta);
        if changed {
            debug!("[{}] target grew to {}", self.font_id, *target);
        }
        changed
    }

    /// Brings the snapshot up to the current target and returns it.
    ///
    /// Resolutions of the same font are serialized. Patches are applied to a
    /// staged copy which is committed only once the gap closes, so any error
    /// (or dropping the future) leaves the previous snapshot and coverage
    /// exactly as they were.
    pub async fn resolve<D, C>(&self, decoder: &D, channel: &C) -> Result<FontBinary>
    where
        D: Decoder + ?Sized,
        C: PatchChannel,
    {
        let _resolving = self.resolving.lock().await;
        let Committed { mut snapshot, mut coverage } = lock(&self.committed).clone();
        let mut applied = 0;

        loop {
            let gap = coverage.gap(&self.target());
            if gap.is_empty()
                && let Some(current) = snapshot.clone()
            {
                if applied > 0 {
                    info!("[{}] applied {applied} patches, font now covers {coverage}", self.font_id);
                    *lock(&self.committed) = Committed { snapshot, coverage };
                }
                return Ok(current);
            }

            if applied == self.options.max_iterations {
                return Err(Error::ResolutionLimitExceeded {
                    font_id: self.font_id.clone(),
                    limit: self.options.max_iterations,
                });
            }

            debug!("[{}] requesting patch {} for {gap}", self.font_id, applied + 1);
            let encoded = channel
                .next_patch(snapshot.as_deref(), &gap)
                .await
                .map_err(|cause| Error::Fetch { font_id: self.font_id.clone(), cause })?;
            let Some(encoded) = encoded else {
                return Err(Error::UnsatisfiableRequest { font_id: self.font_id.clone(), gap });
            };

            let decoded = decoder.decode(&encoded)?;
            let patch = Patch::parse(&decoded)?;
            let patched = patch.apply(snapshot.as_deref())?;

            coverage.add(patch.coverage());
            if coverage.gap(&gap) == gap && snapshot.is_some() {
                warn!("[{}] patch made no progress on {gap}", self.font_id);
            }
            snapshot = Some(patched.into());
            applied += 1;
        }
    }
}
