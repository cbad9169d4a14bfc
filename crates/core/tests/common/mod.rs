//! Shared fixtures: a simulated patch server and scripted channels.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use anyhow::anyhow;
use ift_client_core::{
    CompatibilityId, PatchBuilder, PatchChannel, SubsetDefinition, Tag, config::IFT_TABLE_TAG,
};
use read_fonts::FontRef;

pub const GLYF: Tag = Tag::new(b"glyf");

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn generation(n: u32) -> CompatibilityId {
    CompatibilityId::new([n, 0, 0, 0])
}

/// Code points whose "glyphs" were appended to the `glyf` table, in patch order.
pub fn glyph_codepoints(font: &[u8]) -> Vec<u32> {
    let font = FontRef::new(font).unwrap();
    font.table_data(GLYF)
        .map(|data| {
            data.as_bytes()
                .chunks_exact(4)
                .map(|chunk| u32::from_be_bytes(chunk.try_into().unwrap()))
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    FetchStart(u32),
    FetchEnd(u32),
}

/// Builds patches on demand that extend the given snapshot by (part of) the gap.
pub struct PatchServer {
    supported: SubsetDefinition,
    chunk: usize,
    fetches: Cell<usize>,
    events: RefCell<Vec<Event>>,
}

impl PatchServer {
    pub fn new(supported: SubsetDefinition) -> Self {
        Self {
            supported,
            chunk: usize::MAX,
            fetches: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Limits each patch to `chunk` code points.
    pub fn chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn patch_for(&self, snapshot: Option<&[u8]>, gap: &SubsetDefinition) -> Option<Vec<u8>> {
        let base = CompatibilityId::of_snapshot(snapshot).ok()?;
        let servable = gap.intersection(&self.supported);
        if servable.is_empty() && snapshot.is_some() {
            return None;
        }

        let mut coverage = SubsetDefinition::new();
        coverage.add_codepoints(servable.codepoints().iter().copied().take(self.chunk));
        for tag in servable.features() {
            coverage.add_feature(*tag);
        }
        for (tag, range) in servable.design_space() {
            coverage.add_axis_range(*tag, *range);
        }

        let mut glyphs: Vec<u8> =
            snapshot.map(glyph_codepoints).unwrap_or_default().iter().flat_map(|cp| cp.to_be_bytes()).collect();
        for codepoint in coverage.codepoints() {
            glyphs.extend_from_slice(&codepoint.to_be_bytes());
        }

        let next = generation(base.words()[0] + 1);
        Some(
            PatchBuilder::new(base)
                .replace_table(IFT_TABLE_TAG, next.to_ift_table())
                .replace_table(GLYF, glyphs)
                .coverage(coverage)
                .build(),
        )
    }
}

impl PatchChannel for PatchServer {
    async fn next_patch(
        &self,
        snapshot: Option<&[u8]>,
        gap: &SubsetDefinition,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        let current = CompatibilityId::of_snapshot(snapshot)?.words()[0];
        self.fetches.set(self.fetches.get() + 1);
        self.events.borrow_mut().push(Event::FetchStart(current));
        tokio::task::yield_now().await;
        let patch = self.patch_for(snapshot, gap);
        self.events.borrow_mut().push(Event::FetchEnd(current));
        Ok(patch)
    }
}

/// Replays a fixed list of responses, then reports "no patch".
#[derive(Default)]
pub struct ScriptedChannel {
    responses: RefCell<VecDeque<anyhow::Result<Option<Vec<u8>>>>>,
    fetches: Cell<usize>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, patch: Vec<u8>) -> Self {
        self.responses.borrow_mut().push_back(Ok(Some(patch)));
        self
    }

    pub fn fail(self, message: &'static str) -> Self {
        self.responses.borrow_mut().push_back(Err(anyhow!(message)));
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl PatchChannel for ScriptedChannel {
    async fn next_patch(
        &self,
        _snapshot: Option<&[u8]>,
        _gap: &SubsetDefinition,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        self.fetches.set(self.fetches.get() + 1);
        self.responses.borrow_mut().pop_front().unwrap_or(Ok(None))
    }
}
