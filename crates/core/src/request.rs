//! Entry point used by the surrounding application.

use anyhow::Context;
use log::{debug, warn};
use read_fonts::types::Tag;

use crate::{
    Decoder, FontBinary, FontDescriptor, FontInstaller, PatchChannel, Result, StateRegistry,
    SubsetDefinition, config::ResolveOptions, subset::AxisRange,
};

/// Text and typographic settings a page wants to render with one font.
#[derive(Debug, Clone, Default)]
pub struct FontRequest {
    font_id: String,
    text: String,
    features: Vec<Tag>,
    design_space: Vec<(Tag, AxisRange)>,
}

impl FontRequest {
    pub fn new(font_id: impl Into<String>) -> Self {
        Self { font_id: font_id.into(), ..Default::default() }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn feature(mut self, tag: Tag) -> Self {
        self.features.push(tag);
        self
    }

    pub fn features(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.features.extend(tags);
        self
    }

    /// Requests a single position on an axis. NaN and infinite values are ignored.
    pub fn axis(self, tag: Tag, value: f32) -> Self {
        match AxisRange::point(value) {
            Some(range) => self.axis_range(tag, range),
            None => {
                warn!("[{}] ignoring non-finite value {value} for axis '{tag}'", self.font_id);
                self
            }
        }
    }

    pub fn axis_range(mut self, tag: Tag, range: AxisRange) -> Self {
        self.design_space.push((tag, range));
        self
    }

    pub fn font_id(&self) -> &str {
        &self.font_id
    }

    /// Requirements this request adds to the font's target.
    pub fn delta(&self) -> SubsetDefinition {
        let mut delta = SubsetDefinition::from_text(&self.text);
        for tag in &self.features {
            delta.add_feature(*tag);
        }
        for (tag, range) in &self.design_space {
            delta.add_axis_range(*tag, *range);
        }
        delta
    }
}

/// Application-level context owning the per-font states.
#[derive(Debug, Default)]
pub struct IftClient {
    registry: StateRegistry,
}

impl IftClient {
    pub fn new(options: ResolveOptions) -> Self {
        Self { registry: StateRegistry::new(options) }
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    /// Returns a font binary able to render everything `request` asks for,
    /// plus everything previously requested for the same font.
    pub async fn request_font<D, C>(
        &self,
        request: &FontRequest,
        decoder: &D,
        channel: &C,
    ) -> Result<FontBinary>
    where
        D: Decoder + ?Sized,
        C: PatchChannel,
    {
        let state = self.registry.get_or_create(request.font_id());
        if !state.accumulate(&request.delta()) {
            debug!("[{}] request already part of target", request.font_id());
        }
        state.resolve(decoder, channel).await
    }

    /// Resolves `request` and installs the result under `family`.
    pub async fn load_font<D, C, I>(
        &self,
        request: &FontRequest,
        family: &str,
        descriptor: &FontDescriptor,
        decoder: &D,
        channel: &C,
        installer: &mut I,
    ) -> anyhow::Result<FontBinary>
    where
        D: Decoder + ?Sized,
        C: PatchChannel,
        I: FontInstaller + ?Sized,
    {
        let binary = self
            .request_font(request, decoder, channel)
            .await
            .with_context(|| format!("Failed to resolve font '{}'", request.font_id()))?;
        installer
            .install(family, &binary, descriptor)
            .with_context(|| format!("Failed to install font family '{family}'"))?;
        Ok(binary)
    }
}
