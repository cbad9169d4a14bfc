//! Hand-off of resolved fonts to the rendering side.

use anyhow::Result;

/// Presentation metadata passed through to the installer unchanged.
///
/// Values use CSS descriptor syntax, e.g. `weight = "100 900"`,
/// `stretch = "75% 100%"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontDescriptor {
    pub weight: Option<String>,
    pub stretch: Option<String>,
}

impl FontDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn stretch(mut self, stretch: impl Into<String>) -> Self {
        self.stretch = Some(stretch.into());
        self
    }
}

/// Makes a font binary available to the rendering pipeline under a family name.
pub trait FontInstaller {
    fn install(&mut self, family: &str, binary: &[u8], descriptor: &FontDescriptor) -> Result<()>;
}
