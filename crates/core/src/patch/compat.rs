//! Compatibility ids tie a patch to the exact font it was generated against.

use std::fmt;

use read_fonts::{FontData, FontRef};

use crate::{
    config::{IFT_TABLE_TAG, SUPPORTED_IFT_FORMATS},
    error::PatchError,
};

/// Offset of the compatibility id inside the `IFT ` table (after format + reserved bytes).
const COMPAT_ID_OFFSET: usize = 4;

/// 128-bit id stored in a font's `IFT ` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompatibilityId([u32; 4]);

impl CompatibilityId {
    /// Id matched by patches that build a font from nothing.
    pub const NONE: Self = Self([0; 4]);

    pub const fn new(words: [u32; 4]) -> Self {
        Self(words)
    }

    pub fn words(&self) -> [u32; 4] {
        self.0
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Reads the id from the `IFT ` table of `font`.
    pub fn from_font(font: &FontRef) -> Result<Self, PatchError> {
        let table = font.table_data(IFT_TABLE_TAG).ok_or(PatchError::NotIncremental)?;
        Self::from_table(table)
    }

    /// Reads the id of a font snapshot, treating an absent snapshot as [`Self::NONE`].
    pub fn of_snapshot(snapshot: Option<&[u8]>) -> Result<Self, PatchError> {
        match snapshot {
            Some(data) => Self::from_font(&FontRef::new(data)?),
            None => Ok(Self::NONE),
        }
    }

    fn from_table(table: FontData) -> Result<Self, PatchError> {
        let format: u8 = table.read_at(0)?;
        if !SUPPORTED_IFT_FORMATS.contains(&format) {
            return Err(PatchError::UnsupportedIftFormat(format));
        }
        let mut words = [0u32; 4];
        for (i, word) in words.iter_mut().enumerate() {
            *word = table.read_at(COMPAT_ID_OFFSET + i * 4)?;
        }
        Ok(Self(words))
    }

    /// Encodes a minimal format 2 `IFT ` table carrying this id.
    pub fn to_ift_table(&self) -> Vec<u8> {
        let mut table = vec![2, 0, 0, 0];
        for word in self.0 {
            table.extend_from_slice(&word.to_be_bytes());
        }
        table
    }
}

impl fmt::Display for CompatibilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:08x}-{b:08x}-{c:08x}-{d:08x}")
    }
}
