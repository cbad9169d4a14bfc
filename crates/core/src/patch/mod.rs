//! Table-keyed patches: parsing and application against a font snapshot.
//!
//! A patch names the compatibility id of the font it applies to, a list of
//! whole-table edits, and the coverage the patched font is known to have:
//!
//! ```text
//! Tag     format ('iftk')
//! u32     reserved
//! u32[4]  base compatibility id
//! u16     edit count, then per edit: Tag, u8 flags, u32 length, data
//! u32     code point count, then u32 code points
//! u16     feature count, then Tags
//! u16     axis count, then per axis: Tag, Fixed min, Fixed max
//! ```

mod builder;
mod compat;

pub use builder::PatchBuilder;
pub use compat::CompatibilityId;

use std::mem::size_of;

use read_fonts::{
    FontData, FontRef,
    types::{Fixed, Scalar, Tag},
};
use write_fonts::FontBuilder;

use crate::{SubsetDefinition, config::PATCH_FORMAT_TAG, error::PatchError};

/// Edit flag: insert the table, replacing any existing table with the same tag.
pub const REPLACE_TABLE: u8 = 0x01;
/// Edit flag: remove the table from the font.
pub const DROP_TABLE: u8 = 0x02;

/// A single whole-table edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEdit<'a> {
    Replace { tag: Tag, data: &'a [u8] },
    Drop(Tag),
}

impl TableEdit<'_> {
    pub fn tag(&self) -> Tag {
        match self {
            Self::Replace { tag, .. } | Self::Drop(tag) => *tag,
        }
    }
}

/// A decoded patch borrowing its table data from the decoded bytes.
#[derive(Debug, Clone)]
pub struct Patch<'a> {
    compatibility_id: CompatibilityId,
    edits: Vec<TableEdit<'a>>,
    coverage: SubsetDefinition,
}

impl<'a> Patch<'a> {
    /// Parses a decoded (envelope-free) patch.
    pub fn parse(data: &'a [u8]) -> Result<Self, PatchError> {
        let mut reader = Reader::new(data);

        let format: Tag = reader.read()?;
        if format != PATCH_FORMAT_TAG {
            return Err(PatchError::UnknownFormat(format));
        }
        let _reserved: u32 = reader.read()?;
        let compatibility_id = CompatibilityId::new([
            reader.read()?,
            reader.read()?,
            reader.read()?,
            reader.read()?,
        ]);

        let edit_count: u16 = reader.read()?;
        let mut edits = Vec::with_capacity(edit_count as usize);
        for _ in 0..edit_count {
            let tag: Tag = reader.read()?;
            let flags: u8 = reader.read()?;
            let len: u32 = reader.read()?;
            let data = reader.bytes(len as usize)?;
            edits.push(match flags {
                REPLACE_TABLE => TableEdit::Replace { tag, data },
                DROP_TABLE => TableEdit::Drop(tag),
                _ => return Err(PatchError::InvalidTableFlags { tag, flags }),
            });
        }

        let mut coverage = SubsetDefinition::new();
        let codepoint_count: u32 = reader.read()?;
        for _ in 0..codepoint_count {
            let codepoint: u32 = reader.read()?;
            if char::from_u32(codepoint).is_none() {
                return Err(PatchError::InvalidCodepoint(codepoint));
            }
            coverage.add_codepoints([codepoint]);
        }
        let feature_count: u16 = reader.read()?;
        for _ in 0..feature_count {
            coverage.add_feature(reader.read()?);
        }
        let axis_count: u16 = reader.read()?;
        for _ in 0..axis_count {
            let tag: Tag = reader.read()?;
            let min: Fixed = reader.read()?;
            let max: Fixed = reader.read()?;
            if coverage.design_space().contains_key(&tag) {
                return Err(PatchError::DuplicateAxis(tag));
            }
            coverage.add_design_space(tag, min.to_f64() as f32, max.to_f64() as f32);
        }
        if reader.pos != data.len() {
            return Err(PatchError::TrailingData(reader.pos));
        }

        Ok(Self { compatibility_id, edits, coverage })
    }

    /// Id of the font this patch must be applied to.
    pub fn compatibility_id(&self) -> CompatibilityId {
        self.compatibility_id
    }

    pub fn edits(&self) -> &[TableEdit<'a>] {
        &self.edits
    }

    /// What the patched font is known to cover.
    pub fn coverage(&self) -> &SubsetDefinition {
        &self.coverage
    }

    /// Applies the patch to `base`, producing a new font binary.
    ///
    /// `base` is left untouched; on error nothing is produced.
    pub fn apply(&self, base: Option<&[u8]>) -> Result<Vec<u8>, PatchError> {
        let actual = CompatibilityId::of_snapshot(base)?;
        if actual != self.compatibility_id {
            return Err(PatchError::IncompatibleBase { expected: self.compatibility_id, actual });
        }

        let base = base.map(FontRef::new).transpose()?;
        let mut builder = FontBuilder::new();

        if let Some(font) = &base {
            for record in font.table_directory.table_records() {
                let tag = record.tag();
                if self.edits.iter().any(|edit| edit.tag() == tag) {
                    continue;
                }
                if let Some(table) = font.table_data(tag) {
                    builder.add_raw(tag, table.as_bytes());
                }
            }
        }
        for edit in &self.edits {
            if let TableEdit::Replace { tag, data } = edit {
                builder.add_raw(*tag, *data);
            }
        }

        let patched = builder.build();
        FontRef::new(&patched)?;
        Ok(patched)
    }
}

/// Sequential big-endian reader over patch bytes.
struct Reader<'a> {
    data: FontData<'a>,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data: FontData::new(data), pos: 0 }
    }

    fn read<T: Scalar>(&mut self) -> Result<T, PatchError> {
        let value = self.data.read_at::<T>(self.pos).map_err(|_| PatchError::Truncated(self.pos))?;
        self.pos += size_of::<T>();
        Ok(value)
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], PatchError> {
        let end = self.pos.checked_add(len).ok_or(PatchError::Truncated(self.pos))?;
        let slice = self.data.slice(self.pos..end).ok_or(PatchError::Truncated(self.pos))?;
        self.pos = end;
        Ok(slice.as_bytes())
    }
}
