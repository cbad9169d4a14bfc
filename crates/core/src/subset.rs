//! Subset definitions: what a font snapshot must be able to render.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use read_fonts::types::Tag;

/// A closed interval on a design-space axis.
///
/// A single requested value is stored as a degenerate interval (`min == max`).
/// Both bounds are always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    min: f32,
    max: f32,
}

impl AxisRange {
    /// Creates a range from two bounds given in any order.
    ///
    /// Returns `None` if either bound is NaN or infinite.
    pub fn new(a: f32, b: f32) -> Option<Self> {
        (a.is_finite() && b.is_finite()).then(|| Self { min: a.min(b), max: a.max(b) })
    }

    /// Creates a range covering exactly one point on the axis.
    pub fn point(value: f32) -> Option<Self> {
        Self::new(value, value)
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns `true` if `other` lies entirely within this range.
    pub fn contains(&self, other: &AxisRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Returns `true` if the ranges share at least one point.
    pub fn overlaps(&self, other: &AxisRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Smallest range containing both `self` and `other`.
    pub fn hull(&self, other: &AxisRange) -> AxisRange {
        Self { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Overlapping part of both ranges, if any.
    pub fn intersection(&self, other: &AxisRange) -> Option<AxisRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(Self { min, max })
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// Accumulated rendering requirements for one font.
///
/// A definition only ever grows: there are no removal operations, and every
/// `add_*` method reports whether it changed anything so callers can skip
/// redundant patch work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsetDefinition {
    codepoints: BTreeSet<u32>,
    features: BTreeSet<Tag>,
    design_space: BTreeMap<Tag, AxisRange>,
}

impl SubsetDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a definition holding every code point that appears in `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            codepoints: text.chars().map(u32::from).collect(),
            ..Self::default()
        }
    }

    pub fn codepoints(&self) -> &BTreeSet<u32> {
        &self.codepoints
    }

    pub fn features(&self) -> &BTreeSet<Tag> {
        &self.features
    }

    pub fn design_space(&self) -> &BTreeMap<Tag, AxisRange> {
        &self.design_space
    }

    /// Unions `codepoints` into the definition.
    pub fn add_codepoints(&mut self, codepoints: impl IntoIterator<Item = u32>) -> bool {
        let before = self.codepoints.len();
        self.codepoints.extend(codepoints);
        self.codepoints.len() != before
    }

    pub fn add_feature(&mut self, tag: Tag) -> bool {
        self.features.insert(tag)
    }

    /// Widens the stored interval for `tag` to also cover `[low, high]`.
    ///
    /// The stored interval is never narrowed. Non-finite bounds are
    /// rejected and leave the definition unchanged.
    pub fn add_design_space(&mut self, tag: Tag, low: f32, high: f32) -> bool {
        AxisRange::new(low, high).is_some_and(|range| self.add_axis_range(tag, range))
    }

    pub fn add_axis_range(&mut self, tag: Tag, range: AxisRange) -> bool {
        match self.design_space.get_mut(&tag) {
            Some(existing) if existing.contains(&range) => false,
            Some(existing) => {
                *existing = existing.hull(&range);
                true
            }
            None => {
                self.design_space.insert(tag, range);
                true
            }
        }
    }

    /// Merges every requirement of `other` into `self`.
    pub fn merge(&mut self, other: &SubsetDefinition) -> bool {
        let mut changed = self.add_codepoints(other.codepoints.iter().copied());
        for tag in &other.features {
            changed |= self.add_feature(*tag);
        }
        for (tag, range) in &other.design_space {
            changed |= self.add_axis_range(*tag, *range);
        }
        changed
    }

    /// The part of `self` that `other` does not cover.
    ///
    /// An axis is part of the difference (with its full interval) unless
    /// `other` holds an interval containing it.
    pub fn difference(&self, other: &SubsetDefinition) -> SubsetDefinition {
        SubsetDefinition {
            codepoints: self.codepoints.difference(&other.codepoints).copied().collect(),
            features: self.features.difference(&other.features).copied().collect(),
            design_space: self
                .design_space
                .iter()
                .filter(|(tag, range)| {
                    !other.design_space.get(*tag).is_some_and(|covered| covered.contains(range))
                })
                .map(|(tag, range)| (*tag, *range))
                .collect(),
        }
    }

    /// Requirements present in both definitions.
    pub fn intersection(&self, other: &SubsetDefinition) -> SubsetDefinition {
        SubsetDefinition {
            codepoints: self.codepoints.intersection(&other.codepoints).copied().collect(),
            features: self.features.intersection(&other.features).copied().collect(),
            design_space: self
                .design_space
                .iter()
                .filter_map(|(tag, range)| {
                    let other = other.design_space.get(tag)?;
                    range.intersection(other).map(|overlap| (*tag, overlap))
                })
                .collect(),
        }
    }

    /// Returns `true` if every requirement of `other` is already in `self`.
    pub fn covers(&self, other: &SubsetDefinition) -> bool {
        other.difference(self).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty() && self.features.is_empty() && self.design_space.is_empty()
    }

    /// Total number of code points, features and axes held.
    pub fn len(&self) -> usize {
        self.codepoints.len() + self.features.len() + self.design_space.len()
    }
}

impl fmt::Display for SubsetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} codepoints", self.codepoints.len())?;
        if !self.features.is_empty() {
            let features: Vec<String> = self.features.iter().map(Tag::to_string).collect();
            write!(f, ", features [{}]", features.join(" "))?;
        }
        if !self.design_space.is_empty() {
            let axes: Vec<String> =
                self.design_space.iter().map(|(tag, range)| format!("{tag}={range}")).collect();
            write!(f, ", axes [{}]", axes.join(" "))?;
        }
        Ok(())
    }
}
