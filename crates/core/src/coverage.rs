//! What a font snapshot is known to render.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use read_fonts::types::Tag;

use crate::{AxisRange, SubsetDefinition};

/// Coverage accumulated from the patches applied to a snapshot.
///
/// Unlike a [`SubsetDefinition`], each axis holds a list of disjoint
/// intervals: ranges delivered by separate patches are only joined when they
/// overlap, so the space between them is never reported as covered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coverage {
    codepoints: BTreeSet<u32>,
    features: BTreeSet<Tag>,
    design_space: BTreeMap<Tag, Vec<AxisRange>>,
}

impl Coverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Covered intervals of `tag`, sorted and pairwise disjoint.
    pub fn axis_ranges(&self, tag: Tag) -> &[AxisRange] {
        self.design_space.get(&tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Records everything `covered` declares. Returns `true` if anything new was added.
    pub fn add(&mut self, covered: &SubsetDefinition) -> bool {
        let before = self.clone();
        self.codepoints.extend(covered.codepoints());
        self.features.extend(covered.features());
        for (tag, range) in covered.design_space() {
            self.add_axis_range(*tag, *range);
        }
        *self != before
    }

    fn add_axis_range(&mut self, tag: Tag, range: AxisRange) {
        let ranges = self.design_space.entry(tag).or_default();
        let mut joined = range;
        ranges.retain(|existing| {
            if existing.overlaps(&joined) {
                joined = joined.hull(existing);
                false
            } else {
                true
            }
        });
        ranges.push(joined);
        ranges.sort_by(|a, b| a.min().total_cmp(&b.min()));
    }

    /// Returns `true` if a single covered interval of `tag` contains `range`.
    pub fn covers_axis(&self, tag: Tag, range: &AxisRange) -> bool {
        self.axis_ranges(tag).iter().any(|covered| covered.contains(range))
    }

    /// The part of `target` this coverage does not provide.
    pub fn gap(&self, target: &SubsetDefinition) -> SubsetDefinition {
        self.split(target, false)
    }

    /// The part of `target` this coverage provides.
    ///
    /// An axis counts only when its whole target interval is covered.
    pub fn satisfied(&self, target: &SubsetDefinition) -> SubsetDefinition {
        self.split(target, true)
    }

    fn split(&self, target: &SubsetDefinition, covered: bool) -> SubsetDefinition {
        let mut part = SubsetDefinition::new();
        part.add_codepoints(
            target.codepoints().iter().copied().filter(|cp| self.codepoints.contains(cp) == covered),
        );
        for tag in target.features() {
            if self.features.contains(tag) == covered {
                part.add_feature(*tag);
            }
        }
        for (tag, range) in target.design_space() {
            if self.covers_axis(*tag, range) == covered {
                part.add_axis_range(*tag, *range);
            }
        }
        part
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} codepoints", self.codepoints.len())?;
        if !self.features.is_empty() {
            let features: Vec<String> = self.features.iter().map(Tag::to_string).collect();
            write!(f, ", features [{}]", features.join(" "))?;
        }
        if !self.design_space.is_empty() {
            let axes: Vec<String> = self
                .design_space
                .iter()
                .map(|(tag, ranges)| {
                    let ranges: Vec<String> = ranges.iter().map(AxisRange::to_string).collect();
                    format!("{tag}={}", ranges.join(","))
                })
                .collect();
            write!(f, ", axes [{}]", axes.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGHT: Tag = Tag::new(b"wght");
    const LIGA: Tag = Tag::new(b"liga");

    fn range(min: f32, max: f32) -> AxisRange {
        AxisRange::new(min, max).unwrap()
    }

    fn axis(min: f32, max: f32) -> SubsetDefinition {
        let mut def = SubsetDefinition::new();
        def.add_design_space(WGHT, min, max);
        def
    }

    #[test]
    fn test_disjoint_ranges_stay_separate() {
        let mut coverage = Coverage::new();
        assert!(coverage.add(&axis(800.0, 900.0)));
        assert!(coverage.add(&axis(100.0, 200.0)));
        assert_eq!(coverage.axis_ranges(WGHT), &[range(100.0, 200.0), range(800.0, 900.0)]);

        assert!(coverage.covers_axis(WGHT, &range(150.0, 200.0)));
        assert!(!coverage.covers_axis(WGHT, &range(150.0, 850.0)));
        assert!(!coverage.covers_axis(WGHT, &AxisRange::point(500.0).unwrap()));
    }

    #[test]
    fn test_overlapping_ranges_join() {
        let mut coverage = Coverage::new();
        coverage.add(&axis(100.0, 200.0));
        coverage.add(&axis(800.0, 900.0));
        coverage.add(&axis(200.0, 400.0));
        assert_eq!(coverage.axis_ranges(WGHT), &[range(100.0, 400.0), range(800.0, 900.0)]);

        // Bridging both intervals collapses everything into one.
        coverage.add(&axis(350.0, 850.0));
        assert_eq!(coverage.axis_ranges(WGHT), &[range(100.0, 900.0)]);
        assert!(!coverage.add(&axis(300.0, 600.0)));
    }

    #[test]
    fn test_gap_and_satisfied_partition_target() {
        let mut coverage = Coverage::new();
        let mut covered = SubsetDefinition::from_text("ab");
        covered.add_feature(LIGA);
        coverage.add(&covered);
        coverage.add(&axis(100.0, 200.0));
        coverage.add(&axis(800.0, 900.0));

        let mut target = SubsetDefinition::from_text("abc");
        target.add_feature(LIGA);
        target.add_design_space(WGHT, 150.0, 850.0);

        let gap = coverage.gap(&target);
        assert_eq!(gap.codepoints().iter().copied().collect::<Vec<_>>(), vec![u32::from('c')]);
        assert!(gap.features().is_empty());
        assert_eq!(gap.design_space().get(&WGHT), Some(&range(150.0, 850.0)));

        let satisfied = coverage.satisfied(&target);
        assert_eq!(satisfied.codepoints().len(), 2);
        assert!(satisfied.features().contains(&LIGA));
        assert!(satisfied.design_space().is_empty());
    }

    #[test]
    fn test_display() {
        let mut coverage = Coverage::new();
        coverage.add(&SubsetDefinition::from_text("a"));
        coverage.add(&axis(100.0, 200.0));
        coverage.add(&axis(800.0, 800.0));
        assert_eq!(coverage.to_string(), "1 codepoints, axes [wght=100..200,800]");
    }
}
