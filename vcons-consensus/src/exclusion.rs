use vcons_core::ConfigError;
use vcons_core::models::PositionInterval;

///
/// Reference positions that must never receive a variant.
///
/// Intervals are validated on construction and merged into a sorted,
/// non-overlapping list, so a lookup is a binary search.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionExclusionFilter {
    intervals: Vec<PositionInterval>,
}

impl RegionExclusionFilter {
    /// A filter that excludes nothing.
    pub fn empty() -> Self {
        RegionExclusionFilter::default()
    }

    ///
    /// Build the filter from region specs (`"n"` or `"start-end"`)
    ///
    /// # Arguments
    /// - specs: region specifications; the first invalid one is reported
    ///
    pub fn new<I, S>(specs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let intervals = specs
            .into_iter()
            .map(|spec| spec.as_ref().parse::<PositionInterval>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RegionExclusionFilter::from_intervals(intervals))
    }

    pub fn from_intervals(mut intervals: Vec<PositionInterval>) -> Self {
        intervals.sort_unstable();

        let mut merged: Vec<PositionInterval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            match merged.last_mut() {
                Some(last) if last.touches(&interval) => {
                    last.end = last.end.max(interval.end);
                }
                _ => merged.push(interval),
            }
        }

        RegionExclusionFilter { intervals: merged }
    }

    /// True if `position` lies in any configured interval.
    pub fn contains(&self, position: u64) -> bool {
        self.overlaps(position, position)
    }

    /// True if any position in `[start, end]` is excluded.
    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        // first interval that ends at or after `start`
        let idx = self.intervals.partition_point(|i| i.end < start);
        self.intervals
            .get(idx)
            .is_some_and(|interval| interval.start <= end)
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The merged intervals, sorted by start.
    pub fn intervals(&self) -> &[PositionInterval] {
        &self.intervals
    }
}
