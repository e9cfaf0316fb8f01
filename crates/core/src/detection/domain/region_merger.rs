use serde::{Deserialize, Serialize};

use crate::shared::region::Region;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// One greedy left-to-right sweep. A region passed over before the
    /// accumulator grew into it stays separate.
    #[default]
    SinglePass,
    /// Sweep repeatedly until nothing merges: full connected components.
    Transitive,
}

/// Unions overlapping block candidates into face-sized regions.
///
/// The default single pass is what the filter thresholds were tuned
/// against; `Transitive` is opt-in.
#[derive(Clone, Debug, Default)]
pub struct RegionMerger {
    strategy: MergeStrategy,
}

impl RegionMerger {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub fn merge(&self, regions: &[Region]) -> Vec<Region> {
        match self.strategy {
            MergeStrategy::SinglePass => merge_single_pass(regions),
            MergeStrategy::Transitive => {
                let mut current = merge_single_pass(regions);
                loop {
                    let next = merge_single_pass(&current);
                    if next.len() == current.len() {
                        return next;
                    }
                    current = next;
                }
            }
        }
    }
}

/// Each unconsumed region seeds an accumulator that absorbs every later
/// unconsumed region overlapping it at the moment it is visited.
fn merge_single_pass(regions: &[Region]) -> Vec<Region> {
    if regions.len() <= 1 {
        return regions.to_vec();
    }

    let mut consumed = vec![false; regions.len()];
    let mut merged = Vec::new();

    for i in 0..regions.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        let mut acc = regions[i].clone();

        for j in (i + 1)..regions.len() {
            if !consumed[j] && acc.overlaps(&regions[j]) {
                acc = acc.union(&regions[j]);
                consumed[j] = true;
            }
        }
        merged.push(acc);
    }

    merged
}
