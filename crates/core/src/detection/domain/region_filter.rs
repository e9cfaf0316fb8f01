use crate::shared::region::Region;

/// Final acceptance test for merged regions.
///
/// A region survives only when its confidence and its area both strictly
/// exceed the minimums. Each region is judged on its own; nothing is
/// combined here.
#[derive(Clone, Debug)]
pub struct RegionFilter {
    min_confidence: f64,
    min_area: i64,
}

impl RegionFilter {
    pub fn new(min_confidence: f64, min_area: i64) -> Self {
        Self {
            min_confidence,
            min_area,
        }
    }

    pub fn accepts(&self, region: &Region) -> bool {
        region.confidence > self.min_confidence && region.area() > self.min_area
    }

    pub fn apply(&self, regions: &[Region]) -> Vec<Region> {
        regions.iter().filter(|r| self.accepts(r)).cloned().collect()
    }
}
