/// Empirical RGB bands that plausibly represent human skin.
///
/// The bands overlap and are OR-ed together: the classifier favors recall,
/// and block aggregation downstream absorbs the false positives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkinToneBand {
    Light,
    Medium,
    Dark,
    Olive,
}

impl SkinToneBand {
    pub const ALL: [SkinToneBand; 4] = [
        SkinToneBand::Light,
        SkinToneBand::Medium,
        SkinToneBand::Dark,
        SkinToneBand::Olive,
    ];

    pub fn contains(self, r: u8, g: u8, b: u8) -> bool {
        let (r, g, b) = (r as i32, g as i32, b as i32);
        match self {
            SkinToneBand::Light => {
                let spread = r.max(g).max(b) - r.min(g).min(b);
                r > 95 && g > 40 && b > 20 && spread > 15 && (r - g).abs() > 15 && r > g && r > b
            }
            SkinToneBand::Medium => {
                (81..220).contains(&r)
                    && (51..180).contains(&g)
                    && (31..150).contains(&b)
                    && r > g
                    && g > b
                    && r - g > 10
            }
            SkinToneBand::Dark => {
                (46..120).contains(&r)
                    && (31..100).contains(&g)
                    && (21..80).contains(&b)
                    && r > g
                    && g >= b
                    && r - g > 5
            }
            SkinToneBand::Olive => {
                (101..200).contains(&r)
                    && (81..170).contains(&g)
                    && (61..140).contains(&b)
                    && (r - g).abs() < 30
                    && r > b
                    && g > b
            }
        }
    }

    /// Every band the color falls into, in declaration order.
    pub fn matching(r: u8, g: u8, b: u8) -> Vec<SkinToneBand> {
        Self::ALL
            .into_iter()
            .filter(|band| band.contains(r, g, b))
            .collect()
    }
}

pub fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    SkinToneBand::ALL
        .iter()
        .any(|band| band.contains(r, g, b))
}
