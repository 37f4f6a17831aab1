/// Cell cost at or above which a cell cannot be entered, unless configured
/// otherwise.
pub const IMPASSABLE_COST: f32 = 1000.0;

/// Tunables of a [`PathFinder`](crate::PathFinder).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Cells whose cost is `>=` this value are never expanded.
    pub impassable_threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            impassable_threshold: IMPASSABLE_COST,
        }
    }
}

impl SearchConfig {
    pub fn with_impassable_threshold(mut self, threshold: f32) -> Self {
        self.impassable_threshold = threshold;
        self
    }
}
