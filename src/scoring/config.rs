/// Tunables for outlier scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Neighbors compared against each target (split around it by position).
    pub neighbor_count: usize,
}

impl ScoringConfig {
    pub const DEFAULT_NEIGHBOR_COUNT: usize = 10;

    pub fn with_neighbor_count(neighbor_count: usize) -> Self {
        Self { neighbor_count }
    }

    /// Preferred neighbors taken from newer positions: floor(N / 2).
    pub fn ideal_before(&self) -> usize {
        self.neighbor_count / 2
    }

    /// Preferred neighbors taken from older positions: ceil(N / 2).
    pub fn ideal_after(&self) -> usize {
        self.neighbor_count - self.ideal_before()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            neighbor_count: Self::DEFAULT_NEIGHBOR_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_counts_favor_the_after_side() {
        let config = ScoringConfig::with_neighbor_count(7);
        assert_eq!(config.ideal_before(), 3);
        assert_eq!(config.ideal_after(), 4);

        let config = ScoringConfig::default();
        assert_eq!((config.ideal_before(), config.ideal_after()), (5, 5));
    }
}
