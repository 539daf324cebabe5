// config.rs - Engine configuration

use std::time::Duration;

/// Inclusive range of grid sizes the engine will allocate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

impl SizeBounds {
    pub fn contains(&self, size: usize) -> bool {
        (self.min..=self.max).contains(&size)
    }

    pub fn clamp(&self, size: usize) -> usize {
        size.clamp(self.min, self.max)
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self { min: 5, max: 74 }
    }
}

/// How a forward step is reported to the display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reporting {
    /// One `CellChanged` per cell that flipped.
    #[default]
    Delta,
    /// One `FullGrid` per step.
    Snapshot,
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub bounds: SizeBounds,
    pub default_size: usize,
    pub default_interval: Duration,
    pub reporting: Reporting,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: SizeBounds::default(),
            default_size: 25,
            default_interval: Duration::from_millis(100),
            reporting: Reporting::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_match_the_size_input() {
        let bounds = SizeBounds::default();
        assert!(!bounds.contains(4));
        assert!(bounds.contains(5));
        assert!(bounds.contains(74));
        assert!(!bounds.contains(75));
        assert_eq!(bounds.clamp(1), 5);
        assert_eq!(bounds.clamp(500), 74);
        assert_eq!(bounds.clamp(30), 30);
    }

    #[test]
    fn default_size_is_in_bounds() {
        let config = EngineConfig::default();
        assert!(config.bounds.contains(config.default_size));
        assert_eq!(config.default_interval, Duration::from_millis(100));
    }
}
