//! Engine configuration.
//!
//! - `BoardLayout`: how many degrees of freedom the register carries
//! - `EngineConfig`: board layout plus sampling and simulation budgets

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Largest `max_qubits` a configuration may ask for. A state vector over this
/// many qubits takes 4 GiB.
pub const MAX_QUBITS_CEILING: usize = 28;

/// Board geometry as seen by the register.
///
/// The register holds one degree of freedom per playable square plus the
/// reserved finish slots, which sit after the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Playable squares on the ring.
    pub squares: usize,

    /// Reserved finish-line slots.
    pub finish_slots: usize,
}

impl BoardLayout {
    /// Create a layout.
    #[must_use]
    pub const fn new(squares: usize, finish_slots: usize) -> Self {
        Self {
            squares,
            finish_slots,
        }
    }

    /// Total register length.
    #[must_use]
    pub const fn register_len(self) -> usize {
        self.squares + self.finish_slots
    }

    /// Register index of the `n`th finish slot, if it exists.
    #[must_use]
    pub const fn finish_slot(self, n: usize) -> Option<usize> {
        if n < self.finish_slots {
            Some(self.squares + n)
        } else {
            None
        }
    }

    /// Square reached by walking `steps` forward from `from` around the ring.
    #[must_use]
    pub const fn advance(self, from: usize, steps: usize) -> usize {
        (from + steps) % self.squares
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(32, 2)
    }
}

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Register geometry.
    pub layout: BoardLayout,

    /// Samples drawn per measurement.
    pub shots: u32,

    /// Outcomes observed with a frequency below this are treated as noise.
    pub noise_floor: f64,

    /// Largest register the state-vector backend will simulate at once.
    pub max_qubits: usize,

    /// Active sets larger than this are simulated in chunks.
    pub chunk_threshold: usize,

    /// Degrees of freedom per chunk.
    pub chunk_size: usize,

    /// Random seed. Same seed and same program give the same measurement.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: BoardLayout::default(),
            shots: 1024,
            noise_floor: 0.005,
            max_qubits: 24,
            chunk_threshold: 20,
            chunk_size: 12,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Set the board layout.
    #[must_use]
    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the shot count.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the noise floor.
    #[must_use]
    pub fn with_noise_floor(mut self, noise_floor: f64) -> Self {
        self.noise_floor = noise_floor;
        self
    }

    /// Set the backend qubit budget.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set when and how the active set is chunked.
    #[must_use]
    pub fn with_chunking(mut self, threshold: usize, chunk_size: usize) -> Self {
        self.chunk_threshold = threshold;
        self.chunk_size = chunk_size;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the sampler cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.squares == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.shots == 0 {
            return Err(ConfigError::ZeroShots);
        }
        if !(0.0..1.0).contains(&self.noise_floor) {
            return Err(ConfigError::NoiseFloor(self.noise_floor.to_string()));
        }
        if self.max_qubits > MAX_QUBITS_CEILING {
            return Err(ConfigError::MaxQubits {
                max_qubits: self.max_qubits,
                ceiling: MAX_QUBITS_CEILING,
            });
        }
        if self.chunk_size == 0 || self.chunk_size > self.max_qubits {
            return Err(ConfigError::ChunkSize {
                chunk_size: self.chunk_size,
                max_qubits: self.max_qubits,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let layout = BoardLayout::default();
        assert_eq!(layout.register_len(), 34);
        assert_eq!(layout.finish_slot(0), Some(32));
        assert_eq!(layout.finish_slot(1), Some(33));
        assert_eq!(layout.finish_slot(2), None);
        assert_eq!(layout.advance(30, 5), 3);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_layout(BoardLayout::new(10, 2))
            .with_shots(256)
            .with_noise_floor(0.01)
            .with_max_qubits(16)
            .with_chunking(8, 4)
            .with_seed(9);

        assert_eq!(config.layout.register_len(), 12);
        assert_eq!(config.shots, 256);
        assert_eq!(config.max_qubits, 16);
        assert_eq!((config.chunk_threshold, config.chunk_size), (8, 4));
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_validate_rejects() {
        assert_eq!(
            EngineConfig::default().with_shots(0).validate(),
            Err(ConfigError::ZeroShots)
        );
        assert!(matches!(
            EngineConfig::default().with_noise_floor(1.0).validate(),
            Err(ConfigError::NoiseFloor(_))
        ));
        assert!(matches!(
            EngineConfig::default().with_chunking(20, 30).validate(),
            Err(ConfigError::ChunkSize { .. })
        ));
        assert_eq!(
            EngineConfig::default()
                .with_layout(BoardLayout::new(0, 2))
                .validate(),
            Err(ConfigError::EmptyBoard)
        );
    }

    #[test]
    fn test_validate_caps_max_qubits() {
        assert_eq!(
            EngineConfig::default().with_max_qubits(34).validate(),
            Err(ConfigError::MaxQubits { max_qubits: 34, ceiling: MAX_QUBITS_CEILING })
        );
        assert_eq!(
            EngineConfig::default().with_max_qubits(MAX_QUBITS_CEILING).validate(),
            Ok(())
        );
    }

    #[test]
    fn test_config_serde() {
        let config = EngineConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
