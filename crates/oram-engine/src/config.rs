use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{OramError, OramResult};

/// Construction-time settings for a [`PathOram`](crate::PathOram).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OramConfig {
    /// Blocks per bucket (`Z`). Small values make eviction fail more often
    /// and the stash grow; `1` matches the classic single-slot layout.
    pub bucket_capacity: usize,
    /// Seed for the default randomness source. `None` seeds from OS entropy.
    /// Tests set this for reproducible leaf assignments.
    pub seed: Option<u64>,
    /// Log a warning whenever the stash holds more blocks than this after an
    /// access.
    pub stash_warn_threshold: Option<usize>,
    /// Run the full integrity audit after every access and fail on any
    /// violation. Costs a pass over the whole tree per access.
    pub audit_after_access: bool,
}

impl Default for OramConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: 1,
            seed: None,
            stash_warn_threshold: None,
            audit_after_access: false,
        }
    }
}

impl OramConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_bucket_capacity(mut self, capacity: usize) -> Self {
        self.bucket_capacity = capacity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_stash_warn_threshold(mut self, threshold: usize) -> Self {
        self.stash_warn_threshold = Some(threshold);
        self
    }

    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_after_access = enabled;
        self
    }

    /// Reject settings no store can be built with.
    pub fn validate(&self) -> OramResult<()> {
        if self.bucket_capacity == 0 {
            return Err(OramError::InvalidArgument(
                "bucket_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The default randomness source for this configuration.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn defaults() {
        let config = OramConfig::default();
        assert_eq!(config.bucket_capacity, 1);
        assert_eq!(config.seed, None);
        assert!(!config.audit_after_access);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let config = OramConfig::default()
            .with_bucket_capacity(4)
            .with_seed(9)
            .with_stash_warn_threshold(20)
            .with_audit(true);
        assert_eq!(config.bucket_capacity, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.stash_warn_threshold, Some(20));
        assert!(config.audit_after_access);
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let config = OramConfig::default().with_bucket_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(OramError::InvalidArgument(_))
        ));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = OramConfig::seeded(42);
        let mut a = config.rng();
        let mut b = config.rng();
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn serde_roundtrip() {
        let config = OramConfig::seeded(5).with_bucket_capacity(3);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: OramConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: OramConfig = serde_json::from_str(r#"{"bucket_capacity": 4}"#).unwrap();
        assert_eq!(parsed.bucket_capacity, 4);
        assert_eq!(parsed.seed, None);
        assert!(!parsed.audit_after_access);
    }
}
