//! Engine configuration.
//!
//! Every tunable the matcher and smoother depend on lives here so hosts can
//! re-tune against their own labeled data instead of patching constants.

use serde::{Deserialize, Serialize};

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Normalization parameters
    pub normalizer: NormalizerConfig,

    /// Matching parameters
    pub matcher: MatcherConfig,

    /// Temporal smoothing parameters
    pub smoother: SmootherConfig,

    /// Per-landmark confidence below which a landmark is treated as unseen
    pub visibility_floor: f32,

    /// Confidence floor for the critical landmarks (shoulders, hips)
    pub critical_floor: f32,

    /// Minimum critical landmarks that must clear the floor before matching
    pub min_critical_landmarks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Scale multiplier applied to the torso reference length, chosen so
    /// normalized coordinates cluster inside a unit box around (0.5, 0.5)
    pub scale_factor: f32,

    /// Confidence floor for the torso anchor landmarks
    pub torso_floor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Best-of-catalog score below which a frame is reported Unknown
    pub acceptance_threshold: f32,

    /// Blend weight for normalized-position similarity
    pub position_weight: f32,

    /// Blend weight for joint-angle similarity
    pub angle_weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Maximum detections retained in the history window
    pub capacity: usize,

    /// Detections older than this are dropped regardless of count
    pub ttl_ms: i64,

    /// Minimum history length before a smoothed pose is reported
    pub min_history: usize,

    /// Occurrence fraction a label needs within the window
    pub consistency_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig {
                scale_factor: 2.5,
                torso_floor: 0.3,
            },
            matcher: MatcherConfig {
                acceptance_threshold: 0.55,
                position_weight: 0.4,
                angle_weight: 0.6,
            },
            smoother: SmootherConfig {
                capacity: 10,
                ttl_ms: 2000,
                min_history: 3,
                consistency_threshold: 0.4,
            },
            visibility_floor: 0.3,
            critical_floor: 0.5,
            min_critical_landmarks: 3,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("POSEMATCH"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("POSEMATCH"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.matcher.acceptance_threshold, 0.55);
        assert_eq!(config.matcher.position_weight, 0.4);
        assert_eq!(config.matcher.angle_weight, 0.6);
        assert_eq!(config.smoother.capacity, 10);
        assert_eq!(config.smoother.ttl_ms, 2000);
        assert_eq!(config.visibility_floor, 0.3);
    }
}
