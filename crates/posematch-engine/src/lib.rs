//! # PoseMatch-Engine
//!
//! Pose matching and temporal stabilization: given a per-frame stream of 2D
//! body-landmark detections, decide which named pose the subject is holding
//! and with what confidence, without flickering between labels on jitter.
//!
//! ## Pipeline
//!
//! 1. **Normalizer** - body-centric, scale-invariant coordinates
//! 2. **Angle Extractor** - named joint angles, the primary match signal
//! 3. **Similarity Scorer** - blended position/angle score per exemplar
//! 4. **Pose Matcher** - best-of-catalog with an acceptance threshold
//! 5. **Temporal Smoother** - consistency-gated vote over recent history
//!
//! [`PoseClassifier`] wires the pipeline per frame; every degenerate input
//! collapses to the `Unknown` result value rather than an error, so a noisy
//! frame can never stall a real-time loop.

pub mod angles;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod heuristics;
pub mod matcher;
pub mod normalizer;
pub mod similarity;
pub mod smoother;

pub use angles::{extract_angles, AngleSet, JointAngle};
pub use catalog::{CatalogEntry, PoseCatalog, ReferencePose};
pub use classifier::PoseClassifier;
pub use config::{EngineConfig, MatcherConfig, NormalizerConfig, SmootherConfig};
pub use heuristics::{AngleRange, HeuristicRule};
pub use matcher::PoseMatcher;
pub use normalizer::normalize;
pub use similarity::{angle_similarity, position_similarity, similarity, CORE_LANDMARKS};
pub use smoother::{Detection, TemporalSmoother};
