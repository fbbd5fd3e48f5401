//! Reference pose catalog.
//!
//! Exemplars are static, so each entry's normalized frame and angle set are
//! computed once at load time; the matcher only reads them afterwards.

use posematch_core::{Error, Landmark, PoseFrame, Result, UNKNOWN_LABEL};
use serde::{Deserialize, Serialize};

use crate::angles::{extract_angles, AngleSet};
use crate::config::EngineConfig;
use crate::normalizer::normalize;
use crate::similarity::{min_usable_core, CORE_LANDMARKS};

/// A named reference pose with its canonical exemplar frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencePose {
    pub name: String,
    pub exemplar: PoseFrame,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_ref: String,
}

/// One validated catalog entry with precomputed comparison data
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub pose: ReferencePose,
    pub normalized: PoseFrame,
    pub angles: AngleSet,
}

/// Immutable, validated collection of reference poses.
///
/// Construction filters any synthetic "Unknown" placeholder and rejects
/// exemplars the matcher could not meaningfully score against.
#[derive(Debug, Clone, Default)]
pub struct PoseCatalog {
    entries: Vec<CatalogEntry>,
}

impl PoseCatalog {
    pub fn new(poses: Vec<ReferencePose>, config: &EngineConfig) -> Result<Self> {
        let mut entries = Vec::with_capacity(poses.len());

        for pose in poses {
            if pose.name == UNKNOWN_LABEL {
                tracing::debug!(name = %pose.name, "filtering synthetic catalog entry");
                continue;
            }

            validate_exemplar(&pose, config)?;

            let normalized = normalize(&pose.exemplar, &config.normalizer);
            let angles = extract_angles(&pose.exemplar, config.visibility_floor);

            entries.push(CatalogEntry {
                pose,
                normalized,
                angles,
            });
        }

        if entries.is_empty() {
            tracing::warn!("pose catalog loaded with zero usable entries");
        }

        Ok(Self { entries })
    }

    /// Parse a catalog from an in-memory JSON document
    pub fn from_json(json: &str, config: &EngineConfig) -> Result<Self> {
        let poses: Vec<ReferencePose> = serde_json::from_str(json)?;
        Self::new(poses, config)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.pose.name == name)
    }
}

/// An exemplar must carry the landmarks the engine compares: the torso
/// anchors for normalization plus enough confident core landmarks for the
/// position score's minimum-count gate.
fn validate_exemplar(pose: &ReferencePose, config: &EngineConfig) -> Result<()> {
    for &lm in Landmark::torso() {
        if pose.exemplar.visible(lm, config.normalizer.torso_floor).is_none() {
            return Err(Error::DegenerateExemplar {
                name: pose.name.clone(),
                reason: format!("torso landmark {lm:?} missing or below confidence floor"),
            });
        }
    }

    let core_visible = CORE_LANDMARKS
        .iter()
        .filter(|&&lm| pose.exemplar.visible(lm, config.visibility_floor).is_some())
        .count();
    let min_core = min_usable_core();
    if core_visible < min_core {
        return Err(Error::DegenerateExemplar {
            name: pose.name.clone(),
            reason: format!("only {core_visible} of {min_core} required core landmarks visible"),
        });
    }

    Ok(())
}
