//! Character mention detection
//!
//! Scans free text for tokens that approximately match the first or
//! last name of a known character.
//!
//! ## Flow
//! 1. Normalize and tokenize the content (`text`)
//! 2. Compare every token with every first/last name (`distance`)
//! 3. Drop candidates under `min_confidence`
//! 4. Keep the first candidate per (character, token)
//! 5. Rank by confidence, then character id, then token

pub mod distance;
pub mod text;

pub use distance::levenshtein_distance;

use crate::error::{Error, Result};
use crate::types::Personnage;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Detection thresholds
///
/// Only built through `new`, `with_overrides` or deserialization, all of
/// which validate, so a held value is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDetectionConfig")]
pub struct DetectionConfig {
    /// Maximum edit distance for a fuzzy match
    max_distance: usize,
    /// Minimum token length (chars)
    min_length: usize,
    /// Minimum confidence kept, in [0, 1]
    min_confidence: f64,
}

/// Wire shape of `DetectionConfig`, checked on conversion
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetectionConfig {
    max_distance: usize,
    min_length: usize,
    min_confidence: f64,
}

impl TryFrom<RawDetectionConfig> for DetectionConfig {
    type Error = Error;

    fn try_from(raw: RawDetectionConfig) -> Result<Self> {
        Self::new(raw.max_distance, raw.min_length, raw.min_confidence)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_distance: 3,
            min_length: 3,
            min_confidence: 0.6,
        }
    }
}

impl DetectionConfig {
    pub fn new(max_distance: usize, min_length: usize, min_confidence: f64) -> Result<Self> {
        let config = Self {
            max_distance,
            min_length,
            min_confidence,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn validate(&self) -> Result<()> {
        check_confidence(self.min_confidence)
    }

    /// Merge caller overrides onto this config
    pub fn with_overrides(&self, overrides: &DetectionOverrides) -> Result<Self> {
        let max_distance = match overrides.max_distance {
            Some(v) => non_negative("maxDistance", v)?,
            None => self.max_distance,
        };
        let min_length = match overrides.min_length {
            Some(v) => non_negative("minLength", v)?,
            None => self.min_length,
        };
        let min_confidence = overrides.min_confidence.unwrap_or(self.min_confidence);

        Self::new(max_distance, min_length, min_confidence)
    }
}

fn non_negative(field: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        Error::InvalidConfiguration(format!("{} must be >= 0 (got {})", field, value))
    })
}

fn check_confidence(value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "minConfidence must be within [0, 1] (got {})",
            value
        )))
    }
}

/// Partial, unchecked configuration supplied by a caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

impl DetectionOverrides {
    pub fn is_empty(&self) -> bool {
        self.max_distance.is_none() && self.min_length.is_none() && self.min_confidence.is_none()
    }

    /// Later overrides win field by field
    pub fn merge(&mut self, other: &DetectionOverrides) {
        if other.max_distance.is_some() {
            self.max_distance = other.max_distance;
        }
        if other.min_length.is_some() {
            self.min_length = other.min_length;
        }
        if other.min_confidence.is_some() {
            self.min_confidence = other.min_confidence;
        }
    }
}

/// Which name of the character matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameField {
    First,
    Last,
}

/// A probable character mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedMention {
    /// Normalized token found in the text
    pub name: String,
    pub personnage: Option<Personnage>,
    pub is_existing: bool,
    pub confidence: f64,
    pub matched_field: NameField,
}

impl DetectedMention {
    pub fn personnage_id(&self) -> Option<u64> {
        self.personnage.as_ref().map(|p| p.id)
    }
}

/// Detect character mentions in `content`
///
/// # Arguments
/// * `content` - free text, may contain markup
/// * `personnages` - read-only snapshot of the known characters
/// * `config` - validated thresholds
///
/// # Returns
/// Mentions sorted by descending confidence, unique per (character, token)
pub fn detect_mentions(
    content: &str,
    personnages: &[Personnage],
    config: &DetectionConfig,
) -> Vec<DetectedMention> {
    if content.is_empty() || personnages.is_empty() {
        tracing::debug!("no content or no personnages, skipping detection");
        return Vec::new();
    }

    let normalized = text::normalize_content(content);
    let tokens = text::tokenize(&normalized, config.min_length);
    tracing::trace!(tokens = ?tokens, "tokens to analyze");

    let candidates = collect_candidates(&tokens, personnages, config);
    let raw_count = candidates.len();

    let mut seen: HashSet<(u64, &str)> = HashSet::new();
    let mut mentions: Vec<DetectedMention> = candidates
        .into_iter()
        .filter(|c| c.confidence >= config.min_confidence)
        .filter(|c| seen.insert((c.personnage.id, c.token)))
        .map(|c| DetectedMention {
            name: c.token.to_string(),
            personnage: Some(c.personnage.clone()),
            is_existing: true,
            confidence: c.confidence,
            matched_field: c.field,
        })
        .collect();

    mentions.sort_by(rank);

    tracing::debug!(
        tokens = tokens.len(),
        candidates = raw_count,
        mentions = mentions.len(),
        "detection finished"
    );

    mentions
}

/// Unfiltered candidate produced by the matching step
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub token: &'a str,
    pub personnage: &'a Personnage,
    pub field: NameField,
    pub distance: usize,
    pub confidence: f64,
}

/// Every (token, name) pair within `max_distance`, before confidence filtering
///
/// Order: token, then character, first name before last name.
pub fn collect_candidates<'a>(
    tokens: &[&'a str],
    personnages: &'a [Personnage],
    config: &DetectionConfig,
) -> Vec<Candidate<'a>> {
    let names: Vec<(String, Option<String>)> = personnages
        .iter()
        .map(|p| {
            (
                p.first_name.trim().to_lowercase(),
                p.last_name().map(str::to_lowercase),
            )
        })
        .collect();

    let mut memo: HashMap<(&str, &str), Option<usize>> = HashMap::new();
    let mut candidates = Vec::new();

    for &token in tokens {
        let token_len = token.chars().count();

        for (personnage, (first, last)) in personnages.iter().zip(names.iter()) {
            let fields = [(NameField::First, Some(first)), (NameField::Last, last.as_ref())];

            for (field, name) in fields {
                let Some(name) = name.filter(|n| !n.is_empty()) else {
                    continue;
                };

                let name_len = name.chars().count();
                let distance = *memo
                    .entry((token, name.as_str()))
                    .or_insert_with(|| bounded_distance(token, token_len, name, name_len, config.max_distance));

                if let Some(distance) = distance {
                    candidates.push(Candidate {
                        token,
                        personnage,
                        field,
                        distance,
                        confidence: distance::confidence(distance, token_len, name_len),
                    });
                }
            }
        }
    }

    candidates
}

/// Distance if within `max_distance`; the length gap is a lower bound
fn bounded_distance(
    token: &str,
    token_len: usize,
    name: &str,
    name_len: usize,
    max_distance: usize,
) -> Option<usize> {
    if token_len.abs_diff(name_len) > max_distance {
        return None;
    }
    let distance = levenshtein_distance(token, name);
    (distance <= max_distance).then_some(distance)
}

fn rank(a: &DetectedMention, b: &DetectedMention) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.personnage_id().cmp(&b.personnage_id()))
        .then_with(|| a.name.cmp(&b.name))
}
