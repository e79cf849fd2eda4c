//! Stream planning module
//!
//! Turns the set of active subscriptions into the minimal set of engine
//! streams:
//! - Subscription bucketing (two-way, universal, multi-source, remainder)
//! - Transcript ownership, so every spoken language is emitted once
//! - Final stream list and summary for the session manager

pub mod analyzer;
pub mod ownership;
pub mod planner;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::LanguagePair;

pub use analyzer::{analyze, Analysis, Bucket, Candidate, CandidateId};
pub use ownership::{resolve_ownership, Ownership, OwnershipMap};
pub use planner::plan_streams;

/// Source-language directive telling the engine to detect the language.
pub const AUTO_DETECT: &str = "auto";

/// Kind of engine stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Wildcard-source stream into a universal target.
    /// The wire name predates targets other than English.
    #[serde(rename = "universal_english")]
    Universal,
    TwoWay,
    MultiSource,
    /// One source into one target
    Individual,
    TranscriptionOnly,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Universal => "universal_english",
            StreamKind::TwoWay => "two_way",
            StreamKind::MultiSource => "multi_source",
            StreamKind::Individual => "individual",
            StreamKind::TranscriptionOnly => "transcription_only",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMode {
    OneWay,
    TwoWay,
}

/// Translation part of an engine config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationDirective {
    pub mode: TranslationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Explicit source list, only set for multi-source streams
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_b: Option<String>,
}

/// Literal parameters handed to the speech engine when opening a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Explicit language code or [`AUTO_DETECT`]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationDirective>,
}

impl EngineConfig {
    /// Plain transcription of one language.
    pub fn transcription(language: &str) -> Self {
        Self {
            language: language.to_string(),
            translation: None,
        }
    }

    /// One-way translation into `target`.
    pub fn one_way(language: &str, target: &str, sources: Vec<String>) -> Self {
        Self {
            language: language.to_string(),
            translation: Some(TranslationDirective {
                mode: TranslationMode::OneWay,
                target: Some(target.to_string()),
                sources,
                pair_a: None,
                pair_b: None,
            }),
        }
    }

    /// Bidirectional translation within `pair`.
    pub fn two_way(pair: &LanguagePair) -> Self {
        Self {
            language: AUTO_DETECT.to_string(),
            translation: Some(TranslationDirective {
                mode: TranslationMode::TwoWay,
                target: None,
                sources: Vec::new(),
                pair_a: Some(pair.first().to_string()),
                pair_b: Some(pair.second().to_string()),
            }),
        }
    }

    pub fn is_auto_detect(&self) -> bool {
        self.language == AUTO_DETECT
    }
}

/// One engine stream of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedStream {
    pub kind: StreamKind,
    pub engine_config: EngineConfig,
    /// Raw identifiers satisfied by this stream
    pub handled_subscriptions: Vec<String>,
    /// Languages this stream is the transcript source for
    pub owns_transcription: Vec<String>,
    /// Languages processed here whose transcript another stream owns
    pub skip_transcription_for: Vec<String>,
}

impl OptimizedStream {
    pub fn owns(&self, language: &str) -> bool {
        self.owns_transcription.iter().any(|l| l == language)
    }

    pub fn handles(&self, subscription: &str) -> bool {
        self.handled_subscriptions.iter().any(|s| s == subscription)
    }
}

/// Aggregate counts over a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_streams: usize,
    /// Number of identifiers passed in, malformed ones included
    pub total_subscriptions: usize,
    pub dropped_subscriptions: usize,
    /// Kind of each stream, in stream order
    pub stream_kinds: Vec<StreamKind>,
    pub kind_counts: BTreeMap<StreamKind, usize>,
}

impl Summary {
    pub fn from_streams(
        streams: &[OptimizedStream],
        total_subscriptions: usize,
        dropped_subscriptions: usize,
    ) -> Self {
        let stream_kinds: Vec<StreamKind> = streams.iter().map(|s| s.kind).collect();
        let mut kind_counts = BTreeMap::new();
        for kind in &stream_kinds {
            *kind_counts.entry(*kind).or_insert(0) += 1;
        }
        Self {
            total_streams: streams.len(),
            total_subscriptions,
            dropped_subscriptions,
            stream_kinds,
            kind_counts,
        }
    }
}

/// Complete planning result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamOptimization {
    pub streams: Vec<OptimizedStream>,
    pub original_subscriptions: Vec<String>,
    pub summary: Summary,
}

impl StreamOptimization {
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Stream that emits the transcript for `language`.
    pub fn owner_of(&self, language: &str) -> Option<&OptimizedStream> {
        self.streams.iter().find(|s| s.owns(language))
    }

    /// Stream that satisfies a raw subscription identifier.
    pub fn stream_for(&self, subscription: &str) -> Option<&OptimizedStream> {
        self.streams.iter().find(|s| s.handles(subscription))
    }

    pub fn streams_of_kind(&self, kind: StreamKind) -> impl Iterator<Item = &OptimizedStream> {
        self.streams.iter().filter(move |s| s.kind == kind)
    }
}
