//! Subscription analyzer - groups requests into candidate streams

use std::collections::{BTreeMap, BTreeSet};

use super::{EngineConfig, StreamKind, AUTO_DETECT};
use crate::catalog::{Catalog, LanguagePair};
use crate::subscription::{ParsedSubscriptions, Subscription};

/// Candidate bucket. Declaration order is the ownership priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Transcription,
    TwoWay,
    Universal,
    MultiSource,
    Individual,
}

impl Bucket {
    /// Highest priority first.
    pub const PRIORITY: [Bucket; 5] = [
        Bucket::Transcription,
        Bucket::TwoWay,
        Bucket::Universal,
        Bucket::MultiSource,
        Bucket::Individual,
    ];

    /// Order in which streams appear in the final plan.
    pub const EMIT_ORDER: [Bucket; 5] = [
        Bucket::Universal,
        Bucket::TwoWay,
        Bucket::MultiSource,
        Bucket::Transcription,
        Bucket::Individual,
    ];
}

/// A stream the planner intends to open, before ownership is decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: StreamKind,
    pub engine_config: EngineConfig,
    /// Requests satisfied by the stream, sorted
    pub requests: Vec<Subscription>,
    /// Spoken languages the stream would emit transcript for, sorted
    pub spoken: Vec<String>,
}

impl Candidate {
    fn transcription(language: &str) -> Self {
        Self {
            kind: StreamKind::TranscriptionOnly,
            engine_config: EngineConfig::transcription(language),
            requests: vec![Subscription::transcription(language)],
            spoken: vec![language.to_string()],
        }
    }

    fn two_way(pair: &LanguagePair) -> Self {
        Self {
            kind: StreamKind::TwoWay,
            engine_config: EngineConfig::two_way(pair),
            requests: vec![
                Subscription::translation(pair.first(), pair.second()),
                Subscription::translation(pair.second(), pair.first()),
            ],
            spoken: vec![pair.first().to_string(), pair.second().to_string()],
        }
    }

    fn universal(target: &str, sources: &BTreeSet<String>) -> Self {
        Self {
            kind: StreamKind::Universal,
            engine_config: EngineConfig::one_way(AUTO_DETECT, target, Vec::new()),
            requests: sources
                .iter()
                .map(|s| Subscription::translation(s, target))
                .collect(),
            spoken: sources.iter().cloned().collect(),
        }
    }

    fn multi_source(target: &str, sources: &BTreeSet<String>) -> Self {
        Self {
            kind: StreamKind::MultiSource,
            engine_config: EngineConfig::one_way(
                AUTO_DETECT,
                target,
                sources.iter().cloned().collect(),
            ),
            requests: sources
                .iter()
                .map(|s| Subscription::translation(s, target))
                .collect(),
            spoken: sources.iter().cloned().collect(),
        }
    }

    fn individual(source: &str, target: &str) -> Self {
        Self {
            kind: StreamKind::Individual,
            engine_config: EngineConfig::one_way(source, target, Vec::new()),
            requests: vec![Subscription::translation(source, target)],
            spoken: vec![source.to_string()],
        }
    }
}

/// Identifies a candidate within an [`Analysis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId {
    pub bucket: Bucket,
    pub index: usize,
}

/// Bucketed candidates. Within a bucket, candidates are sorted by key:
/// language for transcriptions, pair for two-way, target for universal and
/// multi-source, `(source, target)` for individual streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    buckets: BTreeMap<Bucket, Vec<Candidate>>,
}

impl Analysis {
    fn push(&mut self, bucket: Bucket, candidate: Candidate) {
        self.buckets.entry(bucket).or_default().push(candidate);
    }

    pub fn candidates(&self, bucket: Bucket) -> &[Candidate] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every candidate, highest priority bucket first.
    pub fn by_priority(&self) -> impl Iterator<Item = (CandidateId, &Candidate)> {
        Bucket::PRIORITY.into_iter().flat_map(move |bucket| {
            self.candidates(bucket)
                .iter()
                .enumerate()
                .map(move |(index, c)| (CandidateId { bucket, index }, c))
        })
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group parsed requests into candidate streams.
///
/// A translation request is consumed by at most one group. Groups are
/// formed in ownership priority order: two-way pairs, then universal
/// targets, then multi-source targets. Whatever is left runs alone.
pub fn analyze(catalog: &Catalog, parsed: &ParsedSubscriptions) -> Analysis {
    let mut analysis = Analysis::default();
    let mut pending: BTreeSet<(String, String)> = BTreeSet::new();

    for sub in parsed.requests.keys() {
        match sub {
            Subscription::Transcription { language } => {
                analysis.push(Bucket::Transcription, Candidate::transcription(language));
            }
            Subscription::Translation { source, target } => {
                pending.insert((source.clone(), target.clone()));
            }
        }
    }

    // Two-way pairs. Visiting each pair from its smaller side keeps the
    // candidates in pair order.
    let pairs: Vec<LanguagePair> = pending
        .iter()
        .filter(|(s, t)| s < t)
        .filter(|(s, t)| pending.contains(&(t.clone(), s.clone())))
        .filter(|(s, t)| catalog.supports_two_way_translation(s, t))
        .map(|(s, t)| LanguagePair::new(s, t))
        .collect();
    for pair in pairs {
        pending.remove(&(pair.first().to_string(), pair.second().to_string()));
        pending.remove(&(pair.second().to_string(), pair.first().to_string()));
        tracing::debug!("Two-way stream for {}", pair);
        analysis.push(Bucket::TwoWay, Candidate::two_way(&pair));
    }

    // Universal targets take every valid source.
    for config in catalog.universal_targets() {
        let sources = take_sources(&mut pending, catalog, &config.target, 1);
        if let Some(sources) = sources {
            tracing::debug!(
                "Universal stream into {} for {} source(s)",
                config.target,
                sources.len()
            );
            analysis.push(
                Bucket::Universal,
                Candidate::universal(&config.target, &sources),
            );
        }
    }

    // Multi-source targets need at least two sources to be worth it.
    for target in catalog.multi_source_targets().keys() {
        if let Some(sources) = take_sources(&mut pending, catalog, target, 2) {
            tracing::debug!(
                "Multi-source stream into {} for {:?}",
                target,
                sources
            );
            analysis.push(Bucket::MultiSource, Candidate::multi_source(target, &sources));
        }
    }

    for (source, target) in &pending {
        if !catalog.supports_translation(source, target) {
            tracing::debug!(
                "Translation {} -> {} not in catalog, planning a dedicated stream",
                source,
                target
            );
        }
        analysis.push(Bucket::Individual, Candidate::individual(source, target));
    }

    analysis
}

/// Remove and return the catalog-valid pending sources for `target`, if
/// there are at least `min` of them. Leaves `pending` untouched otherwise.
fn take_sources(
    pending: &mut BTreeSet<(String, String)>,
    catalog: &Catalog,
    target: &str,
    min: usize,
) -> Option<BTreeSet<String>> {
    let sources: BTreeSet<String> = pending
        .iter()
        .filter(|(s, t)| t == target && catalog.supports_translation(s, t))
        .map(|(s, _)| s.clone())
        .collect();
    if sources.is_empty() || sources.len() < min {
        return None;
    }
    for source in &sources {
        pending.remove(&(source.clone(), target.to_string()));
    }
    Some(sources)
}
