//! Stream planner - determines which engine streams to open

use super::analyzer::{analyze, Bucket, CandidateId};
use super::ownership::resolve_ownership;
use super::{OptimizedStream, StreamOptimization, Summary};
use crate::catalog::Catalog;
use crate::subscription::parse_subscriptions;

/// Plan engine streams for the active subscription identifiers.
///
/// Pure: the same catalog and the same set of identifiers, in any order,
/// always give the same plan. Malformed identifiers are dropped and counted
/// in the summary.
pub fn plan_streams<S: AsRef<str>>(catalog: &Catalog, subscriptions: &[S]) -> StreamOptimization {
    let original_subscriptions: Vec<String> = subscriptions
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();

    let parsed = parse_subscriptions(subscriptions);
    let analysis = analyze(catalog, &parsed);
    let ownership = resolve_ownership(&analysis);

    let mut streams = Vec::with_capacity(analysis.len());
    for bucket in Bucket::EMIT_ORDER {
        for (index, candidate) in analysis.candidates(bucket).iter().enumerate() {
            let mut handled_subscriptions: Vec<String> = candidate
                .requests
                .iter()
                .flat_map(|r| parsed.raw_ids(r).iter().cloned())
                .collect();
            handled_subscriptions.sort();

            let owned = ownership
                .get(CandidateId { bucket, index })
                .cloned()
                .unwrap_or_default();

            streams.push(OptimizedStream {
                kind: candidate.kind,
                engine_config: candidate.engine_config.clone(),
                handled_subscriptions,
                owns_transcription: owned.owns,
                skip_transcription_for: owned.skips,
            });
        }
    }

    let summary = Summary::from_streams(
        &streams,
        original_subscriptions.len(),
        parsed.dropped.len(),
    );
    tracing::debug!(
        "Planned {} stream(s) for {} subscription(s): {:?}",
        summary.total_streams,
        summary.total_subscriptions,
        summary.kind_counts
    );

    StreamOptimization {
        streams,
        original_subscriptions,
        summary,
    }
}
