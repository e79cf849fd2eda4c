//! Planner behavior against the built-in catalog and small fixture catalogs.

use std::collections::{BTreeMap, BTreeSet};

use stream_planner::{plan_streams, Catalog, StreamKind, StreamOptimization, Subscription};

fn builtin() -> Catalog {
    Catalog::builtin().unwrap()
}

/// Catalog with a universal English target and no two-way pairs.
fn no_two_way() -> Catalog {
    Catalog::from_json_str(
        r#"{
            "languages": [{"code": "en"}, {"code": "es"}, {"code": "fr"}],
            "translation_targets": [
                {"target_language": "en", "source_languages": ["*"]},
                {"target_language": "es", "source_languages": ["en", "fr"]}
            ]
        }"#,
    )
    .unwrap()
}

const MIXED: &[&str] = &[
    "transcription:en",
    "transcription:ja",
    "translation:en->es",
    "translation:es->en",
    "translation:fr->en",
    "translation:it->en",
    "translation:de->fr",
    "translation:it->fr",
    "translation:es-to-de",
    "translation:fr->de",
    "translation:en->ja",
    "translation:ko->zh",
    "translation:en->en",
    "subtitles:en",
    "translation:fr",
];

fn well_formed(ids: &[&str]) -> BTreeSet<String> {
    ids.iter()
        .filter(|id| id.parse::<Subscription>().is_ok())
        .map(|id| id.to_string())
        .collect()
}

fn owner_counts(plan: &StreamOptimization) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for stream in &plan.streams {
        for lang in &stream.owns_transcription {
            *counts.entry(lang.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

#[test]
fn test_deterministic_across_orderings() {
    let catalog = builtin();
    let expected = plan_streams(&catalog, MIXED);

    let mut ids: Vec<&str> = MIXED.to_vec();
    for _ in 0..ids.len() {
        ids.rotate_left(1);
        let plan = plan_streams(&catalog, &ids);
        assert_eq!(plan.streams, expected.streams);
        assert_eq!(plan.summary, expected.summary);
    }

    ids.reverse();
    assert_eq!(plan_streams(&catalog, &ids).streams, expected.streams);
}

#[test]
fn test_coverage() {
    let plan = plan_streams(&builtin(), MIXED);
    let handled: BTreeSet<String> = plan
        .streams
        .iter()
        .flat_map(|s| s.handled_subscriptions.iter().cloned())
        .collect();
    assert_eq!(handled, well_formed(MIXED));

    let total_handled: usize = plan
        .streams
        .iter()
        .map(|s| s.handled_subscriptions.len())
        .sum();
    assert_eq!(total_handled, handled.len(), "no identifier handled twice");
    assert_eq!(plan.summary.dropped_subscriptions, 2);
    assert_eq!(plan.summary.total_subscriptions, MIXED.len());
}

#[test]
fn test_single_ownership_of_every_spoken_language() {
    let plan = plan_streams(&builtin(), MIXED);
    let counts = owner_counts(&plan);
    assert!(counts.values().all(|&n| n == 1), "{:?}", counts);

    let spoken: BTreeSet<String> = well_formed(MIXED)
        .iter()
        .map(|id| id.parse::<Subscription>().unwrap().spoken_language().to_string())
        .collect();
    let owned: BTreeSet<String> = counts.keys().map(|l| l.to_string()).collect();
    assert_eq!(owned, spoken);
}

#[test]
fn test_skipped_languages_are_owned_elsewhere() {
    let plan = plan_streams(&builtin(), MIXED);
    for stream in &plan.streams {
        for lang in &stream.skip_transcription_for {
            let owner = plan.owner_of(lang).unwrap();
            assert_ne!(owner, stream);
        }
    }
}

#[test]
fn test_dedicated_transcription_has_priority() {
    let plan = plan_streams(&builtin(), MIXED);
    for lang in ["en", "ja"] {
        assert_eq!(plan.owner_of(lang).unwrap().kind, StreamKind::TranscriptionOnly);
    }
}

#[test]
fn test_two_way_requires_catalog_support() {
    let ids = ["translation:en->es", "translation:es->en"];

    let plan = plan_streams(&builtin(), &ids);
    assert_eq!(plan.summary.stream_kinds, vec![StreamKind::TwoWay]);
    assert_eq!(plan.streams[0].owns_transcription, vec!["en", "es"]);

    let plan = plan_streams(&no_two_way(), &ids);
    assert!(plan.streams_of_kind(StreamKind::TwoWay).next().is_none());
    assert_eq!(plan.summary.total_streams, 2);
}

#[test]
fn test_universal_grouping() {
    let plan = plan_streams(&builtin(), &["translation:es->en", "translation:fr->en"]);
    assert_eq!(plan.summary.stream_kinds, vec![StreamKind::Universal]);
    assert_eq!(plan.streams[0].owns_transcription, vec!["es", "fr"]);
    assert!(plan.streams[0].engine_config.is_auto_detect());
}

#[test]
fn test_skip_on_conflict() {
    let plan = plan_streams(&builtin(), &["transcription:en", "translation:en->es"]);
    assert_eq!(
        plan.summary.stream_kinds,
        vec![StreamKind::TranscriptionOnly, StreamKind::Individual]
    );
    assert_eq!(plan.streams[0].owns_transcription, vec!["en"]);
    assert_eq!(plan.streams[1].skip_transcription_for, vec!["en"]);
    assert!(plan.streams[1].owns_transcription.is_empty());
}

#[test]
fn test_empty_input() {
    let plan = plan_streams::<&str>(&builtin(), &[]);
    assert!(plan.streams.is_empty());
    assert_eq!(plan.summary.total_streams, 0);
    assert_eq!(plan.summary.total_subscriptions, 0);
    assert_eq!(plan.summary.dropped_subscriptions, 0);
    assert!(plan.summary.stream_kinds.is_empty());
}

#[test]
fn test_empty_catalog_degrades_to_one_stream_per_request() {
    let catalog = Catalog::default();
    let ids = [
        "translation:en->es",
        "translation:es->en",
        "translation:fr->en",
        "transcription:de",
    ];
    let plan = plan_streams(&catalog, &ids);
    assert_eq!(plan.summary.total_streams, ids.len());
    assert_eq!(plan.summary.kind_counts[&StreamKind::Individual], 3);
    assert_eq!(plan.summary.kind_counts[&StreamKind::TranscriptionOnly], 1);
}

#[test]
fn test_output_json_shape() {
    let plan = plan_streams(&builtin(), &["translation:de->es", "translation:fr->es"]);
    let value = serde_json::to_value(&plan).unwrap();
    assert_eq!(
        value["streams"][0],
        serde_json::json!({
            "kind": "multi_source",
            "engineConfig": {
                "language": "auto",
                "translation": {"mode": "one_way", "target": "es", "sources": ["de", "fr"]}
            },
            "handledSubscriptions": ["translation:de->es", "translation:fr->es"],
            "ownsTranscription": ["de", "fr"],
            "skipTranscriptionFor": []
        })
    );
    assert_eq!(value["summary"]["streamKinds"], serde_json::json!(["multi_source"]));
}

#[test]
fn test_two_way_pairs_sharing_a_language_claim_in_pair_order() {
    let ids = [
        "translation:en->es",
        "translation:es->en",
        "translation:en->de",
        "translation:de->en",
    ];
    let plan = plan_streams(&builtin(), &ids);
    assert_eq!(
        plan.summary.stream_kinds,
        vec![StreamKind::TwoWay, StreamKind::TwoWay]
    );

    // de:en sorts before en:es, so it claims en first.
    let de_en = &plan.streams[0];
    let translation = de_en.engine_config.translation.as_ref().unwrap();
    assert_eq!(translation.pair_a.as_deref(), Some("de"));
    assert_eq!(translation.pair_b.as_deref(), Some("en"));
    assert_eq!(de_en.owns_transcription, vec!["de", "en"]);
    assert!(de_en.skip_transcription_for.is_empty());

    let en_es = &plan.streams[1];
    let translation = en_es.engine_config.translation.as_ref().unwrap();
    assert_eq!(translation.pair_a.as_deref(), Some("en"));
    assert_eq!(translation.pair_b.as_deref(), Some("es"));
    assert_eq!(en_es.owns_transcription, vec!["es"]);
    assert_eq!(en_es.skip_transcription_for, vec!["en"]);
}

#[test]
fn test_universal_targets_sharing_a_source_claim_in_target_order() {
    let catalog = Catalog::from_json_str(
        r#"{
            "languages": [{"code": "en"}, {"code": "fr"}, {"code": "ja"}, {"code": "zh"}],
            "translation_targets": [
                {"target_language": "zh", "source_languages": ["*"]},
                {"target_language": "en", "source_languages": ["*"]}
            ]
        }"#,
    )
    .unwrap();

    let plan = plan_streams(
        &catalog,
        &["translation:fr->zh", "translation:ja->zh", "translation:fr->en"],
    );
    assert_eq!(
        plan.summary.stream_kinds,
        vec![StreamKind::Universal, StreamKind::Universal]
    );

    let target = |i: usize| {
        plan.streams[i]
            .engine_config
            .translation
            .as_ref()
            .and_then(|t| t.target.clone())
    };
    assert_eq!(target(0).as_deref(), Some("en"));
    assert_eq!(plan.streams[0].owns_transcription, vec!["fr"]);
    assert!(plan.streams[0].skip_transcription_for.is_empty());

    assert_eq!(target(1).as_deref(), Some("zh"));
    assert_eq!(plan.streams[1].owns_transcription, vec!["ja"]);
    assert_eq!(plan.streams[1].skip_transcription_for, vec!["fr"]);
    assert_eq!(plan.owner_of("fr"), Some(&plan.streams[0]));
}
