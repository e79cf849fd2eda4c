//! Transcript ownership
//!
//! Several streams may hear the same spoken language. Exactly one of them
//! emits its transcript; the others still process the audio for their
//! translations but skip transcript output for it.
//!
//! Candidates claim languages in bucket priority order (dedicated
//! transcription, two-way, universal, multi-source, individual). Inside a
//! bucket they go in key order, and each candidate claims its languages in
//! lexicographic order. First claim wins.

use std::collections::{BTreeSet, HashMap};

use super::analyzer::{Analysis, CandidateId};

/// Ownership decision for one candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ownership {
    pub owns: Vec<String>,
    pub skips: Vec<String>,
}

/// Ownership decisions for a whole analysis
#[derive(Debug, Clone, Default)]
pub struct OwnershipMap {
    entries: HashMap<CandidateId, Ownership>,
    claimed: BTreeSet<String>,
}

impl OwnershipMap {
    pub fn get(&self, id: CandidateId) -> Option<&Ownership> {
        self.entries.get(&id)
    }

    /// Every language with an owner.
    pub fn claimed(&self) -> &BTreeSet<String> {
        &self.claimed
    }
}

/// Assign each spoken language to a single owning candidate.
pub fn resolve_ownership(analysis: &Analysis) -> OwnershipMap {
    let mut map = OwnershipMap::default();

    for (id, candidate) in analysis.by_priority() {
        let mut ownership = Ownership::default();
        for language in &candidate.spoken {
            if map.claimed.insert(language.clone()) {
                ownership.owns.push(language.clone());
            } else {
                tracing::debug!(
                    "{} stream skips transcript for {}, already owned",
                    candidate.kind,
                    language
                );
                ownership.skips.push(language.clone());
            }
        }
        map.entries.insert(id, ownership);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::fixture;
    use crate::plan::analyzer::{analyze, Bucket};
    use crate::subscription::parse_subscriptions;

    fn resolve(ids: &[&str]) -> (Analysis, OwnershipMap) {
        let analysis = analyze(&fixture(), &parse_subscriptions(ids));
        let map = resolve_ownership(&analysis);
        (analysis, map)
    }

    fn ownership(map: &OwnershipMap, bucket: Bucket, index: usize) -> &Ownership {
        map.get(CandidateId { bucket, index }).unwrap()
    }

    #[test]
    fn test_transcription_wins_over_individual() {
        let (_, map) = resolve(&["transcription:en", "translation:en->de"]);
        assert_eq!(ownership(&map, Bucket::Transcription, 0).owns, vec!["en"]);
        let individual = ownership(&map, Bucket::Individual, 0);
        assert!(individual.owns.is_empty());
        assert_eq!(individual.skips, vec!["en"]);
    }

    #[test]
    fn test_two_way_wins_over_multi_source() {
        // en and es are spoken in the two-way stream and in the stream into fr.
        let (_, map) = resolve(&[
            "translation:en->es",
            "translation:es->en",
            "translation:es->fr",
            "translation:en->fr",
        ]);
        assert_eq!(ownership(&map, Bucket::TwoWay, 0).owns, vec!["en", "es"]);
        let multi = ownership(&map, Bucket::MultiSource, 0);
        assert!(multi.owns.is_empty());
        assert_eq!(multi.skips, vec!["en", "es"]);
    }

    #[test]
    fn test_universal_wins_over_multi_source() {
        let (_, map) = resolve(&[
            "translation:fr->en",
            "translation:fr->es",
            "translation:de->es",
        ]);
        assert_eq!(ownership(&map, Bucket::Universal, 0).owns, vec!["fr"]);
        let multi = ownership(&map, Bucket::MultiSource, 0);
        assert_eq!(multi.owns, vec!["de"]);
        assert_eq!(multi.skips, vec!["fr"]);
    }

    #[test]
    fn test_same_priority_tie_break_by_key() {
        // Both multi-source targets hear en; es sorts before fr.
        let (_, map) = resolve(&[
            "translation:en->fr",
            "translation:es->fr",
            "translation:en->es",
            "translation:de->es",
        ]);
        let es_stream = ownership(&map, Bucket::MultiSource, 0);
        let fr_stream = ownership(&map, Bucket::MultiSource, 1);
        assert_eq!(es_stream.owns, vec!["de", "en"]);
        assert_eq!(fr_stream.owns, vec!["es"]);
        assert_eq!(fr_stream.skips, vec!["en"]);
    }

    #[test]
    fn test_each_language_claimed_once() {
        let (analysis, map) = resolve(&[
            "transcription:fr",
            "translation:fr->en",
            "translation:fr->es",
            "translation:de->es",
            "translation:fr->de",
        ]);
        let mut owners: HashMap<&str, usize> = HashMap::new();
        for (id, _) in analysis.by_priority() {
            for lang in &map.get(id).unwrap().owns {
                *owners.entry(lang.as_str()).or_insert(0) += 1;
            }
        }
        assert!(owners.values().all(|&n| n == 1));
        assert_eq!(map.claimed().len(), owners.len());
    }
}
