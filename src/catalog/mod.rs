//! Speech engine capability catalog
//!
//! The catalog describes what the upstream engine can do:
//! - Languages it can transcribe
//! - Translation targets and the source languages each one accepts
//! - Language pairs that translate both ways inside a single stream
//!
//! It is loaded once at startup and never mutated afterwards, so it can be
//! shared between any number of planning calls without locking.

pub mod loader;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub use loader::{CatalogDocument, LanguageEntry, TargetEntry};

/// Source-list entry meaning "any source language".
pub const WILDCARD: &str = "*";

/// Source configuration for one translation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Target language code
    pub target: String,
    /// Allowed source languages, possibly containing [`WILDCARD`]
    pub sources: BTreeSet<String>,
    /// Source languages that may never translate into this target
    pub excluded: BTreeSet<String>,
}

impl TargetConfig {
    /// True if the source list is exactly the wildcard.
    pub fn is_universal(&self) -> bool {
        self.sources.len() == 1 && self.sources.contains(WILDCARD)
    }

    /// True if the source list contains the wildcard.
    pub fn accepts_any_source(&self) -> bool {
        self.sources.contains(WILDCARD)
    }
}

/// Unordered language pair. The two codes are stored sorted, so `(es, en)`
/// and `(en, es)` compare equal and order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguagePair {
    first: String,
    second: String,
}

impl LanguagePair {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Lexicographically smaller code
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger code
    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.first == lang || self.second == lang
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.second)
    }
}

/// Read-only capability table of the speech engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    languages: BTreeSet<String>,
    targets: BTreeMap<String, TargetConfig>,
    two_way: BTreeSet<LanguagePair>,
}

impl Catalog {
    /// Languages the engine can transcribe.
    pub fn supported_languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    pub fn is_supported(&self, lang: &str) -> bool {
        self.languages.contains(lang)
    }

    /// Targets accepting more than one explicit source and no wildcard,
    /// keyed and iterated in target order.
    pub fn multi_source_targets(&self) -> BTreeMap<&str, &BTreeSet<String>> {
        self.targets
            .values()
            .filter(|t| t.sources.len() > 1 && !t.accepts_any_source())
            .map(|t| (t.target.as_str(), &t.sources))
            .collect()
    }

    /// Pairs that translate both ways in one stream.
    pub fn two_way_pairs(&self) -> &BTreeSet<LanguagePair> {
        &self.two_way
    }

    pub fn supports_two_way_translation(&self, a: &str, b: &str) -> bool {
        a != b && self.two_way.contains(&LanguagePair::new(a, b))
    }

    /// Whether `source` may be translated into `target`.
    ///
    /// Self-translation is never supported; an explicit exclusion wins over
    /// both an explicit source entry and the wildcard.
    pub fn supports_translation(&self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let Some(config) = self.targets.get(target) else {
            return false;
        };
        if config.excluded.contains(source) {
            return false;
        }
        config.sources.contains(source) || config.accepts_any_source()
    }

    /// Target config of `lang` if any source may translate into it.
    pub fn universal_target(&self, lang: &str) -> Option<&TargetConfig> {
        self.targets.get(lang).filter(|t| t.is_universal())
    }

    /// All universal targets in target order.
    pub fn universal_targets(&self) -> impl Iterator<Item = &TargetConfig> {
        self.targets.values().filter(|t| t.is_universal())
    }

    /// All translation target codes in sorted order.
    pub fn translation_targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Every target `source` can be translated into.
    pub fn targets_for_source(&self, source: &str) -> Vec<&str> {
        self.targets
            .keys()
            .filter(|target| self.supports_translation(source, target))
            .map(String::as_str)
            .collect()
    }
}
