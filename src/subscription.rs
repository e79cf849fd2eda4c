//! Subscription identifiers
//!
//! Apps subscribe with plain strings:
//!
//! transcription:<lang>
//! translation:<source>-><target>
//! translation:<source>-to-<target>   (deprecated alias)
//!
//! Language codes are a lowercase primary subtag of two or three letters,
//! optionally followed by one subtag that is either capitalized (`en-US`,
//! `zh-Hans`) or three digits (`es-419`). A lowercase `to` can therefore
//! never be mistaken for part of a code.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SubscriptionError;

const TRANSCRIPTION_PREFIX: &str = "transcription";
const TRANSLATION_PREFIX: &str = "translation";
const SEPARATOR: &str = "->";
const ALIAS_SEPARATOR: &str = "-to-";

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Whether `s` follows the language-code rule above.
pub(crate) fn is_language_code(s: &str) -> bool {
    regex!(r"^[a-z]{2,3}(?:-(?:[A-Z][A-Za-z]{1,3}|[0-9]{3}))?$").is_match(s)
}

/// A single parsed request.
///
/// Ordering is lexicographic on the canonical form, with transcriptions
/// sorting before translations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subscription {
    /// Raw transcript of `language`
    Transcription { language: String },
    /// Translated text from `source` into `target`
    Translation { source: String, target: String },
}

/// Which wire form an identifier used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierForm {
    Canonical,
    /// `-to-` separator
    Alias,
}

impl Subscription {
    pub fn transcription(language: &str) -> Self {
        Subscription::Transcription {
            language: language.to_string(),
        }
    }

    pub fn translation(source: &str, target: &str) -> Self {
        Subscription::Translation {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// The language spoken into the microphone for this request.
    pub fn spoken_language(&self) -> &str {
        match self {
            Subscription::Transcription { language } => language,
            Subscription::Translation { source, .. } => source,
        }
    }

    pub fn is_transcription(&self) -> bool {
        matches!(self, Subscription::Transcription { .. })
    }

    /// Parse an identifier and report which form it used.
    pub fn parse_identifier(id: &str) -> Result<(Self, IdentifierForm), SubscriptionError> {
        let (kind, rest) = id
            .split_once(':')
            .ok_or_else(|| SubscriptionError::UnknownKind(id.to_string()))?;

        match kind {
            TRANSCRIPTION_PREFIX => {
                if !is_language_code(rest) {
                    return Err(SubscriptionError::MalformedLanguage(id.to_string()));
                }
                Ok((Self::transcription(rest), IdentifierForm::Canonical))
            }
            TRANSLATION_PREFIX => {
                let (source, target, form) = if let Some((s, t)) = rest.split_once(SEPARATOR) {
                    (s, t, IdentifierForm::Canonical)
                } else if let Some(caps) =
                    regex!(r"^([a-z]{2,3}(?:-(?:[A-Z][A-Za-z]{1,3}|[0-9]{3}))?)-to-(.+)$")
                        .captures(rest)
                {
                    let source = caps.get(1).map_or("", |m| m.as_str());
                    let target = caps.get(2).map_or("", |m| m.as_str());
                    (source, target, IdentifierForm::Alias)
                } else if rest.contains(ALIAS_SEPARATOR) {
                    return Err(SubscriptionError::MalformedLanguage(id.to_string()));
                } else {
                    return Err(SubscriptionError::MissingSeparator(id.to_string()));
                };

                if !is_language_code(source) || !is_language_code(target) {
                    return Err(SubscriptionError::MalformedLanguage(id.to_string()));
                }
                Ok((Self::translation(source, target), form))
            }
            _ => Err(SubscriptionError::UnknownKind(kind.to_string())),
        }
    }
}

impl fmt::Display for Subscription {
    /// Canonical identifier.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Subscription::Transcription { language } => {
                write!(f, "{}:{}", TRANSCRIPTION_PREFIX, language)
            }
            Subscription::Translation { source, target } => {
                write!(f, "{}:{}{}{}", TRANSLATION_PREFIX, source, SEPARATOR, target)
            }
        }
    }
}

impl FromStr for Subscription {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_identifier(s).map(|(sub, _)| sub)
    }
}

/// Result of parsing a batch of identifiers.
#[derive(Debug, Clone, Default)]
pub struct ParsedSubscriptions {
    /// Distinct requests and the raw identifiers that asked for them.
    /// Raw identifiers are sorted and deduplicated.
    pub requests: BTreeMap<Subscription, Vec<String>>,
    /// Identifiers that could not be parsed
    pub dropped: Vec<String>,
}

impl ParsedSubscriptions {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Raw identifiers for a request, empty if absent.
    pub fn raw_ids(&self, sub: &Subscription) -> &[String] {
        self.requests.get(sub).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parse every identifier, dropping malformed ones.
///
/// Callers aggregate identifiers from independent apps, so one bad entry
/// must never fail the batch.
pub fn parse_subscriptions<S: AsRef<str>>(ids: &[S]) -> ParsedSubscriptions {
    let mut parsed = ParsedSubscriptions::default();

    for id in ids {
        let id = id.as_ref();
        match Subscription::parse_identifier(id) {
            Ok((sub, form)) => {
                if form == IdentifierForm::Alias {
                    tracing::debug!(
                        "Subscription {:?} uses deprecated separator, canonical form is {}",
                        id,
                        sub
                    );
                }
                parsed.requests.entry(sub).or_default().push(id.to_string());
            }
            Err(e) => {
                tracing::warn!("Dropping subscription: {}", e);
                parsed.dropped.push(id.to_string());
            }
        }
    }

    for raw in parsed.requests.values_mut() {
        raw.sort();
        raw.dedup();
    }
    parsed
}
