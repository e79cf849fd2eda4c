//! Catalog document loading
//!
//! Reads the engine's capability document from JSON or TOML and turns it
//! into a validated [`Catalog`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use super::{Catalog, LanguagePair, TargetConfig, WILDCARD};
use crate::error::CatalogError;
use crate::subscription::is_language_code;

/// Catalog shipped with the crate, used when no catalog file is configured.
const BUILTIN_CATALOG: &str = include_str!("../../catalog/default.json");

/// On-disk catalog format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Languages the engine can transcribe
    pub languages: Vec<LanguageEntry>,
    /// Translation targets and their source lists
    #[serde(default)]
    pub translation_targets: Vec<TargetEntry>,
    /// Two-way pairs encoded as "A:B"
    #[serde(default)]
    pub two_way_translation_pairs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEntry {
    pub target_language: String,
    #[serde(default)]
    pub source_languages: Vec<String>,
    #[serde(default)]
    pub exclude_source_languages: Vec<String>,
}

// helper.
fn checked_code(code: &str) -> Result<String, CatalogError> {
    let code = code.trim();
    if !is_language_code(code) {
        return Err(CatalogError::InvalidLanguageCode(code.to_string()));
    }
    Ok(code.to_string())
}

// helper.
fn checked_source(code: &str) -> Result<String, CatalogError> {
    if code.trim() == WILDCARD {
        return Ok(WILDCARD.to_string());
    }
    checked_code(code)
}

// helper.
fn parse_pair(encoded: &str) -> Result<LanguagePair, CatalogError> {
    let (a, b) = encoded
        .split_once(':')
        .ok_or_else(|| CatalogError::InvalidTwoWayPair(encoded.to_string()))?;
    let (a, b) = (a.trim(), b.trim());
    if a == b || !is_language_code(a) || !is_language_code(b) {
        return Err(CatalogError::InvalidTwoWayPair(encoded.to_string()));
    }
    Ok(LanguagePair::new(a, b))
}

impl Catalog {
    /// Build a catalog from a parsed document.
    ///
    /// Repeated entries for the same target are merged. Every code must
    /// follow the same rule as subscription identifiers, otherwise no
    /// subscription could ever match it.
    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();

        for lang in doc.languages {
            catalog.languages.insert(checked_code(&lang.code)?);
        }

        for entry in doc.translation_targets {
            if entry.target_language.trim().is_empty() {
                return Err(CatalogError::EmptyTarget);
            }
            let target = checked_code(&entry.target_language)?;
            let sources = entry
                .source_languages
                .iter()
                .map(|s| checked_source(s))
                .collect::<Result<Vec<_>, _>>()?;
            let excluded = entry
                .exclude_source_languages
                .iter()
                .map(|s| checked_code(s))
                .collect::<Result<Vec<_>, _>>()?;
            let config = catalog
                .targets
                .entry(target.clone())
                .or_insert_with(|| TargetConfig {
                    target,
                    sources: BTreeSet::new(),
                    excluded: BTreeSet::new(),
                });
            config.sources.extend(sources);
            config.excluded.extend(excluded);
        }

        for encoded in &doc.two_way_translation_pairs {
            catalog.two_way.insert(parse_pair(encoded)?);
        }

        tracing::debug!(
            "Catalog built: {} languages, {} targets, {} two-way pairs",
            catalog.languages.len(),
            catalog.targets.len(),
            catalog.two_way.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(content)?;
        Self::from_document(doc)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(content)?;
        Self::from_document(doc)
    }

    /// Load a catalog file, choosing the format by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => {
                return Err(CatalogError::UnsupportedFormat(
                    path.display().to_string(),
                ))
            }
        };
        tracing::info!("Loaded capability catalog from {}", path.display());
        Ok(catalog)
    }

    /// The catalog bundled with this crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }
}
