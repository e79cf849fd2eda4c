//! Stream planner
//!
//! Computes the minimal, non-duplicating set of speech-engine streams for a
//! live audio session, given the capability catalog of the engine and the
//! transcription/translation subscriptions of every connected app.

pub mod catalog;
pub mod config;
pub mod config_file;
pub mod error;
pub mod http;
pub mod plan;
pub mod state;
pub mod subscription;

pub use catalog::{Catalog, LanguagePair, TargetConfig, WILDCARD};
pub use error::{CatalogError, PlannerError, Result, SubscriptionError};
pub use plan::{
    plan_streams, EngineConfig, OptimizedStream, StreamKind, StreamOptimization, Summary,
    TranslationDirective, TranslationMode, AUTO_DETECT,
};
pub use subscription::{parse_subscriptions, ParsedSubscriptions, Subscription};
