//! Cognate discovery and classification over rank-aligned frequency lists.
//!
//! Given one frequency-ordered word list per language, the engine finds
//! words spelled identically across languages at the same rank (perfect
//! cognates), words spelled similarly (near cognates, gestalt-scored with
//! a spelling-delta description), aggregates cluster and language-pair
//! statistics, and merges everything into a deduplicated, audited master
//! table.
//!
//! Rank alignment is a screening heuristic, not a semantic guarantee: two
//! words at the same rank are compared only because their lists rank them
//! equally often, not because one translates the other.

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod io;
pub mod lexicon;
pub mod merge;
pub mod perfect;
pub mod similarity;
pub mod types;

pub use cluster::{aggregate_clusters, ClusterKey, ClusterReport};
pub use config::EngineConfig;
pub use engine::{DiscoveryOutput, Engine, RunSummary};
pub use error::CognateError;
pub use fuzzy::find_near_cognates;
pub use lexicon::LexiconTable;
pub use merge::{merge_records, AuditPolicy, DefaultAuditPolicy, MergeStats};
pub use perfect::find_perfect_cognates;
pub use types::{
    AuditStatus, LanguageCode, LexicalEntry, MasterCognateRecord, MatchType,
    NearCognateRecord, PerfectCognateRecord,
};
