//! Stage orchestration: lexicon -> detectors -> merge.
//!
//! Each stage fully consumes its input before the next runs; outputs are
//! handed off as immutable collections and nothing is written until every
//! stage has succeeded.

use std::collections::BTreeMap;

use tracing::info;

use crate::cluster::{aggregate_clusters, ClusterReport};
use crate::config::EngineConfig;
use crate::error::CognateError;
use crate::fuzzy::find_near_cognates;
use crate::io::SkippedRows;
use crate::lexicon::LexiconTable;
use crate::merge::{merge_records, AuditPolicy, DefaultAuditPolicy, MergeStats};
use crate::perfect::find_perfect_cognates;
use crate::types::{
    LanguageCode, MasterCognateRecord, NearCognateRecord, PerfectCognateRecord,
};

/// End-of-run counters reported to the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub perfect_records: usize,
    pub near_records: usize,
    pub master_rows: usize,
    pub removed_by_dedup: usize,
    pub skipped_rows: SkippedRows,
}

/// Everything one discovery run produces.
#[derive(Debug)]
pub struct DiscoveryOutput {
    pub perfect: Vec<PerfectCognateRecord>,
    pub near: Vec<NearCognateRecord>,
    pub master: Vec<MasterCognateRecord>,
    pub clusters: ClusterReport,
    pub summary: RunSummary,
}

/// Batch driver for the full discovery pipeline.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every stage over the given per-language word lists, using the
    /// default audit policy tuned to this engine's configuration.
    pub fn run(
        &self,
        sources: BTreeMap<LanguageCode, Vec<String>>,
    ) -> Result<DiscoveryOutput, CognateError> {
        self.run_with_policy(sources, &DefaultAuditPolicy::from_config(&self.config))
    }

    /// Run every stage with a caller-supplied audit policy.
    pub fn run_with_policy(
        &self,
        sources: BTreeMap<LanguageCode, Vec<String>>,
        policy: &dyn AuditPolicy,
    ) -> Result<DiscoveryOutput, CognateError> {
        if !sources.contains_key(&self.config.reference_language) {
            return Err(CognateError::MalformedSource {
                language: self.config.reference_language.to_string(),
            });
        }

        let lexicon = LexiconTable::load(sources)?;
        info!(
            languages = lexicon.languages().len(),
            max_rank = lexicon.max_rank(),
            "lexicon loaded"
        );

        let perfect = find_perfect_cognates(&lexicon, &self.config);
        let near = find_near_cognates(&lexicon, &self.config);
        let clusters = aggregate_clusters(&perfect, &self.config);
        let (master, merge_stats) = merge_records(&perfect, &near, policy);

        let summary = RunSummary {
            perfect_records: perfect.len(),
            near_records: near.len(),
            master_rows: master.len(),
            removed_by_dedup: merge_stats.removed_by_dedup,
            skipped_rows: SkippedRows::default(),
        };

        Ok(DiscoveryOutput {
            perfect,
            near,
            master,
            clusters,
            summary,
        })
    }

    /// Merge previously produced record sets without re-running detection.
    pub fn merge_only(
        &self,
        perfect: Vec<PerfectCognateRecord>,
        near: Vec<NearCognateRecord>,
        policy: &dyn AuditPolicy,
    ) -> (Vec<MasterCognateRecord>, MergeStats) {
        merge_records(&perfect, &near, policy)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
