//! Command-line front-end for the cognate discovery pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cognate_core::engine::RunSummary;
use cognate_core::{
    io, CognateError, DefaultAuditPolicy, Engine, EngineConfig, LanguageCode,
};

#[derive(Parser)]
#[command(name = "cognate-engine", about = "Discover cognates across rank-aligned frequency lists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: load sources, detect, aggregate, merge.
    Discover {
        /// CSV of language,rank,word rows for the non-reference languages.
        #[arg(long)]
        raw: PathBuf,
        /// Reference word list, one word per line in rank order.
        #[arg(long)]
        reference: PathBuf,
        /// Reference language code.
        #[arg(long, default_value = "en")]
        reference_language: String,
        /// Master table output path.
        #[arg(long, default_value = "master_cognates.csv")]
        output: PathBuf,
        /// Also write the perfect record set here.
        #[arg(long)]
        perfect_out: Option<PathBuf>,
        /// Also write the near record set here.
        #[arg(long)]
        near_out: Option<PathBuf>,
        /// Print the cluster report as JSON.
        #[arg(long)]
        clusters: bool,
        /// Near-cognate acceptance threshold (exclusive lower bound).
        #[arg(long, default_value_t = cognate_core::config::DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: f64,
        /// Minimum word length admitted to fuzzy comparison.
        #[arg(long, default_value_t = cognate_core::config::DEFAULT_MIN_FUZZY_LEN)]
        min_length: usize,
        /// Clusters and pairs to show in the report.
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Merge previously written perfect and near record sets.
    Merge {
        #[arg(long)]
        perfect: PathBuf,
        #[arg(long)]
        near: PathBuf,
        #[arg(long, default_value = "master_cognates.csv")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CognateError> {
    match cli.command {
        Command::Discover {
            raw,
            reference,
            reference_language,
            output,
            perfect_out,
            near_out,
            clusters,
            threshold,
            min_length,
            top,
        } => {
            let reference_language = LanguageCode::from_str(&reference_language)?;
            let config = EngineConfig {
                reference_language,
                similarity_threshold: threshold,
                min_fuzzy_len: min_length,
                top_k: top,
                ..EngineConfig::default()
            };

            let (mut sources, skipped) = io::load_raw_csv(&raw)?;
            let reference_list = io::load_word_list(&reference)?;
            sources.insert(reference_language, reference_list);

            let engine = Engine::new(config);
            let mut discovery = engine.run(sources)?;
            discovery.summary.skipped_rows = skipped;

            if let Some(path) = perfect_out {
                io::write_perfect_csv(&path, &discovery.perfect)?;
            }
            if let Some(path) = near_out {
                io::write_near_csv(&path, &discovery.near)?;
            }
            io::write_master_csv(&output, &discovery.master)?;

            if clusters {
                print_cluster_report(&discovery, engine.config().top_k)?;
            }
            report(&discovery.summary, &output);
            Ok(())
        }
        Command::Merge {
            perfect,
            near,
            output,
        } => {
            let perfect_records = io::read_perfect_csv(&perfect)?;
            let near_records = io::read_near_csv(&near)?;

            let engine = Engine::default();
            let (master, stats) = engine.merge_only(
                perfect_records,
                near_records,
                &DefaultAuditPolicy::default(),
            );
            io::write_master_csv(&output, &master)?;

            info!(
                rows = master.len(),
                removed_by_dedup = stats.removed_by_dedup,
                output = %output.display(),
                "master table written"
            );
            Ok(())
        }
    }
}

fn print_cluster_report(
    discovery: &cognate_core::DiscoveryOutput,
    top_k: usize,
) -> Result<(), CognateError> {
    let report = &discovery.clusters;
    info!(
        clusters = report.total_clusters(),
        words = report.total_words(),
        "cluster summary"
    );
    for (languages, words) in report.top_clusters(top_k) {
        let names: Vec<&str> = languages.iter().map(|l| l.name()).collect();
        info!(languages = names.join(", "), words = words.len(), "cluster");
    }
    for &((a, b), count) in report.top_pairs(top_k) {
        info!(pair = format!("{} & {}", a.name(), b.name()), shared = count, "language pair");
    }
    println!("{}", report.to_json()?);
    Ok(())
}

fn report(summary: &RunSummary, output: &std::path::Path) {
    info!(
        perfect = summary.perfect_records,
        near = summary.near_records,
        master = summary.master_rows,
        removed_by_dedup = summary.removed_by_dedup,
        skipped_rows = summary.skipped_rows.total(),
        output = %output.display(),
        "run complete"
    );
}
