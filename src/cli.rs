//! Command-line interface definitions.
//!
//! Flags override values loaded by [`Config::from_env`].

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::Config;
use crate::constants::DEFAULT_EMBED_BATCH_SIZE;

/// Default CSV path for `report`.
pub const DEFAULT_REPORT_PATH: &str = "taxon_report.csv";

/// Semantic search and Hit@K evaluation over the provider taxonomy.
#[derive(Parser, Debug)]
#[command(name = "taxon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Run a single ad-hoc query instead of the evaluation set
    #[arg(long, value_name = "TEXT")]
    pub free: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the labeled evaluation set and print Hit@1 / Hit@3 (default)
    Eval,

    /// Run the batch term list and write a CSV report
    Report {
        /// Output CSV path
        #[arg(long, short, default_value = DEFAULT_REPORT_PATH)]
        out: PathBuf,

        /// Print the first N rows per term while running
        #[arg(long, default_value_t = 0)]
        preview: usize,

        /// Terms embedded per request when pre-embedding
        #[arg(long, default_value_t = DEFAULT_EMBED_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Verify the collection exists and its vector size matches the encoder
    Check,
}

/// What a parsed command line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// `--free <TEXT>`: one ad-hoc query.
    Free(String),
    Command(Commands),
}

impl Cli {
    /// Resolves the run mode. `--free` only combines with `eval` (or no
    /// subcommand).
    pub fn mode(&self) -> Result<Mode, clap::Error> {
        match (self.command.clone().unwrap_or(Commands::Eval), &self.free) {
            (Commands::Eval, Some(query)) => Ok(Mode::Free(query.clone())),
            (command, None) => Ok(Mode::Command(command)),
            (_, Some(_)) => Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--free runs a single query and cannot be combined with 'report' or 'check'",
            )),
        }
    }
}

/// Retrieval knobs shared by every command.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SearchArgs {
    /// Candidates pulled from the index before gating
    #[arg(long, global = true)]
    pub retrieval_k: Option<usize>,

    /// Results kept per query
    #[arg(long, global = true)]
    pub final_k: Option<usize>,

    /// Minimum ANN score
    #[arg(long, global = true, conflicts_with = "no_threshold")]
    pub threshold: Option<f32>,

    /// Disable the score gate
    #[arg(long, global = true)]
    pub no_threshold: bool,

    /// Skip the cross-encoder stage
    #[arg(long, global = true)]
    pub no_rerank: bool,

    /// Send query text to the index's own inference instead of embedding locally
    #[arg(long, global = true)]
    pub server_embedding: bool,

    /// Keep only candidates in this section (e.g. Individual)
    #[arg(long, global = true)]
    pub section: Option<String>,

    /// Keep only candidates whose code starts with this prefix
    #[arg(long, global = true)]
    pub code_prefix: Option<String>,

    /// Collection to search
    #[arg(long, global = true)]
    pub collection: Option<String>,
}

impl SearchArgs {
    /// Writes every flag that was given into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(k) = self.retrieval_k {
            config.retrieval_k = k;
        }
        if let Some(k) = self.final_k {
            config.final_k = k;
        }
        if self.no_threshold {
            config.threshold = None;
        } else if let Some(t) = self.threshold {
            config.threshold = Some(t);
        }
        if self.no_rerank {
            config.rerank_enabled = false;
        }
        if self.server_embedding {
            config.server_side_embedding = true;
        }
        if let Some(section) = &self.section {
            config.section = Some(section.clone());
        }
        if let Some(prefix) = &self.code_prefix {
            config.code_prefix = Some(prefix.clone());
        }
        if let Some(collection) = &self.collection {
            config.collection = collection.clone();
        }
    }
}
