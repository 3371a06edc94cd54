//! Command-line interface definitions for the headline digest.
//!
//! All options have sensible defaults so a bare `headline_digest` run with a
//! `config.yaml` in the working directory does the right thing.

use clap::Parser;

/// Command-line arguments for the headline digest.
///
/// # Examples
///
/// ```sh
/// # Fetch configured sources, write ./digest.txt
/// headline_digest
///
/// # Explicit config and output, plus dated JSON copies
/// headline_digest -c ~/.config/digest.yaml -o /var/spool/digest.txt -j ./json
///
/// # Consolidate a saved batch without touching the network
/// headline_digest --input batch.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to config.yaml (defaults to ./config.yaml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Where to write the rendered digest
    #[arg(short, long, default_value = "digest.txt")]
    pub output: String,

    /// Optional output directory for dated JSON copies of the digest
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Read headlines from a JSON batch file instead of fetching sources
    #[arg(short, long)]
    pub input: Option<String>,

    /// API key sent to search-kind sources
    #[arg(long, env = "SEARCH_API_KEY", hide_env_values = true)]
    pub search_api_key: Option<String>,
}
