mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "recon")]
#[command(version, about = "Layer reconciliation checks and reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two datasets position by position and write the diff workbook
    Diff {
        /// Reference dataset (JSON), e.g. the bronze table
        reference: String,

        /// Candidate dataset (JSON), e.g. the landing table
        candidate: String,

        /// Workbook path; relative paths go under the configured output directory
        #[arg(short, long, default_value = "positional_row_diffs.xlsx")]
        output: String,

        /// Configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check an observed schema against a schema contract
    Schema {
        /// Path to the contract file (YAML or TOML)
        contract: String,

        /// Observed schema (JSON object of column to datatype)
        observed: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Compare the content hashes of two datasets
    Hash {
        /// Reference dataset (JSON)
        reference: String,

        /// Candidate dataset (JSON)
        candidate: String,

        /// Columns to hash, comma separated (defaults to every column)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Render dbt test results as a self-contained HTML report
    Report {
        /// dbt run results
        #[arg(long, default_value = "datahub_refinery/target/run_results.json")]
        run_results: String,

        /// dbt manifest
        #[arg(long, default_value = "datahub_refinery/target/manifest.json")]
        manifest: String,

        /// Report path
        #[arg(short, long, default_value = "dbt_test_report.html")]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Diff {
            reference,
            candidate,
            output,
            config,
            format,
        } => commands::diff::execute(&reference, &candidate, &output, config.as_deref(), &format),

        Commands::Schema {
            contract,
            observed,
            format,
        } => commands::schema::execute(&contract, &observed, &format),

        Commands::Hash {
            reference,
            candidate,
            columns,
            config,
        } => commands::hash::execute(&reference, &candidate, columns, config.as_deref()),

        Commands::Report {
            run_results,
            manifest,
            output,
        } => commands::report::execute(&run_results, &manifest, &output),
    }
}
