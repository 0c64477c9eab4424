// KeyComp CLI - headless key-based dataset comparison

mod exit_codes;
mod load;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use keycomp_recon::{
    compare, normalize_value, render_outcome_summary, CompareConfig, CompareError, CompareOutcome,
};

use exit_codes::{
    EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_MISSING_COLUMN, EXIT_SUCCESS, EXIT_USAGE,
};
use load::load_source;

pub struct CliError {
    pub code: u8,
    pub message: String,
}

#[derive(Parser)]
#[command(name = "kcomp")]
#[command(about = "Compare two tabular datasets by a normalized key column")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a comparison from a TOML job file
    #[command(after_help = "\
Examples:
  kcomp compare job.toml
  kcomp compare job.toml --json
  kcomp compare job.toml --excel results.xlsx --summary results.txt
  kcomp compare job.toml --output outcome.json")]
    Compare {
        /// Path to the job config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write a two-sheet Excel workbook (unique matches, unique non-matches)
        #[arg(long)]
        excel: Option<PathBuf>,

        /// Write the plain-text summary report
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Validate a job config without running it
    #[command(after_help = "\
Examples:
  kcomp validate job.toml")]
    Validate {
        /// Path to the job config file
        config: PathBuf,
    },

    /// Show how the first rows of a dataset's key column normalize
    #[command(after_help = "\
Examples:
  kcomp preview job.toml
  kcomp preview job.toml --dataset 2 --limit 10")]
    Preview {
        /// Path to the job config file
        config: PathBuf,

        /// Which dataset to preview (1 or 2)
        #[arg(long, default_value_t = 1)]
        dataset: u8,

        /// Number of rows to show
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// List the worksheets of an Excel file
    #[command(after_help = "\
Examples:
  kcomp sheets report.xlsx")]
    Sheets {
        /// Path to the Excel file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            config,
            json,
            output,
            excel,
            summary,
        } => cmd_compare(config, json, output, excel, summary),
        Commands::Validate { config } => cmd_validate(config),
        Commands::Preview {
            config,
            dataset,
            limit,
        } => cmd_preview(config, dataset, limit),
        Commands::Sheets { file } => cmd_sheets(file),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::from(e.code)
        }
    }
}

fn cli_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError {
        code,
        message: msg.into(),
    }
}

fn read_config(path: &Path) -> Result<CompareConfig, CliError> {
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| cli_err(EXIT_LOAD, format!("cannot read config: {e}")))?;
    CompareConfig::from_toml(&config_str).map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))
}

fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_compare(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    excel_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base = base_dir(&config_path);

    let table1 = load_source(&config.dataset1, base, 1)?;
    let table2 = load_source(&config.dataset2, base, 2)?;

    let (result, statistics) = compare(
        &table1,
        &config.dataset1.side_spec(),
        &table2,
        &config.dataset2.side_spec(),
    )
    .map_err(compare_error)?;

    let outcome = CompareOutcome::new(&config.name, result, statistics);

    // Human summary to stderr
    let s = &outcome.statistics;
    eprintln!(
        "'{}': {} records ({} unique) — {} unique matches, {} unique non-matches, {} duplicate matches, {} duplicate non-matches",
        config.name,
        s.total_records,
        s.total_unique,
        s.unique_matches,
        s.unique_non_matches,
        s.duplicate_matches,
        s.duplicate_non_matches,
    );

    if let Some(ref path) = excel_file {
        keycomp_io::xlsx::export_result(&outcome.matches, &outcome.non_matches, path)
            .map_err(|e| cli_err(EXIT_ERROR, e.to_string()))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = summary_file {
        let text = render_outcome_summary(&outcome);
        std::fs::write(path, text)
            .map_err(|e| cli_err(EXIT_ERROR, format!("cannot write summary: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    let json_str = serde_json::to_string_pretty(&outcome)
        .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| cli_err(EXIT_ERROR, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: '{}' comparing dataset 2 ({}) against dataset 1 ({})",
        config.name,
        config.dataset2.key_column,
        config.dataset1.key_column,
    );
    Ok(())
}

fn cmd_preview(config_path: PathBuf, dataset: u8, limit: usize) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base = base_dir(&config_path);

    let source = match dataset {
        1 => &config.dataset1,
        2 => &config.dataset2,
        other => {
            return Err(cli_err(
                EXIT_USAGE,
                format!("--dataset must be 1 or 2, got {other}"),
            ))
        }
    };

    let table = load_source(source, base, dataset)?;
    let column = table.column(&source.key_column).ok_or_else(|| {
        cli_err(
            EXIT_MISSING_COLUMN,
            format!(
                "dataset {dataset}: column '{}' not found",
                source.key_column
            ),
        )
    })?;

    let (trim_start, trim_end) = source.trim.effective();
    println!(
        "dataset {dataset}: key column '{}' (trim {trim_start}/{trim_end})",
        source.key_column
    );
    for value in column.values.iter().filter(|v| !v.is_null()).take(limit) {
        println!(
            "  {:?} -> {:?}",
            value.render_text(),
            normalize_value(value, trim_start, trim_end)
        );
    }
    Ok(())
}

fn cmd_sheets(file: PathBuf) -> Result<(), CliError> {
    let names = keycomp_io::xlsx::sheet_names(&file)
        .map_err(|e| cli_err(EXIT_LOAD, e.to_string()))?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn compare_error(error: CompareError) -> CliError {
    let code = match error {
        CompareError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        _ => EXIT_INVALID_CONFIG,
    };
    cli_err(code, error.to_string())
}
