use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use gradebook::grading::AssessmentScheme;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable table
    #[default]
    Table,
    /// Tab-separated values, one row per subject
    Tsv,
    /// Pretty JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build report cards (subject totals, grades and positions) per cohort
    Report {
        /// Results files or glob patterns (e.g. "results/*.json")
        #[arg(required = true)]
        files: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Also write the full report as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the configured scheme, e.g. "ca=40,exam=60"
        #[arg(long)]
        scheme: Option<String>,
    },
    /// Print overall class positions per cohort
    Rank {
        /// Results files or glob patterns
        #[arg(required = true)]
        files: Vec<String>,

        /// Override the configured scheme, e.g. "ca1=10,ca2=10,exam=80"
        #[arg(long)]
        scheme: Option<String>,
    },
    /// Compute mock-exam aggregates from a mock sheet
    Mock {
        /// Mock sheet JSON file
        file: PathBuf,

        /// Output format (tsv prints the table without colours)
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Resolve the letter grade for a single total
    Grade {
        /// Weighted total (0-100)
        #[arg(allow_negative_numbers = true)]
        total: f64,

        /// Department used to pick the grading scale
        #[arg(long)]
        department: Option<String>,

        /// Academic year used to pick the grading scale
        #[arg(long)]
        year: Option<String>,

        /// Term used to pick the grading scale
        #[arg(long)]
        term: Option<String>,
    },
    /// Validate the configuration and list warnings
    Check,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(about = "Report cards, class positions and mock aggregates from raw CA and exam marks", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to config file (defaults to ~/.config/gradebook/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GRADEBOOK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Parse a `--scheme` override, exiting with a config error if it is invalid.
fn scheme_override(raw: Option<&str>, configured: &AssessmentScheme) -> AssessmentScheme {
    match raw {
        None => configured.clone(),
        Some(s) => match s.parse::<AssessmentScheme>() {
            Ok(mut scheme) => {
                scheme.name = Some("command line".to_string());
                for warning in gradebook::grading::grading_warnings(&scheme, &[]) {
                    tracing::warn!("{}", warning);
                }
                scheme
            }
            Err(e) => {
                eprintln!("Invalid --scheme '{}': {}", s, e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    }
}

fn load_results_or_exit(files: &[String]) -> Vec<gradebook::results::StudentResult> {
    match gradebook::results::load_results(files) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Results error: {}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("{}", e);
    }

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading, since the config may not exist yet
    if let Commands::Init = cli.command {
        if let Err(e) = gradebook::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match gradebook::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate grading config at startup
    if let Err(errors) =
        gradebook::grading::validate_grading(&config.scheme, &config.grading_scales)
    {
        eprintln!("Grading config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // `check` prints these itself
    if !matches!(cli.command, Commands::Check) {
        for warning in
            gradebook::grading::grading_warnings(&config.scheme, &config.grading_scales)
        {
            tracing::warn!("{}", warning);
        }
    }

    tracing::debug!(
        scheme = config.scheme.display_name(),
        ca = config.scheme.ca_percentage(),
        exam = config.scheme.exam_percentage(),
        "using assessment scheme"
    );

    let use_colors = gradebook::output::should_use_colors();

    match cli.command {
        Commands::Report {
            files,
            format,
            output,
            scheme,
        } => {
            let scheme = scheme_override(scheme.as_deref(), &config.scheme);
            let results = load_results_or_exit(&files);
            let report =
                gradebook::report::build_report(results, &scheme, &config.grading_scales);

            match format {
                Format::Table => {
                    let tables: Vec<String> = report
                        .cohorts
                        .iter()
                        .map(|c| gradebook::output::format_report_table(c, use_colors))
                        .collect();
                    println!("{}", tables.join("\n\n"));
                }
                Format::Tsv => {
                    for cohort in &report.cohorts {
                        let tsv = gradebook::output::format_report_tsv(cohort);
                        if !tsv.is_empty() {
                            println!("{}", tsv);
                        }
                    }
                }
                Format::Json => match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
            }

            if let Some(path) = output {
                if let Err(e) = gradebook::results::save_json_report(&path, &report) {
                    eprintln!("Failed to write report: {:#}", e);
                    std::process::exit(EXIT_FAILURE);
                }
                tracing::info!(path = %path.display(), "report written");
            }

            tracing::debug!(
                cohorts = report.cohorts.len(),
                elapsed = ?start_time.elapsed(),
                "report complete"
            );
        }
        Commands::Rank { files, scheme } => {
            let scheme = scheme_override(scheme.as_deref(), &config.scheme);
            let results = load_results_or_exit(&files);
            let report =
                gradebook::report::build_report(results, &scheme, &config.grading_scales);
            let tables: Vec<String> = report
                .cohorts
                .iter()
                .map(|c| gradebook::output::format_ranking_table(c, use_colors))
                .collect();
            println!("{}", tables.join("\n\n"));
        }
        Commands::Mock { file, format } => {
            let sheet = match gradebook::results::load_mock_sheet(&file) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Mock sheet error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            let summaries = gradebook::mock::summarize(&sheet.entries);

            match format {
                Format::Json => match serde_json::to_string_pretty(&summaries) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize mock summary: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
                Format::Table | Format::Tsv => {
                    if let Some(ref session) = sheet.session {
                        println!("{}", session);
                    }
                    let colors = use_colors && format == Format::Table;
                    println!("{}", gradebook::output::format_mock_table(&summaries, colors));
                }
            }
        }
        Commands::Grade {
            total,
            department,
            year,
            term,
        } => {
            let bands = gradebook::grading::select_scale(
                &config.grading_scales,
                department.as_deref(),
                year.as_deref(),
                term.as_deref(),
            );
            if bands.is_empty() {
                tracing::debug!("no grading scale selected, using default ladder");
            }
            let letter = gradebook::grading::resolve_grade(total, bands);
            println!("{}", gradebook::output::format_grade(&letter));
        }
        Commands::Check => {
            println!(
                "Scheme: {} (CA {}%, exam {}%)",
                config.scheme.display_name(),
                config.scheme.ca_percentage(),
                config.scheme.exam_percentage()
            );
            if config.grading_scales.is_empty() {
                println!("Grading scales: none, default ladder applies");
            } else {
                for set in &config.grading_scales {
                    println!(
                        "Grading scale ({}): {} bands",
                        set.scope_label(),
                        set.bands.len()
                    );
                }
            }

            let warnings =
                gradebook::grading::grading_warnings(&config.scheme, &config.grading_scales);
            if warnings.is_empty() {
                println!("No problems found.");
            } else {
                println!("Warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
        }
        Commands::Init => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_accepts_negative_total() {
        let cli = Cli::try_parse_from(["gradebook", "grade", "-5"]).unwrap();
        match cli.command {
            Commands::Grade { total, .. } => assert_eq!(total, -5.0),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_report_flags() {
        let cli = Cli::try_parse_from([
            "gradebook", "-q", "report", "a.json", "b/*.json", "--format", "tsv", "--scheme",
            "ca=40,exam=60",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Report {
                files,
                format,
                scheme,
                output,
            } => {
                assert_eq!(files, vec!["a.json", "b/*.json"]);
                assert_eq!(format, Format::Tsv);
                assert_eq!(scheme.as_deref(), Some("ca=40,exam=60"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["gradebook", "-v", "-q", "check"]).is_err());
    }
}
