//! Command implementations for the CLI
//!
//! Sets up logging, builds configuration from the parsed arguments and
//! dispatches to batch conversion, schema discovery or path queries.

use crate::cli::args::{Args, Commands, ConvertArgs, QueryArgs, SchemaArgs};
use crate::models::ProcessingStats;
use crate::parser::SheetParser;
use crate::path::{build_path, query};
use crate::processor::WorkbookProcessor;
use crate::value::Value;
use crate::workbook::load_workbook;
use crate::worksheet::Worksheet;
use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info, warn};

/// Main command runner
pub async fn run(args: Args) -> Result<ProcessingStats> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let show_progress = args.show_progress();
    match args.command {
        Some(Commands::Convert(convert)) => run_convert(convert, show_progress).await,
        Some(Commands::Schema(schema)) => {
            run_schema(&schema)?;
            Ok(ProcessingStats::default())
        }
        Some(Commands::Query(query)) => {
            run_query(&query)?;
            Ok(ProcessingStats::default())
        }
        None => anyhow::bail!("No command given; run with --help for usage"),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sheet_records={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

async fn run_convert(args: ConvertArgs, show_progress: bool) -> Result<ProcessingStats> {
    args.validate()?;
    let config = args.to_processor_config()?;
    debug!("Processor configuration: {:?}", config);

    let mut processor = WorkbookProcessor::new(args.inputs, args.output_dir, config)?;
    if !show_progress {
        processor = processor.quiet();
    }

    let stats = processor.process().await?;
    info!(
        "Converted {} files ({} failed), {} records",
        stats.files_processed, stats.files_failed, stats.total_records
    );

    if stats.files_processed == 0 && stats.files_failed > 0 {
        anyhow::bail!("No workbook could be converted");
    }
    Ok(stats)
}

/// Discovery mode: report headers without reading data rows
fn run_schema(args: &SchemaArgs) -> Result<()> {
    let parser = SheetParser::new(args.parser.to_config()?)?;
    let sheets = load_workbook(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!(
        "{} {}",
        "Workbook:".bright_green().bold(),
        args.file.display()
    );

    for sheet in &sheets {
        println!("\n{} {}", "Sheet".bright_yellow(), sheet.name().bright_white().bold());

        let schema = match parser.extract_schema(sheet) {
            Ok(schema) => schema,
            Err(e) => {
                warn!("No schema for sheet '{}': {}", sheet.name(), e);
                println!("  {} {}", "Skipped:".bright_red(), e);
                continue;
            }
        };

        println!(
            "  {} {} (data starts at row {})",
            "Header rows:".bright_cyan(),
            schema.header_rows,
            schema.data_start_row()
        );

        println!("  {}", "Columns:".bright_cyan());
        for column in &schema.columns {
            let path = build_path(column.var_path());
            println!(
                "    {:>4}  {}  {}",
                column.column,
                path.bright_white(),
                column.types().join(" / ").bright_black()
            );
        }

        println!("  {}", "Types:".bright_cyan());
        for (path, tag) in &schema.path_types {
            println!("    {} = {}", path, tag.bright_white());
        }

        if !schema.path_defaults.is_empty() {
            println!("  {}", "Defaults:".bright_cyan());
            for (path, default) in &schema.path_defaults {
                println!("    {} = {}", path, default.bright_white());
            }
        }

        if !schema.metadata.is_empty() {
            println!("  {}", "Metadata:".bright_cyan());
            for (key, value) in &schema.metadata {
                println!("    {} = {}", key, value.bright_white());
            }
        }
    }
    Ok(())
}

/// Print every value at a dotted path, one JSON value per line
fn run_query(args: &QueryArgs) -> Result<()> {
    let parser = SheetParser::new(args.parser.to_config()?)?;
    let sheets = load_workbook(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let workbook = parser.parse_workbook(&args.file, &sheets);

    let mut matches = 0usize;
    for sheet in &workbook.sheets {
        let records = Value::List(sheet.records.iter().cloned().map(Value::Record).collect());
        for value in query(&records, &args.path) {
            println!("{}", serde_json::to_string(value)?);
            matches += 1;
        }
    }

    debug!("Query '{}' matched {} values", args.path, matches);
    Ok(())
}
