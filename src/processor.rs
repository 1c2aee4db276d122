//! Batch conversion engine.
//!
//! Orchestrates the workbook conversion workflow: input discovery, sheet
//! parsing on blocking worker tasks with bounded concurrency, and one JSON
//! output file per workbook.

pub mod discovery;

#[cfg(test)]
mod tests;

pub use discovery::{discover_inputs, is_supported_file};

use crate::config::ProcessorConfig;
use crate::constants::OUTPUT_SUFFIX;
use crate::error::{Result, SheetError};
use crate::models::{ProcessingStats, WorkbookResult};
use crate::parser::SheetParser;
use crate::workbook::load_workbook;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::{debug, error, warn};

/// Converts workbook files into `<stem>.records.json` outputs
pub struct WorkbookProcessor {
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    config: ProcessorConfig,
    parser: Arc<SheetParser>,
    show_progress: bool,
}

impl WorkbookProcessor {
    /// Create a processor; outputs land next to each input unless
    /// `output_dir` is given
    pub fn new(
        inputs: Vec<PathBuf>,
        output_dir: Option<PathBuf>,
        config: ProcessorConfig,
    ) -> Result<Self> {
        let parser = SheetParser::new(config.parser.clone())?;
        Ok(Self {
            inputs,
            output_dir,
            config,
            parser: Arc::new(parser),
            show_progress: true,
        })
    }

    /// Hide the progress bar and the console summary
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Where the output for `input` is written, before collision handling
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        self.output_dir_for(input).join(output_file_name(input, None))
    }

    fn output_dir_for<'a>(&'a self, input: &'a Path) -> &'a Path {
        match &self.output_dir {
            Some(dir) => dir,
            None => input.parent().unwrap_or_else(|| Path::new(".")),
        }
    }

    /// Pair every input with a distinct output path.
    ///
    /// Inputs sharing a stem and an output directory (`a/x.csv` and
    /// `b/x.csv` with `-o DIR`, or `x.csv` next to `x.json`) would
    /// overwrite each other. The first keeps `<stem>.records.json`; later
    /// ones get `<stem>_2.records.json`, `<stem>_3.records.json`, ...
    pub fn plan_outputs(&self, files: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
        let mut taken = HashSet::new();
        let mut plan = Vec::with_capacity(files.len());

        for input in files {
            let dir = self.output_dir_for(input);
            let mut output = dir.join(output_file_name(input, None));
            let mut n = 2;
            while taken.contains(&output) {
                output = dir.join(output_file_name(input, Some(n)));
                n += 1;
            }
            if n > 2 {
                warn!(
                    "Output for {} would overwrite another input's output, writing {} instead",
                    input.display(),
                    output.display()
                );
            }
            taken.insert(output.clone());
            plan.push((input.clone(), output));
        }
        plan
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        if self.show_progress {
            println!("{}", "Starting workbook conversion".bright_green().bold());
        }

        let files = discover_inputs(&self.inputs)?;
        if self.show_progress {
            println!(
                "  {} {} workbook files",
                "Found".bright_green(),
                files.len().to_string().bright_white().bold()
            );
        }

        let output_path = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => common_parent(&files),
        };

        if files.is_empty() {
            warn!("No workbook files found in the given inputs");
            return Ok(ProcessingStats {
                output_path,
                processing_time_ms: start_time.elapsed().as_millis(),
                ..ProcessingStats::default()
            });
        }

        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir).await?;
        }

        let plan = self.plan_outputs(&files);
        let mut stats = self.process_files(&plan).await?;
        stats.output_path = output_path;
        stats.processing_time_ms = start_time.elapsed().as_millis();

        if self.show_progress {
            print_summary(&stats);
        }
        Ok(stats)
    }

    async fn process_files(&self, files: &[(PathBuf, PathBuf)]) -> Result<ProcessingStats> {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .map_err(|e| SheetError::configuration(format!("progress template: {}", e)))?
                    .progress_chars("#>-"),
            );
            pb.set_message("Converting workbooks");
            pb
        } else {
            ProgressBar::hidden()
        };

        let concurrent_limit = self.config.max_concurrent_files.min(files.len()).max(1);
        debug!(
            "Converting {} files with concurrency {}",
            files.len(),
            concurrent_limit
        );

        let mut results = stream::iter(files)
            .map(|(file_path, output)| {
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = file_path.file_name() {
                        pb.set_message(format!("Converting: {}", file_name.to_string_lossy()));
                    }
                    let result = self.convert_file(file_path, output).await;
                    pb.inc(1);
                    (file_path, result)
                }
            })
            .buffer_unordered(concurrent_limit);

        let mut stats = ProcessingStats::default();
        while let Some((file_path, result)) = results.next().await {
            match result {
                Ok(workbook) => {
                    debug!(
                        "Converted {}: {} sheets, {} records",
                        file_path.display(),
                        workbook.sheets.len(),
                        workbook.record_count()
                    );
                    stats.record_workbook(&workbook);
                }
                Err(e) => {
                    error!("Failed to convert {}: {}", file_path.display(), e);
                    stats.files_failed += 1;
                    if self.config.fail_fast {
                        pb.abandon_with_message("Conversion aborted");
                        return Err(e);
                    }
                }
            }
        }

        pb.finish_with_message("All workbooks converted");
        Ok(stats)
    }

    /// Load and parse a single workbook, writing its JSON to `output`
    pub async fn convert_file(&self, file_path: &Path, output: &Path) -> Result<WorkbookResult> {
        let workbook = task::spawn_blocking({
            let file_path = file_path.to_owned();
            let parser = Arc::clone(&self.parser);
            move || -> Result<WorkbookResult> {
                let sheets = load_workbook(&file_path)?;
                Ok(parser.parse_workbook(&file_path, &sheets))
            }
        })
        .await
        .map_err(|e| SheetError::ProcessingFailed {
            path: file_path.to_path_buf(),
            reason: format!("worker task failed: {}", e),
        })??;

        let value = workbook.to_value();
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        }
        .map_err(|source| SheetError::Json {
            path: output.to_path_buf(),
            source,
        })?;

        fs::write(output, bytes).await?;
        debug!("Wrote {}", output.display());
        Ok(workbook)
    }
}

/// `<stem>.records.json`, or `<stem>_<n>.records.json` when numbered
fn output_file_name(input: &Path, number: Option<usize>) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match number {
        Some(n) => format!("{}_{}.{}", stem, n, OUTPUT_SUFFIX),
        None => format!("{}.{}", stem, OUTPUT_SUFFIX),
    }
}

/// Deepest directory containing every input file
fn common_parent(files: &[PathBuf]) -> PathBuf {
    let mut parents = files.iter().filter_map(|file| file.parent());
    let Some(mut common) = parents.next() else {
        return PathBuf::from(".");
    };
    for parent in parents {
        while !parent.starts_with(common) {
            match common.parent() {
                Some(up) => common = up,
                None => return PathBuf::from("."),
            }
        }
    }
    if common.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        common.to_path_buf()
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Sheets parsed:".bright_cyan(),
        stats.sheets_parsed.to_string().bright_white()
    );
    if stats.sheets_failed > 0 {
        println!(
            "  {} {}",
            "Sheets failed:".bright_red(),
            stats.sheets_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Total records:".bright_cyan(),
        stats.total_records.to_string().bright_white().bold()
    );
}
