//! Command-line argument definitions
//!
//! Defines the CLI surface with the clap derive API: `convert` for batch
//! conversion, `schema` for header discovery and `query` for path lookups.

use crate::config::{ParserConfig, ProcessorConfig};
use crate::error::{Result, SheetError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the worksheet record compiler
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sheet-records",
    version,
    about = "Compile header-annotated worksheets into nested, typed records",
    long_about = "Reads worksheets whose leading '#' rows declare field paths, types and \
                  defaults, and turns the data rows below into nested JSON records. Rows that \
                  only fill list fields are folded into the record above them."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert workbooks into `<stem>.records.json` files
    Convert(ConvertArgs),
    /// Print the header schema of every sheet without reading data rows
    Schema(SchemaArgs),
    /// Print every value found at a dotted path
    Query(QueryArgs),
}

/// Parser options shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ParserArgs {
    /// JSON file with parser settings; flags below override it
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Validate identifiers and type tags, dropping offending columns
    #[arg(long)]
    pub strict: bool,

    /// Match keywords, types and identifiers case-sensitively
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    /// Additional per-column header keyword (repeatable)
    #[arg(long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Workbook files, directories or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for output files; defaults to each input's directory
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Pretty-print output JSON
    #[arg(long)]
    pub pretty: bool,

    /// Number of workbooks converted concurrently (defaults to CPU count)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Stop at the first workbook that fails
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

/// Arguments for the schema command
#[derive(Debug, Clone, Parser)]
pub struct SchemaArgs {
    /// Workbook file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub parser: ParserArgs,
}

/// Arguments for the query command
#[derive(Debug, Clone, Parser)]
pub struct QueryArgs {
    /// Workbook file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dotted field path, e.g. `Items.Name`
    #[arg(value_name = "PATH")]
    pub path: String,

    #[command(flatten)]
    pub parser: ParserArgs,
}

impl Args {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars and summaries are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ParserArgs {
    /// Layer the flags over the config file (or the defaults)
    pub fn to_config(&self) -> Result<ParserConfig> {
        let mut config = match &self.config_file {
            Some(path) => ParserConfig::from_json_file(path)?,
            None => ParserConfig::default(),
        };
        if self.strict {
            config = config.with_strict();
        }
        if self.case_sensitive {
            config = config.with_case_sensitive();
        }
        for keyword in &self.keywords {
            config = config.with_custom_keyword(keyword.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

impl ConvertArgs {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(SheetError::configuration(
                "Number of jobs must be greater than 0",
            ));
        }
        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(SheetError::configuration(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Build the batch configuration
    pub fn to_processor_config(&self) -> Result<ProcessorConfig> {
        let mut config = ProcessorConfig::default().with_parser(self.parser.to_config()?);
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_files(jobs);
        }
        if self.pretty {
            config = config.with_pretty();
        }
        if self.fail_fast {
            config = config.with_fail_fast();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_convert_args_parse() {
        let args = Args::try_parse_from([
            "sheet-records",
            "convert",
            "a.csv",
            "data/",
            "-o",
            "out",
            "--strict",
            "--keyword",
            "desc",
            "--keyword",
            "unit",
            "--jobs",
            "3",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.verbose, 1);
        let Some(Commands::Convert(convert)) = args.command else {
            panic!("expected convert command");
        };
        assert_eq!(convert.inputs.len(), 2);
        assert_eq!(convert.output_dir, Some(PathBuf::from("out")));
        assert!(convert.parser.strict);
        assert_eq!(convert.parser.keywords, vec!["desc", "unit"]);
        assert_eq!(convert.jobs, Some(3));
    }

    #[test]
    fn test_convert_requires_input() {
        assert!(Args::try_parse_from(["sheet-records", "convert"]).is_err());
    }

    #[test]
    fn test_query_args_parse() {
        let args =
            Args::try_parse_from(["sheet-records", "query", "book.json", "Items.Name", "-q"])
                .unwrap();
        assert!(args.quiet);
        let Some(Commands::Query(query)) = args.command else {
            panic!("expected query command");
        };
        assert_eq!(query.path, "Items.Name");
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::try_parse_from(["sheet-records"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_parser_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"custom_keywords": ["desc"], "max_depth": 2}}"#).unwrap();

        let parser = ParserArgs {
            config_file: Some(file.path().to_path_buf()),
            strict: true,
            case_sensitive: false,
            keywords: vec!["unit".to_string()],
        };
        let config = parser.to_config().unwrap();
        assert!(config.strict);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.custom_keywords, vec!["desc", "unit"]);
    }

    #[test]
    fn test_convert_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();

        let mut args = ConvertArgs {
            inputs: vec![temp_dir.path().to_path_buf()],
            output_dir: None,
            parser: ParserArgs::default(),
            pretty: false,
            jobs: Some(2),
            fail_fast: false,
        };
        assert!(args.validate().is_ok());
        assert_eq!(args.to_processor_config().unwrap().max_concurrent_files, 2);

        args.jobs = Some(0);
        assert!(args.validate().is_err());

        args.jobs = None;
        args.output_dir = Some(file);
        assert!(args.validate().is_err());
    }
}
