//! A CLI tool for converting DICOM files
//! into structured JSON documents.
use clap::Parser;
use dicomix_dictionary_std::{registry, TagDictionary};
use dicomix_json::{DataSetSerializer, OutputOptions};
use dicomix_parser::{parse_with_options, ParseOptions};
use snafu::{Report, ResultExt, Snafu, Whatever};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{error, Level};

/// Exit code for when the options or the dictionary could not be loaded.
const ERROR_SETUP: i32 = -1;
/// Exit code for when an error emerged while reading the DICOM file.
const ERROR_READ: i32 = -2;
/// Exit code for when the DICOM file could not be parsed.
const ERROR_PARSE: i32 = -3;
/// Exit code for when an error emerged while writing the output.
const ERROR_WRITE: i32 = -4;

/// Convert DICOM files to JSON
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// The DICOM file(s) to convert
    #[clap(required = true)]
    files: Vec<PathBuf>,
    /// Always write numeric values as arrays, even single ones
    #[arg(long = "array-single")]
    array_single: bool,
    /// Leave out group length elements
    #[arg(long = "ignore-group-length")]
    ignore_group_length: bool,
    /// Leave out file meta information elements
    #[arg(long = "ignore-meta-header")]
    ignore_meta_header: bool,
    /// Leave out private elements
    #[arg(long = "ignore-private")]
    ignore_private: bool,
    /// Leave out binary elements instead of writing bulk data URIs
    #[arg(long = "ignore-binary")]
    ignore_binary: bool,
    /// Key elements by tag instead of by keyword
    #[arg(long = "tag-keys")]
    tag_keys: bool,
    /// The root to prefix bulk data URIs with
    #[arg(long = "bulk-data-root", value_name = "ROOT")]
    bulk_data_root: Option<String>,
    /// The maximum sequence nesting depth
    #[arg(long = "max-depth", value_name = "DEPTH")]
    max_depth: Option<usize>,
    /// Read the output options from a JSON file
    /// (flags take precedence)
    #[arg(long = "options", value_name = "FILE")]
    options: Option<PathBuf>,
    /// Read the tag dictionary from a JSON file
    /// instead of using the standard one
    #[arg(long = "dictionary", value_name = "FILE")]
    dictionary: Option<PathBuf>,
    /// Pretty print the JSON output
    #[arg(long = "pretty")]
    pretty: bool,
    /// Stop at the first file which fails to convert
    #[arg(long = "fail-first")]
    fail_first: bool,
    /// Print debugging information
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl App {
    /// Build the output options,
    /// starting from the options file if given
    /// and applying the flags on top.
    fn output_options(&self) -> Result<OutputOptions, Whatever> {
        let mut options = match &self.options {
            Some(path) => read_options(path)?,
            None => OutputOptions::new(),
        };

        if self.array_single {
            options.use_array_with_single_value(true);
        }
        if self.ignore_group_length {
            options.ignore_group_length(true);
        }
        if self.ignore_meta_header {
            options.ignore_meta_header(true);
        }
        if self.ignore_private {
            options.ignore_private(true);
        }
        if self.ignore_binary {
            options.ignore_binary(true);
        }
        if self.tag_keys {
            options.use_common_names(false);
        }
        if let Some(root) = &self.bulk_data_root {
            options.bulk_data_root(root.as_str());
        }
        if let Some(depth) = self.max_depth {
            options.max_sequence_depth(depth);
        }
        Ok(options)
    }

    fn parse_options(&self, output_options: &OutputOptions) -> ParseOptions {
        let mut options = ParseOptions::new();
        options.max_depth(output_options.max_sequence_depth);
        options
    }
}

fn read_options(path: &Path) -> Result<OutputOptions, Whatever> {
    let text = std::fs::read_to_string(path)
        .with_whatever_context(|_| format!("Could not read options file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_whatever_context(|_| format!("Invalid options file {}", path.display()))
}

#[derive(Debug, Snafu)]
enum ConvertError {
    #[snafu(display("Could not read {}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Could not parse {}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: dicomix_parser::Error,
    },
    #[snafu(display("Could not write JSON"))]
    WriteJson { source: serde_json::Error },
    #[snafu(display("Could not write output"))]
    WriteOutput { source: std::io::Error },
}

impl ConvertError {
    fn exit_code(&self) -> i32 {
        match self {
            ConvertError::ReadFile { .. } => ERROR_READ,
            ConvertError::ParseFile { .. } => ERROR_PARSE,
            ConvertError::WriteJson { .. } | ConvertError::WriteOutput { .. } => ERROR_WRITE,
        }
    }

    fn is_broken_pipe(&self) -> bool {
        matches!(self, ConvertError::WriteOutput { source } if source.kind() == ErrorKind::BrokenPipe)
    }
}

fn main() {
    run().unwrap_or_else(|e| {
        eprintln!("{}", Report::from_error(e));
        std::process::exit(ERROR_SETUP);
    });
}

fn run() -> Result<(), Whatever> {
    let app = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if app.verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")
    .unwrap_or_else(|e: Whatever| {
        eprintln!("[ERROR] {}", Report::from_error(e));
    });

    let options = app.output_options()?;
    let parse_options = app.parse_options(&options);

    let custom_dictionary;
    let dictionary: &TagDictionary = match &app.dictionary {
        Some(path) => {
            custom_dictionary = TagDictionary::open(path).with_whatever_context(|_| {
                format!("Could not load dictionary {}", path.display())
            })?;
            &custom_dictionary
        }
        None => registry().whatever_context("Could not load the standard dictionary")?,
    };

    let serializer = DataSetSerializer::new(&options, dictionary);
    let fail_first = app.files.len() == 1 || app.fail_first;
    let mut errors: i32 = 0;

    for path in &app.files {
        match convert(&serializer, &parse_options, path, app.pretty) {
            Ok(()) => {}
            Err(e) if e.is_broken_pipe() => return Ok(()),
            Err(e) => {
                error!("{}", Report::from_error(&e));
                if fail_first {
                    std::process::exit(e.exit_code());
                }
                errors += 1;
            }
        }
    }

    std::process::exit(errors);
}

/// Read, parse and serialize one file, writing the JSON to standard output.
fn convert(
    serializer: &DataSetSerializer<'_, &TagDictionary>,
    parse_options: &ParseOptions,
    path: &Path,
    pretty: bool,
) -> Result<(), ConvertError> {
    let bytes = std::fs::read(path).context(ReadFileSnafu { path })?;
    let dataset = parse_with_options(&bytes, parse_options).context(ParseFileSnafu { path })?;
    tracing::debug!("{}: {} top level elements", path.display(), dataset.len());

    let output = serializer.serialize(&dataset);
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context(WriteJsonSnafu)?;

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    writeln!(stdout, "{}", json).context(WriteOutputSnafu)
}

#[cfg(test)]
mod tests {
    use crate::App;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli() {
        App::command().debug_assert();
    }

    #[test]
    fn flags_to_options() {
        let app = App::try_parse_from([
            "dicomix-tojson",
            "--ignore-group-length",
            "--tag-keys",
            "--bulk-data-root",
            "http://pacs/instances/1",
            "--max-depth",
            "8",
            "a.dcm",
        ])
        .unwrap();
        let options = app.output_options().unwrap();
        assert!(options.ignore_group_length);
        assert!(!options.use_common_names);
        assert!(!options.ignore_binary);
        assert_eq!(options.effective_bulk_data_root(), "http://pacs/instances/1");
        assert_eq!(options.max_sequence_depth, 8);
        assert_eq!(app.parse_options(&options).max_depth, 8);
    }

    #[test]
    fn flags_override_options_file() {
        let path = std::env::temp_dir().join(format!("dicomix-tojson-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "ignoreBinary": true, "useCommonNames": false }"#).unwrap();

        let app = App::try_parse_from([
            "dicomix-tojson",
            "--options",
            path.to_str().unwrap(),
            "--array-single",
            "a.dcm",
        ])
        .unwrap();
        let options = app.output_options();
        std::fs::remove_file(&path).unwrap();

        let options = options.unwrap();
        assert!(options.ignore_binary);
        assert!(!options.use_common_names);
        assert!(options.use_array_with_single_value);
    }

    #[test]
    fn files_are_required() {
        assert!(App::try_parse_from(["dicomix-tojson", "--pretty"]).is_err());
    }
}
