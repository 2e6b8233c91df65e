//! xmlstats CLI tool - check an XML document and print its stats
//!
//! Usage: xmlstats [OPTIONS] INPUT

use std::env;
use std::process;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use xmlstats::source::{DocumentSource, SourceError};
use xmlstats::{scan, ScanReport};

/// Exit code for malformed documents
const EXIT_PARSE_ERROR: i32 = 1;
/// Exit code for documents that could not be read or fetched
const EXIT_SOURCE_ERROR: i32 = 2;

#[derive(Debug, Default)]
struct Options {
    json: bool,
    list_broken: bool,
    timing: bool,
    verbose: bool,
    input: Option<String>,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("xmlstats");

    let mut options = Options::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--list-broken" => options.list_broken = true,
            "--timing" => options.timing = true,
            "--verbose" => options.verbose = true,
            "--help" | "-h" => {
                print_usage(program);
                process::exit(0);
            }
            _ if options.input.is_none() => options.input = Some(arg.clone()),
            _ => {
                eprintln!("Error: unexpected argument {}", arg);
                print_usage(program);
                process::exit(EXIT_SOURCE_ERROR);
            }
        }
    }

    init_logging(options.verbose);

    if options.input.is_none() {
        eprintln!("Error: Missing required argument <INPUT>");
        print_usage(program);
        process::exit(EXIT_SOURCE_ERROR);
    }

    match run(&options) {
        Ok(output) => println!("{}", output),
        Err(failure) => {
            eprintln!("{}", failure);
            process::exit(failure.exit_code());
        }
    }
}

/// Why a run produced no stats
#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("Error: Missing required argument <INPUT>")]
    MissingInput,

    #[error(transparent)]
    Source(#[from] SourceError),

    /// Parse error already formatted with its line, column and context
    #[error("{0}")]
    Parse(String),

    #[error("Error: cannot serialize stats: {0}")]
    Render(#[from] serde_json::Error),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::MissingInput | Failure::Source(_) => EXIT_SOURCE_ERROR,
            Failure::Parse(_) | Failure::Render(_) => EXIT_PARSE_ERROR,
        }
    }
}

/// Load, scan and render the document named by `options.input`
fn run(options: &Options) -> Result<String, Failure> {
    let input = options.input.as_deref().ok_or(Failure::MissingInput)?;

    let start = Instant::now();
    let document = DocumentSource::from_arg(input).load()?;

    if options.timing {
        eprintln!("Document loaded in {:?}", start.elapsed());
    }

    let scan_start = Instant::now();
    let report = scan(&document).map_err(|e| Failure::Parse(e.format_with_context(&document)))?;

    if options.timing {
        eprintln!("Document scanned in {:?}", scan_start.elapsed());
        eprintln!("Total time: {:?}", start.elapsed());
    }

    if options.json {
        Ok(render_json(&report, options.list_broken)?)
    } else {
        Ok(render_text(&report, options.list_broken))
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_text(report: &ScanReport, list_broken: bool) -> String {
    let mut lines = vec![
        format!("letters: {}", report.stats.letter_count),
        format!("links: {}", report.stats.total_link_count),
        format!("broken links: {}", report.stats.broken_link_count),
    ];

    if list_broken {
        lines.extend(report.broken_links.iter().map(|target| format!("  #{}", target)));
    }

    lines.join("\n")
}

/// Stats only, or the full report with `brokenLinks` when listing targets
fn render_json(report: &ScanReport, list_broken: bool) -> Result<String, serde_json::Error> {
    if list_broken {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string_pretty(&report.stats)
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [<OPTION>...] <INPUT>", program);
    eprintln!();
    eprintln!("  Check that an XML document is well formed, count the letters in its text");
    eprintln!("  and verify that every <a href=\"#id\"> points at a declared id.");
    eprintln!();
    eprintln!("  <INPUT>            the document: literal, file name or http(s) URL.");
    eprintln!();
    eprintln!("  <OPTION>:");
    eprintln!("    --json           print the stats as JSON.");
    eprintln!("    --list-broken    also list the targets of broken links.");
    eprintln!("    --timing         print timing information.");
    eprintln!("    --verbose        enable debug logging (RUST_LOG overrides).");
    eprintln!("    --help, -h       show this help message.");
    eprintln!();
    eprintln!("  A literal input must be preceded by an exclamation point (!).");
    eprintln!("  Stats go to standard output, all diagnostics go to standard error.");
    eprintln!("  Exit status: 0 ok, 1 malformed document, 2 document could not be read.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlstats::XmlStats;

    fn report() -> ScanReport {
        ScanReport {
            stats: XmlStats {
                letter_count: 5,
                total_link_count: 3,
                broken_link_count: 2,
            },
            broken_links: vec!["gone".to_string(), "lost".to_string()],
        }
    }

    fn options_for(input: &str) -> Options {
        Options {
            input: Some(input.to_string()),
            ..Options::default()
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&report(), false),
            "letters: 5\nlinks: 3\nbroken links: 2"
        );
        assert_eq!(
            render_text(&report(), true),
            "letters: 5\nlinks: 3\nbroken links: 2\n  #gone\n  #lost"
        );
    }

    #[test]
    fn test_render_json_keys() {
        let stats: serde_json::Value =
            serde_json::from_str(&render_json(&report(), false).unwrap()).unwrap();
        assert_eq!(stats["letterCount"], 5);
        assert_eq!(stats["totalLinkCount"], 3);
        assert_eq!(stats["brokenLinkCount"], 2);
        assert!(stats.get("brokenLinks").is_none());

        let full: serde_json::Value =
            serde_json::from_str(&render_json(&report(), true).unwrap()).unwrap();
        assert_eq!(full["brokenLinkCount"], 2);
        assert_eq!(full["brokenLinks"], serde_json::json!(["gone", "lost"]));
    }

    #[test]
    fn test_run_literal() {
        let mut options = options_for(r##"!<?xml version="1.0"?><doc><a href="#x">Hi</a></doc>"##);
        options.list_broken = true;
        let output = run(&options).unwrap();
        assert_eq!(output, "letters: 2\nlinks: 1\nbroken links: 1\n  #x");
    }

    #[test]
    fn test_malformed_document_exits_with_parse_code() {
        let failure = run(&options_for("!<doc/>")).unwrap_err();
        assert!(matches!(failure, Failure::Parse(_)));
        assert_eq!(failure.exit_code(), EXIT_PARSE_ERROR);
        assert_eq!(failure.exit_code(), 1);
    }

    #[test]
    fn test_missing_file_exits_with_source_code() {
        let failure = run(&options_for("/nonexistent/xmlstats/missing.xml")).unwrap_err();
        assert!(matches!(failure, Failure::Source(SourceError::Io { .. })));
        assert_eq!(failure.exit_code(), EXIT_SOURCE_ERROR);
        assert_eq!(failure.exit_code(), 2);
    }

    #[test]
    fn test_missing_input_exits_with_source_code() {
        let failure = run(&Options::default()).unwrap_err();
        assert_eq!(failure.exit_code(), 2);
    }
}
