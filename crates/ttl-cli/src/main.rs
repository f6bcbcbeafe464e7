use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use ttl_core::builder::build_document;
use ttl_core::parser::parse_tree;
use ttl_core::ParseError;

/// 3TL - Typed Talking To LLMs
///
/// Parse, validate and fingerprint 3TL table files.
#[derive(Parser)]
#[command(name = "3tl", version, about, long_about = None)]
struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a 3TL file and output JSON
    Parse {
        /// Path to .3tl file
        file: PathBuf,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that input is valid 3TL
    Validate {
        /// Path to .3tl file
        #[arg(required_unless_present = "string")]
        file: Option<PathBuf>,
        /// Validate this text instead of a file
        #[arg(short, long, conflicts_with = "file")]
        string: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print the classified line tree
        #[arg(short = 't', long)]
        show_tree: bool,
    },

    /// Compute the document hash (SHA-256) of a 3TL file
    Hash {
        /// Path to .3tl file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let exit_code = match cli.command {
        Commands::Parse {
            file,
            pretty,
            output,
        } => cmd_parse(&file, pretty, output.as_deref(), cli.quiet),
        Commands::Validate {
            file,
            string,
            json,
            show_tree,
        } => cmd_validate(file.as_deref(), string, json, show_tree, cli.quiet),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Version => {
            println!("3tl {} (ttl-core {})", env!("CARGO_PKG_VERSION"), ttl_core::VERSION);
            0
        }
    };

    process::exit(exit_code);
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_parse(file: &Path, pretty: bool, output: Option<&Path>, quiet: bool) -> i32 {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let doc = match ttl_core::parse(&source) {
        Ok(doc) => doc,
        Err(ttl_core::Error::Parse(e)) => {
            report_parse_error(&e, &source, Some(file));
            return 1;
        }
        Err(e) => {
            report_error(&e.to_string());
            return 2;
        }
    };

    let json = ttl_core::serialize(&doc, pretty);

    match output {
        Some(out) => {
            if let Err(e) = std::fs::write(out, format!("{}\n", json)) {
                report_error(&format!("cannot write {}: {}", out.display(), e));
                return 2;
            }
            if !quiet {
                println!("Parsed {} -> {}", file.display(), out.display());
            }
        }
        None => println!("{}", json),
    }

    0
}

fn cmd_validate(
    file: Option<&Path>,
    string: Option<String>,
    json: bool,
    show_tree: bool,
    quiet: bool,
) -> i32 {
    let source = match (file, string) {
        (_, Some(text)) => text,
        (Some(path), None) => match read_source(path) {
            Ok(s) => s,
            Err(code) => return code,
        },
        (None, None) => {
            report_error("provide a FILE or --string");
            return 2;
        }
    };

    let result = parse_tree(&source).and_then(|tree| build_document(&tree).map(|_| tree));

    if json {
        let verdict = match &result {
            Ok(_) => serde_json::json!({ "valid": true, "error": null }),
            Err(e) => serde_json::json!({ "valid": false, "error": e }),
        };
        println!("{}", verdict);
        return if result.is_ok() { 0 } else { 1 };
    }

    match result {
        Ok(tree) => {
            if show_tree {
                print!("{}", tree.pretty());
            }
            if !quiet {
                println!("{}", "Valid 3TL format".green());
            }
            0
        }
        Err(e) => {
            report_parse_error(&e, &source, file);
            1
        }
    }
}

fn cmd_hash(file: &Path) -> i32 {
    let source = match read_source(file) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match ttl_core::parse(&source) {
        Ok(doc) => {
            println!("{}", ttl_core::document_hash(&doc));
            0
        }
        Err(ttl_core::Error::Parse(e)) => {
            report_parse_error(&e, &source, Some(file));
            1
        }
        Err(e) => {
            report_error(&e.to_string());
            2
        }
    }
}

// ── Helpers ───────────────────────────────────────────────

/// Read a source file; exit code 2 on failure
fn read_source(path: &Path) -> Result<String, i32> {
    std::fs::read_to_string(path).map_err(|e| {
        report_error(&format!("cannot read {}: {}", path.display(), e));
        2
    })
}

fn report_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

fn report_parse_error(err: &ParseError, source: &str, file: Option<&Path>) {
    match file {
        Some(path) => report_error(&format!("{}: {}", path.display(), err)),
        None => report_error(&err.to_string()),
    }
    eprintln!("{}", err.snippet(source));
}
