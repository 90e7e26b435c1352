use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sortcheck_core::{normalize_xml, NormalizeOptions, SortProfile};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "checkstyle-in.xml";
const DEFAULT_OUTPUT: &str = "checkstyle-out.xml";

/// SortCheckstyle - canonical ordering for Checkstyle configurations
///
/// Sort the attributes and children of every element, optionally
/// compressing whitespace, and write the result back.
#[derive(Parser)]
#[command(name = "sortcheck", version, about, long_about = None)]
struct Cli {
    /// Generate additional log output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress progress messages
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a configuration and write the result
    Sort {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        processing: ProcessingArgs,
    },

    /// Report whether a configuration is already in canonical form
    Check {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        processing: ProcessingArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct InputArgs {
    /// Input file [default: checkstyle-in.xml]
    #[arg(short = 'i', long = "input", short_alias = 'f', alias = "file", conflicts_with = "uri")]
    file: Option<PathBuf>,

    /// Input URI, fetched over HTTP(S)
    #[arg(short, long)]
    uri: Option<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT, conflicts_with_all = ["stdout", "in_place"])]
    output: PathBuf,

    /// Write the result to standard output
    #[arg(long, conflicts_with = "in_place")]
    stdout: bool,

    /// Overwrite the input file
    #[arg(short = 'w', long, conflicts_with = "uri")]
    in_place: bool,
}

#[derive(Args)]
struct ProcessingArgs {
    /// Remove whitespace-only text between elements
    #[arg(short, long)]
    compress: bool,

    /// Collapse whitespace runs in property and message values
    #[arg(long)]
    collapse_values: bool,

    /// Disable attribute sorting
    #[arg(long)]
    no_sort_attributes: bool,

    /// Disable child sorting
    #[arg(long)]
    no_sort_children: bool,

    /// Child ordering to apply
    #[arg(long, value_enum, default_value_t = Profile::Alphabetical)]
    profile: Profile,
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    /// Tag, then name attribute, then content
    Alphabetical,
    /// Properties, then modules by check category, then messages
    Checkstyle,
}

impl ProcessingArgs {
    fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            sort_attributes: !self.no_sort_attributes,
            sort_children: !self.no_sort_children,
            compress: self.compress,
            collapse_values: self.collapse_values,
            profile: match self.profile {
                Profile::Alphabetical => SortProfile::Alphabetical,
                Profile::Checkstyle => SortProfile::Checkstyle,
            },
        }
    }
}

/// Where the document came from, for messages and in-place writes
enum Source {
    File(PathBuf),
    Uri(String),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            2
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<i32> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Sort {
            input,
            output,
            processing,
        } => sort(&input, &output, &processing, quiet),
        Commands::Check {
            input,
            processing,
            json,
        } => check(&input, &processing, json, quiet),
        Commands::Version => {
            println!("sortcheck {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn sort(input: &InputArgs, output: &OutputArgs, processing: &ProcessingArgs, quiet: bool) -> Result<i32> {
    let (source, text) = read_input(input, quiet)?;
    let options = processing.options();
    let result = normalize_xml(&text, &options).context("failed to parse input XML")?;
    info!(
        changed = result.report.changed,
        after = %result.report.after_sha256,
        "normalized"
    );

    if output.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(result.output.as_bytes())
            .context("failed to write to standard output")?;
        stdout.flush()?;
    } else {
        let path = if output.in_place {
            match &source {
                Source::File(path) => path.clone(),
                Source::Uri(_) => bail!("--in-place requires a file input"),
            }
        } else {
            output.output.clone()
        };
        progress(
            quiet,
            &format!(
                "Writing {} XML to file \"{}\" ...",
                options.describe(),
                path.display()
            ),
        );
        fs::write(&path, &result.output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        done(quiet);
    }

    if !quiet {
        eprintln!("{}", result.report.summary().dimmed());
    }
    Ok(0)
}

fn check(input: &InputArgs, processing: &ProcessingArgs, json: bool, quiet: bool) -> Result<i32> {
    let (_, text) = read_input(input, quiet || json)?;
    let options = processing.options();
    let result = normalize_xml(&text, &options).context("failed to parse input XML")?;

    if json {
        println!("{}", result.report.to_json()?);
    } else if !quiet {
        if result.report.changed {
            println!("{} would be {}", "✗".red(), options.describe());
        } else {
            println!("{} {}", "✓".green(), result.report.summary());
        }
    }

    Ok(if result.report.changed { 1 } else { 0 })
}

// ── I/O helpers ───────────────────────────────────────────

fn read_input(input: &InputArgs, quiet: bool) -> Result<(Source, String)> {
    if let Some(uri) = &input.uri {
        progress(quiet, &format!("Reading XML from URI \"{}\" ...", uri));
        let text = fetch(uri)?;
        done(quiet);
        return Ok((Source::Uri(uri.clone()), text));
    }

    let path = input
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    progress(quiet, &format!("Reading XML from file \"{}\" ...", path.display()));
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    done(quiet);
    debug!(bytes = text.len(), "read input file");
    Ok((Source::File(path), text))
}

fn fetch(uri: &str) -> Result<String> {
    let response = reqwest::blocking::get(uri)
        .with_context(|| format!("failed to fetch {}", uri))?
        .error_for_status()
        .with_context(|| format!("server rejected request for {}", uri))?;
    let text = response
        .text()
        .with_context(|| format!("failed to read response body from {}", uri))?;
    debug!(bytes = text.len(), "fetched input URI");
    Ok(text)
}

fn progress(quiet: bool, message: &str) {
    if !quiet {
        eprint!("{}", message);
    }
}

fn done(quiet: bool) {
    if !quiet {
        eprintln!(" {}", "done.".green());
    }
}
