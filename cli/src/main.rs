//! undoc CLI - document to text artifact converter

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use undoc::{
    render, type_hint_from_key, ConversionHandler, HandlerConfig, HandlerVariant, LocalStore,
    Pipeline, StorageEvent,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "undoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert Word, Excel, and PDF documents into flat text artifacts", long_about = None)]
struct Cli {
    /// Handler preset
    #[arg(long, global = true, value_enum, env = "UNDOC_VARIANT")]
    variant: Option<Variant>,

    /// Handler configuration file (JSON); overrides --variant
    #[arg(long, global = true, value_name = "FILE", env = "UNDOC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert documents, writing each artifact next to its source
    Convert {
        /// Input documents
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Print the artifact of one document
    Text {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Type hint (defaults to the file extension)
        #[arg(short = 't', long = "type", value_name = "EXT")]
        type_hint: Option<String>,
    },

    /// Run the handler on an object-created notification
    Handle {
        /// Notification JSON file
        #[arg(short, long, value_name = "FILE")]
        event: PathBuf,

        /// Directory holding one subdirectory per bucket
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        root: PathBuf,
    },

    /// List the sections of an artifact
    Sections {
        /// Artifact file
        #[arg(value_name = "ARTIFACT")]
        input: PathBuf,

        /// Print sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// List accepted extensions
    Formats,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Word and Excel, every sheet delimited
    ContentExtraction,
    /// PDF, Word and Excel, active sheet only
    FullConversion,
    /// PDF and Word, `.md` suffix
    Markdown,
}

impl From<Variant> for HandlerVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::ContentExtraction => HandlerVariant::ContentExtraction,
            Variant::FullConversion => HandlerVariant::FullConversion,
            Variant::Markdown => HandlerVariant::Markdown,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref(), cli.variant).and_then(|config| {
        match cli.command {
            Some(Commands::Convert { inputs, output }) => {
                cmd_convert(config, &inputs, output.as_deref())
            }
            Some(Commands::Text {
                input,
                output,
                type_hint,
            }) => cmd_text(config, &input, output.as_deref(), type_hint.as_deref()),
            Some(Commands::Handle { event, root }) => cmd_handle(config, &event, &root),
            Some(Commands::Sections { input, json }) => cmd_sections(&input, json),
            Some(Commands::Formats) => {
                cmd_formats(&config);
                Ok(())
            }
            Some(Commands::Version) => {
                cmd_version();
                Ok(())
            }
            None => {
                println!("{}", "Usage: undoc <COMMAND> [FILE]...".yellow());
                println!("       undoc --help for more information");
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&Path>,
    variant: Option<Variant>,
) -> Result<HandlerConfig, Box<dyn std::error::Error>> {
    let config = match (path, variant) {
        (Some(path), _) => HandlerConfig::from_json_file(path)?,
        (None, Some(variant)) => HandlerVariant::from(variant).config(),
        (None, None) => HandlerConfig::default(),
    };
    log::debug!("Using configuration {:?}", config);
    Ok(config)
}

fn cmd_convert(config: HandlerConfig, inputs: &[PathBuf], output: Option<&Path>) -> CliResult {
    let pipeline = Pipeline::new(config)?;
    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());

        let hint = type_hint_from_key(&name);
        let bytes = fs::read(input)?;
        let artifact = pipeline.extract(&bytes, &hint)?;

        let target_name = pipeline.output_key(&name);
        let target = match output {
            Some(dir) => dir.join(&target_name),
            None => input.with_file_name(&target_name),
        };
        fs::write(&target, &artifact)?;
        written.push((target, artifact.len()));
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    let last = written.len().saturating_sub(1);
    for (i, (path, len)) in written.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!(
            "  {} {} {}",
            branch.dimmed(),
            path.display(),
            format!("({} bytes)", len).dimmed()
        );
    }

    Ok(())
}

fn cmd_text(
    config: HandlerConfig,
    input: &Path,
    output: Option<&Path>,
    type_hint: Option<&str>,
) -> CliResult {
    let pipeline = Pipeline::new(config)?;
    let hint = match type_hint {
        Some(hint) => hint.to_string(),
        None => type_hint_from_key(&input.to_string_lossy()),
    };

    let bytes = fs::read(input)?;
    let artifact = pipeline.extract(&bytes, &hint)?;

    if let Some(path) = output {
        fs::write(path, &artifact)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        io::stdout().write_all(&artifact)?;
    }

    Ok(())
}

fn cmd_handle(config: HandlerConfig, event: &Path, root: &Path) -> CliResult {
    let event = StorageEvent::from_json_file(event)?;
    let handler = ConversionHandler::new(config, LocalStore::new(root))?;

    for outcome in handler.handle_event(&event)? {
        println!(
            "{} {} {} {} {}",
            "Converted".green(),
            outcome.source,
            "->".dimmed(),
            outcome.target.key,
            format!("({}, {} bytes)", outcome.format, outcome.bytes_written).dimmed()
        );
    }

    Ok(())
}

fn cmd_sections(input: &Path, json: bool) -> CliResult {
    let text = fs::read_to_string(input)?;
    let sections = render::read_sections(&text)?;

    if json {
        let mut values = Vec::with_capacity(sections.len());
        for section in &sections {
            values.push(serde_json::json!({
                "sheetTitle": section.title(),
                "rows": section.records()?,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, section) in sections.iter().enumerate() {
        let rows = section.records()?.len();
        println!(
            "{:>3}. {}: {} rows",
            i + 1,
            section.title().unwrap_or("(untitled)").bold(),
            rows
        );
    }

    Ok(())
}

fn cmd_formats(config: &HandlerConfig) {
    println!("{}", "Accepted extensions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for ext in config.extensions() {
        println!("  .{}", ext);
    }
    println!();
    println!("{}: {:?}", "Sheet layout".bold(), config.sheet_layout);
    println!("{}: {}", "Output suffix".bold(), config.output_suffix);
}

fn cmd_version() {
    println!("{} {}", "undoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document to text artifact converter");
    println!();
    println!("License: MIT");
}
