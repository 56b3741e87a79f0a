//! Meridian CLI - reformat, inspect and scan WKT coordinate reference systems

mod config;
mod logging;
mod summary;

use anyhow::{Context, Result};
use clap::{Parser as _, Subcommand};
use meridian_units::{Citation, UnitDialect};
use meridian_wkt::{format_with, FormatOptions, Parser, SymbolStyle};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::summary::Summary;

#[derive(clap::Parser)]
#[command(name = "meridian")]
#[command(author, version, about = "Well-Known Text CRS toolbox", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./meridian.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse WKT and write it back out
    Format {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
        /// Unit-label dialect: default, EPSG or ESRI
        #[arg(short, long)]
        dialect: Option<Citation>,
        /// Spaces per nesting level; 0 writes a single line
        #[arg(short, long)]
        indent: Option<usize>,
        /// Write parentheses instead of square brackets
        #[arg(long)]
        parentheses: bool,
    },
    /// Print a summary of a WKT object
    Inspect {
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether WKT text contains an element, ignoring quoted names
    Contains {
        /// Element keyword, e.g. AXIS
        keyword: String,
        /// Input file, stdin when omitted
        input: Option<PathBuf>,
    },
    /// Resolve a unit label
    Unit {
        label: String,
        /// Dialect consulted first
        #[arg(short, long)]
        dialect: Option<Citation>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Format {
            input,
            dialect,
            indent,
            parentheses,
        } => {
            let mut options = config.format;
            if let Some(dialect) = dialect {
                options.dialect = dialect;
            }
            if let Some(indent) = indent {
                options.indentation = indent;
            }
            if parentheses {
                options.symbols = SymbolStyle::Parentheses;
            }
            let text = read_input(input.as_deref())?;
            println!("{}", reformat(&config, &text, &options)?);
        }
        Commands::Inspect { input, json } => {
            let text = read_input(input.as_deref())?;
            let object = Parser::new(config.parser)
                .parse_object(&text)
                .context("Failed to parse WKT")?;
            let summary = Summary::of(&object, UnitDialect::get(config.format.dialect));
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
        }
        Commands::Contains { keyword, input } => {
            let text = read_input(input.as_deref())?;
            let symbols = config.parser.symbols.symbols();
            println!("{}", symbols.contains_keyword(&text, &keyword));
        }
        Commands::Unit { label, dialect } => {
            let first = dialect.unwrap_or(config.parser.dialect);
            print!("{}", describe_unit(&label, first)?);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn reformat(config: &Config, text: &str, options: &FormatOptions) -> Result<String> {
    let object = Parser::new(config.parser)
        .parse_object(text)
        .context("Failed to parse WKT")?;
    tracing::info!(kind = object.kind(), "Reformatting");
    format_with(&object, options).context("Failed to format WKT")
}

/// Factor and preferred label per dialect of the unit `label` names,
/// looked up in `first` and then in the other dialects.
fn describe_unit(label: &str, first: Citation) -> Result<String> {
    let unit = std::iter::once(first)
        .chain(Citation::ALL.into_iter().filter(|c| *c != first))
        .find_map(|c| UnitDialect::get(c).lookup(label))
        .with_context(|| format!("Unknown unit label '{label}'"))?;

    let mut out = format!(
        "{}: {:?}, factor {:?}\n",
        label,
        unit.dimension(),
        unit.factor()
    );
    for citation in Citation::ALL {
        let preferred = UnitDialect::get(citation).find_label(unit).unwrap_or("-");
        out.push_str(&format!("  {}: {}\n", citation.name(), preferred));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reformats_with_options() {
        let config = Config::default();
        let options = FormatOptions::default().with_dialect(Citation::Esri);
        let text = reformat(
            &config,
            r#"GEOGCS["WGS 84", DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
                PRIMEM["Greenwich", 0], UNIT["degree", 0.0174532925199433]]"#,
            &options,
        )
        .unwrap();
        assert!(text.contains(r#"UNIT["Degree", 0.017453292519943295]"#), "{text}");
    }

    #[test]
    fn reformat_reports_parse_errors() {
        let err = reformat(&Config::default(), "GEOGCS[", &FormatOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse WKT"));
    }

    #[test]
    fn unit_lookup_falls_back_to_other_dialects() {
        let text = describe_unit("Foot_US", Citation::Default).unwrap();
        assert!(text.starts_with("Foot_US: Length"), "{text}");
        assert!(text.contains("  ESRI: Foot_US"), "{text}");
        assert!(text.contains("  EPSG: US survey foot"), "{text}");
        assert!(text.contains("  default: ftUS"), "{text}");
        assert!(describe_unit("furlong", Citation::Esri).is_err());
    }
}
