//! hoverxref CLI
//!
//! Render the tooltip client assets outside of a documentation build.
//!
//! # Usage
//!
//! ```bash
//! # Write _static/js/hoverxref.js and friends into _build/html
//! hoverxref assets _build/html -D hoverxref_project=myproject -D hoverxref_version=latest
//!
//! # Print the template context as JSON
//! hoverxref context --config hoverxref.yaml
//!
//! # List declared options
//! hoverxref options
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hoverxref::assets::template_context;
use hoverxref::{Extension, HoverError};

#[derive(Parser)]
#[command(name = "hoverxref")]
#[command(about = "Hover tooltips for documentation cross-references")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// YAML or JSON file with option overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override an option (name=value), may be repeated
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    define: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render and copy the client assets into an output directory
    Assets {
        /// Build output directory (assets go under <OUTDIR>/_static)
        outdir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Directory holding the tooltipster vendor files
        #[arg(long)]
        vendor: Option<PathBuf>,

        /// Quiet mode (suppress output)
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the template context as JSON
    Context {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List declared options with their defaults and active values
    Options {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn load_extension(args: &ConfigArgs) -> Result<Extension, HoverError> {
    let mut ext = Extension::new();
    if let Some(path) = &args.config {
        ext.config_mut().load_file(path)?;
    }
    for pair in &args.define {
        ext.config_mut().set_pair(pair)?;
    }
    // Validate once up front
    ext.hover_config()?;
    Ok(ext)
}

fn run(cli: Cli) -> Result<(), HoverError> {
    match cli.command {
        Commands::Assets {
            outdir,
            config,
            vendor,
            quiet,
        } => {
            let ext = load_extension(&config)?;
            ext.setup();
            let written = ext.build_finished(&outdir, vendor.as_deref(), None)?;
            if !quiet {
                println!("{} Wrote {} asset(s)\n", "✓".green().bold(), written.len());
                for path in &written {
                    println!("  {} {}", "•".dimmed(), path.display().to_string().cyan());
                }
            }
        }
        Commands::Context { config } => {
            let ext = load_extension(&config)?;
            let context = template_context(ext.config());
            let json = serde_json::to_string_pretty(&context).map_err(|e| HoverError::Config {
                name: "context".to_string(),
                message: e.to_string(),
            })?;
            println!("{}", json);
        }
        Commands::Options { config } => {
            let ext = load_extension(&config)?;
            for decl in ext.config().declared() {
                let active = ext.config().get(&decl.name).unwrap_or(&decl.default);
                println!(
                    "{} [{}]\n    default: {:?}\n    active:  {:?}",
                    decl.name.bold(),
                    decl.rebuild,
                    decl.default,
                    active
                );
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
