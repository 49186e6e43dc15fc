mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{fonts, library, render, validate, FontsArgs, LibraryArgs, RenderArgs, ValidateArgs};

/// Pagesmith CLI - compose and preview sites from a component library
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a page of a site document to HTML
    Render(RenderArgs),

    /// List the component library
    Library(LibraryArgs),

    /// Report (and optionally load) the fonts a site uses
    Fonts(FontsArgs),

    /// Check that every page renders without placeholders
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Render(args) => render(args, &cwd).await,
                Command::Library(args) => library(args, &cwd),
                Command::Fonts(args) => fonts(args, &cwd).await,
                Command::Validate(args) => validate(args, &cwd).await,
            }
        }
        Err(err) => Err(anyhow::anyhow!("Cannot get current directory: {err}")),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
