use super::load_library;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_model::AtomicHierarchy;
use pagesmith_registry::ListFilter;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LibraryArgs {
    /// Only list this level (atom, molecule, organism, template, page)
    #[arg(long)]
    pub hierarchy: Option<String>,

    /// Case-insensitive name filter
    #[arg(short, long)]
    pub query: Option<String>,

    /// Component library directory (overrides config)
    #[arg(short, long)]
    pub library: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn library(args: LibraryArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = args.library.clone().unwrap_or_else(|| config.get_library_dir(cwd));
    let registry = load_library(&dir)?;

    let hierarchy = match args.hierarchy.as_deref() {
        Some(level) => Some(
            AtomicHierarchy::parse(level)
                .ok_or_else(|| anyhow!("Unknown hierarchy level: {level}"))?,
        ),
        None => None,
    };
    let filter = ListFilter {
        hierarchy,
        query: args.query.clone(),
    };
    let entries = registry.list(&filter);

    if args.format == "json" {
        let schemas: Vec<_> = entries.iter().map(|entry| &entry.schema).collect();
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    println!("{}", "📚 Component library".bright_blue().bold());
    println!("   {}", dir.display());
    println!();

    let mut level = None;
    for entry in &entries {
        let schema = &entry.schema;
        if level != Some(schema.atomic_hierarchy) {
            level = Some(schema.atomic_hierarchy);
            println!("{}", schema.atomic_hierarchy.as_str().bold());
        }
        let slots: Vec<_> = schema.slot_names().collect();
        if slots.is_empty() {
            println!("  {}", schema.name);
        } else {
            println!("  {} {}", schema.name, format!("slots: {}", slots.join(", ")).dimmed());
        }
    }

    println!();
    println!("   {} components", entries.len());
    Ok(())
}
