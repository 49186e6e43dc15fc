use super::load_library;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{Mutation, Pipeline, SiteDocument};
use pagesmith_evaluator::html::render_page;
use pagesmith_evaluator::{PlaceholderKind, RenderTree};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Site document (JSON)
    pub site: PathBuf,

    /// Page id to render (defaults to the first page)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Component library directory (overrides config)
    #[arg(short, long)]
    pub library: Option<PathBuf>,

    /// Deepest slot nesting to render (overrides config)
    #[arg(long)]
    pub max_slot_depth: Option<usize>,

    /// CSS scope class (overrides config)
    #[arg(long)]
    pub css_scope: Option<String>,
}

pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let library_dir = args
        .library
        .clone()
        .unwrap_or_else(|| config.get_library_dir(cwd));
    let registry = Arc::new(load_library(&library_dir)?);
    let render_config = config.render_config(args.max_slot_depth, args.css_scope.as_deref());

    let mut document = SiteDocument::load(&args.site)?;
    if let Some(page) = &args.page {
        document.apply(&Mutation::SelectPage {
            page_id: Some(page.clone()),
        })?;
    }

    let mut pipeline = Pipeline::new(document, registry, render_config);
    pipeline.load_pending().await;

    let tree = pipeline
        .tree()
        .ok_or_else(|| anyhow!("Site has no pages: {}", args.site.display()))?;
    let html = render_page(tree, pipeline.config());

    if args.stdout {
        println!("{html}");
        return Ok(());
    }

    println!("{}", "🔨 Rendering page...".bright_blue().bold());
    report(tree);

    let out_dir = args
        .out_dir
        .as_ref()
        .map(|dir| PathBuf::from(cwd).join(dir))
        .or_else(|| config.get_out_dir(cwd))
        .unwrap_or_else(|| PathBuf::from(cwd).join("dist"));
    fs::create_dir_all(&out_dir)?;

    let out_file = out_dir.join(format!("{}.html", tree.page_id));
    fs::write(&out_file, html)?;
    println!("  {} {}", "✓".green(), out_file.display());

    Ok(())
}

/// Print one line per placeholder in the tree
pub fn report(tree: &RenderTree) -> usize {
    let placeholders = tree.placeholders();
    for placeholder in &placeholders {
        let marker = match placeholder.kind {
            PlaceholderKind::NotFound | PlaceholderKind::LoadFailed { .. } => "✗".red(),
            PlaceholderKind::Loading => "…".yellow(),
            PlaceholderKind::Cycle { .. } | PlaceholderKind::DepthExceeded { .. } => "⚠".yellow(),
        };
        println!(
            "  {} /{}: {}",
            marker,
            placeholder.path.join("/"),
            placeholder.kind
        );
    }
    for diagnostic in &tree.diagnostics {
        println!("  {} {}", "⚠".yellow(), diagnostic);
    }
    placeholders.len()
}
