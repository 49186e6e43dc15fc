use super::{load_library, render::report};
use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{Mutation, Pipeline, SiteDocument};
use pagesmith_evaluator::RenderTree;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Site document (JSON)
    pub site: PathBuf,

    /// Component library directory (overrides config)
    #[arg(short, long)]
    pub library: Option<PathBuf>,

    /// Deepest slot nesting to render (overrides config)
    #[arg(long)]
    pub max_slot_depth: Option<usize>,
}

pub async fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let library_dir = args
        .library
        .clone()
        .unwrap_or_else(|| config.get_library_dir(cwd));
    let registry = Arc::new(load_library(&library_dir)?);

    println!("🔍 {} {}", "Validating".green().bold(), args.site.display());
    println!();

    let document = SiteDocument::load(&args.site)?;
    let page_ids: Vec<String> = document.site().pages.iter().map(|p| p.id.clone()).collect();
    let mut pipeline = Pipeline::new(
        document,
        registry,
        config.render_config(args.max_slot_depth, None),
    );

    let mut total_placeholders = 0;
    let mut total_warnings = 0;
    for page_id in &page_ids {
        pipeline.apply_mutation(&Mutation::SelectPage {
            page_id: Some(page_id.clone()),
        })?;
        pipeline.load_pending().await;

        let Some(tree) = pipeline.tree() else {
            continue;
        };
        let (placeholders, warnings) = counts(tree);
        if placeholders == 0 && warnings == 0 {
            println!("{} {}", "✓".green(), page_id);
        } else {
            println!("{} {}", "✗".red(), page_id);
            report(tree);
        }
        total_placeholders += placeholders;
        total_warnings += warnings;
    }

    println!();
    println!("   Pages checked: {}", page_ids.len());
    if total_warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), total_warnings);
    }
    if total_placeholders > 0 {
        bail!("{total_placeholders} component(s) could not be rendered");
    }
    println!("   {} No issues found!", "✓".green());
    Ok(())
}

fn counts(tree: &RenderTree) -> (usize, usize) {
    (tree.placeholders().len(), tree.diagnostics.len())
}
