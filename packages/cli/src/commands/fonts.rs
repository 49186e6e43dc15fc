use super::load_library;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{FontError, FontLoader, Mutation, Pipeline, SiteDocument};
use pagesmith_evaluator::FontRequest;
use std::path::PathBuf;
use std::sync::Arc;

/// Families the hosted font service serves
pub const FONT_CATALOG: [&str; 6] = ["Inter", "Roboto", "Open Sans", "Montserrat", "Lato", "Poppins"];

#[derive(Debug, Args)]
pub struct FontsArgs {
    /// Site document (JSON)
    pub site: PathBuf,

    /// Mark catalog fonts as loaded and save the document
    #[arg(long)]
    pub apply: bool,

    /// Component library directory (overrides config)
    #[arg(short, long)]
    pub library: Option<PathBuf>,
}

/// Accepts the families in [`FONT_CATALOG`]
pub struct CatalogFonts;

impl FontLoader for CatalogFonts {
    async fn ensure(&self, request: &FontRequest) -> Result<(), FontError> {
        if FONT_CATALOG
            .iter()
            .any(|family| family.eq_ignore_ascii_case(&request.family))
        {
            Ok(())
        } else {
            Err(FontError::new(&request.family, "not in the font catalog"))
        }
    }
}

pub async fn fonts(args: FontsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let library_dir = args
        .library
        .clone()
        .unwrap_or_else(|| config.get_library_dir(cwd));
    let registry = Arc::new(load_library(&library_dir)?);

    let document = SiteDocument::load(&args.site)?;
    let page_ids: Vec<String> = document.site().pages.iter().map(|p| p.id.clone()).collect();
    let mut pipeline = Pipeline::new(document, registry, config.render_config(None, None));

    println!("{}", "🔤 Fonts".bright_blue().bold());

    for page_id in page_ids {
        pipeline.apply_mutation(&Mutation::SelectPage {
            page_id: Some(page_id.clone()),
        })?;
        pipeline.load_pending().await;

        let (_, requests) = pipeline.font_requests();
        println!("{}", page_id.bold());
        if requests.is_empty() {
            println!("  {} all fonts loaded", "✓".green());
            continue;
        }
        for request in &requests {
            let weights: Vec<_> = request.weights.iter().map(u16::to_string).collect();
            println!("  {} ({})", request.family, weights.join(", "));
        }

        if args.apply {
            for family in pipeline.ensure_fonts(&CatalogFonts).await? {
                println!("  {} loaded {}", "✓".green(), family);
            }
        }
    }

    if args.apply && pipeline.document().is_dirty() {
        pipeline.document_mut().save()?;
        println!();
        println!("  {} saved {}", "✓".green(), args.site.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_fonts() {
        let known = FontRequest {
            family: "open sans".to_string(),
            weights: vec![400],
        };
        assert!(CatalogFonts.ensure(&known).await.is_ok());

        let unknown = FontRequest {
            family: "Comic Neue".to_string(),
            weights: vec![400],
        };
        assert_eq!(
            CatalogFonts.ensure(&unknown).await,
            Err(FontError::new("Comic Neue", "not in the font catalog"))
        );
    }
}
