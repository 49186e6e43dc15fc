//! # Typography Cascade
//!
//! Effective typography for a node is built field by field:
//!
//! ```text
//! component override ─┐
//! page override ──────┼─► first scope defining the field wins
//! global scale ───────┘
//! ```
//!
//! Overriding only `weight` on a component keeps the `size_px` the page or
//! site defined.

use crate::config::DEFAULT_CSS_SCOPE;
use pagesmith_model::{Tag, TokenOverride, TypographyOverride, TypographyScale, TypographyToken};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

const FALLBACK_FAMILY: &str = "Inter";
const FALLBACK_WEIGHT: u16 = 400;
const FALLBACK_SIZE_PX: f32 = 14.0;
const FALLBACK_LINE_HEIGHT: f32 = 120.0;

pub fn merge(
    global: &TypographyScale,
    page: Option<&TypographyOverride>,
    component: Option<&TypographyOverride>,
) -> TypographyScale {
    let mut scale = global.clone();
    for layer in [page, component].into_iter().flatten() {
        apply_override(&mut scale, layer);
    }
    scale
}

pub fn apply_override(scale: &mut TypographyScale, layer: &TypographyOverride) {
    for tag in Tag::ALL {
        if let Some(patch) = layer.get(tag) {
            apply_token(scale.get_mut(tag), patch);
        }
    }
}

fn apply_token(token: &mut TypographyToken, patch: &TokenOverride) {
    if let Some(family) = &patch.font_family {
        token.font_family = family.clone();
    }
    if let Some(weight) = patch.weight {
        token.weight = weight;
    }
    if let Some(size) = patch.size_px {
        token.size_px = size;
    }
    if patch.letter_spacing_px.is_some() {
        token.letter_spacing_px = patch.letter_spacing_px;
    }
    if patch.line_height_percent.is_some() {
        token.line_height_percent = patch.line_height_percent;
    }
}

/// A font family to ensure, with the weights the scale uses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontRequest {
    pub family: String,
    pub weights: Vec<u16>,
}

/// Families used by `scale` that are not in `loaded`, in name order
pub fn fonts_to_load(scale: &TypographyScale, loaded: &BTreeSet<String>) -> Vec<FontRequest> {
    let mut families: BTreeMap<&str, BTreeSet<u16>> = BTreeMap::new();
    for (_, token) in scale.iter() {
        let family = effective_family(token);
        if loaded.contains(family) {
            continue;
        }
        families
            .entry(family)
            .or_default()
            .insert(effective_weight(token));
    }

    families
        .into_iter()
        .map(|(family, weights)| FontRequest {
            family: family.to_string(),
            weights: weights.into_iter().collect(),
        })
        .collect()
}

/// One rule per tag, scoped under `.{scope}`
pub fn to_css(scale: &TypographyScale, scope: &str) -> String {
    rules_for(scale, &format!(".{}", scope_class(scope)))
}

/// `scope` reduced to a safe CSS class name; empty input falls back to the default scope
pub fn scope_class(scope: &str) -> String {
    let class: String = scope
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if class.is_empty() {
        DEFAULT_CSS_SCOPE.to_string()
    } else {
        class
    }
}

/// One rule per tag under `selector`, which must already be safe to emit
pub(crate) fn rules_for(scale: &TypographyScale, selector: &str) -> String {
    let mut css = String::new();
    for (tag, token) in scale.iter() {
        if !css.is_empty() {
            css.push('\n');
        }
        let _ = write!(
            css,
            "{selector} {tag} {{ font-family: '{}', sans-serif; font-weight: {}; font-size: {}px; line-height: {}%;",
            css_family(token),
            effective_weight(token),
            effective_size(token),
            token.line_height_percent.unwrap_or(FALLBACK_LINE_HEIGHT),
        );
        if let Some(spacing) = token.letter_spacing_px {
            let _ = write!(css, " letter-spacing: {spacing}px;");
        }
        css.push_str(" }");
    }
    css
}

fn effective_family(token: &TypographyToken) -> &str {
    let family = token.font_family.trim();
    if family.is_empty() {
        FALLBACK_FAMILY
    } else {
        family
    }
}

/// Family names come from stored documents; only letters, digits, spaces,
/// `-`, `_` and `.` survive into the stylesheet
fn css_family(token: &TypographyToken) -> String {
    let family: String = effective_family(token)
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect();
    match family.trim() {
        "" => FALLBACK_FAMILY.to_string(),
        family => family.to_string(),
    }
}

fn effective_weight(token: &TypographyToken) -> u16 {
    if token.weight == 0 {
        FALLBACK_WEIGHT
    } else {
        token.weight
    }
}

fn effective_size(token: &TypographyToken) -> f32 {
    if token.size_px > 0.0 {
        token.size_px
    } else {
        FALLBACK_SIZE_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn global() -> TypographyScale {
        let mut scale = TypographyScale::default();
        scale.h1 = TypographyToken::new("Inter", 700, 36.0).with_line_height(120.0);
        scale
    }

    #[test]
    fn test_field_level_merge() {
        let page = TypographyOverride::default().with(
            Tag::H1,
            TokenOverride {
                weight: Some(800),
                ..Default::default()
            },
        );
        let component = TypographyOverride::default().with(
            Tag::H1,
            TokenOverride {
                size_px: Some(40.0),
                ..Default::default()
            },
        );

        let effective = merge(&global(), Some(&page), Some(&component));
        assert_eq!(
            effective.h1,
            TypographyToken::new("Inter", 800, 40.0).with_line_height(120.0)
        );
        assert_eq!(effective.h2, global().h2);
    }

    #[test]
    fn test_component_wins_over_page() {
        let page = TypographyOverride::default().with(
            Tag::P,
            TokenOverride {
                font_family: Some("Lora".to_string()),
                weight: Some(300),
                ..Default::default()
            },
        );
        let component = TypographyOverride::default().with(
            Tag::P,
            TokenOverride {
                weight: Some(500),
                letter_spacing_px: Some(0.5),
                ..Default::default()
            },
        );

        let p = merge(&global(), Some(&page), Some(&component)).p;
        assert_eq!(p.font_family, "Lora");
        assert_eq!(p.weight, 500);
        assert_eq!(p.size_px, 16.0);
        assert_eq!(p.letter_spacing_px, Some(0.5));
    }

    #[test]
    fn test_merge_without_overrides_is_global() {
        assert_eq!(merge(&global(), None, None), global());
    }

    #[test]
    fn test_fonts_to_load_skips_loaded_families() {
        let mut scale = TypographyScale::default();
        scale.h1.font_family = "Poppins".to_string();
        scale.h2.font_family = "Poppins".to_string();
        scale.h2.weight = 600;

        let loaded: BTreeSet<String> = ["Inter".to_string()].into();
        assert_eq!(
            fonts_to_load(&scale, &loaded),
            vec![FontRequest {
                family: "Poppins".to_string(),
                weights: vec![600, 700],
            }]
        );

        let all: BTreeSet<String> = ["Inter".to_string(), "Poppins".to_string()].into();
        assert!(fonts_to_load(&scale, &all).is_empty());
    }

    #[test]
    fn test_css_rules() {
        let mut scale = TypographyScale::default();
        scale.span.letter_spacing_px = Some(1.5);
        scale.h6.line_height_percent = None;

        let css = to_css(&scale, "preview-engine");
        let lines: Vec<_> = css.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(
            lines[0],
            ".preview-engine h1 { font-family: 'Inter', sans-serif; font-weight: 700; font-size: 36px; line-height: 120%; }"
        );
        assert!(lines[5].contains("line-height: 120%"));
        assert!(lines[7].ends_with("letter-spacing: 1.5px; }"));
    }

    #[test]
    fn test_css_strips_markup_from_families() {
        let mut scale = TypographyScale::default();
        scale.h1.font_family = "X</style><script>alert(1)</script>".to_string();
        scale.h2.font_family = "Open Sans".to_string();
        scale.h3.font_family = "'; }\n body { display: none".to_string();

        let css = to_css(&scale, "preview-engine");
        assert!(!css.contains('<'));
        assert!(!css.contains("body {"));
        assert!(css.contains(".preview-engine h2 { font-family: 'Open Sans', sans-serif;"));
        assert_eq!(css.lines().count(), 8);
    }

    #[test]
    fn test_scope_class_is_sanitized() {
        assert_eq!(scope_class("site-preview"), "site-preview");
        assert_eq!(scope_class("a\"><script>"), "ascript");
        assert_eq!(scope_class("  "), "preview-engine");
    }
}
