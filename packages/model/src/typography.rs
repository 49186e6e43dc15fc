//! # Typography Tokens
//!
//! A [`TypographyScale`] holds one complete [`TypographyToken`] per text tag.
//! Overrides ([`TypographyOverride`]) are partial at two levels: a tag may be
//! absent, and a present tag may define only some fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text tags covered by a scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    P,
    Span,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::H1,
        Tag::H2,
        Tag::H3,
        Tag::H4,
        Tag::H5,
        Tag::H6,
        Tag::P,
        Tag::Span,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::P => "p",
            Tag::Span => "span",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_family() -> String {
    "Inter".to_string()
}

fn default_weight() -> u16 {
    400
}

fn default_size() -> f32 {
    14.0
}

/// Fully specified text style for one tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyToken {
    #[serde(default = "default_family")]
    pub font_family: String,

    #[serde(default = "default_weight")]
    pub weight: u16,

    #[serde(default = "default_size")]
    pub size_px: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing_px: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_percent: Option<f32>,
}

impl TypographyToken {
    pub fn new(font_family: impl Into<String>, weight: u16, size_px: f32) -> Self {
        Self {
            font_family: font_family.into(),
            weight,
            size_px,
            letter_spacing_px: None,
            line_height_percent: None,
        }
    }

    pub fn with_line_height(mut self, percent: f32) -> Self {
        self.line_height_percent = Some(percent);
        self
    }

    pub fn with_letter_spacing(mut self, px: f32) -> Self {
        self.letter_spacing_px = Some(px);
        self
    }
}

/// One token per tag.
///
/// Missing tags in a persisted scale are filled from [`TypographyScale::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyScale {
    pub h1: TypographyToken,
    pub h2: TypographyToken,
    pub h3: TypographyToken,
    pub h4: TypographyToken,
    pub h5: TypographyToken,
    pub h6: TypographyToken,
    pub p: TypographyToken,
    pub span: TypographyToken,
}

impl TypographyScale {
    pub fn get(&self, tag: Tag) -> &TypographyToken {
        match tag {
            Tag::H1 => &self.h1,
            Tag::H2 => &self.h2,
            Tag::H3 => &self.h3,
            Tag::H4 => &self.h4,
            Tag::H5 => &self.h5,
            Tag::H6 => &self.h6,
            Tag::P => &self.p,
            Tag::Span => &self.span,
        }
    }

    pub fn get_mut(&mut self, tag: Tag) -> &mut TypographyToken {
        match tag {
            Tag::H1 => &mut self.h1,
            Tag::H2 => &mut self.h2,
            Tag::H3 => &mut self.h3,
            Tag::H4 => &mut self.h4,
            Tag::H5 => &mut self.h5,
            Tag::H6 => &mut self.h6,
            Tag::P => &mut self.p,
            Tag::Span => &mut self.span,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &TypographyToken)> {
        Tag::ALL.into_iter().map(move |tag| (tag, self.get(tag)))
    }
}

impl Default for TypographyScale {
    fn default() -> Self {
        let token = |weight, size, line_height| {
            TypographyToken::new("Inter", weight, size).with_line_height(line_height)
        };
        Self {
            h1: token(700, 36.0, 120.0),
            h2: token(600, 30.0, 120.0),
            h3: token(600, 24.0, 120.0),
            h4: token(500, 20.0, 120.0),
            h5: token(500, 18.0, 120.0),
            h6: token(500, 16.0, 120.0),
            p: token(400, 16.0, 140.0),
            span: token(400, 14.0, 120.0),
        }
    }
}

/// Partial token: each field set here wins over the inherited one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_px: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing_px: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_percent: Option<f32>,
}

impl TokenOverride {
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.weight.is_none()
            && self.size_px.is_none()
            && self.letter_spacing_px.is_none()
            && self.line_height_percent.is_none()
    }

    /// Layer `other` on top of `self`, field by field
    pub fn merged_with(&self, other: &TokenOverride) -> TokenOverride {
        TokenOverride {
            font_family: other.font_family.clone().or_else(|| self.font_family.clone()),
            weight: other.weight.or(self.weight),
            size_px: other.size_px.or(self.size_px),
            letter_spacing_px: other.letter_spacing_px.or(self.letter_spacing_px),
            line_height_percent: other.line_height_percent.or(self.line_height_percent),
        }
    }
}

/// Partial scale attached to a page or a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h1: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h2: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h3: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h4: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h5: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h6: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<TokenOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<TokenOverride>,
}

impl TypographyOverride {
    pub fn get(&self, tag: Tag) -> Option<&TokenOverride> {
        self.slot(tag).as_ref()
    }

    /// Merge `patch` into the override for `tag`, keeping fields it leaves unset
    pub fn set(&mut self, tag: Tag, patch: &TokenOverride) {
        let slot = self.slot_mut(tag);
        let merged = match slot.as_ref() {
            Some(current) => current.merged_with(patch),
            None => patch.clone(),
        };
        *slot = if merged.is_empty() { None } else { Some(merged) };
    }

    pub fn with(mut self, tag: Tag, patch: TokenOverride) -> Self {
        self.set(tag, &patch);
        self
    }

    pub fn is_empty(&self) -> bool {
        Tag::ALL.iter().all(|tag| self.get(*tag).is_none())
    }

    fn slot(&self, tag: Tag) -> &Option<TokenOverride> {
        match tag {
            Tag::H1 => &self.h1,
            Tag::H2 => &self.h2,
            Tag::H3 => &self.h3,
            Tag::H4 => &self.h4,
            Tag::H5 => &self.h5,
            Tag::H6 => &self.h6,
            Tag::P => &self.p,
            Tag::Span => &self.span,
        }
    }

    fn slot_mut(&mut self, tag: Tag) -> &mut Option<TokenOverride> {
        match tag {
            Tag::H1 => &mut self.h1,
            Tag::H2 => &mut self.h2,
            Tag::H3 => &mut self.h3,
            Tag::H4 => &mut self.h4,
            Tag::H5 => &mut self.h5,
            Tag::H6 => &mut self.h6,
            Tag::P => &mut self.p,
            Tag::Span => &mut self.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_scale_fills_missing_tags_from_default() {
        let scale: TypographyScale = serde_json::from_value(json!({
            "h1": { "font_family": "Lora", "weight": 800, "size_px": 48 }
        }))
        .unwrap();

        assert_eq!(scale.h1.font_family, "Lora");
        assert_eq!(scale.h1.line_height_percent, None);
        assert_eq!(scale.p, TypographyScale::default().p);
    }

    #[test]
    fn test_override_set_merges_fields() {
        let mut typography = TypographyOverride::default();
        typography.set(
            Tag::H2,
            &TokenOverride {
                weight: Some(900),
                ..Default::default()
            },
        );
        typography.set(
            Tag::H2,
            &TokenOverride {
                size_px: Some(28.0),
                ..Default::default()
            },
        );

        let h2 = typography.get(Tag::H2).unwrap();
        assert_eq!(h2.weight, Some(900));
        assert_eq!(h2.size_px, Some(28.0));
        assert!(typography.get(Tag::H1).is_none());
    }

    #[test]
    fn test_empty_override_clears_tag() {
        let mut typography = TypographyOverride::default();
        typography.set(Tag::P, &TokenOverride::default());
        assert!(typography.is_empty());
    }

    #[test]
    fn test_tag_parse() {
        assert_eq!(Tag::parse("span"), Some(Tag::Span));
        assert_eq!(Tag::parse("h7"), None);
    }
}
