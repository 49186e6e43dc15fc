//! HTML emission for a [`RenderTree`].
//!
//! Slots render bottom-up: each child's markup is produced first and handed
//! to its parent's renderer keyed by slot name.

use crate::cascade;
use crate::config::RenderConfig;
use crate::renderer::{Placeholder, RenderNode, RenderTree};
use pagesmith_model::TypographyScale;
use pagesmith_registry::{escape_html, RenderInput};
use std::collections::BTreeMap;
use tracing::instrument;

pub fn render_node(node: &RenderNode) -> String {
    render_with(node, None)
}

/// Component-level typography that differs from the page scale. Each such
/// component is wrapped in a numbered class and gets its own rules.
struct ScopedStyles<'a> {
    scope: String,
    page: &'a TypographyScale,
    rules: Vec<String>,
}

impl ScopedStyles<'_> {
    fn wrap(&mut self, scale: &TypographyScale, markup: String) -> String {
        if scale == self.page {
            return markup;
        }
        let class = format!("{}-t{}", self.scope, self.rules.len());
        self.rules
            .push(cascade::rules_for(scale, &format!(".{} .{class}", self.scope)));
        format!("<div class=\"{class}\">{markup}</div>")
    }
}

fn render_with(node: &RenderNode, mut styles: Option<&mut ScopedStyles<'_>>) -> String {
    match node {
        RenderNode::Render(rendered) => {
            let slots: BTreeMap<String, String> = rendered
                .children
                .iter()
                .map(|(slot, child)| (slot.clone(), render_with(child, styles.as_deref_mut())))
                .collect();
            let markup = rendered.renderer.render(&RenderInput {
                name: &rendered.name,
                attrs: &rendered.attrs,
                typography: &rendered.typography,
                slots: &slots,
            });
            match styles {
                Some(styles) => styles.wrap(&rendered.typography, markup),
                None => markup,
            }
        }
        RenderNode::Placeholder(placeholder) => render_placeholder(placeholder),
    }
}

fn render_placeholder(placeholder: &Placeholder) -> String {
    format!(
        "<div class=\"pagesmith-placeholder\" data-kind=\"{}\" data-component=\"{}\">{}: {}</div>",
        placeholder.kind.as_str(),
        escape_html(&placeholder.name),
        escape_html(&placeholder.name),
        escape_html(&placeholder.kind.to_string()),
    )
}

/// Full page markup: scoped typography rules, then every instruction in order
#[instrument(skip_all, fields(page = %tree.page_id))]
pub fn render_page(tree: &RenderTree, config: &RenderConfig) -> String {
    let mut styles = ScopedStyles {
        scope: cascade::scope_class(&config.css_scope),
        page: &tree.typography,
        rules: Vec::new(),
    };
    let mut body = String::new();
    if tree.instructions.is_empty() {
        body.push_str("<p class=\"pagesmith-empty\">This page has no components yet.</p>\n");
    }
    for node in &tree.instructions {
        body.push_str(&render_with(node, Some(&mut styles)));
        body.push('\n');
    }

    let mut css = cascade::to_css(&tree.typography, &styles.scope);
    for rules in &styles.rules {
        css.push('\n');
        css.push_str(rules);
    }
    format!(
        "<div class=\"{}\">\n<style>\n{css}\n</style>\n{body}</div>\n",
        styles.scope
    )
}
