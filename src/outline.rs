//! Textual views of a concept tree: the indented outline and the full study
//! guide (summary, outline, report).

use crate::model::ConceptTree;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    pub id: String,
    pub depth: usize,
    pub label: String,
    pub summary: String,
    pub page_number: u32,
    pub quote: Option<String>,
}

/// Pre-order outline. A synthetic root is left out and its children become
/// the top level.
pub fn outline_entries(tree: &ConceptTree) -> Vec<OutlineEntry> {
    let skip_root = tree.root_node().synthetic;
    let mut entries = Vec::with_capacity(tree.len());
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((idx, depth)) = stack.pop() {
        let node = tree.node(idx);
        let child_depth = if skip_root && idx == tree.root() {
            0
        } else {
            entries.push(OutlineEntry {
                id: node.id.clone(),
                depth,
                label: node.label.clone(),
                summary: node.summary.clone(),
                page_number: node.page_number,
                quote: node.quote.clone(),
            });
            depth + 1
        };
        stack.extend(node.children.iter().rev().map(|&child| (child, child_depth)));
    }
    entries
}

pub fn render_outline_markdown(tree: &ConceptTree) -> String {
    let mut out = String::new();
    for entry in outline_entries(tree) {
        let indent = "  ".repeat(entry.depth);
        out.push_str(&format!(
            "{indent}- **{}** (p. {})",
            entry.label, entry.page_number
        ));
        if !entry.summary.is_empty() {
            out.push_str(&format!(": {}", entry.summary));
        }
        out.push('\n');
        if let Some(quote) = entry.quote.as_deref() {
            out.push_str(&format!("{indent}  > {quote}\n"));
        }
    }
    out
}

pub fn render_study_guide(tree: &ConceptTree) -> String {
    let mut out = String::new();
    let title = &tree.root_node().label;
    out.push_str(&format!("# {title}\n\n"));
    if !tree.executive_summary.trim().is_empty() {
        out.push_str(&format!(
            "## Executive Summary\n\n{}\n\n",
            tree.executive_summary.trim()
        ));
    }
    out.push_str(&format!("## Outline\n\n{}\n", render_outline_markdown(tree)));
    if !tree.research_report.trim().is_empty() {
        out.push_str(&format!(
            "## Research Report\n\n{}\n",
            tree.research_report.trim()
        ));
    }
    out
}
