use crate::layout::{EdgeStyleTag, MindMapLayout, Orientation};
use crate::model::ConceptTree;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Machine-readable layout for hosts that draw the map themselves.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump<'a> {
    pub orientation: Orientation,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump<'a>>,
    pub edges: Vec<EdgeDump<'a>>,
    pub executive_summary: &'a str,
    pub research_report: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump<'a> {
    pub id: &'a str,
    pub parent_id: Option<&'a str>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub label: &'a str,
    pub summary: &'a str,
    pub quote: Option<&'a str>,
    pub page_number: u32,
    pub synthetic: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub style: &'static str,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a MindMapLayout, tree: Option<&'a ConceptTree>) -> Self {
        let parents = layout.parents_by_id();
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: &node.id,
                parent_id: parents.get(node.id.as_str()).copied(),
                x: node.position.x,
                y: node.position.y,
                width: node.width,
                height: node.height,
                depth: node.depth,
                label: &node.data.label,
                summary: &node.data.summary,
                quote: node.data.quote.as_deref(),
                page_number: node.data.page_number,
                synthetic: node.data.synthetic,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: &edge.id,
                source: &edge.source,
                target: &edge.target,
                style: edge_style_name(edge.style_tag),
            })
            .collect();

        LayoutDump {
            orientation: layout.orientation,
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
            executive_summary: tree.map(|t| t.executive_summary.as_str()).unwrap_or(""),
            research_report: tree.map(|t| t.research_report.as_str()).unwrap_or(""),
        }
    }
}

fn edge_style_name(style: EdgeStyleTag) -> &'static str {
    match style {
        EdgeStyleTag::Straight => "straight",
        EdgeStyleTag::Stepped => "stepped",
        EdgeStyleTag::SmoothStep => "smoothStep",
        EdgeStyleTag::Curved => "curved",
    }
}

/// Pretty JSON to `path`, or stdout when no path is given.
pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &MindMapLayout,
    tree: Option<&ConceptTree>,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, tree);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
