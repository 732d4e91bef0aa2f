use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Direction in which ranks advance. Siblings are packed along the other
/// axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    #[serde(alias = "TD", alias = "TB")]
    TopDown,
    #[serde(alias = "LR")]
    LeftRight,
}

impl Orientation {
    /// Extent of a `width` x `height` box along the packing axis.
    pub fn secondary_extent(self, width: f32, height: f32) -> f32 {
        match self {
            Self::TopDown => width,
            Self::LeftRight => height,
        }
    }

    /// Extent of a `width` x `height` box along the rank axis.
    pub fn primary_extent(self, width: f32, height: f32) -> f32 {
        match self {
            Self::TopDown => height,
            Self::LeftRight => width,
        }
    }

    pub fn primary(self, point: Point) -> f32 {
        match self {
            Self::TopDown => point.y,
            Self::LeftRight => point.x,
        }
    }

    pub fn secondary(self, point: Point) -> f32 {
        match self {
            Self::TopDown => point.x,
            Self::LeftRight => point.y,
        }
    }

    pub fn point(self, primary: f32, secondary: f32) -> Point {
        match self {
            Self::TopDown => Point::new(secondary, primary),
            Self::LeftRight => Point::new(primary, secondary),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum NodeSizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

/// Connector style handed through to the render adapter untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum EdgeStyleTag {
    Straight,
    #[serde(alias = "step")]
    Stepped,
    #[default]
    SmoothStep,
    #[serde(alias = "bezier", alias = "default")]
    Curved,
}

/// Interval reserved for a subtree along the packing axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub start: f32,
    pub end: f32,
}

impl Span {
    pub fn midpoint(&self) -> f32 {
        (self.start + self.end) / 2.0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// What the render adapter shows for a node and needs to navigate on click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub summary: String,
    pub quote: Option<String>,
    pub page_number: u32,
    pub is_root: bool,
    pub synthetic: bool,
    pub size_class: NodeSizeClass,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutNode {
    pub id: String,
    /// Top-left corner of the node box.
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub span: Span,
    pub data: NodeData,
}

impl LaidOutNode {
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style_tag: EdgeStyleTag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapLayout {
    pub orientation: Orientation,
    /// Pre-order: parents before children, siblings in rank order.
    pub nodes: Vec<LaidOutNode>,
    pub edges: Vec<LaidOutEdge>,
    pub width: f32,
    pub height: f32,
}

impl MindMapLayout {
    pub fn empty(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Single lookup by id. Callers resolving many ids should build
    /// [`MindMapLayout::nodes_by_id`] once instead.
    pub fn node(&self, id: &str) -> Option<&LaidOutNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_by_id(&self) -> HashMap<&str, &LaidOutNode> {
        self.nodes
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect()
    }

    /// Parent id of every non-root node, from the edge list.
    pub fn parents_by_id(&self) -> HashMap<&str, &str> {
        self.edges
            .iter()
            .map(|edge| (edge.target.as_str(), edge.source.as_str()))
            .collect()
    }

    /// `(min_x, min_y, max_x, max_y)` over all node boxes.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for node in &self.nodes {
            min_x = min_x.min(node.position.x);
            min_y = min_y.min(node.position.y);
            max_x = max_x.max(node.position.x + node.width);
            max_y = max_y.max(node.position.y + node.height);
        }
        Some((min_x, min_y, max_x, max_y))
    }
}
