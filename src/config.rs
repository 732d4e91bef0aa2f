use crate::layout::{EdgeStyleTag, NodeSizeClass, Orientation};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Box dimensions and label font for one node size class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeBox {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeBoxConfig {
    pub small: NodeBox,
    pub medium: NodeBox,
    pub large: NodeBox,
}

impl Default for NodeBoxConfig {
    fn default() -> Self {
        Self {
            small: NodeBox {
                width: 120.0,
                height: 48.0,
                font_size: 12.0,
            },
            medium: NodeBox {
                width: 140.0,
                height: 60.0,
                font_size: 14.0,
            },
            large: NodeBox {
                width: 180.0,
                height: 76.0,
                font_size: 16.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    pub size_class: NodeSizeClass,
    pub edge_style: EdgeStyleTag,
    /// Gap between neighbouring sibling subtrees along the packing axis.
    pub sibling_spacing: f32,
    /// Gap between consecutive ranks along the rank axis.
    pub rank_gap: f32,
    pub node_boxes: NodeBoxConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::TopDown,
            size_class: NodeSizeClass::Medium,
            edge_style: EdgeStyleTag::SmoothStep,
            sibling_spacing: 24.0,
            rank_gap: 80.0,
            node_boxes: NodeBoxConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn node_box(&self) -> NodeBox {
        match self.size_class {
            NodeSizeClass::Small => self.node_boxes.small,
            NodeSizeClass::Medium => self.node_boxes.medium,
            NodeSizeClass::Large => self.node_boxes.large,
        }
    }

    /// Footprint of a childless node: the box extent along the packing axis.
    pub fn base_footprint(&self) -> f32 {
        let node_box = self.node_box();
        self.orientation
            .secondary_extent(node_box.width, node_box.height)
            .max(0.0)
    }

    /// Distance between the leading edges of two consecutive ranks.
    pub fn rank_step(&self) -> f32 {
        let node_box = self.node_box();
        self.orientation
            .primary_extent(node_box.width, node_box.height)
            .max(0.0)
            + self.rank_gap.max(0.0)
    }
}

/// How reconstruction picks the single root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum RootPolicy {
    /// Always inject a placeholder root above every top-level node.
    #[default]
    Synthesize,
    /// Use the single top-level node as root; otherwise adopt the first one
    /// and hang the others beneath it.
    AdoptSingle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructOptions {
    pub root_policy: RootPolicy,
    pub synthetic_root_label: String,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            root_policy: RootPolicy::Synthesize,
            synthetic_root_label: "Research Paper".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 24.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub reconstruct: ReconstructOptions,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            reconstruct: ReconstructOptions::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    root_policy: Option<RootPolicy>,
    synthetic_root_label: Option<String>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    primary_color: Option<String>,
    primary_text_color: Option<String>,
    primary_border_color: Option<String>,
    line_color: Option<String>,
    root_fill: Option<String>,
    root_text_color: Option<String>,
    level_fills: Option<Vec<String>>,
    quote_marker_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    orientation: Option<Orientation>,
    #[serde(alias = "nodeSize")]
    size_class: Option<NodeSizeClass>,
    edge_style: Option<EdgeStyleTag>,
    sibling_spacing: Option<f32>,
    rank_gap: Option<f32>,
    node_boxes: Option<NodeBoxConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "base" || theme_name == "default" || theme_name == "classic" {
            config.theme = Theme::classic();
        } else {
            log::warn!("unknown theme `{theme_name}`, keeping the default");
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.primary_color {
            config.theme.primary_color = v;
        }
        if let Some(v) = vars.primary_text_color {
            config.theme.primary_text_color = v;
        }
        if let Some(v) = vars.primary_border_color {
            config.theme.primary_border_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.root_fill {
            config.theme.root_fill = v;
        }
        if let Some(v) = vars.root_text_color {
            config.theme.root_text_color = v;
        }
        if let Some(v) = vars.level_fills {
            config.theme.level_fills = v;
        }
        if let Some(v) = vars.quote_marker_color {
            config.theme.quote_marker_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.orientation {
            config.layout.orientation = v;
        }
        if let Some(v) = layout.size_class {
            config.layout.size_class = v;
        }
        if let Some(v) = layout.edge_style {
            config.layout.edge_style = v;
        }
        if let Some(v) = layout.sibling_spacing {
            config.layout.sibling_spacing = v;
        }
        if let Some(v) = layout.rank_gap {
            config.layout.rank_gap = v;
        }
        if let Some(v) = layout.node_boxes {
            config.layout.node_boxes = v;
        }
    }

    if let Some(v) = parsed.root_policy {
        config.reconstruct.root_policy = v;
    }
    if let Some(v) = parsed.synthetic_root_label {
        config.reconstruct.synthetic_root_label = v;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_footprint_follows_orientation() {
        let mut config = LayoutConfig::default();
        assert_eq!(config.base_footprint(), 140.0);
        assert_eq!(config.rank_step(), 60.0 + 80.0);
        config.orientation = Orientation::LeftRight;
        assert_eq!(config.base_footprint(), 60.0);
        assert_eq!(config.rank_step(), 140.0 + 80.0);
        config.size_class = NodeSizeClass::Large;
        assert_eq!(config.base_footprint(), 76.0);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let config = parse_config(
            r##"{
                "theme": "classic",
                "themeVariables": { "rootFill": "#123456" },
                "layout": { "orientation": "LR", "nodeSize": "small", "edgeStyle": "curved", "siblingSpacing": 10 },
                "rootPolicy": "adoptSingle",
                "syntheticRootLabel": "Paper"
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.root_fill, "#123456");
        assert_eq!(config.layout.orientation, Orientation::LeftRight);
        assert_eq!(config.layout.size_class, NodeSizeClass::Small);
        assert_eq!(config.layout.edge_style, EdgeStyleTag::Curved);
        assert_eq!(config.layout.sibling_spacing, 10.0);
        assert_eq!(config.layout.rank_gap, 80.0);
        assert_eq!(config.reconstruct.root_policy, RootPolicy::AdoptSingle);
        assert_eq!(config.reconstruct.synthetic_root_label, "Paper");
        assert_eq!(config.render.background, config.theme.background);
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.reconstruct.root_policy, RootPolicy::Synthesize);
        assert_eq!(config.layout.sibling_spacing, 24.0);
    }
}
