use paper_mindmap::config::{Config, RootPolicy};
use paper_mindmap::layout::{EdgeStyleTag, NodeSizeClass, Orientation, compute_layout};
use paper_mindmap::layout_dump::LayoutDump;
use paper_mindmap::outline::render_outline_markdown;
use paper_mindmap::reconstruct::reconstruct_output;
use paper_mindmap::{ConceptTree, Theme, parse_generator_response, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MindMapOptions {
    theme: Option<String>,
    orientation: Option<Orientation>,
    #[serde(alias = "nodeSize")]
    size: Option<NodeSizeClass>,
    edge_style: Option<EdgeStyleTag>,
    root_policy: Option<RootPolicy>,
    root_label: Option<String>,
    font_family: Option<String>,
}

fn build_config(options: MindMapOptions) -> Config {
    let mut config = Config::default();
    if matches!(options.theme.as_deref(), Some("default" | "classic")) {
        config.theme = Theme::classic();
        config.render.background = config.theme.background.clone();
    }
    if let Some(v) = options.orientation {
        config.layout.orientation = v;
    }
    if let Some(v) = options.size {
        config.layout.size_class = v;
    }
    if let Some(v) = options.edge_style {
        config.layout.edge_style = v;
    }
    if let Some(v) = options.root_policy {
        config.reconstruct.root_policy = v;
    }
    if let Some(v) = options.root_label {
        config.reconstruct.synthetic_root_label = v;
    }
    if let Some(v) = options.font_family {
        config.theme.font_family = v;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<MindMapOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(MindMapOptions::default()),
    }
}

fn build_tree(response: &str, config: &Config) -> Result<ConceptTree, String> {
    let output = parse_generator_response(response).map_err(|error| error.to_string())?;
    reconstruct_output(&output, &config.reconstruct).map_err(|error| error.to_string())
}

fn layout_json(response: &str, options_json: Option<String>) -> Result<String, String> {
    let config = build_config(parse_options(options_json)?);
    let tree = build_tree(response, &config)?;
    let layout = compute_layout(Some(&tree), &config.layout);
    serde_json::to_string(&LayoutDump::from_layout(&layout, Some(&tree)))
        .map_err(|error| error.to_string())
}

fn svg(response: &str, options_json: Option<String>) -> Result<String, String> {
    let config = build_config(parse_options(options_json)?);
    let tree = build_tree(response, &config)?;
    let layout = compute_layout(Some(&tree), &config.layout);
    Ok(render_svg(&layout, &config.theme, &config.render))
}

/// Generator response in, positioned nodes and edges out as JSON.
#[wasm_bindgen]
pub fn layout_mind_map(response: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_json(response, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_mind_map_svg(response: &str, options_json: Option<String>) -> Result<String, JsValue> {
    svg(response, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn outline_markdown(response: &str) -> Result<String, JsValue> {
    let tree = build_tree(response, &Config::default()).map_err(|error| JsValue::from_str(&error))?;
    Ok(render_outline_markdown(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "nodes": [
            {"id": "1", "parentId": null, "label": "Introduction", "pageNumber": 1},
            {"id": "2", "parentId": "1", "label": "Method", "pageNumber": 3, "quote": "we propose"},
            {"id": "3", "parentId": "missing", "label": "Results", "pageNumber": 6}
        ],
        "executiveSummary": "A short summary."
    }"#;

    #[test]
    fn lays_out_response_with_options() {
        let json = layout_json(
            RESPONSE,
            Some(r#"{"orientation": "LR", "edgeStyle": "curved", "rootLabel": "Paper"}"#.to_string()),
        )
        .expect("layout should succeed");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["orientation"], "leftRight");
        assert_eq!(value["nodes"][0]["label"], "Paper");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(value["edges"].as_array().unwrap().len(), 3);
        assert_eq!(value["edges"][0]["style"], "curved");
        assert_eq!(value["executiveSummary"], "A short summary.");
    }

    #[test]
    fn renders_svg_and_rejects_bad_input() {
        let rendered = svg(RESPONSE, None).expect("svg should render");
        assert!(rendered.contains("<svg"));
        assert!(rendered.contains("Method"));
        assert!(layout_json("not json at all", None).is_err());
        assert!(layout_json(r#"{"nodes": []}"#, None).is_err());
        assert!(parse_options(Some("{".to_string())).is_err());
    }
}
