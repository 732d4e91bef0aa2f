use crate::config::RenderConfig;
use crate::layout::{EdgeStyleTag, LaidOutNode, MindMapLayout, Orientation};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const LABEL_PADDING: f32 = 8.0;
const LINE_HEIGHT: f32 = 1.25;
const STEP_CORNER_RADIUS: f32 = 8.0;

/// Reference render adapter: node boxes, connectors in the requested style,
/// and `data-*` attributes a host can use to route clicks back to the page.
pub fn render_svg(layout: &MindMapLayout, theme: &Theme, config: &RenderConfig) -> String {
    let pad = config.padding.max(0.0);
    let (min_x, min_y) = layout
        .bounds()
        .map(|(min_x, min_y, _, _)| (min_x, min_y))
        .unwrap_or((0.0, 0.0));
    let width = (layout.width + pad * 2.0).max(1.0);
    let height = (layout.height + pad * 2.0).max(1.0);
    let view_x = min_x - pad;
    let view_y = min_y - pad;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{view_x:.2} {view_y:.2} {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{view_x:.2}\" y=\"{view_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    let by_id = layout.nodes_by_id();

    for edge in &layout.edges {
        let (Some(source), Some(target)) = (
            by_id.get(edge.source.as_str()),
            by_id.get(edge.target.as_str()),
        ) else {
            continue;
        };
        let d = edge_path(source, target, layout.orientation, edge.style_tag);
        svg.push_str(&format!(
            "<path data-edge=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            escape_xml(&edge.id),
            d,
            theme.line_color
        ));
    }

    for node in &layout.nodes {
        let fill = theme.fill_for_depth(node.depth);
        let text_color = theme.text_color_for_depth(node.depth);
        svg.push_str(&format!(
            "<g data-id=\"{}\" data-page=\"{}\">",
            escape_xml(&node.id),
            node.data.page_number
        ));
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            node.position.x,
            node.position.y,
            node.width,
            node.height,
            fill,
            theme.primary_border_color
        ));
        if node.data.quote.is_some() {
            svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"3\" fill=\"{}\"/>",
                node.position.x + node.width - 8.0,
                node.position.y + 8.0,
                theme.quote_marker_color
            ));
        }
        svg.push_str(&label_svg(node, theme, text_color));
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

/// Connector from the parent's outgoing side to the child's incoming side.
fn edge_path(
    source: &LaidOutNode,
    target: &LaidOutNode,
    orientation: Orientation,
    style: EdgeStyleTag,
) -> String {
    let (start, end) = match orientation {
        Orientation::TopDown => (
            (source.center().x, source.position.y + source.height),
            (target.center().x, target.position.y),
        ),
        Orientation::LeftRight => (
            (source.position.x + source.width, source.center().y),
            (target.position.x, target.center().y),
        ),
    };
    let mid = match orientation {
        Orientation::TopDown => (start.1 + end.1) / 2.0,
        Orientation::LeftRight => (start.0 + end.0) / 2.0,
    };
    let corner = |primary: f32, secondary: f32| match orientation {
        Orientation::TopDown => (secondary, primary),
        Orientation::LeftRight => (primary, secondary),
    };
    let (start_secondary, end_secondary) = match orientation {
        Orientation::TopDown => (start.0, end.0),
        Orientation::LeftRight => (start.1, end.1),
    };

    match style {
        EdgeStyleTag::Straight => points_to_path(&[start, end]),
        EdgeStyleTag::Stepped => points_to_path(&[
            start,
            corner(mid, start_secondary),
            corner(mid, end_secondary),
            end,
        ]),
        EdgeStyleTag::SmoothStep => {
            let offset = end_secondary - start_secondary;
            if offset.abs() < 0.5 {
                return points_to_path(&[start, end]);
            }
            let start_primary = match orientation {
                Orientation::TopDown => start.1,
                Orientation::LeftRight => start.0,
            };
            let radius = STEP_CORNER_RADIUS
                .min(offset.abs() / 2.0)
                .min((mid - start_primary).abs());
            let sign = offset.signum();
            let a = corner(mid - radius, start_secondary);
            let a_ctrl = corner(mid, start_secondary);
            let a_out = corner(mid, start_secondary + sign * radius);
            let b_in = corner(mid, end_secondary - sign * radius);
            let b_ctrl = corner(mid, end_secondary);
            let b = corner(mid + radius, end_secondary);
            format!(
                "M {:.2} {:.2} L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2}",
                start.0, start.1, a.0, a.1, a_ctrl.0, a_ctrl.1, a_out.0, a_out.1, b_in.0, b_in.1,
                b_ctrl.0, b_ctrl.1, b.0, b.1, end.0, end.1
            )
        }
        EdgeStyleTag::Curved => {
            let c1 = corner(mid, start_secondary);
            let c2 = corner(mid, end_secondary);
            format!(
                "M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                start.0, start.1, c1.0, c1.1, c2.0, c2.1, end.0, end.1
            )
        }
    }
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn label_svg(node: &LaidOutNode, theme: &Theme, fill: &str) -> String {
    let font_size = node.data.font_size;
    let lines = wrap_label(&node.data.label, node.width - LABEL_PADDING * 2.0, node.height - LABEL_PADDING, font_size);
    let center = node.center();
    let line_step = font_size * LINE_HEIGHT;
    let total_height = lines.len() as f32 * line_step;
    let start_y = center.y - total_height / 2.0 + font_size;

    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        center.x,
        escape_xml(&theme.font_family),
        font_size,
        fill
    ));
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_step };
        text.push_str(&format!(
            "<tspan x=\"{:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            center.x,
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

/// Greedy word wrap with an average-glyph estimate; lines that do not fit
/// the box height are dropped and the last kept line gets an ellipsis.
fn wrap_label(label: &str, max_width: f32, max_height: f32, font_size: f32) -> Vec<String> {
    let char_width = (font_size * 0.55).max(1.0);
    let max_chars = ((max_width / char_width).floor() as usize).max(1);
    let max_lines = ((max_height / (font_size * LINE_HEIGHT)).floor() as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in label.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let keep = max_chars.saturating_sub(1).min(last.chars().count());
            *last = last.chars().take(keep).collect::<String>() + "…";
        }
    }
    for line in lines.iter_mut() {
        if line.chars().count() > max_chars {
            *line = line.chars().take(max_chars.saturating_sub(1)).collect::<String>() + "…";
        }
    }
    lines
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
