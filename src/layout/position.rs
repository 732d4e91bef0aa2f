use super::metrics::SubtreeMetrics;
use super::types::{LaidOutEdge, LaidOutNode, MindMapLayout, NodeData, Point, Span};
use crate::config::LayoutConfig;
use crate::model::{ConceptTree, NodeIndex};

struct Frame {
    idx: NodeIndex,
    span_start: f32,
    depth: usize,
}

/// Pre-order placement pass.
///
/// `origin` is where the root's span starts on the packing axis and where
/// rank 0 starts on the rank axis. Every node box is centered inside the span
/// reserved for its subtree, and the children block is centered inside the
/// same span, so a parent always sits over the middle of its children.
///
/// Panics if `metrics` was not computed for `tree`.
pub fn assign_positions(
    tree: &ConceptTree,
    metrics: &SubtreeMetrics,
    origin: Point,
    config: &LayoutConfig,
) -> MindMapLayout {
    assert_eq!(
        metrics.len(),
        tree.len(),
        "subtree metrics were computed for a different tree"
    );

    let orientation = config.orientation;
    let node_box = config.node_box();
    let box_secondary = orientation.secondary_extent(node_box.width, node_box.height);
    let rank_step = config.rank_step();
    let origin_primary = orientation.primary(origin);

    let mut nodes = Vec::with_capacity(tree.len());
    let mut edges = Vec::with_capacity(tree.len().saturating_sub(1));
    let mut stack = vec![Frame {
        idx: tree.root(),
        span_start: orientation.secondary(origin),
        depth: 0,
    }];

    while let Some(Frame {
        idx,
        span_start,
        depth,
    }) = stack.pop()
    {
        let node = tree.node(idx);
        let footprint = metrics.footprint(idx);
        assert!(
            footprint.is_finite() && footprint >= 0.0,
            "node `{}` has footprint {footprint}; metrics were not computed for this tree",
            node.id
        );

        let secondary = span_start + (footprint - box_secondary) / 2.0;
        let primary = origin_primary + depth as f32 * rank_step;
        nodes.push(LaidOutNode {
            id: node.id.clone(),
            position: orientation.point(primary, secondary),
            width: node_box.width,
            height: node_box.height,
            depth,
            span: Span {
                start: span_start,
                end: span_start + footprint,
            },
            data: NodeData {
                label: node.label.clone(),
                summary: node.summary.clone(),
                quote: node.quote.clone(),
                page_number: node.page_number,
                is_root: idx == tree.root(),
                synthetic: node.synthetic,
                size_class: config.size_class,
                font_size: node_box.font_size,
            },
        });

        if let Some(parent) = node.parent {
            let source = &tree.node(parent).id;
            edges.push(LaidOutEdge {
                id: format!("e-{}", node.id),
                source: source.clone(),
                target: node.id.clone(),
                style_tag: config.edge_style,
            });
        }

        let children = tree.children(idx);
        if children.is_empty() {
            continue;
        }
        let block = metrics.block_extent(children);
        let mut cursor = span_start + (footprint - block) / 2.0;
        let mut frames = Vec::with_capacity(children.len());
        for &child in children {
            frames.push(Frame {
                idx: child,
                span_start: cursor,
                depth: depth + 1,
            });
            cursor += metrics.footprint(child) + metrics.spacing();
        }
        // Popped in source order.
        stack.extend(frames.into_iter().rev());
    }

    let mut layout = MindMapLayout {
        orientation,
        nodes,
        edges,
        width: 0.0,
        height: 0.0,
    };
    if let Some((min_x, min_y, max_x, max_y)) = layout.bounds() {
        layout.width = (max_x - min_x).max(0.0);
        layout.height = (max_y - min_y).max(0.0);
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReconstructOptions, RootPolicy};
    use crate::layout::metrics::{compute_subtree_metrics, subtree_footprints};
    use crate::layout::{EdgeStyleTag, Orientation};
    use crate::model::RawNodeRecord;
    use crate::reconstruct::reconstruct_tree;

    fn scenario_tree() -> ConceptTree {
        let records = [
            RawNodeRecord::new("root", None),
            RawNodeRecord::new("A", Some("root")),
            RawNodeRecord::new("A1", Some("A")),
            RawNodeRecord::new("A2", Some("A")),
            RawNodeRecord::new("B", Some("root")),
        ];
        let options = ReconstructOptions {
            root_policy: RootPolicy::AdoptSingle,
            ..ReconstructOptions::default()
        };
        reconstruct_tree(&records, &options).unwrap()
    }

    fn center_x(layout: &MindMapLayout, id: &str) -> f32 {
        layout.node(id).unwrap().center().x
    }

    #[test]
    fn scenario_spans_and_centers() {
        let tree = scenario_tree();
        let config = LayoutConfig::default();
        let metrics = subtree_footprints(&tree, 140.0, 24.0);
        let layout = assign_positions(&tree, &metrics, Point::default(), &config);

        let span = |id: &str| layout.node(id).unwrap().span;
        assert_eq!(span("root"), Span { start: 0.0, end: 468.0 });
        assert_eq!(span("A"), Span { start: 0.0, end: 304.0 });
        assert_eq!(span("B"), Span { start: 328.0, end: 468.0 });
        assert_eq!(span("A1"), Span { start: 0.0, end: 140.0 });
        assert_eq!(span("A2"), Span { start: 164.0, end: 304.0 });

        assert_eq!(center_x(&layout, "root"), 234.0);
        assert_eq!(center_x(&layout, "A"), 152.0);
        assert_eq!(center_x(&layout, "B"), 398.0);
        assert_eq!(center_x(&layout, "A1"), 70.0);
        assert_eq!(center_x(&layout, "A2"), 234.0);
        assert!(!span("A2").overlaps(&span("B")));
        assert_eq!(span("root").midpoint(), center_x(&layout, "root"));
    }

    #[test]
    fn ranks_advance_by_box_plus_gap() {
        let tree = scenario_tree();
        let config = LayoutConfig::default();
        let metrics = compute_subtree_metrics(&tree, &config);
        let layout = assign_positions(&tree, &metrics, Point::new(10.0, 5.0), &config);

        assert_eq!(layout.node("root").unwrap().position.y, 5.0);
        assert_eq!(layout.node("A").unwrap().position.y, 5.0 + 140.0);
        assert_eq!(layout.node("A1").unwrap().position.y, 5.0 + 280.0);
        assert_eq!(layout.node("root").unwrap().span.start, 10.0);
        assert_eq!(layout.width, 468.0);
        assert_eq!(layout.height, 280.0 + 60.0);
    }

    #[test]
    fn left_right_swaps_axes() {
        let tree = scenario_tree();
        let config = LayoutConfig {
            orientation: Orientation::LeftRight,
            ..LayoutConfig::default()
        };
        let metrics = compute_subtree_metrics(&tree, &config);
        let layout = assign_positions(&tree, &metrics, Point::default(), &config);

        let root = layout.node("root").unwrap();
        let a = layout.node("A").unwrap();
        let b = layout.node("B").unwrap();
        assert_eq!(root.position.x, 0.0);
        assert_eq!(a.position.x, 140.0 + 80.0);
        assert_eq!(a.position.x, b.position.x);
        assert!(a.position.y + a.height <= b.position.y);
        let children_mid = (a.span.start + b.span.end) / 2.0;
        assert_eq!(root.center().y, children_mid);
        assert_eq!(root.span.midpoint(), children_mid);
    }

    #[test]
    fn edges_link_each_child_to_its_parent() {
        let tree = scenario_tree();
        let config = LayoutConfig {
            edge_style: EdgeStyleTag::Stepped,
            ..LayoutConfig::default()
        };
        let metrics = compute_subtree_metrics(&tree, &config);
        let layout = assign_positions(&tree, &metrics, Point::default(), &config);

        let pairs: Vec<(&str, &str)> = layout
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [("root", "A"), ("A", "A1"), ("A", "A2"), ("root", "B")]
        );
        assert!(layout.edges.iter().all(|edge| edge.style_tag == EdgeStyleTag::Stepped));
        assert_eq!(layout.edges[0].id, "e-A");
    }

    #[test]
    fn edge_ids_stay_unique_when_ids_contain_dashes() {
        let records = [
            RawNodeRecord::new("a", None),
            RawNodeRecord::new("a-b", Some("a")),
            RawNodeRecord::new("b-c", Some("a")),
            RawNodeRecord::new("c", Some("a-b")),
        ];
        let tree = reconstruct_tree(&records, &ReconstructOptions::default()).unwrap();
        let config = LayoutConfig::default();
        let metrics = compute_subtree_metrics(&tree, &config);
        let layout = assign_positions(&tree, &metrics, Point::default(), &config);

        let mut ids: Vec<&str> = layout.edges.iter().map(|edge| edge.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), layout.edges.len());
        assert_eq!(ids, ["e-a", "e-a-b", "e-b-c", "e-c"]);
    }

    #[test]
    #[should_panic(expected = "different tree")]
    fn metrics_from_another_tree_are_rejected() {
        let tree = scenario_tree();
        let other = reconstruct_tree(&[RawNodeRecord::new("x", None)], &ReconstructOptions::default())
            .unwrap();
        let config = LayoutConfig::default();
        let metrics = compute_subtree_metrics(&other, &config);
        assign_positions(&tree, &metrics, Point::default(), &config);
    }
}
