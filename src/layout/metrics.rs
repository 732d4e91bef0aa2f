use crate::config::LayoutConfig;
use crate::model::{ConceptTree, NodeIndex};

/// Footprint of every subtree along the packing axis, indexed by node.
///
/// Computed fresh for one tree and one configuration; it is never updated
/// incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtreeMetrics {
    footprints: Vec<f32>,
    base: f32,
    spacing: f32,
}

impl SubtreeMetrics {
    pub fn footprint(&self, idx: NodeIndex) -> f32 {
        self.footprints[idx.index()]
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Combined extent of a sibling block: their footprints plus the gaps
    /// between them.
    pub fn block_extent(&self, siblings: &[NodeIndex]) -> f32 {
        if siblings.is_empty() {
            return 0.0;
        }
        let total: f32 = siblings.iter().map(|&idx| self.footprint(idx)).sum();
        total + self.spacing * (siblings.len() as f32 - 1.0)
    }
}

pub fn compute_subtree_metrics(tree: &ConceptTree, config: &LayoutConfig) -> SubtreeMetrics {
    subtree_footprints(tree, config.base_footprint(), config.sibling_spacing)
}

/// Post-order footprint pass: a leaf reserves `base`, an inner node reserves
/// `max(base, sum(children) + (n - 1) * spacing)`.
pub fn subtree_footprints(tree: &ConceptTree, base: f32, spacing: f32) -> SubtreeMetrics {
    let mut metrics = SubtreeMetrics {
        footprints: vec![f32::NAN; tree.len()],
        base: base.max(0.0),
        spacing: spacing.max(0.0),
    };

    // Reversed pre-order visits every child before its parent.
    for idx in tree.preorder().into_iter().rev() {
        let children = tree.children(idx);
        let footprint = if children.is_empty() {
            metrics.base
        } else {
            metrics.base.max(metrics.block_extent(children))
        };
        metrics.footprints[idx.index()] = footprint;
    }

    log::debug!(
        "subtree metrics: {} nodes, root footprint {}",
        tree.len(),
        metrics.footprint(tree.root())
    );
    metrics
}
