mod metrics;
mod position;
mod types;

pub use metrics::{SubtreeMetrics, compute_subtree_metrics, subtree_footprints};
pub use position::assign_positions;
pub use types::*;

use crate::config::LayoutConfig;
use crate::model::ConceptTree;

/// Runs the footprint pass and the placement pass back to back with the
/// root's span starting at the origin. No tree means an empty layout.
pub fn compute_layout(tree: Option<&ConceptTree>, config: &LayoutConfig) -> MindMapLayout {
    let Some(tree) = tree else {
        return MindMapLayout::empty(config.orientation);
    };
    let metrics = compute_subtree_metrics(tree, config);
    assign_positions(tree, &metrics, Point::default(), config)
}
