#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod navigation;
pub mod outline;
pub mod reconstruct;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, ReconstructOptions, RootPolicy, load_config};
pub use error::{Error, Result};
pub use generator::{Generator, GeneratorOutput, StaticGenerator, parse_generator_response};
pub use layout::{
    EdgeStyleTag, MindMapLayout, NodeSizeClass, Orientation, Point, SubtreeMetrics,
    assign_positions, compute_layout, compute_subtree_metrics,
};
pub use model::{ConceptNode, ConceptTree, NodeIndex, RawNodeRecord};
pub use navigation::{NodeActivation, NodeActivationHandler, activate_node};
pub use reconstruct::reconstruct_tree;
pub use render::render_svg;
pub use theme::Theme;
