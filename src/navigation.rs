//! Click-to-source navigation: a rendered node maps back to the page (and
//! quote) it was drawn from.

use crate::layout::MindMapLayout;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeActivation {
    pub page_number: u32,
    pub quote: Option<String>,
}

/// Host-side receiver for node activations, typically the PDF viewer.
pub trait NodeActivationHandler {
    fn on_node_activated(&mut self, page_number: u32, quote: Option<&str>);
}

impl<F> NodeActivationHandler for F
where
    F: FnMut(u32, Option<&str>),
{
    fn on_node_activated(&mut self, page_number: u32, quote: Option<&str>) {
        self(page_number, quote)
    }
}

/// Where activating `node_id` should navigate. The synthetic root has no
/// place in the document and yields `None`.
pub fn activation_for(layout: &MindMapLayout, node_id: &str) -> Option<NodeActivation> {
    let node = layout.node(node_id)?;
    if node.data.synthetic {
        return None;
    }
    Some(NodeActivation {
        page_number: node.data.page_number,
        quote: node.data.quote.clone(),
    })
}

/// Dispatches one activation to `handler`. Returns false when the node is
/// unknown or has nowhere to navigate.
pub fn activate_node<H>(layout: &MindMapLayout, node_id: &str, handler: &mut H) -> bool
where
    H: NodeActivationHandler + ?Sized,
{
    let Some(activation) = activation_for(layout, node_id) else {
        log::debug!("activation of `{node_id}` ignored");
        return false;
    };
    handler.on_node_activated(activation.page_number, activation.quote.as_deref());
    true
}
