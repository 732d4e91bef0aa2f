//! Rebuilds the generator's flat node list into a single rooted tree.
//!
//! The generator is not trusted: ids may be numbers or missing, parent
//! references may dangle, point at the node itself or form loops, and there
//! may be any number of parentless nodes. Every one of those is recovered
//! here. The only failure is an empty input.

use crate::config::{ReconstructOptions, RootPolicy};
use crate::error::{Error, Result};
use crate::generator::GeneratorOutput;
use crate::model::{ConceptNode, ConceptTree, NodeIndex, RawNodeRecord};
use std::collections::{HashMap, HashSet};

/// Id given to the placeholder root (suffixed if the input already uses it).
pub const SYNTHETIC_ROOT_ID: &str = "__root__";

pub fn reconstruct_tree(
    records: &[RawNodeRecord],
    options: &ReconstructOptions,
) -> Result<ConceptTree> {
    if records.is_empty() {
        return Err(Error::EmptyResult);
    }

    let declared: HashSet<String> = records.iter().filter_map(RawNodeRecord::key).collect();
    let (mut nodes, parent_keys, ids) = build_arena(records, &declared);
    let mut top_level = resolve_parents(&mut nodes, &parent_keys, &ids);

    if top_level.is_empty() {
        log::warn!(
            "no top-level node among {} records; attaching every node directly to the root",
            nodes.len()
        );
        for node in nodes.iter_mut() {
            node.parent = None;
            node.children.clear();
        }
        top_level = (0..nodes.len()).map(NodeIndex).collect();
    } else {
        break_unreachable_cycles(&mut nodes, &mut top_level);
    }

    let root = match options.root_policy {
        RootPolicy::Synthesize => {
            let id = unique_id(SYNTHETIC_ROOT_ID, false, &ids, &declared);
            let root = NodeIndex(nodes.len());
            let mut placeholder = ConceptNode::new(id, options.synthetic_root_label.clone());
            placeholder.synthetic = true;
            nodes.push(placeholder);
            for child in top_level {
                link(&mut nodes, root, child);
            }
            root
        }
        RootPolicy::AdoptSingle => {
            let root = top_level[0];
            if top_level.len() > 1 {
                log::warn!(
                    "{} top-level nodes; adopting `{}` as root and reattaching the rest beneath it",
                    top_level.len(),
                    nodes[root.0].id
                );
            }
            for &orphan in &top_level[1..] {
                link(&mut nodes, root, orphan);
            }
            root
        }
    };

    log::debug!(
        "reconstructed {} nodes under root `{}`",
        nodes.len(),
        nodes[root.0].id
    );
    Ok(ConceptTree::from_arena(nodes, root))
}

/// Reconstructs the tree and carries the two text blobs along with it.
pub fn reconstruct_output(
    output: &GeneratorOutput,
    options: &ReconstructOptions,
) -> Result<ConceptTree> {
    let mut tree = reconstruct_tree(&output.nodes, options)?;
    tree.executive_summary = output.executive_summary.clone();
    tree.research_report = output.research_report.clone();
    Ok(tree)
}

/// First pass: one validated node per record, in source order. `declared`
/// holds every id the input names, so renamed and generated ids never take
/// one that a later record claims.
fn build_arena(
    records: &[RawNodeRecord],
    declared: &HashSet<String>,
) -> (Vec<ConceptNode>, Vec<Option<String>>, HashMap<String, NodeIndex>) {
    let mut nodes = Vec::with_capacity(records.len() + 1);
    let mut parent_keys = Vec::with_capacity(records.len());
    let mut ids: HashMap<String, NodeIndex> = HashMap::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let declared_id = record.key();
        let base = declared_id
            .clone()
            .unwrap_or_else(|| format!("node_{position}"));
        let id = unique_id(&base, declared_id.is_some(), &ids, declared);
        match declared_id {
            None => log::warn!("record {position} has no id; using `{id}`"),
            Some(_) if id != base => {
                log::warn!("duplicate node id `{base}` at record {position}; renamed to `{id}`")
            }
            Some(_) => {}
        }

        let mut node = ConceptNode::new(id.clone(), record.label_text().unwrap_or(base));
        node.summary = record.summary_text().unwrap_or_default();
        node.quote = record.quote_text();
        node.page_number = record.page().unwrap_or(1);

        ids.insert(id, NodeIndex(nodes.len()));
        nodes.push(node);
        parent_keys.push(record.parent_key());
    }

    (nodes, parent_keys, ids)
}

/// Second pass: attach every node to its declared parent when that parent
/// exists. Returns the top-level nodes in source order.
fn resolve_parents(
    nodes: &mut [ConceptNode],
    parent_keys: &[Option<String>],
    ids: &HashMap<String, NodeIndex>,
) -> Vec<NodeIndex> {
    let mut top_level = Vec::new();
    for (position, key) in parent_keys.iter().enumerate() {
        let child = NodeIndex(position);
        let parent = match key.as_deref() {
            None => None,
            Some(key) => match ids.get(key) {
                Some(&parent) if parent == child => {
                    log::warn!("node `{}` names itself as parent", nodes[position].id);
                    None
                }
                Some(&parent) => Some(parent),
                None => {
                    log::warn!(
                        "node `{}` references missing parent `{key}`",
                        nodes[position].id
                    );
                    None
                }
            },
        };
        match parent {
            Some(parent) => link(nodes, parent, child),
            None => top_level.push(child),
        }
    }
    top_level
}

/// Nodes that cannot be reached from any top-level node hang off a parent
/// cycle. For each one, in source order, the cycle above it is cut at its
/// earliest member, which is promoted. Links below the cycle stay intact.
fn break_unreachable_cycles(nodes: &mut [ConceptNode], top_level: &mut Vec<NodeIndex>) {
    let mut reachable = vec![false; nodes.len()];
    for &start in top_level.iter() {
        mark_reachable(nodes, start, &mut reachable);
    }

    for position in 0..nodes.len() {
        if reachable[position] {
            continue;
        }
        let cut = cycle_member(nodes, NodeIndex(position));
        if let Some(parent) = nodes[cut.0].parent.take() {
            nodes[parent.0].children.retain(|&child| child != cut);
            log::warn!(
                "parent cycle through `{}`; detaching it from `{}`",
                nodes[cut.0].id,
                nodes[parent.0].id
            );
        }
        top_level.push(cut);
        mark_reachable(nodes, cut, &mut reachable);
    }

    top_level.sort();
}

/// Follows parent links from `start` until one repeats and returns the
/// earliest node of the loop found.
fn cycle_member(nodes: &[ConceptNode], start: NodeIndex) -> NodeIndex {
    let mut seen: HashMap<NodeIndex, usize> = HashMap::new();
    let mut path = Vec::new();
    let mut current = start;
    loop {
        if let Some(&at) = seen.get(&current) {
            return path[at..].iter().copied().min().unwrap_or(current);
        }
        seen.insert(current, path.len());
        path.push(current);
        match nodes[current.0].parent {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

fn mark_reachable(nodes: &[ConceptNode], start: NodeIndex, reachable: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(idx) = stack.pop() {
        if reachable[idx.0] {
            continue;
        }
        reachable[idx.0] = true;
        stack.extend(nodes[idx.0].children.iter().copied());
    }
}

fn link(nodes: &mut [ConceptNode], parent: NodeIndex, child: NodeIndex) {
    nodes[parent.0].children.push(child);
    nodes[child.0].parent = Some(parent);
}

/// `base` itself when free, otherwise the first free `base_<n>`. A declared
/// id may keep its own name; anything else also steers clear of every id the
/// input declares.
fn unique_id(
    base: &str,
    is_declared: bool,
    ids: &HashMap<String, NodeIndex>,
    declared: &HashSet<String>,
) -> String {
    let free = |candidate: &str| !ids.contains_key(candidate) && !declared.contains(candidate);
    if !ids.contains_key(base) && (is_declared || !declared.contains(base)) {
        return base.to_string();
    }
    let mut suffix = ids.len();
    loop {
        let candidate = format!("{base}_{suffix}");
        if free(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
