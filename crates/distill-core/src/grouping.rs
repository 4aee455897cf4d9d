//! # Vector Grouping
//!
//! Second pass over the finished tree. Parents of vector art are grouped by
//! the content id of their vector payload, and each such parent is rebuilt
//! as an image placeholder keeping only its id (plus size in `ImageFill` style).
//!
//! The tree is consumed and a new one returned; no node is edited in place.

use crate::options::{CollapseStyle, SimplifyOptions};
use crate::types::{CollapsedNode, SimplifiedNode, SimplifiedPaint, Size, VarId};
use crate::vars::GlobalVarStore;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Diagnostics of one grouping pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingReport {
    /// Distinct vector content ids.
    pub groups: usize,
    /// Parents rewritten into placeholders.
    pub collapsed: usize,
    /// Recorded parents that were not found in the tree, sorted.
    pub missing: Vec<String>,
}

/// Output of [`group_vectors`].
#[derive(Debug, Clone)]
pub struct Grouped {
    pub nodes: Vec<SimplifiedNode>,
    pub children_to_parents: BTreeMap<VarId, Vec<String>>,
    pub report: GroupingReport,
}

struct Target {
    content_id: VarId,
    size: Option<Size>,
}

/// Drains the store's vector-parent records and collapses every recorded parent.
///
/// Parents that cannot be located (hidden, cut off by depth, or already
/// absorbed by a collapsed ancestor) are skipped and reported.
#[instrument(level = "debug", skip_all, fields(roots = nodes.len()))]
pub fn group_vectors(
    nodes: Vec<SimplifiedNode>,
    store: &mut GlobalVarStore,
    options: &SimplifyOptions,
) -> Grouped {
    let records = store.take_vector_parents();

    let mut children_to_parents: BTreeMap<VarId, Vec<String>> = BTreeMap::new();
    let mut sizes: HashMap<&str, Option<Size>> = HashMap::new();
    for record in &records {
        let parents = children_to_parents.entry(record.children_id.clone()).or_default();
        if !parents.contains(&record.parent_id) {
            parents.push(record.parent_id.clone());
        }
        sizes.entry(record.parent_id.as_str()).or_insert(record.parent_size);
    }

    // A parent listed under several contents takes the first content id.
    let mut targets: HashMap<String, Target> = HashMap::new();
    for (content_id, parents) in &children_to_parents {
        for parent_id in parents {
            targets.entry(parent_id.clone()).or_insert_with(|| Target {
                content_id: content_id.clone(),
                size: sizes.get(parent_id.as_str()).copied().flatten(),
            });
        }
    }

    let mut found = HashSet::new();
    let nodes = nodes
        .into_iter()
        .map(|node| collapse(node, &targets, options, &mut found))
        .collect();

    let mut missing: Vec<String> = targets
        .keys()
        .filter(|id| !found.contains(id.as_str()))
        .cloned()
        .collect();
    missing.sort();
    for parent_id in &missing {
        warn!(parent_id = %parent_id, "vector parent not found in simplified tree, skipping");
    }

    let report = GroupingReport {
        groups: children_to_parents.len(),
        collapsed: found.len(),
        missing,
    };
    debug!(
        groups = report.groups,
        collapsed = report.collapsed,
        missing = report.missing.len(),
        "vector grouping complete"
    );

    Grouped {
        nodes,
        children_to_parents,
        report,
    }
}

fn collapse(
    node: SimplifiedNode,
    targets: &HashMap<String, Target>,
    options: &SimplifyOptions,
    found: &mut HashSet<String>,
) -> SimplifiedNode {
    match node {
        SimplifiedNode::Element(mut element) => {
            if let Some(target) = targets.get(&element.id) {
                found.insert(element.id.clone());
                return SimplifiedNode::Collapsed(placeholder(element.id, target, options));
            }
            element.children = element
                .children
                .into_iter()
                .map(|child| collapse(child, targets, options, found))
                .collect();
            SimplifiedNode::Element(element)
        }
        collapsed => collapsed,
    }
}

fn placeholder(id: String, target: &Target, options: &SimplifyOptions) -> CollapsedNode {
    match options.collapse {
        CollapseStyle::Stub => CollapsedNode {
            id,
            name: None,
            node_type: "IMAGE".to_string(),
            size: None,
            fills: Vec::new(),
        },
        CollapseStyle::ImageFill => CollapsedNode {
            id,
            name: Some("Image".to_string()),
            node_type: "IMAGE".to_string(),
            size: target.size,
            fills: vec![SimplifiedPaint::Image {
                image_ref: Some(options.image_url(&target.content_id)),
                scale_mode: Some("FILL".to_string()),
            }],
        },
    }
}
