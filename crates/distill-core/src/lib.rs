//! # Distill Core
//!
//! `distill-core` turns a raw, deeply nested design document into a compact,
//! de-duplicated representation suited to language models and renderers.
//!
//! ## Pipeline
//!
//! 1.  **Tree walk**: hidden nodes are dropped; text styles, paints, effects,
//!     stroke weights and layouts are normalized and stored once in a
//!     content-addressed [`GlobalVarStore`]; nodes keep references.
//! 2.  **Vector grouping**: parents of vector art are grouped by the content of
//!     their vectors and rebuilt as image placeholders.
//! 3.  **Pruning**: empty collections are removed from every emitted node.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use distill_core::{simplify_design, SimplifyOptions};
//! use distill_data::model::DesignResponse;
//!
//! let raw = std::fs::read_to_string("file.json").unwrap();
//! let response: DesignResponse = serde_json::from_str(&raw).unwrap();
//! let design = simplify_design(&response, &SimplifyOptions::default()).unwrap();
//! println!("{}", design.to_json_string(true).unwrap());
//! ```
//!
//! A run is synchronous and owns its store; independent runs can execute on
//! different threads without sharing anything.

/// Paint and color normalization.
pub mod color;

/// Shadow and blur effects.
pub mod effects;

pub mod errors;

/// Vector grouping post-pass.
pub mod grouping;

/// Layout abstraction and the pluggable `LayoutBuilder`.
pub mod layout;

pub mod options;

/// Presence and shape checks for raw fields.
pub mod predicates;

/// Empty-key pruning.
pub mod prune;

/// Output data structures.
pub mod types;

/// Content-addressed global variable store.
pub mod vars;

/// Recursive node simplifier.
pub mod walker;

pub use errors::{PaintError, SimplifyError};
pub use grouping::{group_vectors, GroupingReport};
pub use layout::{AutoLayoutBuilder, LayoutBuilder};
pub use options::{CollapseStyle, SimplifyOptions};
pub use types::{GlobalVars, SimplifiedDesign, SimplifiedNode, StyleValue};
pub use vars::GlobalVarStore;
pub use walker::{simplify_node, Simplifier};

use distill_data::model::DesignResponse;
use tracing::{debug, instrument};

impl Simplifier<'_> {
    /// Runs the whole pipeline over a file or nodes response.
    #[instrument(level = "debug", skip_all, fields(name = response.name()))]
    pub fn simplify_design(&self, response: &DesignResponse) -> Result<SimplifiedDesign, SimplifyError> {
        let mut store = GlobalVarStore::new(self.options().id_seed);

        let mut nodes = Vec::new();
        for root in response.roots() {
            if let Some(node) = self.simplify_node(&mut store, root, None)? {
                nodes.push(node);
            }
        }
        debug!(
            roots = nodes.len(),
            variables = store.len(),
            vector_parents = store.vector_parents().len(),
            "tree walk complete"
        );

        let grouped = group_vectors(nodes, &mut store, self.options());

        Ok(SimplifiedDesign {
            name: response.name().to_string(),
            last_modified: response.last_modified().to_string(),
            thumbnail_url: response.thumbnail_url().map(str::to_string),
            nodes: grouped.nodes,
            global_vars: GlobalVars {
                styles: store.into_values(),
                children_to_parents: grouped.children_to_parents,
            },
        })
    }
}

/// Simplifies a response with the default layout builder.
pub fn simplify_design(
    response: &DesignResponse,
    options: &SimplifyOptions,
) -> Result<SimplifiedDesign, SimplifyError> {
    Simplifier::new(options).simplify_design(response)
}
