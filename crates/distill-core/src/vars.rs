//! # Global Variable Store
//!
//! Content-addressed storage for style-like payloads shared between nodes.
//!
//! ## Responsibilities
//! - **Deduplication**: structurally equal payloads map to one id per run.
//! - **Id minting**: `{category}_{XXXXXX}` ids from a seeded generator, redrawn on collision.
//! - **Vector bookkeeping**: holds the transient vector-parent records until grouping takes them.
//!
//! A store belongs to exactly one simplification run; it is not meant to be
//! shared between concurrent runs.

use crate::types::{Size, StyleValue, VarId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_LEN: usize = 6;

/// Records that `parent_id` has a vector child whose payload is `children_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorParentRecord {
    pub parent_id: String,
    pub parent_name: String,
    pub parent_type: String,
    pub children_id: VarId,
    /// Parent's bounding-box size, used to size the collapsed placeholder.
    pub parent_size: Option<Size>,
}

pub struct GlobalVarStore {
    values: BTreeMap<VarId, StyleValue>,
    // Canonical JSON of a payload -> its id.
    index: HashMap<String, VarId>,
    rng: StdRng,
    vector_parents: Vec<VectorParentRecord>,
}

impl GlobalVarStore {
    pub fn new(seed: u64) -> Self {
        Self {
            values: BTreeMap::new(),
            index: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            vector_parents: Vec::new(),
        }
    }

    /// Returns the id of a structurally equal payload if one exists,
    /// otherwise registers `value` under a new id prefixed with `category`.
    pub fn find_or_create(
        &mut self,
        value: StyleValue,
        category: &str,
    ) -> Result<VarId, serde_json::Error> {
        let key = serde_json::to_string(&value)?;
        if let Some(existing) = self.index.get(&key) {
            return Ok(existing.clone());
        }

        let id = self.mint_id(category);
        trace!(id = %id, "registered global variable");
        self.index.insert(key, id.clone());
        self.values.insert(id.clone(), value);
        Ok(id)
    }

    fn mint_id(&mut self, category: &str) -> VarId {
        loop {
            let suffix: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            let id = format!("{}_{}", category, suffix);
            if !self.values.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&StyleValue> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VarId, &StyleValue)> {
        self.values.iter()
    }

    pub fn record_vector_parent(&mut self, record: VectorParentRecord) {
        self.vector_parents.push(record);
    }

    pub fn vector_parents(&self) -> &[VectorParentRecord] {
        &self.vector_parents
    }

    /// Removes and returns the vector-parent records, leaving the bucket empty.
    pub fn take_vector_parents(&mut self) -> Vec<VectorParentRecord> {
        std::mem::take(&mut self.vector_parents)
    }

    pub fn into_values(self) -> BTreeMap<VarId, StyleValue> {
        self.values
    }
}
