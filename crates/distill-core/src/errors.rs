use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("Unknown paint type: {0}")]
    UnknownPaintType(String),
    #[error("{0} paint has no color")]
    MissingColor(String),
}

#[derive(Error, Debug)]
pub enum SimplifyError {
    #[error("Failed to normalize paint on node {node_id}: {source}")]
    Paint {
        node_id: String,
        #[source]
        source: PaintError,
    },
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
