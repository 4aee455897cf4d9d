// distill-data: Serde structs for raw design documents
pub mod model;
