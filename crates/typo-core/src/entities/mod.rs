//! Model types for reconstructed revision history.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! output and schema validation.

mod revision;
mod snapshot;

pub use revision::EntityRevision;
pub use snapshot::{FieldValue, Snapshot};
