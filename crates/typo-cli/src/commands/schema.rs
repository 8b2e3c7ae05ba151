use schemars::schema_for;
use typo_core::entities::EntityRevision;
use typo_core::responses::{HistoryResponse, RevisionDiffResponse};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `typo schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(args.type_name), flags.format)
}

pub fn schema(type_name: SchemaType) -> schemars::Schema {
    match type_name {
        SchemaType::History => schema_for!(HistoryResponse),
        SchemaType::Revision => schema_for!(EntityRevision),
        SchemaType::Diff => schema_for!(RevisionDiffResponse),
    }
}
