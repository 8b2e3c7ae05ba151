use clap::{Args, Subcommand, ValueEnum};
use typo_core::ids::{RecordId, RevisionNumber};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Full revision history of a record, newest first.
    History(HistoryArgs),
    /// One revision of a record with its predecessor snapshot.
    Revision(RevisionArgs),
    /// Labelled field changes introduced by one revision.
    Diff(RevisionArgs),
    /// Dump the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    /// Record identifier.
    pub record_id: RecordId,
}

#[derive(Clone, Debug, Args)]
pub struct RevisionArgs {
    /// Record identifier.
    pub record_id: RecordId,
    /// Revision number.
    pub revision: RevisionNumber,
}

/// Response types with a published schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    History,
    Revision,
    Diff,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
