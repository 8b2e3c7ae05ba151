use anyhow::Context;
use typo_core::entities::EntityRevision;
use typo_db::service::HistoryService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RevisionArgs;
use crate::output::output;

/// Handle `typo revision`.
pub async fn handle(
    args: &RevisionArgs,
    service: &HistoryService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let revision = fetch(args, service).await?;
    output(&revision, flags.format)
}

/// Look up one revision, failing if it is not part of the record's history.
pub async fn fetch(args: &RevisionArgs, service: &HistoryService) -> anyhow::Result<EntityRevision> {
    service
        .try_get_revision(args.record_id, args.revision)
        .await?
        .with_context(|| {
            format!(
                "revision {} not found in the history of record {}",
                args.revision, args.record_id
            )
        })
}
