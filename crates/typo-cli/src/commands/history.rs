use typo_core::responses::HistoryResponse;
use typo_db::service::HistoryService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::output::output;

/// Handle `typo history`.
pub async fn handle(
    args: &HistoryArgs,
    service: &HistoryService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = build(args, service).await?;
    output(&response, flags.format)
}

/// An unreadable store is reported as an error, not as an empty history.
pub async fn build(args: &HistoryArgs, service: &HistoryService) -> anyhow::Result<HistoryResponse> {
    let revisions = service.try_request_history(args.record_id).await?;
    Ok(HistoryResponse::new(args.record_id, revisions))
}
