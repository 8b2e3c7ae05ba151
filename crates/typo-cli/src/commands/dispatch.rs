use typo_db::service::HistoryService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    service: &HistoryService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::History(args) => commands::history::handle(&args, service, flags).await,
        Commands::Revision(args) => commands::revision::handle(&args, service, flags).await,
        Commands::Diff(args) => commands::diff::handle(&args, service, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
