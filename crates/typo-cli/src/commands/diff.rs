use typo_core::responses::RevisionDiffResponse;
use typo_db::history::request_diff;
use typo_db::service::HistoryService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RevisionArgs;
use crate::commands::revision;
use crate::output::output;

/// Handle `typo diff`.
pub async fn handle(
    args: &RevisionArgs,
    service: &HistoryService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = build(args, service).await?;
    output(&response, flags.format)
}

pub async fn build(
    args: &RevisionArgs,
    service: &HistoryService,
) -> anyhow::Result<RevisionDiffResponse> {
    let revision = revision::fetch(args, service).await?;
    let changes = request_diff(&revision);
    Ok(RevisionDiffResponse::from_revision(&revision, changes))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typo_core::ids::{RecordId, RevisionNumber};

    use super::*;
    use crate::commands::test_support::seeded_service;

    fn args(revision: i64) -> RevisionArgs {
        RevisionArgs {
            record_id: RecordId(7),
            revision: RevisionNumber(revision),
        }
    }

    #[tokio::test]
    async fn diff_labels_changed_language() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = seeded_service(&dir).await;

        let response = build(&args(2), &service).await.unwrap();

        assert_eq!(response.revision_label, "Modification");
        let keys: Vec<&str> = response.changes.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["labels.en"]);
        assert_eq!(response.changes[0].label, "Labels (en)");
        assert_eq!(response.changes[0].old_display, "Jar");
        assert_eq!(response.changes[0].new_display, "Amphora");
    }

    #[tokio::test]
    async fn creation_diff_shows_every_field_as_new() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = seeded_service(&dir).await;

        let response = build(&args(1), &service).await.unwrap();

        assert_eq!(response.revision_label, "Creation");
        assert!(response.changes.iter().all(|c| c.old.is_none()));
        let public = response
            .changes
            .iter()
            .find(|c| c.key == "is_public")
            .unwrap();
        assert_eq!(public.new_display, "Yes");
        assert_eq!(public.old_display, "No value");
    }

    #[tokio::test]
    async fn missing_revision_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = seeded_service(&dir).await;

        let err = build(&args(5), &service).await.unwrap_err();
        assert!(err.to_string().contains("revision 5 not found"));
    }
}
