mod common;

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use billsheet::application::{AssumeYes, LedgerSession, TableSnapshot};
use billsheet::domain::{Field, Mutation};
use billsheet::io::{
    ArtifactFormat, ExportNotice, Exporter, ShareTarget, finish_export, spawn_export,
};
use common::{BrokenShare, RecordingShare, run_console};
use tempfile::TempDir;

fn edited_session() -> LedgerSession {
    let mut session = LedgerSession::default();
    session.dispatch(
        Mutation::SetField {
            id: 1,
            field: Field::Kgs,
            value: "100".into(),
        },
        &mut AssumeYes,
    );
    session
}

#[tokio::test]
async fn test_export_without_share_surfaces_location() -> Result<()> {
    let temp = TempDir::new()?;
    let exporter = Exporter::new(temp.path(), ArtifactFormat::Text);

    let notice = finish_export(spawn_export(exporter, None, edited_session().snapshot())).await;

    let ExportNotice::Saved(path) = notice.clone() else {
        panic!("expected saved notice, got {notice:?}");
    };
    assert!(path.starts_with(temp.path()));
    let text = fs::read_to_string(&path)?;
    assert!(text.contains("Material Billing"));
    assert!(text.contains("1,800"));
    Ok(())
}

#[tokio::test]
async fn test_export_hands_artifact_to_share_target() -> Result<()> {
    let temp = TempDir::new()?;
    let share = Arc::new(RecordingShare::default());
    let exporter = Exporter::new(temp.path().join("nested"), ArtifactFormat::Csv);

    let target: Arc<dyn ShareTarget> = share.clone();
    let notice = finish_export(spawn_export(
        exporter,
        Some(target),
        edited_session().snapshot(),
    ))
    .await;

    let ExportNotice::Shared(path) = notice.clone() else {
        panic!("expected shared notice, got {notice:?}");
    };
    assert_eq!(share.shared.lock().unwrap().as_slice(), &[path.clone()]);
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
    let csv = fs::read_to_string(&path)?;
    assert!(csv.starts_with("no,id,item,bags,kgs,rs,amount"));
    assert!(csv.contains("1,1,TUBE,0,100,18,1800"));
    Ok(())
}

#[tokio::test]
async fn test_export_failure_is_generic_and_leaves_sheet_alone() -> Result<()> {
    let temp = TempDir::new()?;
    let session = edited_session();
    let before = session.ledger().clone();

    let target: Arc<dyn ShareTarget> = Arc::new(BrokenShare);
    let notice = finish_export(spawn_export(
        Exporter::new(temp.path(), ArtifactFormat::Json),
        Some(target),
        session.snapshot(),
    ))
    .await;

    assert_eq!(notice, ExportNotice::Failed);
    assert_eq!(notice.to_string(), "could not complete export");
    assert_eq!(session.ledger(), &before);
    Ok(())
}

#[tokio::test]
async fn test_export_to_unwritable_location_fails() -> Result<()> {
    let temp = TempDir::new()?;
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "occupied")?;

    let notice = finish_export(spawn_export(
        Exporter::new(&blocker, ArtifactFormat::Text),
        None,
        edited_session().snapshot(),
    ))
    .await;

    assert!(notice.is_failure());
    Ok(())
}

#[tokio::test]
async fn test_json_export_round_trips_snapshot() -> Result<()> {
    let temp = TempDir::new()?;
    let snapshot = edited_session().snapshot();

    let path = Exporter::new(temp.path(), ArtifactFormat::Json).write_artifact(&snapshot)?;
    let parsed: TableSnapshot = serde_json::from_str(&fs::read_to_string(path)?)?;

    assert_eq!(parsed, snapshot);
    Ok(())
}

#[tokio::test]
async fn test_console_export_does_not_block_editing() -> Result<()> {
    let temp = TempDir::new()?;
    let share = Arc::new(RecordingShare::default());
    let input = "set 1 kgs 100\nexport\nset 1 kgs 200\nexport csv\nquit\n";

    let target: Arc<dyn ShareTarget> = share.clone();
    let (session, output) = run_console(input, temp.path(), Some(target), false).await?;

    assert_eq!(output.matches("Export started").count(), 2);
    assert_eq!(output.matches("Shared export:").count(), 2);
    assert_eq!(share.shared.lock().unwrap().len(), 2);
    assert_eq!(session.ledger().get(1).map(|r| r.kgs.as_str()), Some("200"));

    // Each export captured the sheet as it was when it was requested.
    let mut contents = Vec::new();
    for entry in fs::read_dir(temp.path())? {
        contents.push(fs::read_to_string(entry?.path())?);
    }
    assert_eq!(contents.len(), 2);
    assert!(contents.iter().any(|c| c.contains("1,1,TUBE,0,200,18,3600")));
    assert!(contents.iter().any(|c| c.contains("1,800")));
    Ok(())
}
