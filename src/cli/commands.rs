use crate::catalog::FileCatalog;
use crate::cli::error::{WagtailError, WagtailErrorKind};
use crate::ledger::Ledger;

use serde::Serialize;


#[derive(Debug, Serialize)]
pub struct SetupReport {
    pub directory: String,
    pub created_directory: bool,
}

#[derive(Debug, Serialize)]
pub struct NewReport {
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyReport {
    /// Migration files in the catalog.
    pub found: usize,
    /// Files not yet recorded in the ledger.
    pub outstanding: usize,
    /// Files selected for this invocation after count bounding.
    pub attempted: usize,
    pub applied: Vec<String>,
}


/// Initializes the migration directory and the ledger table.
/// Both steps are idempotent, so re-running setup is harmless.
pub async fn setup(ledger: &Ledger, migration_directory: &str) -> Result<SetupReport, WagtailError> {
    let created = FileCatalog::ensure_directory(migration_directory)?;
    if created {
        tracing::info!("Created migration directory at '{migration_directory}'");
    } else {
        tracing::info!("Found migration directory at '{migration_directory}'");
    }

    ledger.ensure_schema().await?;
    tracing::info!("Created or found migration table");

    Ok(SetupReport {
        directory: migration_directory.to_string(),
        created_directory: created,
    })
}

/// Creates a new timestamped migration file in an existing directory.
pub fn new_migration(migration_directory: &str, label: &str) -> Result<NewReport, WagtailError> {
    let catalog = FileCatalog::open(migration_directory)?;
    let file_name = catalog.create_migration_file(label)?;

    tracing::info!("Created migration file at '{migration_directory}/{file_name}'");

    Ok(NewReport { file_name })
}

/// Applies outstanding migrations in sorted order.
///
/// Reconciles the ledger against the catalog, reads the selected files
/// into a batch, and hands it to the ledger in one go.
pub async fn apply(
    ledger: &Ledger,
    migration_directory: &str,
    count: Option<i64>,
    use_transaction: bool,
) -> Result<ApplyReport, WagtailError> {
    // Non-positive counts are rejected before any database or filesystem
    // interaction.
    validate_count(count)?;

    let catalog = FileCatalog::open(migration_directory)?;

    let all_names = catalog.list_names()?;
    let last_applied = ledger.last_applied().await?;

    let (outstanding, selected) = select_outstanding(
        &all_names,
        last_applied.as_ref().map(|(_, name)| name.as_str()),
        count,
    )?;

    tracing::info!(
        "Found {} migration file{} with {} outstanding",
        all_names.len(),
        plural(all_names.len()),
        outstanding.len(),
    );
    tracing::info!(
        "Attempting to apply {} migration{}",
        selected.len(),
        plural(selected.len()),
    );

    let mut batch = Vec::with_capacity(selected.len());
    for name in selected {
        batch.push((name.clone(), catalog.read(name)?));
    }

    let applied = ledger.apply(&batch, use_transaction).await?;

    tracing::info!(
        "Successfully applied {} migration{}",
        applied.len(),
        plural(applied.len()),
    );

    Ok(ApplyReport {
        found: all_names.len(),
        outstanding: outstanding.len(),
        attempted: selected.len(),
        applied,
    })
}

/// Outstanding migrations are every name strictly after the resume point,
/// in sorted order; `count` truncates that list. Returns both the full
/// outstanding slice and the selected prefix.
fn select_outstanding<'a>(
    all_names: &'a [String],
    last_applied: Option<&str>,
    count: Option<i64>,
) -> Result<(&'a [String], &'a [String]), WagtailError> {
    validate_count(count)?;

    let start = match last_applied {
        Some(last) => {
            let index = all_names
                .iter()
                .position(|name| name == last)
                .ok_or_else(|| WagtailError {
                    kind: WagtailErrorKind::HistoryMismatch(last.to_string())
                })?;
            index + 1
        }
        None => 0,
    };

    let outstanding = &all_names[start..];
    let selected = match count {
        Some(count) => &outstanding[..outstanding.len().min(count as usize)],
        None => outstanding,
    };

    Ok((outstanding, selected))
}

fn validate_count(count: Option<i64>) -> Result<(), WagtailError> {
    match count {
        Some(count) if count < 1 => {
            Err(WagtailError { kind: WagtailErrorKind::InvalidCount(count) })
        }
        _ => Ok(()),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_names_are_outstanding_without_history() {
        let all = names(&["1_init.sql", "2_add_col.sql", "3_add_col2.sql"]);

        let (outstanding, selected) = select_outstanding(&all, None, None).unwrap();

        assert_eq!(outstanding, all.as_slice());
        assert_eq!(selected, all.as_slice());
    }

    #[test]
    fn outstanding_starts_strictly_after_last_applied() {
        let all = names(&["1_init.sql", "2_add_col.sql", "3_add_col2.sql"]);

        let (outstanding, selected) =
            select_outstanding(&all, Some("1_init.sql"), None).unwrap();

        assert_eq!(outstanding, &all[1..]);
        assert_eq!(selected, &all[1..]);
    }

    #[test]
    fn nothing_outstanding_when_last_applied_is_final_name() {
        let all = names(&["1_init.sql", "2_add_col.sql"]);

        let (outstanding, selected) =
            select_outstanding(&all, Some("2_add_col.sql"), None).unwrap();

        assert!(outstanding.is_empty());
        assert!(selected.is_empty());
    }

    #[test]
    fn count_bounds_the_selection_in_order() {
        let all = names(&["1.sql", "2.sql", "3.sql", "4.sql", "5.sql"]);

        let (outstanding, selected) = select_outstanding(&all, None, Some(2)).unwrap();

        assert_eq!(outstanding.len(), 5);
        assert_eq!(selected, &all[..2]);
    }

    #[test]
    fn count_larger_than_outstanding_selects_everything() {
        let all = names(&["1.sql", "2.sql"]);

        let (_, selected) = select_outstanding(&all, Some("1.sql"), Some(10)).unwrap();

        assert_eq!(selected, &all[1..]);
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        let all = names(&["1.sql"]);

        for count in [0, -1, -42] {
            let err = select_outstanding(&all, None, Some(count)).unwrap_err();
            assert!(matches!(err.kind, WagtailErrorKind::InvalidCount(c) if c == count));
        }
    }

    #[test]
    fn missing_last_applied_name_is_a_history_mismatch() {
        let all = names(&["2_add_col.sql", "3_add_col2.sql"]);

        let err = select_outstanding(&all, Some("1_init.sql"), None).unwrap_err();

        assert!(
            matches!(err.kind, WagtailErrorKind::HistoryMismatch(name) if name == "1_init.sql")
        );
    }

    #[test]
    fn empty_catalog_with_no_history_selects_nothing() {
        let all: Vec<String> = Vec::new();

        let (outstanding, selected) = select_outstanding(&all, None, None).unwrap();

        assert!(outstanding.is_empty());
        assert!(selected.is_empty());
    }
}
