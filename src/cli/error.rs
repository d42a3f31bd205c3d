use crate::catalog::CatalogError;
use crate::ledger::LedgerError;

use std::error::Error;
use std::fmt;


#[derive(Debug)]
pub struct WagtailError {
    pub kind: WagtailErrorKind
}

impl fmt::Display for WagtailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WagtailError: {}", self.kind)
    }
}

impl Error for WagtailError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}

#[derive(Debug)]
pub enum WagtailErrorKind {
    Catalog(CatalogError),
    Ledger(LedgerError),
    /// The ledger's last applied migration has no matching file in the
    /// catalog: the history has been deleted or renamed from under us.
    HistoryMismatch(String),
    InvalidCount(i64),
}

impl fmt::Display for WagtailErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(error) => write!(f, "{}", error.kind),
            Self::Ledger(error) => write!(f, "{}", error.kind),
            Self::HistoryMismatch(name) => {
                write!(f, "Last applied migration '{name}' not found in the migration directory")
            }
            Self::InvalidCount(count) => {
                write!(f, "Number of migrations to apply must be positive, got {count}")
            }
        }
    }
}

impl Error for WagtailErrorKind {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(source) => Some(source),
            Self::Ledger(source) => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for WagtailError {
    fn from(error: CatalogError) -> Self {
        WagtailError { kind: WagtailErrorKind::Catalog(error) }
    }
}

impl From<LedgerError> for WagtailError {
    fn from(error: LedgerError) -> Self {
        WagtailError { kind: WagtailErrorKind::Ledger(error) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogErrorKind;
    use crate::ledger::LedgerErrorKind;
    use std::error::Error;

    #[test]
    fn wagtail_error_display_formats_correctly() {
        let catalog_err = CatalogError {
            kind: CatalogErrorKind::NotFound("1_init.sql".into()),
        };
        let ledger_err = LedgerError {
            kind: LedgerErrorKind::Sqlx(sqlx::Error::RowNotFound),
        };

        let cases: Vec<(WagtailErrorKind, &str)> = vec![
            (WagtailErrorKind::Catalog(catalog_err), "not found in the migration directory"),
            (WagtailErrorKind::Ledger(ledger_err), "no rows returned"),
            (
                WagtailErrorKind::HistoryMismatch("1_init.sql".into()),
                "Last applied migration '1_init.sql' not found",
            ),
            (WagtailErrorKind::InvalidCount(0), "must be positive, got 0"),
            (WagtailErrorKind::InvalidCount(-2), "must be positive, got -2"),
        ];

        for (kind, expect) in cases {
            let text = kind.to_string();
            assert!(
                text.contains(expect),
                "Expected `{}` in `{}`",
                expect,
                text
            );
        }
    }

    #[test]
    fn wagtail_error_source_chain_works() {
        let kind = WagtailErrorKind::Ledger(LedgerError {
            kind: LedgerErrorKind::Sqlx(sqlx::Error::RowNotFound),
        });
        assert!(kind.source().is_some());
        assert!(WagtailErrorKind::HistoryMismatch("x.sql".into()).source().is_none());
    }

    #[test]
    fn wagtail_error_from_conversions_work() {
        let catalog_err = CatalogError {
            kind: CatalogErrorKind::NotFound("x.sql".into()),
        };
        let ledger_err = LedgerError {
            kind: LedgerErrorKind::Sqlx(sqlx::Error::RowNotFound),
        };

        let e1: WagtailError = catalog_err.into();
        let e2: WagtailError = ledger_err.into();

        assert!(matches!(e1.kind, WagtailErrorKind::Catalog(_)));
        assert!(matches!(e2.kind, WagtailErrorKind::Ledger(_)));
    }
}
