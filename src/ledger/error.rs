use std::error::Error;
use std::fmt;


#[derive(Debug)]
pub struct LedgerError {
    pub kind: LedgerErrorKind
}

impl LedgerError {
    pub(crate) fn apply(
        name: &str,
        committed: Vec<String>,
        rolled_back: bool,
        source: sqlx::Error,
    ) -> Self {
        LedgerError {
            kind: LedgerErrorKind::Apply {
                name: name.to_string(),
                committed,
                rolled_back,
                source,
            }
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerError: {}", self.kind)
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}

#[derive(Debug)]
pub enum LedgerErrorKind {
    Sqlx(sqlx::Error),
    Apply {
        /// The migration that failed.
        name: String,
        /// Names that were already committed when the failure hit.
        /// Always empty after a rollback.
        committed: Vec<String>,
        rolled_back: bool,
        source: sqlx::Error,
    },
}

impl fmt::Display for LedgerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlx(e) => write!(f, "{e}"),
            Self::Apply { name, committed, rolled_back, source } => {
                write!(f, "Error applying migration: {name}: {source}")?;
                if *rolled_back {
                    write!(f, " (the batch was rolled back)")
                } else {
                    write!(f, " ({} prior migration(s) remain committed)", committed.len())
                }
            }
        }
    }
}

impl Error for LedgerErrorKind {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlx(source) => Some(source),
            Self::Apply { source, .. } => Some(source),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(error: sqlx::Error) -> Self {
        LedgerError { kind: LedgerErrorKind::Sqlx(error) }
    }
}
