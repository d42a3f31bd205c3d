use std::error::Error;
use std::fmt;
use std::path::PathBuf;


#[derive(Debug)]
pub struct CatalogError {
    pub kind: CatalogErrorKind
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CatalogError: {}", self.kind)
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}

#[derive(Debug)]
pub enum CatalogErrorKind {
    DirectoryMissing(PathBuf),
    NotFound(String),
    Read { source: std::io::Error, path: PathBuf },
    DirectoryCreate { source: std::io::Error, path: PathBuf },
    FileCreate { source: std::io::Error, path: PathBuf },
}

impl fmt::Display for CatalogErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryMissing(path) => {
                write!(f, "Migration directory not found: '{path:?}'. Run the setup command to create it.")
            }
            Self::NotFound(name) => write!(f, "Migration '{name}' not found in the migration directory"),
            Self::Read { path, .. } => write!(f, "Failed to read: '{path:?}'"),
            Self::DirectoryCreate { path, .. } => write!(f, "Failed to create directory: '{path:?}'"),
            Self::FileCreate { path, .. } => write!(f, "Failed to create migration file: '{path:?}'"),
        }
    }
}

impl Error for CatalogErrorKind {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::DirectoryCreate { source, .. } => Some(source),
            Self::FileCreate { source, .. } => Some(source),
            _ => None,
        }
    }
}
