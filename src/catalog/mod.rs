pub mod error;
pub use error::{CatalogError, CatalogErrorKind};

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};


/// Template written into every new migration file.
const MIGRATION_TEMPLATE: &str = "-- Write migration code below\n";


/// Read-only view of the migration directory.
///
/// File names carry a sortable timestamp prefix, so lexicographic order
/// is apply order.
#[derive(Debug)]
pub struct FileCatalog {
    directory: PathBuf,
}

impl FileCatalog {
    /// Opens an existing migration directory.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.is_dir() {
            return Err(CatalogError { kind: CatalogErrorKind::DirectoryMissing(directory) });
        }

        Ok(FileCatalog { directory })
    }

    /// Creates the migration directory if it is missing.
    /// Returns whether it had to be created.
    pub fn ensure_directory(directory: impl AsRef<Path>) -> Result<bool, CatalogError> {
        let directory = directory.as_ref();
        if directory.is_dir() {
            return Ok(false);
        }

        fs::create_dir_all(directory)
            .map_err(|source| CatalogError {
                kind: CatalogErrorKind::DirectoryCreate { source, path: directory.to_path_buf() }
            })?;

        Ok(true)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// All migration file names in the directory, sorted ascending.
    pub fn list_names(&self) -> Result<Vec<String>, CatalogError> {
        let entries = fs::read_dir(&self.directory)
            .map_err(|source| CatalogError {
                kind: CatalogErrorKind::Read { source, path: self.directory.clone() }
            })?;

        let mut names = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if !path.is_file() || !path.extension().map_or(false, |ext| ext == "sql") {
                    return None;
                }
                Some(path.file_name()?.to_str()?.to_string())
            })
            .collect::<Vec<String>>();

        names.sort();
        Ok(names)
    }

    /// Reads the SQL text of the named migration file.
    ///
    /// A missing file is a hard error: a name that the ledger knows about
    /// but the directory no longer holds means the history has diverged.
    pub fn read(&self, name: &str) -> Result<String, CatalogError> {
        let path = self.directory.join(name);
        if !path.is_file() {
            return Err(CatalogError { kind: CatalogErrorKind::NotFound(name.to_string()) });
        }

        fs::read_to_string(&path)
            .map_err(|source| CatalogError { kind: CatalogErrorKind::Read { source, path } })
    }

    /// Creates a new timestamped migration file and returns its name.
    ///
    /// The `<YYYYMMDDHHMMSS>_<label>.sql` format keeps file names sorted
    /// in creation order.
    pub fn create_migration_file(&self, label: &str) -> Result<String, CatalogError> {
        let file_name = format!("{}_{}.sql", Local::now().format("%Y%m%d%H%M%S"), label);
        let path = self.directory.join(&file_name);

        fs::write(&path, MIGRATION_TEMPLATE)
            .map_err(|source| CatalogError { kind: CatalogErrorKind::FileCreate { source, path } })?;

        Ok(file_name)
    }
}
