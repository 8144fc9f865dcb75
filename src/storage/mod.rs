pub mod json_backend;

use std::path::Path;

use crate::errors::Result;
use crate::ledger::ProjectBook;

/// Abstraction over persistence backends capable of storing project books
/// and snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &ProjectBook, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<ProjectBook>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, book: &ProjectBook, name: &str, note: Option<&str>) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<ProjectBook>;

    /// Optional helpers for ad-hoc file operations. Default implementations
    /// forward to managed storage when not overridden.
    fn save_to_path(&self, book: &ProjectBook, path: &Path) -> Result<()> {
        json_backend::save_book_to_path(book, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<ProjectBook> {
        json_backend::load_book_from_path(path)
    }
}

pub use json_backend::{book_warnings, JsonStorage};
