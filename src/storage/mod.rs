//! All things related to the storage of folders and notes

use axum::async_trait;
use thiserror::Error;

use crate::folders::Folder;
use crate::notes::Note;

#[cfg(any(test, not(feature = "postgres")))]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> memory::Memory {
    memory::Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> postgres::Postgres {
    postgres::Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// A constraint of the storage was violated, like a note referencing a
    /// folder that does not exist
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Folder
pub struct CreateFolderValues<'a> {
    /// Name of the folder, already sanitized
    pub folder_name: &'a str,
}

/// Values to update a Folder
pub struct UpdateFolderValues {
    /// New (optional) name of the folder, already sanitized
    pub folder_name: Option<String>,
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// Name of the note, already sanitized
    pub note_name: &'a str,

    /// The folder the note belongs to
    pub folder_id: i64,

    /// Content of the note, already sanitized
    pub content: &'a str,
}

/// Values to update a Note
///
/// Only fields that are `Some` are written, the rest keeps its current value.
pub struct UpdateNoteValues {
    /// New name of the note, already sanitized
    pub note_name: Option<String>,

    /// New folder of the note
    pub folder_id: Option<i64>,

    /// New content of the note, already sanitized
    pub content: Option<String>,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find all folders, in ascending ID order
    async fn find_all_folders(&self) -> Result<Vec<Folder>>;

    /// Find a single folder by its ID
    async fn find_single_folder_by_id(&self, id: i64) -> Result<Option<Folder>>;

    /// Create a folder, the storage assigns the ID
    async fn create_folder(&self, values: &CreateFolderValues<'_>) -> Result<Folder>;

    /// Update a folder, merging only the supplied fields
    async fn update_folder(&self, folder: &Folder, values: &UpdateFolderValues) -> Result<Folder>;

    /// Delete a folder, taking its notes with it
    async fn delete_folder(&self, folder: &Folder) -> Result<()>;

    /// Find all notes, in ascending ID order
    async fn find_all_notes(&self) -> Result<Vec<Note>>;

    /// Find a single note by its ID
    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>>;

    /// Create a note, the storage assigns the ID and the modified timestamp
    ///
    /// The referenced folder must exist
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note>;

    /// Update a note, merging only the supplied fields
    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note>;

    /// Delete a note
    async fn delete_note(&self, note: &Note) -> Result<()>;
}
