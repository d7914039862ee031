//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::BTreeMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::folders::Folder;
use crate::notes::Note;

use super::CreateFolderValues;
use super::CreateNoteValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateFolderValues;
use super::UpdateNoteValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All folders in storage, keyed and ordered by ID
    folders: Arc<Mutex<BTreeMap<i64, Folder>>>,

    /// All notes in storage, keyed and ordered by ID
    notes: Arc<Mutex<BTreeMap<i64, Note>>>,

    /// Next folder ID
    folder_sequence: Arc<AtomicI64>,

    /// Next note ID
    note_sequence: Arc<AtomicI64>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_all_folders(&self) -> Result<Vec<Folder>> {
        Ok(self.folders.lock().await.values().cloned().collect())
    }

    async fn find_single_folder_by_id(&self, id: i64) -> Result<Option<Folder>> {
        Ok(self.folders.lock().await.get(&id).cloned())
    }

    async fn create_folder(&self, values: &CreateFolderValues<'_>) -> Result<Folder> {
        let folder = Folder {
            id: self.folder_sequence.fetch_add(1, Ordering::SeqCst) + 1,
            folder_name: values.folder_name.to_string(),
        };

        self.folders.lock().await.insert(folder.id, folder.clone());

        Ok(folder)
    }

    async fn update_folder(&self, folder: &Folder, values: &UpdateFolderValues) -> Result<Folder> {
        let updated_folder = Folder {
            id: folder.id,
            folder_name: values
                .folder_name
                .clone()
                .unwrap_or_else(|| folder.folder_name.clone()),
        };

        self.folders
            .lock()
            .await
            .insert(updated_folder.id, updated_folder.clone());

        Ok(updated_folder)
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<()> {
        self.folders.lock().await.remove(&folder.id);

        // mirrors the `ON DELETE CASCADE` of the Postgres storage
        self.notes
            .lock()
            .await
            .retain(|_, note| note.folder_id != folder.id);

        Ok(())
    }

    async fn find_all_notes(&self) -> Result<Vec<Note>> {
        Ok(self.notes.lock().await.values().cloned().collect())
    }

    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.notes.lock().await.get(&id).cloned())
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        self.check_folder_reference(values.folder_id).await?;

        let note = Note {
            id: self.note_sequence.fetch_add(1, Ordering::SeqCst) + 1,
            note_name: values.note_name.to_string(),
            folder_id: values.folder_id,
            content: values.content.to_string(),
            modified: Utc::now(),
        };

        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note> {
        if let Some(folder_id) = values.folder_id {
            self.check_folder_reference(folder_id).await?;
        }

        let updated_note = Note {
            id: note.id,
            note_name: values
                .note_name
                .clone()
                .unwrap_or_else(|| note.note_name.clone()),
            folder_id: values.folder_id.unwrap_or(note.folder_id),
            content: values
                .content
                .clone()
                .unwrap_or_else(|| note.content.clone()),
            modified: note.modified,
        };

        self.notes
            .lock()
            .await
            .insert(updated_note.id, updated_note.clone());

        Ok(updated_note)
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        self.notes.lock().await.remove(&note.id);

        Ok(())
    }
}

impl Memory {
    /// Reject note writes pointing at a folder that does not exist
    ///
    /// The Postgres storage gets this from its foreign key constraint
    async fn check_folder_reference(&self, folder_id: i64) -> Result<()> {
        if self.folders.lock().await.contains_key(&folder_id) {
            Ok(())
        } else {
            Err(Error::Constraint(format!(
                "folder {folder_id} does not exist"
            )))
        }
    }
}
