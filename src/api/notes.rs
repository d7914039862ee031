//! Notes API endpoints
//!
//! Everything related to the notes management

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::notes::Note;
use crate::sanitize;
use crate::storage::CreateNoteValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

use super::CurrentToken;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// Note response going to the user
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,

    /// Name of the note
    pub note_name: String,

    /// The folder the note belongs to
    pub folder_id: i64,

    /// Content of the note
    pub content: String,

    /// Set by the storage at insert time
    pub modified: DateTime<Utc>,
}

impl NoteResponse {
    /// Create a response from a [`Note`](Note)
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            note_name: note.note_name,
            folder_id: note.folder_id,
            content: note.content,
            modified: note.modified,
        }
    }

    /// Create a response from multiple [`Note`](Note)s
    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<_>>()
    }
}

/// List all notes
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:8000/api/notes
/// ```
///
/// Response:
/// ```json
/// [ { "id": 1, "note_name": "Shopping", "folder_id": 1, "content": "...", "modified": "..." } ]
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = storage
        .find_all_notes()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Get a single note
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<NoteResponse>, Error> {
    get_note(&storage, note_id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteForm {
    note_name: Option<String>,
    folder_id: Option<i64>,
    content: Option<String>,
}

/// Create a note
///
/// All three fields are required, the referenced folder must exist
///
/// Responds with `201`, the created note and a `Location` header
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let note_name = form
        .note_name
        .ok_or_else(|| Error::missing_field("note_name"))?;
    let folder_id = form
        .folder_id
        .ok_or_else(|| Error::missing_field("folder_id"))?;
    let content = form
        .content
        .ok_or_else(|| Error::missing_field("content"))?;

    let note_name = sanitize::escape(&note_name);
    let content = sanitize::CONTENT_POLICY.clean(&content);

    let values = CreateNoteValues {
        note_name: &note_name,
        folder_id,
        content: &content,
    };

    let note = storage
        .create_note(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(
        format!("/api/notes/{}", note.id),
        NoteResponse::from_note(note),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteForm {
    note_name: Option<String>,
    folder_id: Option<i64>,
    content: Option<String>,
}

/// Partially update a note
///
/// At least one recognized field must be present, unknown fields are ignored
///
/// Responds with `204`, re-fetch to see the update
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    PathParameters(note_id): PathParameters<i64>,
    form: Result<Form<UpdateNoteForm>, Error>,
) -> Result<Success<&'static str>, Error> {
    // an unknown note is a 404 before any complaint about the body
    let note = get_note(&storage, note_id).await?;

    let Form(form) = form?;

    if form.note_name.is_none() && form.folder_id.is_none() && form.content.is_none() {
        return Err(Error::bad_request(
            "Request body must content either 'note_name, folder_id, or content'",
        ));
    }

    let values = UpdateNoteValues {
        note_name: form.note_name.as_deref().map(sanitize::escape),
        folder_id: form.folder_id,
        content: form
            .content
            .as_deref()
            .map(|content| sanitize::CONTENT_POLICY.clean(content)),
    };

    storage
        .update_note(&note, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}

/// Delete a note
///
/// Responds with `204`
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    let note = get_note(&storage, note_id).await?;

    storage
        .delete_note(&note)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}

async fn get_note<S: Storage>(storage: &S, note_id: i64) -> Result<Note, Error> {
    storage
        .find_single_note_by_id(note_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Note doesn't exist")), Ok)
}
