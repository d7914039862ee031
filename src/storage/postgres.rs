//! Postgres storage

use std::time::Duration;

use axum::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::error::ErrorKind;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::folders::Folder;
use crate::notes::Note;

use super::CreateFolderValues;
use super::CreateNoteValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateFolderValues;
use super::UpdateNoteValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of a folder
#[derive(FromRow)]
struct PostgresFolder {
    /// Folder ID
    id: i64,

    /// Name of the folder
    folder_name: String,
}

impl PostgresFolder {
    fn into_folder(self) -> Folder {
        Folder {
            id: self.id,
            folder_name: self.folder_name,
        }
    }
}

/// Postgres version of a note
#[derive(FromRow)]
struct PostgresNote {
    /// Note ID
    id: i64,

    /// Name of the note
    note_name: String,

    /// The folder the note belongs to
    folder_id: i64,

    /// Content of the note
    content: String,

    /// Set by the database at insert time
    modified: DateTime<Utc>,
}

impl PostgresNote {
    fn into_note(self) -> Note {
        Note {
            id: self.id,
            note_name: self.note_name,
            folder_id: self.folder_id,
            content: self.content,
            modified: self.modified,
        }
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_all_folders(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, PostgresFolder>(
            r"
            SELECT id, folder_name
            FROM folders
            ORDER BY id
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folders
            .into_iter()
            .map(PostgresFolder::into_folder)
            .collect())
    }

    async fn find_single_folder_by_id(&self, id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, PostgresFolder>(
            r"
            SELECT id, folder_name
            FROM folders
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folder.map(PostgresFolder::into_folder))
    }

    async fn create_folder(&self, values: &CreateFolderValues<'_>) -> Result<Folder> {
        let folder = sqlx::query_as::<_, PostgresFolder>(
            r"
            INSERT INTO folders (folder_name)
            VALUES ($1)
            RETURNING id, folder_name
            ",
        )
        .bind(values.folder_name)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folder.into_folder())
    }

    async fn update_folder(&self, folder: &Folder, values: &UpdateFolderValues) -> Result<Folder> {
        let updated_folder = sqlx::query_as::<_, PostgresFolder>(
            r"
            UPDATE folders
            SET folder_name = $1
            WHERE id = $2
            RETURNING id, folder_name
            ",
        )
        .bind(values.folder_name.as_deref().unwrap_or(&folder.folder_name))
        .bind(folder.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(updated_folder.into_folder())
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM folders
            WHERE id = $1
            ",
        )
        .bind(folder.id)
        .execute(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn find_all_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, PostgresNote>(
            r"
            SELECT id, note_name, folder_id, content, modified
            FROM notes
            ORDER BY id
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(notes.into_iter().map(PostgresNote::into_note).collect())
    }

    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            SELECT id, note_name, folder_id, content, modified
            FROM notes
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(note.map(PostgresNote::into_note))
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            INSERT INTO notes (note_name, folder_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, note_name, folder_id, content, modified
            ",
        )
        .bind(values.note_name)
        .bind(values.folder_id)
        .bind(values.content)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(note.into_note())
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note> {
        let updated_note = sqlx::query_as::<_, PostgresNote>(
            r"
            UPDATE notes
            SET note_name = $1, folder_id = $2, content = $3
            WHERE id = $4
            RETURNING id, note_name, folder_id, content, modified
            ",
        )
        .bind(values.note_name.as_deref().unwrap_or(&note.note_name))
        .bind(values.folder_id.unwrap_or(note.folder_id))
        .bind(values.content.as_deref().unwrap_or(&note.content))
        .bind(note.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(updated_note.into_note())
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM notes
            WHERE id = $1
            ",
        )
        .bind(note.id)
        .execute(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

/// Map a sqlx error to a storage error
fn storage_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(database_error)
            if matches!(database_error.kind(), ErrorKind::ForeignKeyViolation) =>
        {
            Error::Constraint(database_error.to_string())
        }
        _ => Error::Connection(err.to_string()),
    }
}
