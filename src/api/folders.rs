//! Folders API endpoints
//!
//! Everything related to the folders management

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::folders::Folder;
use crate::sanitize;
use crate::storage::CreateFolderValues;
use crate::storage::Storage;
use crate::storage::UpdateFolderValues;

use super::CurrentToken;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// Folder response going to the user
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    /// Folder ID
    pub id: i64,

    /// Name of the folder
    pub folder_name: String,
}

impl FolderResponse {
    /// Create a response from a [`Folder`](Folder)
    fn from_folder(folder: Folder) -> Self {
        Self {
            id: folder.id,
            folder_name: folder.folder_name,
        }
    }

    /// Create a response from multiple [`Folder`](Folder)s
    fn from_folder_multiple(mut folders: Vec<Folder>) -> Vec<Self> {
        folders.drain(..).map(Self::from_folder).collect::<Vec<_>>()
    }
}

/// List all folders
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:8000/api/folders
/// ```
///
/// Response:
/// ```json
/// [ { "id": 1, "folder_name": "Important" } ]
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
) -> Result<Success<Vec<FolderResponse>>, Error> {
    let folders = storage
        .find_all_folders()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(FolderResponse::from_folder_multiple(folders)))
}

/// Get a single folder
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    PathParameters(folder_id): PathParameters<i64>,
) -> Result<Success<FolderResponse>, Error> {
    get_folder(&storage, folder_id)
        .await
        .map(|folder| Success::ok(FolderResponse::from_folder(folder)))
}

#[derive(Debug, Deserialize)]
pub struct CreateFolderForm {
    folder_name: Option<String>,
}

/// Create a folder
///
/// Request:
/// ```sh
/// curl -v -X POST -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{"folder_name":"Important"}' \
///     http://localhost:8000/api/folders
/// ```
///
/// Responds with `201`, the created folder and a `Location` header
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    Form(form): Form<CreateFolderForm>,
) -> Result<Success<FolderResponse>, Error> {
    let folder_name = form
        .folder_name
        .filter(|folder_name| !folder_name.is_empty())
        .ok_or_else(|| Error::missing_field("folder_name"))?;

    let folder_name = sanitize::escape(&folder_name);

    let values = CreateFolderValues {
        folder_name: &folder_name,
    };

    let folder = storage
        .create_folder(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(
        format!("/api/folders/{}", folder.id),
        FolderResponse::from_folder(folder),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateFolderForm {
    folder_name: Option<String>,
}

/// Partially update a folder
///
/// Responds with `204`, re-fetch to see the update
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    PathParameters(folder_id): PathParameters<i64>,
    form: Result<Form<UpdateFolderForm>, Error>,
) -> Result<Success<&'static str>, Error> {
    // an unknown folder is a 404 before any complaint about the body
    let folder = get_folder(&storage, folder_id).await?;

    let Form(form) = form?;

    let Some(folder_name) = form.folder_name else {
        return Err(Error::bad_request("Request body must content 'folder_name'"));
    };

    let values = UpdateFolderValues {
        folder_name: Some(sanitize::escape(&folder_name)),
    };

    storage
        .update_folder(&folder, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}

/// Delete a folder
///
/// Responds with `204`, the notes of the folder are deleted with it
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    _current_token: CurrentToken,
    PathParameters(folder_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    let folder = get_folder(&storage, folder_id).await?;

    storage
        .delete_folder(&folder)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}

async fn get_folder<S: Storage>(storage: &S, folder_id: i64) -> Result<Folder, Error> {
    storage
        .find_single_folder_by_id(folder_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Folder doesn't exist")), Ok)
}
