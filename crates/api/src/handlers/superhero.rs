//! Handlers for the superhero catalog.
//!
//! Create and update take `multipart/form-data`; image files are written
//! to the upload directory before the record is persisted and rolled back
//! if persisting fails.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use heroes_core::error::CoreError;
use heroes_core::pagination::PageRequest;
use heroes_core::superhero::{
    edit_images, parse_images_to_remove, MessageBody, Superhero, SuperheroEnvelope,
    SuperheroPage, ENTITY, MSG_ALREADY_EXISTS, MSG_CREATED, MSG_DELETED, MSG_NO_IMAGES,
    MSG_UPDATED,
};
use heroes_core::types::{parse_id, DbId};
use heroes_core::uploads::{RemovalOutcome, RemovalReport};

use crate::error::{AppError, AppResult};
use crate::multipart::SuperheroForm;
use crate::query::PageParams;
use crate::state::AppState;

/// POST /superheroes/create
///
/// Requires every scalar field and at least one image.
pub async fn create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<SuperheroEnvelope>)> {
    let form = SuperheroForm::read(multipart?).await?;
    let draft = form.fields.require_all()?;

    if state.store.find_by_nickname(&draft.nickname).await?.is_some() {
        return Err(CoreError::Conflict(MSG_ALREADY_EXISTS.to_string()).into());
    }
    if form.images.is_empty() {
        return Err(CoreError::Validation(MSG_NO_IMAGES.to_string()).into());
    }

    let images = state.uploads.save_all(&form.images).await?;
    let superhero = match state.store.insert(&draft.with_images(images.clone())).await {
        Ok(hero) => hero,
        Err(err) => {
            discard_uploads(&state, &images).await;
            return Err(err.into());
        }
    };

    tracing::info!(
        superhero_id = superhero.id,
        nickname = %superhero.nickname,
        images = superhero.images.len(),
        "Superhero created",
    );
    Ok((
        StatusCode::CREATED,
        Json(SuperheroEnvelope {
            message: MSG_CREATED.to_string(),
            superhero,
        }),
    ))
}

/// GET /superheroes/all?page=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<SuperheroPage>> {
    let request = PageRequest::from_query(params.page.as_deref(), params.limit.as_deref());
    let total = state.store.count().await?;
    let superheroes = state
        .store
        .list_page(request.offset(), request.limit)
        .await?;
    Ok(Json(SuperheroPage::new(superheroes, request.window(total))))
}

/// GET /superheroes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Superhero>> {
    let id = require_id(&raw_id)?;
    let superhero = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;
    Ok(Json(superhero))
}

/// PUT /superheroes/update/{id}
///
/// Applies whichever scalar fields were sent, removes the paths listed in
/// `imagesToRemove` and appends newly uploaded images. Files of removed
/// images are deleted only after the record is saved.
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SuperheroEnvelope>> {
    let id = require_id(&raw_id)?;
    let current = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    let form = SuperheroForm::read(multipart?).await?;
    let to_remove = match form.images_to_remove.as_deref() {
        Some(raw) => parse_images_to_remove(raw)?,
        None => Vec::new(),
    };

    let added = state.uploads.save_all(&form.images).await?;
    let edit = edit_images(&current.images, &to_remove, &added);

    let mut changes = form.fields.into_changes();
    if !edit.removed.is_empty() || !added.is_empty() {
        changes.images = Some(edit.images);
    }

    let superhero = match state.store.update(id, &changes).await {
        Ok(Some(hero)) => hero,
        Ok(None) => {
            discard_uploads(&state, &added).await;
            return Err(not_found(&raw_id));
        }
        Err(err) => {
            discard_uploads(&state, &added).await;
            return Err(err.into());
        }
    };

    let report = state.uploads.remove_all(&edit.removed).await;
    log_removals(superhero.id, &report);

    tracing::info!(
        superhero_id = superhero.id,
        added = added.len(),
        removed = edit.removed.len(),
        "Superhero updated",
    );
    Ok(Json(SuperheroEnvelope {
        message: MSG_UPDATED.to_string(),
        superhero,
    }))
}

/// DELETE /superheroes/delete/{id}
///
/// Deletes the record, then every image file it referenced.
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    let id = require_id(&raw_id)?;
    let superhero = state
        .store
        .delete(id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    let report = state.uploads.remove_all(&superhero.images).await;
    log_removals(superhero.id, &report);

    tracing::info!(superhero_id = superhero.id, "Superhero deleted");
    Ok(Json(MessageBody {
        message: MSG_DELETED.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(raw_id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ENTITY,
        id: raw_id.to_string(),
    })
}

/// Ids that cannot name a record are reported as missing records.
fn require_id(raw_id: &str) -> AppResult<DbId> {
    parse_id(raw_id).ok_or_else(|| not_found(raw_id))
}

/// Remove files saved for a request whose record was never persisted.
async fn discard_uploads(state: &AppState, paths: &[String]) {
    let report = state.uploads.remove_all(paths).await;
    for (path, outcome) in report.failures() {
        tracing::warn!(path = %path, ?outcome, "Failed to discard uploaded image");
    }
}

fn log_removals(superhero_id: DbId, report: &RemovalReport) {
    for (path, outcome) in &report.entries {
        match outcome {
            RemovalOutcome::Removed => {}
            RemovalOutcome::Missing => {
                tracing::info!(superhero_id, path = %path, "Image file already gone");
            }
            RemovalOutcome::Rejected | RemovalOutcome::Failed(_) => {
                tracing::warn!(superhero_id, path = %path, ?outcome, "Failed to delete image file");
            }
        }
    }
    if report.attempted() > 0 {
        tracing::debug!(
            superhero_id,
            attempted = report.attempted(),
            removed = report.removed_count(),
            "Image files cleaned up",
        );
    }
}
