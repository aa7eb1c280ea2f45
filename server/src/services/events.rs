//! Create, edit and delete, on top of an [`EventStore`].

use chrono::Utc;
use tracing::{info, warn};

use super::normalize::{normalize, ValidationErrors};
use crate::models::EventForm;
use crate::store::{EventStore, StoreError};
use crate::utils::error::AppError;

/// Result of a create or edit submission.
#[derive(Debug)]
pub enum Submission {
    Saved(i32),
    /// The form must be shown again with these errors.
    Invalid(ValidationErrors),
}

pub async fn create_event(store: &dyn EventStore, form: &EventForm) -> Result<Submission, AppError> {
    let draft = match normalize(form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(Submission::Invalid(errors)),
    };

    let id = store.create(&draft, Utc::now()).await?;
    info!(event_id = id, title = %draft.title, "Event created");

    Ok(Submission::Saved(id))
}

/// Applies an edit to event `path_id`.
///
/// The id carried by the form must match the one in the path. A lost
/// optimistic-concurrency race is reported as not found when the event has
/// since been deleted, and as a conflict otherwise.
pub async fn update_event(
    store: &dyn EventStore,
    path_id: i32,
    form: &EventForm,
) -> Result<Submission, AppError> {
    if form.id.trim().parse::<i32>().ok() != Some(path_id) {
        return Err(AppError::event_not_found(path_id));
    }

    let draft = match normalize(form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(Submission::Invalid(errors)),
    };
    let expected_version = form.row_version.trim().parse::<i32>().ok();

    match store.update(path_id, &draft, expected_version).await {
        Ok(()) => {
            info!(event_id = path_id, "Event updated");
            Ok(Submission::Saved(path_id))
        }
        Err(StoreError::Conflict(id)) => {
            warn!(event_id = id, ?expected_version, "Event update lost a concurrent race");
            if !store.exists(id).await? {
                return Err(AppError::event_not_found(id));
            }
            Err(StoreError::Conflict(id).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_event(store: &dyn EventStore, id: i32) -> Result<(), AppError> {
    store.delete(id).await?;
    info!(event_id = id, "Event deleted");
    Ok(())
}
