use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::submission::SubmissionResponse;
use crate::services::result_visibility::shape;

/// Staff always see full detail. The owning student sees it only while the test's
/// answer key is released, read fresh on every request.
pub(in crate::api::submissions) async fn get_submission(
    Path(submission_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = state
        .store()
        .find_submission_by_id(&submission_id)
        .await
        .map_err(|e| ApiError::storage(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    if user.role.is_staff() {
        return Ok(Json(shape(submission, true)));
    }

    if submission.student_id != user.id {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let flags = state
        .store()
        .answer_key_flags(std::slice::from_ref(&submission.test_group_id))
        .await
        .map_err(|e| ApiError::storage(e, "Failed to load answer key settings"))?;
    let visible = flags.get(&submission.test_group_id).copied().unwrap_or(false);

    Ok(Json(shape(submission, visible)))
}
