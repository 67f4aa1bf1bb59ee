use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_student, CurrentUser};
use crate::api::pagination::{window, PaginatedResponse};
use crate::core::state::AppState;
use crate::schemas::submission::{SubmissionListQuery, SubmissionResponse, SubmitTestRequest};
use crate::services::grading::{self, GradingError};
use crate::services::result_visibility::shape;

pub(in crate::api::submissions) async fn submit_test(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmitTestRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    require_student(&user, "Only students can submit tests")?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let graded = grading::submit(state.store(), &user, &payload.test_id, payload.answers)
        .await
        .map_err(|err| match err {
            GradingError::NotStudent => ApiError::Forbidden("Only students can submit tests"),
            GradingError::Invalid(message) => ApiError::BadRequest(message),
            GradingError::TestNotFound => ApiError::NotFound("Test not found".to_string()),
            GradingError::TestUnavailable => ApiError::Forbidden("Test is not available"),
            GradingError::InvalidContent(err) => ApiError::internal(err, "Test content is invalid"),
            GradingError::AlreadySubmitted => {
                ApiError::Conflict("Test already submitted".to_string())
            }
            GradingError::Store(err) => ApiError::storage(err, "Failed to save submission"),
        })?;

    Ok((StatusCode::CREATED, Json(shape(graded.submission, graded.show_answer_key))))
}

pub(in crate::api::submissions) async fn get_my_submissions(
    Query(params): Query<SubmissionListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<SubmissionResponse>>, ApiError> {
    let (skip, limit) =
        window(params.skip, params.limit, state.settings().exam().submission_list_max_limit);

    let submissions = state
        .store()
        .list_submissions_by_student(&user.id, skip, limit)
        .await
        .map_err(|e| ApiError::storage(e, "Failed to fetch submissions"))?;
    let total_count = state
        .store()
        .count_submissions_by_student(&user.id)
        .await
        .map_err(|e| ApiError::storage(e, "Failed to count submissions"))?;

    let group_ids: Vec<String> = submissions
        .iter()
        .map(|submission| submission.test_group_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let flags = state
        .store()
        .answer_key_flags(&group_ids)
        .await
        .map_err(|e| ApiError::storage(e, "Failed to load answer key settings"))?;

    let items = submissions
        .into_iter()
        .map(|submission| {
            let visible = flags.get(&submission.test_group_id).copied().unwrap_or(false);
            shape(submission, visible)
        })
        .collect();

    Ok(Json(PaginatedResponse { items, total_count, skip, limit }))
}
