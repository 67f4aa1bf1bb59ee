mod review;
mod student;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(student::submit_test))
        .route("/my", get(student::get_my_submissions))
        .route("/:submission_id", get(review::get_submission))
}
