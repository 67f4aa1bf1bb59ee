use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{require_student, CurrentUser};
use crate::content::{validate_sections, CandidateSection, CandidateTest};
use crate::core::state::AppState;
use crate::services::chunk_resolver::{self, ResolveError};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:test_id/session", get(start_session))
}

/// Hands a candidate the merged test without answer keys, plus its timing plan.
async fn start_session(
    Path(test_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CandidateTest>, ApiError> {
    require_student(&user, "Only students can take tests")?;

    let logical = chunk_resolver::resolve(state.store(), &test_id).await.map_err(|err| match err {
        ResolveError::NotFound => ApiError::NotFound("Test not found".to_string()),
        ResolveError::Store(err) => ApiError::storage(err, "Failed to load test"),
    })?;

    if !logical.is_available() {
        return Err(ApiError::Forbidden("Test is not available"));
    }

    validate_sections(&logical.sections)
        .map_err(|e| ApiError::internal(e, "Test content is invalid"))?;
    let plan = logical.plan().map_err(|e| ApiError::internal(e, "Test timing is invalid"))?;

    tracing::info!(
        test_id = %test_id,
        test_group_id = %logical.group_id(),
        student_id = %user.id,
        fragments = logical.fragment_ids.len(),
        "Exam session started"
    );

    Ok(Json(CandidateTest {
        test_id,
        test_group_id: logical.group_id().to_string(),
        title: logical.root.title.clone(),
        plan,
        sections: logical.sections.iter().map(CandidateSection::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::content::{Subject, TestKind};
    use crate::db::types::UserRole;
    use crate::test_support::{
        bearer_token, chunk, json_request, read_json, section, setup_test_context, test_document,
        user, TestContext,
    };

    async fn start(ctx: &TestContext, user_id: &str, test_id: &str) -> (StatusCode, serde_json::Value) {
        let token = bearer_token(user_id, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                Method::GET,
                &format!("/api/v1/tests/{test_id}/session"),
                Some(&token),
                None,
            ))
            .await
            .expect("response");
        let status = response.status();
        (status, read_json(response).await)
    }

    #[tokio::test]
    async fn mock_session_merges_fragments_and_hides_keys() {
        let ctx = setup_test_context().await;
        ctx.store.insert_user(user("s1", UserRole::Student));
        let mut root = test_document(
            "mock-1",
            TestKind::Mock,
            vec![section(Subject::Physics, &[0, 1]), section(Subject::Chemistry, &[2])],
        );
        root.total_chunks = Some(2);
        root.phase1_minutes = Some(45);
        ctx.store.insert_test(root);
        ctx.store.insert_test(chunk(
            "mock-1-b",
            "mock-1",
            Some(1),
            0,
            vec![section(Subject::Maths, &[3, 3]), section(Subject::Physics, &[2])],
        ));

        let (status, body) = start(&ctx, "s1", "mock-1-b").await;

        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["test_id"], "mock-1-b");
        assert_eq!(body["test_group_id"], "mock-1");
        assert_eq!(body["plan"]["kind"], "mock");
        assert_eq!(body["plan"]["phase_one_seconds"], 45 * 60);
        assert_eq!(body["plan"]["phase_two_seconds"], 90 * 60);
        assert_eq!(body["plan"]["phase_two"], "maths");

        let sections = body["sections"].as_array().expect("sections");
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0]["subject"], "physics");
        assert_eq!(sections[0]["questions"].as_array().map(Vec::len), Some(3));
        assert_eq!(sections[2]["marks_per_question"], 2);

        let serialized = body.to_string();
        assert!(!serialized.contains("correct_option"));
        assert!(!serialized.contains("explanation"));
    }

    #[tokio::test]
    async fn unapproved_test_is_forbidden() {
        let ctx = setup_test_context().await;
        ctx.store.insert_user(user("s1", UserRole::Student));
        let mut draft =
            test_document("draft", TestKind::Custom, vec![section(Subject::Biology, &[1])]);
        draft.is_approved = false;
        ctx.store.insert_test(draft);

        let (status, _) = start(&ctx, "s1", "draft").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn staff_cannot_start_sessions() {
        let ctx = setup_test_context().await;
        ctx.store.insert_user(user("t1", UserRole::Teacher));
        ctx.store.insert_test(test_document(
            "quiz",
            TestKind::Custom,
            vec![section(Subject::Biology, &[1])],
        ));

        let (status, body) = start(&ctx, "t1", "quiz").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Only students can take tests");
    }

    #[tokio::test]
    async fn unknown_test_is_not_found() {
        let ctx = setup_test_context().await;
        ctx.store.insert_user(user("s1", UserRole::Student));

        let (status, body) = start(&ctx, "s1", "missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Test not found");
    }

    #[tokio::test]
    async fn broken_content_is_a_server_error() {
        let ctx = setup_test_context().await;
        ctx.store.insert_user(user("s1", UserRole::Student));
        ctx.store.insert_test(test_document(
            "bad",
            TestKind::Custom,
            vec![section(Subject::Biology, &[7])],
        ));

        let (status, _) = start(&ctx, "s1", "bad").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
