use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::core::retry::{self, RetryPolicy};
use crate::db::models::{Submission, TestDocument, User};
use crate::repositories::{submissions, test_documents, users};

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("a submission for this test group and student already exists")]
    Duplicate,
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Duplicate;
            }
        }
        if retry::is_transient(&err) {
            return Self::Unavailable(err);
        }
        Self::Database(err)
    }
}

/// Everything the grading and session paths need from persistent storage.
///
/// `create_submission` must enforce uniqueness of `(test_group_id, student_id)` at
/// write time and report a violation as [`StoreError::Duplicate`].
#[async_trait]
pub(crate) trait ExamStore: Send + Sync {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn get_test_by_id(&self, id: &str) -> Result<Option<TestDocument>, StoreError>;

    /// Documents whose parent reference points at `root_id`. The root itself is not included.
    async fn find_tests_by_group(&self, root_id: &str) -> Result<Vec<TestDocument>, StoreError>;

    async fn find_submission(
        &self,
        test_group_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>, StoreError>;

    async fn find_submission_by_id(&self, id: &str) -> Result<Option<Submission>, StoreError>;

    async fn list_submissions_by_student(
        &self,
        student_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Submission>, StoreError>;

    async fn count_submissions_by_student(&self, student_id: &str) -> Result<i64, StoreError>;

    async fn create_submission(&self, record: Submission) -> Result<Submission, StoreError>;

    /// Current answer-key visibility per test id. Unknown ids are absent from the map.
    async fn answer_key_flags(&self, test_ids: &[String]) -> Result<HashMap<String, bool>, StoreError>;
}

#[derive(Clone)]
pub(crate) struct PgExamStore {
    pool: PgPool,
    policy: RetryPolicy,
}

impl PgExamStore {
    pub(crate) fn new(pool: PgPool, policy: RetryPolicy) -> Self {
        Self { pool, policy }
    }
}

#[async_trait]
impl ExamStore for PgExamStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "find_user", move || users::find_by_id(pool, id))
            .await?)
    }

    async fn get_test_by_id(&self, id: &str) -> Result<Option<TestDocument>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "get_test_by_id", move || {
            test_documents::find_by_id(pool, id)
        })
        .await?)
    }

    async fn find_tests_by_group(&self, root_id: &str) -> Result<Vec<TestDocument>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "find_tests_by_group", move || {
            test_documents::list_children(pool, root_id)
        })
        .await?)
    }

    async fn find_submission(
        &self,
        test_group_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "find_submission", move || {
            submissions::find_by_group_and_student(pool, test_group_id, student_id)
        })
        .await?)
    }

    async fn find_submission_by_id(&self, id: &str) -> Result<Option<Submission>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "find_submission_by_id", move || {
            submissions::find_by_id(pool, id)
        })
        .await?)
    }

    async fn list_submissions_by_student(
        &self,
        student_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Submission>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "list_submissions_by_student", move || {
            submissions::list_by_student(pool, student_id, skip, limit)
        })
        .await?)
    }

    async fn count_submissions_by_student(&self, student_id: &str) -> Result<i64, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "count_submissions_by_student", move || {
            submissions::count_by_student(pool, student_id)
        })
        .await?)
    }

    async fn create_submission(&self, record: Submission) -> Result<Submission, StoreError> {
        let pool = &self.pool;
        let record = &record;
        // A retry after a lost acknowledgement hits the conflict clause and fails closed.
        retry::with_backoff(self.policy, "create_submission", move || {
            submissions::create(pool, record)
        })
        .await?
        .ok_or(StoreError::Duplicate)
    }

    async fn answer_key_flags(&self, test_ids: &[String]) -> Result<HashMap<String, bool>, StoreError> {
        let pool = &self.pool;
        Ok(retry::with_backoff(self.policy, "answer_key_flags", move || {
            test_documents::answer_key_flags(pool, test_ids)
        })
        .await?)
    }
}
