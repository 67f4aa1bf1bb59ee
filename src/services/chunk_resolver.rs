use std::cmp::Ordering;

use thiserror::Error;

use crate::content::{ContentError, PhasePlan, Section, TestKind};
use crate::db::models::TestDocument;
use crate::repositories::store::{ExamStore, StoreError};

#[derive(Debug, Error)]
pub(crate) enum ResolveError {
    #[error("test not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A root test merged with all of its fragments.
#[derive(Debug, Clone)]
pub(crate) struct LogicalTest {
    pub(crate) root: TestDocument,
    /// Document ids in merge order, root included.
    pub(crate) fragment_ids: Vec<String>,
    pub(crate) sections: Vec<Section>,
}

impl LogicalTest {
    /// Identifier used for grading and duplicate detection.
    pub(crate) fn group_id(&self) -> &str {
        &self.root.id
    }

    pub(crate) fn kind(&self) -> TestKind {
        self.root.kind
    }

    pub(crate) fn show_answer_key(&self) -> bool {
        self.root.show_answer_key
    }

    pub(crate) fn is_available(&self) -> bool {
        self.root.is_approved && self.root.is_active
    }

    pub(crate) fn plan(&self) -> Result<PhasePlan, ContentError> {
        PhasePlan::build(self.root.kind, &self.sections, self.root.durations())
    }
}

pub(crate) async fn resolve(store: &dyn ExamStore, test_id: &str) -> Result<LogicalTest, ResolveError> {
    let referenced = store.get_test_by_id(test_id).await?.ok_or(ResolveError::NotFound)?;

    if !referenced.is_chunked() {
        return Ok(merge_fragments(referenced, Vec::new()));
    }

    let root = match referenced.parent_test_id.as_deref() {
        None => referenced,
        Some(parent_id) => match store.get_test_by_id(parent_id).await? {
            Some(parent) => parent,
            None => {
                tracing::warn!(
                    test_id = %referenced.id,
                    parent_id,
                    "Parent test is missing; treating fragment as its own root"
                );
                referenced
            }
        },
    };

    let children = store.find_tests_by_group(&root.id).await?;
    Ok(merge_fragments(root, children))
}

/// Orders the root and its children and merges their sections by subject.
pub(crate) fn merge_fragments(root: TestDocument, children: Vec<TestDocument>) -> LogicalTest {
    let root_id = root.id.clone();
    let mut fragments: Vec<TestDocument> =
        children.into_iter().filter(|child| child.id != root_id).collect();
    fragments.push(root);
    fragments.sort_by(|a, b| compare_fragments(a, b, &root_id));

    let sections = merge_sections(fragments.iter().map(|doc| doc.sections.0.as_slice()));
    let fragment_ids = fragments.iter().map(|doc| doc.id.clone()).collect();

    let root_index = fragments.iter().position(|doc| doc.id == root_id).unwrap_or(0);
    let root = fragments.swap_remove(root_index);

    LogicalTest { root, fragment_ids, sections }
}

/// Explicit positions first, ascending. Without one, the root leads and children
/// follow by creation time, then id.
fn compare_fragments(a: &TestDocument, b: &TestDocument, root_id: &str) -> Ordering {
    let key = |doc: &TestDocument| {
        let position = doc.chunk_index;
        let implicit_root = position.is_none() && doc.id == root_id;
        (position.is_none() && !implicit_root, position.unwrap_or(0), !implicit_root)
    };
    key(a)
        .cmp(&key(b))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub(crate) fn merge_sections<'a>(fragments: impl IntoIterator<Item = &'a [Section]>) -> Vec<Section> {
    let mut merged: Vec<Section> = Vec::new();

    for sections in fragments {
        for section in sections {
            match merged.iter_mut().find(|existing| existing.subject == section.subject) {
                Some(existing) => {
                    if existing.marks_per_question.is_none() {
                        existing.marks_per_question = section.marks_per_question;
                    }
                    existing.questions.extend(section.questions.iter().cloned());
                }
                None => merged.push(section.clone()),
            }
        }
    }

    merged
}
