use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Subject;

/// Address of one question inside a logical test: `{subject}_{index}` on the wire,
/// with a zero-based index into the merged section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnswerKey {
    pub subject: Subject,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerKeyError {
    #[error("answer key '{0}' is not of the form subject_index")]
    Malformed(String),
    #[error("answer key '{0}' names an unknown subject")]
    UnknownSubject(String),
}

impl AnswerKey {
    pub fn new(subject: Subject, index: usize) -> Self {
        Self { subject, index }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.subject, self.index)
    }
}

impl FromStr for AnswerKey {
    type Err = AnswerKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (subject, index) =
            value.rsplit_once('_').ok_or_else(|| AnswerKeyError::Malformed(value.to_string()))?;
        let index = index.parse::<usize>().map_err(|_| AnswerKeyError::Malformed(value.to_string()))?;
        let subject =
            subject.parse::<Subject>().map_err(|_| AnswerKeyError::UnknownSubject(value.to_string()))?;
        Ok(Self { subject, index })
    }
}

impl TryFrom<String> for AnswerKey {
    type Error = AnswerKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnswerKey> for String {
    fn from(key: AnswerKey) -> Self {
        key.to_string()
    }
}
