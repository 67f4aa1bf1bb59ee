pub(crate) mod chunk_resolver;
pub(crate) mod grading;
pub(crate) mod result_visibility;
