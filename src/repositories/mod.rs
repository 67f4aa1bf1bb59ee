pub(crate) mod store;
pub(crate) mod submissions;
pub(crate) mod test_documents;
pub(crate) mod users;
