mod extract;

pub(crate) use extract::extract_credentials;
