use crate::{Error, DEFAULT_SCHOOL_TYPE};

/// The selector sent by the client, or `hs` when absent.
pub fn school_type_or_default(school_type: &Option<String>) -> String {
    school_type
        .clone()
        .unwrap_or_else(|| DEFAULT_SCHOOL_TYPE.key().to_string())
}

pub fn require_metric(metric: &Option<String>) -> Result<&str, Error> {
    metric
        .as_deref()
        .ok_or(Error::MissingParameter("metric"))
}
