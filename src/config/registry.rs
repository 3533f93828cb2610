use std::collections::HashMap;
use object_store::path::Path;
use crate::SchoolType;

/// Maps every school type onto the location of its dataset inside the data store.
#[derive(Debug, Clone)]
pub struct SchoolTypeRegistry {
    sources: HashMap<SchoolType, String>,
}

impl Default for SchoolTypeRegistry {
    fn default() -> Self {
        let sources = SchoolType::ALL
            .into_iter()
            .map(|school_type| (school_type, school_type.default_source()))
            .collect();

        Self { sources }
    }
}

impl SchoolTypeRegistry {
    pub fn with_source(mut self, school_type: SchoolType, location: impl Into<String>) -> Self {
        self.sources.insert(school_type, location.into());
        self
    }

    pub fn location(&self, school_type: SchoolType) -> Option<&str> {
        self.sources.get(&school_type).map(String::as_str)
    }

    pub fn path(&self, school_type: SchoolType) -> Option<Path> {
        self.location(school_type).map(Path::from)
    }
}
