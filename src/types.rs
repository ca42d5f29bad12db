use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One repository record exactly as the listing endpoint returned it.
///
/// Only `name`, `stargazers_count`, `language` and `created_at` are read
/// downstream; everything else is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRepository(pub Value);

impl RawRepository {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|obj| obj.get(key))
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }
}

impl From<Value> for RawRepository {
    fn from(value: Value) -> Self {
        RawRepository(value)
    }
}
