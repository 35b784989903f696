use serde_json::{Map, Value as Json};

use crate::Error;

/// Read-only runtime data that paths and interpolation keys are looked up in.
/// Always a mapping at the top level.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    root: Json,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            root: Json::Object(Map::new()),
        }
    }
}

impl Context {
    pub fn new(map: Map<String, Json>) -> Self {
        Self {
            root: Json::Object(map),
        }
    }

    /// The whole context, as the starting point for path walks.
    pub fn root(&self) -> &Json {
        &self.root
    }

    /// Direct top-level lookup; no path splitting.
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.root.get(key)
    }
}

impl From<Map<String, Json>> for Context {
    fn from(map: Map<String, Json>) -> Self {
        Self::new(map)
    }
}

impl TryFrom<Json> for Context {
    type Error = Error;
    fn try_from(json: Json) -> Result<Self, Self::Error> {
        match json {
            Json::Object(map) => Ok(Self::new(map)),
            other => Err(Error::ContextNotMapping(crate::Value::from(&other).type_name())),
        }
    }
}
