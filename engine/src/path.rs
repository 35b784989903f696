use serde_json::Value as Json;

use crate::Value;

/// Walks dotted paths like `"a.b.0"` through JSON data.
///
/// All-digit segments index into lists (and into text, yielding one character).
/// Other segments are mapping keys. Any step that can't be taken
/// makes the whole walk come back empty; walking never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathWalker {
    numeric_key_fallback: bool,
}

/// Where a walk currently stands.
#[derive(Debug, Clone, Copy)]
enum Cursor<'j> {
    Json(&'j Json),
    Char(char),
}

impl<'j> Cursor<'j> {
    fn into_value(self) -> Value {
        match self {
            Self::Json(json) => Value::from(json),
            Self::Char(c) => Value::Text(c.to_string()),
        }
    }
}

impl PathWalker {
    pub fn new(numeric_key_fallback: bool) -> Self {
        Self {
            numeric_key_fallback,
        }
    }

    /// Follow `path` from `root`. `None` means the path doesn't exist.
    pub fn walk(&self, path: &str, root: &Json) -> Option<Value> {
        let mut cursor = Cursor::Json(root);
        for segment in path.split('.') {
            cursor = self.step(cursor, segment)?;
        }
        Some(cursor.into_value())
    }

    fn step<'j>(&self, cursor: Cursor<'j>, segment: &str) -> Option<Cursor<'j>> {
        if !is_index(segment) {
            return match cursor {
                Cursor::Json(Json::Object(map)) => map.get(segment).map(Cursor::Json),
                _ => None,
            };
        }
        // digits too long for usize can't index anything real:
        let index: Option<usize> = segment.parse().ok();
        match cursor {
            Cursor::Json(Json::Array(items)) => index.and_then(|i| items.get(i)).map(Cursor::Json),
            Cursor::Json(Json::String(text)) => {
                index.and_then(|i| text.chars().nth(i)).map(Cursor::Char)
            }
            Cursor::Char(c) => (index == Some(0)).then_some(Cursor::Char(c)),
            Cursor::Json(Json::Object(map)) if self.numeric_key_fallback => {
                map.get(segment).map(Cursor::Json)
            }
            _ => None,
        }
    }
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod test {
    use super::PathWalker;
    use crate::Value;
    use serde_json::json;

    #[test]
    fn test_walk_keys_and_indices() {
        let data = json!({
            "a": {"b": [10, {"c": "deep"}]},
            "name": "story",
            "": "empty key"
        });
        let walker = PathWalker::default();
        assert_eq!(Some(Value::Int(10)), walker.walk("a.b.0", &data));
        assert_eq!(Some(Value::from("deep")), walker.walk("a.b.1.c", &data));
        assert_eq!(Some(Value::from("t")), walker.walk("name.1", &data));
        assert_eq!(Some(Value::from("t")), walker.walk("name.1.0", &data));
        assert_eq!(Some(Value::from("empty key")), walker.walk("", &data));
        assert_eq!(
            Some(Value::from(&json!([10, {"c": "deep"}]))),
            walker.walk("a.b", &data)
        );
    }

    #[test]
    fn test_walk_misses() {
        let data = json!({"a": {"b": [1, 2]}, "s": "xy", "n": 5});
        let walker = PathWalker::default();
        for path in [
            "missing",
            "a.c",
            "a.b.2",
            "a.b.x",
            "a.b.-1",
            "s.9",
            "s.0.1",
            "n.0",
            "n.x",
            "a..b",
            "a.b.99999999999999999999999999",
        ] {
            assert_eq!(None, walker.walk(path, &data), "path {path:?}");
        }
    }

    #[test]
    fn test_numeric_key_fallback() {
        let data = json!({"a": {"0": "zero"}});
        assert_eq!(None, PathWalker::new(false).walk("a.0", &data));
        assert_eq!(
            Some(Value::from("zero")),
            PathWalker::new(true).walk("a.0", &data)
        );
    }

    #[test]
    fn test_null_is_found_not_absent() {
        let data = json!({"a": null});
        assert_eq!(Some(Value::Null), PathWalker::default().walk("a", &data));
    }
}
