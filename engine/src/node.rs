use serde_json::{Map, Value as Json};

use crate::{Error, Value};

/// Key that marks a JSON mapping as a tagged node.
pub const OBJECT_KEY: &str = "$OBJECT";

/// A node in an unresolved value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// A plain scalar, passed through unchanged.
    Literal(Value),
    /// A sequence of nodes; resolves to their text forms joined with spaces.
    List(Vec<ValueNode>),
    /// Anything mapping-shaped: a tagged node or a plain mapping.
    Object(ObjectNode),
}

/// The mapping-shaped nodes, dispatched on their `$OBJECT` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectNode {
    /// Untagged mapping; every value is resolved, keys are kept.
    Mapping(Vec<(String, ValueNode)>),
    /// `{"$OBJECT": "string", "string": .., "values": [..]?}`
    String {
        template: String,
        values: Option<Vec<ValueNode>>,
    },
    /// `{"$OBJECT": "path", "paths": [..]}`. Only the first path is used.
    Path { paths: Vec<String> },
    /// `{"$OBJECT": "regexp", "regexp": ..}`
    Regexp { pattern: String },
    /// `{"$OBJECT": "value", "value": ..}`; the value is used verbatim.
    Value(Value),
    /// `{"$OBJECT": "method", "method": .., "left": .., "right": ..}`
    Method {
        method: String,
        left: Box<ValueNode>,
        right: Box<ValueNode>,
    },
    /// `{"$OBJECT": "expression", "expression": .., "values": [..]}`
    Expression {
        template: String,
        values: Vec<ValueNode>,
    },
}

impl ValueNode {
    /// Decode a JSON tree, rejecting trees nested deeper than `max_depth`.
    pub fn from_json(json: &Json, max_depth: usize) -> Result<Self, Error> {
        Decoder { max_depth }.decode(json, 1)
    }

    /// Name of this node's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "a literal",
            Self::List(_) => "a list",
            Self::Object(obj) => match obj {
                ObjectNode::Mapping(_) => "a mapping",
                ObjectNode::String { .. } => "a string node",
                ObjectNode::Path { .. } => "a path node",
                ObjectNode::Regexp { .. } => "a regexp node",
                ObjectNode::Value(_) => "a value node",
                ObjectNode::Method { .. } => "a method node",
                ObjectNode::Expression { .. } => "an expression node",
            },
        }
    }

    /// The raw lookup key named by a path node, used by string interpolation.
    /// The path is not walked; this is a direct top-level key.
    pub fn bare_key(&self) -> Result<&str, Error> {
        match self {
            Self::Object(ObjectNode::Path { paths }) => paths
                .first()
                .map(String::as_str)
                .ok_or_else(|| Error::MalformedNode("path node with no paths".to_owned())),
            other => Err(Error::NotAKey(other.kind())),
        }
    }

    // Builders, mostly for writing trees by hand in tests.

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn list(items: Vec<ValueNode>) -> Self {
        Self::List(items)
    }

    pub fn mapping(fields: Vec<(&str, ValueNode)>) -> Self {
        Self::Object(ObjectNode::Mapping(
            fields.into_iter().map(|(k, v)| (k.to_owned(), v)).collect(),
        ))
    }

    pub fn path(path: &str) -> Self {
        Self::Object(ObjectNode::Path {
            paths: vec![path.to_owned()],
        })
    }

    pub fn string(template: &str) -> Self {
        Self::Object(ObjectNode::String {
            template: template.to_owned(),
            values: None,
        })
    }

    pub fn interpolated(template: &str, values: Vec<ValueNode>) -> Self {
        Self::Object(ObjectNode::String {
            template: template.to_owned(),
            values: Some(values),
        })
    }

    pub fn regexp(pattern: &str) -> Self {
        Self::Object(ObjectNode::Regexp {
            pattern: pattern.to_owned(),
        })
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Object(ObjectNode::Value(value.into()))
    }

    pub fn method(method: &str, left: ValueNode, right: ValueNode) -> Self {
        Self::Object(ObjectNode::Method {
            method: method.to_owned(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn expression(template: &str, values: Vec<ValueNode>) -> Self {
        Self::Object(ObjectNode::Expression {
            template: template.to_owned(),
            values,
        })
    }
}

struct Decoder {
    max_depth: usize,
}

impl Decoder {
    fn decode(&self, json: &Json, depth: usize) -> Result<ValueNode, Error> {
        if depth > self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        match json {
            Json::Array(items) => Ok(ValueNode::List(self.decode_all(items, depth)?)),
            Json::Object(obj) => match obj.get(OBJECT_KEY) {
                None => {
                    let mut fields = Vec::with_capacity(obj.len());
                    for (k, v) in obj {
                        fields.push((k.clone(), self.decode(v, depth + 1)?));
                    }
                    Ok(ValueNode::Object(ObjectNode::Mapping(fields)))
                }
                Some(Json::String(tag)) => self.decode_tagged(tag, obj, depth).map(ValueNode::Object),
                Some(other) => Err(Error::MalformedNode(format!(
                    "'{OBJECT_KEY}' must be text, got {other}"
                ))),
            },
            scalar => Ok(ValueNode::Literal(Value::from(scalar))),
        }
    }

    fn decode_all(&self, items: &[Json], depth: usize) -> Result<Vec<ValueNode>, Error> {
        items.iter().map(|item| self.decode(item, depth + 1)).collect()
    }

    fn decode_tagged(
        &self,
        tag: &str,
        obj: &Map<String, Json>,
        depth: usize,
    ) -> Result<ObjectNode, Error> {
        let node = match tag {
            "string" => ObjectNode::String {
                template: text_field(obj, tag, "string")?.to_owned(),
                values: match obj.get("values") {
                    None | Some(Json::Null) => None,
                    Some(Json::Array(items)) => Some(self.decode_all(items, depth)?),
                    Some(_) => return Err(wrong_type(tag, "values", "a list")),
                },
            },
            "path" => {
                let paths = array_field(obj, tag, "paths")?
                    .iter()
                    .map(|p| p.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| wrong_type(tag, "paths", "a list of text"))?;
                if paths.is_empty() {
                    return Err(Error::MalformedNode(
                        "'path' node needs at least one path".to_owned(),
                    ));
                }
                ObjectNode::Path { paths }
            }
            "regexp" => ObjectNode::Regexp {
                pattern: text_field(obj, tag, "regexp")?.to_owned(),
            },
            "value" => ObjectNode::Value(Value::from(field(obj, tag, "value")?)),
            "method" => ObjectNode::Method {
                method: text_field(obj, tag, "method")?.to_owned(),
                left: Box::new(self.decode(field(obj, tag, "left")?, depth + 1)?),
                right: Box::new(self.decode(field(obj, tag, "right")?, depth + 1)?),
            },
            "expression" => ObjectNode::Expression {
                template: text_field(obj, tag, "expression")?.to_owned(),
                values: self.decode_all(array_field(obj, tag, "values")?, depth)?,
            },
            unknown => {
                return Err(Error::MalformedNode(format!(
                    "unknown '{OBJECT_KEY}' kind '{unknown}'"
                )))
            }
        };
        Ok(node)
    }
}

fn field<'j>(obj: &'j Map<String, Json>, tag: &str, name: &str) -> Result<&'j Json, Error> {
    obj.get(name)
        .ok_or_else(|| Error::MalformedNode(format!("'{tag}' node is missing '{name}'")))
}

fn text_field<'j>(obj: &'j Map<String, Json>, tag: &str, name: &str) -> Result<&'j str, Error> {
    field(obj, tag, name)?
        .as_str()
        .ok_or_else(|| wrong_type(tag, name, "text"))
}

fn array_field<'j>(
    obj: &'j Map<String, Json>,
    tag: &str,
    name: &str,
) -> Result<&'j [Json], Error> {
    field(obj, tag, name)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| wrong_type(tag, name, "a list"))
}

fn wrong_type(tag: &str, name: &str, expected: &str) -> Error {
    Error::MalformedNode(format!("'{name}' of '{tag}' node must be {expected}"))
}

#[cfg(test)]
mod test {
    use super::{ObjectNode, ValueNode};
    use crate::{Error, Value};
    use anyhow::Result;
    use serde_json::json;

    fn decode(json: serde_json::Value) -> Result<ValueNode, Error> {
        ValueNode::from_json(&json, 64)
    }

    #[test]
    fn test_decode_scalars_and_lists() -> Result<()> {
        assert_eq!(ValueNode::literal(3), decode(json!(3))?);
        assert_eq!(ValueNode::Literal(Value::Null), decode(json!(null))?);
        assert_eq!(
            ValueNode::list(vec![ValueNode::literal("a"), ValueNode::literal(true)]),
            decode(json!(["a", true]))?
        );
        Ok(())
    }

    #[test]
    fn test_decode_tagged() -> Result<()> {
        let node = decode(json!({
            "$OBJECT": "method",
            "method": "like",
            "left": {"$OBJECT": "path", "paths": ["name"]},
            "right": {"$OBJECT": "regexp", "regexp": "^a"}
        }))?;
        assert_eq!(
            ValueNode::method("like", ValueNode::path("name"), ValueNode::regexp("^a")),
            node
        );

        let node = decode(json!({
            "$OBJECT": "string",
            "string": "hi {}",
            "values": [{"$OBJECT": "path", "paths": ["who", "ignored"]}]
        }))?;
        let ValueNode::Object(ObjectNode::String { template, values }) = &node else {
            panic!("expected string node, got {node:?}");
        };
        assert_eq!("hi {}", template.as_str());
        assert_eq!(Some(1), values.as_ref().map(Vec::len));

        assert_eq!(
            ValueNode::string("plain"),
            decode(json!({"$OBJECT": "string", "string": "plain"}))?
        );
        assert_eq!(
            ValueNode::value(Value::from(&json!({"$OBJECT": "path"}))),
            decode(json!({"$OBJECT": "value", "value": {"$OBJECT": "path"}}))?
        );
        Ok(())
    }

    #[test]
    fn test_mapping_keeps_key_order() -> Result<()> {
        let node = decode(json!({"z": 1, "a": 2, "m": 3}))?;
        let ValueNode::Object(ObjectNode::Mapping(fields)) = &node else {
            panic!("expected mapping, got {node:?}");
        };
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(vec!["z", "a", "m"], keys);
        Ok(())
    }

    #[test]
    fn test_malformed() {
        let cases = [
            json!({"$OBJECT": "nonsense"}),
            json!({"$OBJECT": 7}),
            json!({"$OBJECT": "path", "paths": []}),
            json!({"$OBJECT": "path", "paths": "a.b"}),
            json!({"$OBJECT": "string"}),
            json!({"$OBJECT": "method", "method": "is", "left": 1}),
            json!({"$OBJECT": "expression", "expression": "1 + {}"}),
        ];
        for case in cases {
            assert!(
                matches!(decode(case.clone()), Err(Error::MalformedNode(_))),
                "expected malformed: {case}"
            );
        }
    }

    #[test]
    fn test_depth_limit() -> Result<()> {
        let deep = json!([[[["x"]]]]);
        assert!(ValueNode::from_json(&deep, 5).is_ok());
        assert!(matches!(
            ValueNode::from_json(&deep, 4),
            Err(Error::DepthExceeded(4))
        ));
        Ok(())
    }

    #[test]
    fn test_bare_key() -> Result<()> {
        assert_eq!("a.b", ValueNode::path("a.b").bare_key()?);
        assert!(matches!(
            ValueNode::literal(1).bare_key(),
            Err(Error::NotAKey("a literal"))
        ));
        Ok(())
    }
}
