use serde_json::Value as Json;

use crate::expression;
use crate::interp::interpolate;
use crate::method;
use crate::{Context, Error, ObjectNode, Pattern, PathWalker, ResolverConfig, Value, ValueNode};

/// Turns value trees into plain values, given a context.
///
/// Resolution is a pure function of the tree and the context;
/// a `Resolver` holds nothing but its configuration.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Decode a serialized tree, applying this resolver's depth limit.
    pub fn decode(&self, json: &Json) -> Result<ValueNode, Error> {
        ValueNode::from_json(json, self.config.max_depth)
    }

    /// Resolve any node: lists are joined, mapping-shaped nodes
    /// go through [`Resolver::resolve_object`], scalars pass through.
    pub fn resolve(&self, node: &ValueNode, context: &Context) -> Result<Value, Error> {
        self.resolve_at(node, context, 1)
    }

    /// Resolve a mapping-shaped node.
    pub fn resolve_object(&self, node: &ObjectNode, context: &Context) -> Result<Value, Error> {
        self.resolve_object_at(node, context, 1)
    }

    /// Resolve each item of a list node and join their text forms with spaces.
    pub fn resolve_list(&self, items: &[ValueNode], context: &Context) -> Result<Value, Error> {
        self.resolve_list_at(items, context, 1)
    }

    /// Look up a dotted path in the context. A path that leads nowhere
    /// resolves to [`Value::Absent`].
    pub fn resolve_path(&self, path: &str, context: &Context) -> Value {
        let walker = PathWalker::new(self.config.numeric_key_fallback);
        walker.walk(path, context.root()).unwrap_or_else(|| {
            log::debug!("path '{path}' not found; resolving to absent");
            Value::Absent
        })
    }

    /// Resolve `values`, substitute their expression-source forms into
    /// `template`, and evaluate the result.
    pub fn evaluate(
        &self,
        template: &str,
        values: &[ValueNode],
        context: &Context,
    ) -> Result<Value, Error> {
        self.evaluate_at(template, values, context, 1)
    }

    fn resolve_at(&self, node: &ValueNode, context: &Context, depth: usize) -> Result<Value, Error> {
        if depth > self.config.max_depth {
            return Err(Error::DepthExceeded(self.config.max_depth));
        }
        log::trace!("resolving {} at depth {depth}", node.kind());
        match node {
            ValueNode::Literal(v) => Ok(v.clone()),
            ValueNode::List(items) => self.resolve_list_at(items, context, depth),
            ValueNode::Object(obj) => self.resolve_object_at(obj, context, depth),
        }
    }

    fn resolve_object_at(
        &self,
        node: &ObjectNode,
        context: &Context,
        depth: usize,
    ) -> Result<Value, Error> {
        match node {
            ObjectNode::Mapping(fields) => {
                let mut resolved = Vec::with_capacity(fields.len());
                for (key, value) in fields {
                    resolved.push((key.clone(), self.resolve_at(value, context, depth + 1)?));
                }
                Ok(Value::Map(resolved))
            }
            ObjectNode::String { template, values } => match values.as_deref() {
                // nothing to fill in, so braces are left alone:
                None | Some([]) => Ok(Value::Text(template.clone())),
                Some(values) => {
                    let keys = values
                        .iter()
                        .map(ValueNode::bare_key)
                        .collect::<Result<Vec<_>, _>>()?;
                    interpolate(template, &keys, context).map(Value::Text)
                }
            },
            ObjectNode::Path { paths } => match paths.first() {
                Some(path) => Ok(self.resolve_path(path, context)),
                None => Err(Error::MalformedNode("path node with no paths".to_owned())),
            },
            ObjectNode::Regexp { pattern } => Pattern::new(pattern)
                .map(Value::Pattern)
                .map_err(|source| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }),
            ObjectNode::Value(v) => Ok(v.clone()),
            ObjectNode::Method {
                method,
                left,
                right,
            } => {
                let left = self.resolve_at(left, context, depth + 1)?;
                let right = self.resolve_at(right, context, depth + 1)?;
                method::apply(method, &left, &right).map(Value::Bool)
            }
            ObjectNode::Expression { template, values } => self.evaluate_at(template, values, context, depth),
        }
    }

    fn resolve_list_at(
        &self,
        items: &[ValueNode],
        context: &Context,
        depth: usize,
    ) -> Result<Value, Error> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            parts.push(self.resolve_at(item, context, depth + 1)?.to_string());
        }
        Ok(Value::Text(parts.join(" ")))
    }

    fn evaluate_at(
        &self,
        template: &str,
        values: &[ValueNode],
        context: &Context,
        depth: usize,
    ) -> Result<Value, Error> {
        let mut operands = Vec::with_capacity(values.len());
        for value in values {
            let resolved = self.resolve_at(value, context, depth + 1)?;
            operands.push(crate::stringify(&resolved));
        }
        expression::evaluate(template, &operands, self.config.max_expr_nesting)
    }
}
