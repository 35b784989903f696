//! Resolves declarative value trees against a runtime context.
//!
//! A tree is decoded from JSON (mappings tagged with `$OBJECT` become
//! paths, templates, patterns, predicates and expressions) and then
//! resolved into a plain [`Value`] by a [`Resolver`].

mod config;
pub use config::{ResolverConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPR_NESTING};

mod context;
pub use context::Context;

mod error;
pub use error::Error;

mod expression;
pub use expression::EvalError;

mod interp;

mod method;
pub use method::Method;

mod node;
pub use node::{ObjectNode, ValueNode, OBJECT_KEY};

mod path;
pub use path::PathWalker;

mod resolver;
pub use resolver::Resolver;

mod stringify;
pub use stringify::{stringify, TEXT_DELIMITER};

mod value;
pub use value::{Pattern, Value};

/// Resolve `node` against `context` with the default configuration.
pub fn resolve(node: &ValueNode, context: &Context) -> Result<Value, Error> {
    Resolver::default().resolve(node, context)
}
