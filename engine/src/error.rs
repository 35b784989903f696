use crate::expression::EvalError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported method: '{0}'")]
    UnsupportedOperation(String),
    #[error("Missing interpolation arguments: {}", .0.join(", "))]
    MissingArgument(Vec<String>),
    #[error("Unable to evaluate expression \"{expr}\": {source}")]
    Evaluation {
        expr: String,
        #[source]
        source: EvalError,
    },
    #[error("Nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),
    #[error("Invalid operands for '{method}': {reason}")]
    InvalidOperand { method: String, reason: String },
    #[error("Invalid regular expression \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Interpolation arguments must be path nodes, found {0}")]
    NotAKey(&'static str),
    #[error(transparent)]
    Template(#[from] syntax::TemplateError),
    #[error("Malformed node: {0}")]
    MalformedNode(String),
    #[error("Context must be a mapping, got {0}")]
    ContextNotMapping(&'static str),
}
