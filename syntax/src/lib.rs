#[macro_use]
mod macros;
mod parse;
pub use parse::{nesting_depth, parse_expr, Error};
pub mod ast;
mod template;
pub use template::{Template, TemplateError};
