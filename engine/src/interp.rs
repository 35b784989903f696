use syntax::{Template, TemplateError};

use crate::{Context, Error, Value};

/// Fill `template` with the values found under `keys` in `context`.
///
/// Keys are direct top-level lookups, not dotted paths. Every missing key
/// is reported at once.
pub fn interpolate(template: &str, keys: &[&str], context: &Context) -> Result<String, Error> {
    let mut args = Vec::with_capacity(keys.len());
    let mut missing = Vec::new();
    for key in keys {
        match context.get(key) {
            Some(json) => args.push(Value::from(json)),
            None => missing.push((*key).to_owned()),
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingArgument(missing));
    }

    Template::parse(template)?
        .render(&args)
        .map_err(|e| match e {
            TemplateError::MissingArgument { index, .. } => {
                Error::MissingArgument(vec![format!("placeholder {index}")])
            }
            other => Error::Template(other),
        })
}
