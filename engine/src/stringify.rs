use crate::value::format_float;
use crate::Value;

/// Delimiter wrapped around text operands, so they read back as string literals.
pub const TEXT_DELIMITER: &str = "\"\"\"";

/// Render a value as expression source text, for substitution into
/// an expression template.
///
/// Text becomes a triple-quoted literal with its `"` characters escaped;
/// absent and null both become `null`. Maps and patterns get a form
/// the expression grammar doesn't accept, so using one in an
/// expression is an evaluation error.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Text(text) => quote(text),
        Value::Absent | Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(stringify).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), stringify(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Pattern(p) => format!("re{}", quote(p.as_str())),
    }
}

fn quote(text: &str) -> String {
    format!(
        "{TEXT_DELIMITER}{}{TEXT_DELIMITER}",
        text.replace('"', "\\\"")
    )
}
