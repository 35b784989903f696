use std::str::FromStr;

use crate::{Error, Value};

/// The binary predicates a `method` node can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `left` is text that `right` (a pattern) matches at the start of.
    Like,
    NotLike,
    /// `left` is contained in `right`.
    In,
    /// `right` is contained in `left`. Also spelled `contains`.
    Has,
    /// `left` is not contained in `right`.
    Excludes,
    Is,
    Isnt,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::NotLike => "notlike",
            Self::In => "in",
            Self::Has => "has",
            Self::Excludes => "excludes",
            Self::Is => "is",
            Self::Isnt => "isnt",
        }
    }

    pub fn apply(self, left: &Value, right: &Value) -> Result<bool, Error> {
        match self {
            Self::Like => self.matches(left, right),
            Self::NotLike => self.matches(left, right).map(|m| !m),
            Self::In => self.contains(right, left),
            Self::Has => self.contains(left, right),
            Self::Excludes => self.contains(right, left).map(|c| !c),
            Self::Is => Ok(left == right),
            Self::Isnt => Ok(left != right),
        }
    }

    fn matches(self, text: &Value, pattern: &Value) -> Result<bool, Error> {
        match (text, pattern) {
            (Value::Text(text), Value::Pattern(pattern)) => Ok(pattern.matches_start(text)),
            _ => Err(self.invalid(format!(
                "expected text and a pattern, got {} and {}",
                text.type_name(),
                pattern.type_name()
            ))),
        }
    }

    fn contains(self, container: &Value, item: &Value) -> Result<bool, Error> {
        container.contains(item).ok_or_else(|| {
            self.invalid(format!(
                "can't look for {} in {}",
                item.type_name(),
                container.type_name()
            ))
        })
    }

    fn invalid(self, reason: String) -> Error {
        Error::InvalidOperand {
            method: self.name().to_owned(),
            reason,
        }
    }
}

impl FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "like" => Self::Like,
            "notlike" => Self::NotLike,
            "in" => Self::In,
            "has" | "contains" => Self::Has,
            "excludes" => Self::Excludes,
            "is" => Self::Is,
            "isnt" => Self::Isnt,
            other => return Err(Error::UnsupportedOperation(other.to_owned())),
        })
    }
}

/// Apply the method named `method` to two resolved operands.
pub fn apply(method: &str, left: &Value, right: &Value) -> Result<bool, Error> {
    method.parse::<Method>()?.apply(left, right)
}

#[cfg(test)]
mod test {
    use super::apply;
    use crate::{Error, Pattern, Value};
    use anyhow::Result;
    use serde_json::json;

    fn pattern(p: &str) -> Result<Value> {
        Ok(Value::Pattern(Pattern::new(p)?))
    }

    #[test]
    fn test_like() -> Result<()> {
        assert!(apply("like", &Value::from("abc"), &pattern("a.c")?)?);
        assert!(apply("like", &Value::from("abcdef"), &pattern("abc")?)?);
        assert!(!apply("like", &Value::from("xabc"), &pattern("abc")?)?);
        assert!(apply("notlike", &Value::from("xabc"), &pattern("abc")?)?);
        assert!(matches!(
            apply("like", &Value::Int(1), &pattern("1")?),
            Err(Error::InvalidOperand { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_containment() -> Result<()> {
        let list = Value::from(&json!(["x", "y"]));
        let x = Value::from("x");
        assert!(apply("in", &x, &list)?);
        assert!(apply("has", &list, &x)?);
        assert!(apply("contains", &list, &x)?);
        assert!(!apply("excludes", &x, &list)?);
        assert!(apply("excludes", &Value::from("z"), &list)?);
        assert!(apply("in", &Value::from("ell"), &Value::from("hello"))?);
        assert!(apply("has", &Value::from(&json!({"k": 1})), &Value::from("k"))?);
        assert!(matches!(
            apply("in", &x, &Value::Int(3)),
            Err(Error::InvalidOperand { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_equality() -> Result<()> {
        assert!(apply("is", &Value::Int(2), &Value::Float(2.0))?);
        assert!(apply("is", &Value::Absent, &Value::Null)?);
        assert!(apply("isnt", &Value::from("a"), &Value::from("b"))?);
        assert!(!apply("isnt", &Value::Bool(true), &Value::Bool(true))?);
        Ok(())
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            apply("resembles", &Value::Null, &Value::Null),
            Err(Error::UnsupportedOperation(m)) if m == "resembles"
        ));
    }
}
