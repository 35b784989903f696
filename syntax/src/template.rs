use std::fmt::{Display, Write};

use crate::ast::Piece;
use crate::parse::line_at;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Malformed template '{line}': {msg}")]
    Malformed { msg: String, line: String },
    #[error("Template mixes automatic ('{{}}') and manual ('{{N}}') field numbering")]
    MixedNumbering,
    #[error("Template refers to argument {index}, but only {supplied} were supplied")]
    MissingArgument { index: usize, supplied: usize },
}

/// A parsed `{}`-style template: literal text with positional placeholders.
/// `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    pieces: Vec<Piece<'a>>,
}

impl<'a> Template<'a> {
    /// Parse `text`, rejecting unmatched braces, named or formatted fields,
    /// and templates that mix `{}` with `{N}`.
    pub fn parse(text: &'a str) -> Result<Self, TemplateError> {
        use combine::EasyParser;
        let pieces = grammar::pieces()
            .easy_parse(text)
            .map(|(pieces, _remainder)| pieces)
            .map_err(|e| {
                let pos = e.position.translate_position(text);
                TemplateError::Malformed {
                    msg: format!("{}", e),
                    line: line_at(text, pos),
                }
            })?;

        let has_next = pieces.iter().any(|p| matches!(p, Piece::Next));
        let has_index = pieces.iter().any(|p| matches!(p, Piece::Index(_)));
        if has_next && has_index {
            return Err(TemplateError::MixedNumbering);
        }
        Ok(Self { pieces })
    }

    /// Number of arguments this template consumes.
    pub fn placeholder_count(&self) -> usize {
        let mut next = 0;
        let mut max_index = None;
        for piece in &self.pieces {
            match piece {
                Piece::Next => next += 1,
                Piece::Index(i) => max_index = Some(max_index.map_or(*i, |m: usize| m.max(*i))),
                Piece::Text(_) => {}
            }
        }
        max_index.map_or(next, |m| m + 1)
    }

    /// Substitute `args` into the placeholders, in order.
    /// Extra args are ignored; missing ones are an error.
    pub fn render<T: Display>(&self, args: &[T]) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut next = 0;
        for piece in &self.pieces {
            let index = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Next => {
                    next += 1;
                    next - 1
                }
                Piece::Index(i) => *i,
            };
            let arg = args.get(index).ok_or(TemplateError::MissingArgument {
                index,
                supplied: args.len(),
            })?;
            // writing to a String can't fail:
            let _ = write!(out, "{arg}");
        }
        Ok(out)
    }
}

mod grammar {
    use crate::ast::Piece;
    use crate::parse::prelude::*;
    use combine::parser::char::digit;

    p! {
        placeholder() -> Piece<'a>, {
            char('{')
                .with(optional(
                    recognize(skip_many1(digit())).and_then(|s: &str| s.parse::<usize>())
                ))
                .skip(char('}'))
                .map(|index| index.map_or(Piece::Next, Piece::Index))
        }
    }

    p! {
        piece() -> Piece<'a>, {
            choice!(
                attempt(string("{{")).map(|_| Piece::Text("{")),
                attempt(string("}}")).map(|_| Piece::Text("}")),
                placeholder(),
                recognize(skip_many1(none_of("{}".chars()))).map(Piece::Text)
            )
        }
    }

    p! {
        pieces() -> Vec<Piece<'a>>, {
            many(piece()).skip(eof())
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Template, TemplateError};
    use crate::ast::Piece;
    use anyhow::Result;
    #[test]
    fn test_parse() -> Result<()> {
        let t = Template::parse("hi {}, {{ok}}")?;
        assert_eq!(
            vec![
                Piece::Text("hi "),
                Piece::Next,
                Piece::Text(", "),
                Piece::Text("{"),
                Piece::Text("ok"),
                Piece::Text("}"),
            ],
            t.pieces
        );
        assert_eq!(1, t.placeholder_count());
        Ok(())
    }
    #[test]
    fn test_render() -> Result<()> {
        assert_eq!("hi bob", Template::parse("hi {}")?.render(&["bob"])?);
        assert_eq!(
            "b a b",
            Template::parse("{1} {0} {1}")?.render(&["a", "b"])?
        );
        assert_eq!("no fields", Template::parse("no fields")?.render(&[1, 2])?);
        assert_eq!("", Template::parse("")?.render::<u8>(&[])?);
        Ok(())
    }
    #[test]
    fn test_placeholder_count() -> Result<()> {
        assert_eq!(0, Template::parse("plain")?.placeholder_count());
        assert_eq!(3, Template::parse("{} {} {}")?.placeholder_count());
        assert_eq!(3, Template::parse("{2} {0}")?.placeholder_count());
        Ok(())
    }
    #[test]
    fn test_missing_argument() -> Result<()> {
        let t = Template::parse("{} and {}")?;
        assert!(matches!(
            t.render(&["one"]),
            Err(TemplateError::MissingArgument {
                index: 1,
                supplied: 1
            })
        ));
        Ok(())
    }
    #[test]
    fn test_malformed() {
        assert!(matches!(
            Template::parse("{name}"),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            Template::parse("open {"),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            Template::parse("close }"),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            Template::parse("{} {0}"),
            Err(TemplateError::MixedNumbering)
        ));
    }
}
