use crate::ast::Expr;

#[derive(Debug, thiserror::Error)]
#[error("ParseError on line '{line}': {msg}")]
pub struct Error {
    msg: String,
    pos: usize,
    line: String,
}

impl Error {
    /// Byte offset into the parsed text where parsing failed.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Parse the full text of a restricted expression.
/// Trailing input that isn't part of the expression is an error.
pub fn parse_expr(text: &str) -> Result<Expr, Error> {
    use combine::EasyParser;
    expr::full_expr()
        .easy_parse(text)
        .map(|(expr, _remainder)| expr)
        .map_err(|e| {
            let pos = e.position.translate_position(text);
            // since converting combine's errors is a lifetime nightmare,
            // we just stringify the error before returning it.
            Error {
                pos,
                line: line_at(text, pos),
                msg: format!("{}", e),
            }
        })
}

/// Isolate the line of `text` containing byte offset `pos`.
pub(crate) fn line_at(text: &str, pos: usize) -> String {
    let pos = pos.min(text.len());
    let (before, after) = match (text.get(..pos), text.get(pos..)) {
        (Some(before), Some(after)) => (before, after),
        _ => return text.to_owned(),
    };
    let prefix: String = before.chars().rev().take_while(|&c| c != '\n').collect();
    let prefix: String = prefix.chars().rev().collect();
    let suffix: String = after.chars().take_while(|&c| c != '\n').collect();
    prefix + &suffix
}

/// Deepest bracket nesting (`(` and `[`) in `text`,
/// ignoring anything inside string literals.
///
/// Checked before parsing, since the parser recurses once per bracket.
pub fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match c {
            '(' | '[' => {
                depth += 1;
                deepest = deepest.max(depth);
                rest = &rest[1..];
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                rest = &rest[1..];
            }
            '"' | '\'' => rest = skip_string_literal(rest, c),
            _ => rest = &rest[c.len_utf8()..],
        }
    }
    deepest
}

// returns whatever follows the string literal at the start of `text`.
fn skip_string_literal(text: &str, quote: char) -> &str {
    let triple = if quote == '"' { "\"\"\"" } else { "'''" };
    let delim = if text.starts_with(triple) {
        triple
    } else {
        &triple[..1]
    };
    let mut body = &text[delim.len()..];
    while let Some(c) = body.chars().next() {
        if c == '\\' {
            let escaped = body[1..].chars().next().map_or(0, char::len_utf8);
            body = &body[1 + escaped..];
        } else if body.starts_with(delim) {
            return &body[delim.len()..];
        } else {
            body = &body[c.len_utf8()..];
        }
    }
    body
}

pub mod prelude {
    pub use combine::parser::char::{char, string};
    pub use combine::parser::range::recognize;
    pub use combine::*;
}

pub mod util {

    use super::prelude::*;
    use combine::parser::char::spaces;

    p! {
        ident_char() -> char, {
            satisfy(|c: char| c.is_alphanumeric() || c == '_')
        }
    }

    // a word that can't run on into an identifier, e.g. "in" but not "index".
    p! {
        keyword(word: &'static str) -> &'static str, {
            attempt(string(*word).skip(not_followed_by(ident_char())))
        }
    }

    wrapper! {
        lex(parser), {
            parser.skip(spaces())
        }
    }

    wrapper! {
        parens(parser), {
            lex(char('(')).with(parser).skip(char(')'))
        }
    }

    wrapper! {
        brackets(parser), {
            lex(char('[')).with(parser).skip(char(']'))
        }
    }

}

mod literal {

    use super::prelude::*;
    use super::util::keyword;
    use crate::ast::Literal;
    use combine::parser::char::digit;

    p! {
        escape() -> String, {
            char('\\').with(any()).map(|c: char| match c {
                'n' => "\n".to_owned(),
                't' => "\t".to_owned(),
                'r' => "\r".to_owned(),
                '\\' | '"' | '\'' => c.to_string(),
                // unknown escapes are kept verbatim:
                other => format!("\\{other}"),
            })
        }
    }

    p! {
        triple_quoted(quote: char) -> String, {
            let q = *quote;
            let (delim, pair) = if q == '"' { ("\"\"\"", "\"\"") } else { ("'''", "''") };
            attempt(string(delim))
                .with(many::<String, _, _>(choice!(
                    escape(),
                    attempt(string(pair).skip(look_ahead(none_of([q])))).map(str::to_owned),
                    attempt(char(q).skip(look_ahead(none_of([q])))).map(|c: char| c.to_string()),
                    recognize(skip_many1(none_of([q, '\\']))).map(str::to_owned)
                )))
                .skip(string(delim))
        }
    }

    p! {
        single_quoted(quote: char) -> String, {
            let q = *quote;
            char(q)
                .with(many::<String, _, _>(choice!(
                    escape(),
                    recognize(skip_many1(none_of([q, '\\', '\n']))).map(str::to_owned)
                )))
                .skip(char(q))
        }
    }

    p! {
        string_literal() -> String, {
            choice!(
                attempt(triple_quoted('"')),
                attempt(triple_quoted('\'')),
                single_quoted('"'),
                single_quoted('\'')
            )
        }
    }

    p! {
        exponent() -> (), {
            one_of("eE".chars())
                .with(optional(one_of("+-".chars())))
                .with(skip_many1(digit()))
        }
    }

    p! {
        float() -> f64, {
            recognize(
                skip_many1(digit()).and(choice!(
                    char('.').with(skip_many(digit())).skip(optional(attempt(exponent()))),
                    exponent()
                ))
            ).and_then(|s: &str| s.parse::<f64>())
        }
    }

    p! {
        integer() -> i64, {
            recognize(skip_many1(digit())).and_then(|s: &str| s.parse::<i64>())
        }
    }

    p! {
        number() -> Literal, {
            attempt(float().map(Literal::Float)).or(integer().map(Literal::Int))
        }
    }

    p! {
        constant() -> Literal, {
            choice!(
                keyword("true").or(keyword("True")).map(|_| Literal::Bool(true)),
                keyword("false").or(keyword("False")).map(|_| Literal::Bool(false)),
                keyword("null").or(keyword("None")).map(|_| Literal::Null)
            )
        }
    }

    p! {
        literal() -> Literal, {
            choice!(
                number(),
                string_literal().map(Literal::Str),
                constant()
            )
        }
    }

}

mod ops {

    use super::prelude::*;
    use super::util::{keyword, lex};
    use crate::ast::{ArithOp, CmpOp, LogicOp, UnOp};

    p! {
        sum_op() -> ArithOp, {
            lex(choice!(
                char('+').map(|_| ArithOp::Add),
                char('-').map(|_| ArithOp::Sub)
            ))
        }
    }

    p! {
        term_op() -> ArithOp, {
            lex(choice!(
                attempt(char('*').skip(not_followed_by(char('*')))).map(|_| ArithOp::Mul),
                attempt(string("//")).map(|_| ArithOp::FloorDiv),
                char('/').map(|_| ArithOp::Div),
                char('%').map(|_| ArithOp::Mod)
            ))
        }
    }

    p! {
        power_op() -> (), {
            lex(attempt(string("**"))).map(|_| ())
        }
    }

    p! {
        sign() -> UnOp, {
            lex(choice!(
                char('-').map(|_| UnOp::Neg),
                char('+').map(|_| UnOp::Pos)
            ))
        }
    }

    p! {
        not_op() -> UnOp, {
            lex(choice!(
                keyword("not"),
                attempt(char('!').skip(not_followed_by(char('=')))).map(|_| "!")
            )).map(|_| UnOp::Not)
        }
    }

    p! {
        cmp_op() -> CmpOp, {
            lex(choice!(
                attempt(string("==")).map(|_| CmpOp::Eq),
                attempt(string("!=")).map(|_| CmpOp::Ne),
                attempt(string("<=")).map(|_| CmpOp::Le),
                attempt(string(">=")).map(|_| CmpOp::Ge),
                char('<').map(|_| CmpOp::Lt),
                char('>').map(|_| CmpOp::Gt),
                keyword("in").map(|_| CmpOp::In),
                attempt(lex(keyword("not")).with(keyword("in"))).map(|_| CmpOp::NotIn)
            ))
        }
    }

    p! {
        and_op() -> LogicOp, {
            lex(keyword("and").or(attempt(string("&&")))).map(|_| LogicOp::And)
        }
    }

    p! {
        or_op() -> LogicOp, {
            lex(keyword("or").or(attempt(string("||")))).map(|_| LogicOp::Or)
        }
    }

}

mod expr {

    use super::literal::literal;
    use super::ops::{and_op, cmp_op, not_op, or_op, power_op, sign, sum_op, term_op};
    use super::prelude::*;
    use super::util::{brackets, lex, parens};
    use crate::ast::{ArithOp, CmpOp, Expr, LogicOp, UnOp};
    use combine::parser::char::spaces;

    fn prefixed(ops: Vec<UnOp>, operand: Expr) -> Expr {
        if ops.is_empty() {
            operand
        } else {
            Expr::Unary {
                ops,
                operand: Box::new(operand),
            }
        }
    }

    fn arith(head: Expr, tail: Vec<(ArithOp, Expr)>) -> Expr {
        if tail.is_empty() {
            head
        } else {
            Expr::Arith {
                head: Box::new(head),
                tail,
            }
        }
    }

    fn logic(op: LogicOp, head: Expr, tail: Vec<Expr>) -> Expr {
        if tail.is_empty() {
            return head;
        }
        let mut operands = Vec::with_capacity(tail.len() + 1);
        operands.push(head);
        operands.extend(tail);
        Expr::Logic { op, operands }
    }

    p! {
        list() -> Vec<Expr>, {
            brackets(sep_end_by(expr(), lex(char(','))))
        }
    }

    p! {
        primary() -> Expr, {
            lex(choice!(
                literal().map(Expr::Literal),
                list().map(Expr::List),
                parens(expr())
            ))
        }
    }

    // the right-hand side of `**` may carry its own sign, e.g. `2 ** -1`.
    p! {
        signed() -> Expr, {
            many(sign())
                .and(primary())
                .map(|(ops, operand): (Vec<UnOp>, Expr)| prefixed(ops, operand))
        }
    }

    p! {
        power() -> Expr, {
            primary()
                .and(many(power_op().with(signed())))
                .map(|(head, mut tail): (Expr, Vec<Expr>)| {
                    if tail.is_empty() {
                        head
                    } else {
                        tail.insert(0, head);
                        Expr::Power(tail)
                    }
                })
        }
    }

    p! {
        factor() -> Expr, {
            many(sign())
                .and(power())
                .map(|(ops, operand): (Vec<UnOp>, Expr)| prefixed(ops, operand))
        }
    }

    p! {
        term() -> Expr, {
            factor()
                .and(many(term_op().and(factor())))
                .map(|(head, tail): (Expr, Vec<(ArithOp, Expr)>)| arith(head, tail))
        }
    }

    p! {
        sum() -> Expr, {
            term()
                .and(many(sum_op().and(term())))
                .map(|(head, tail): (Expr, Vec<(ArithOp, Expr)>)| arith(head, tail))
        }
    }

    p! {
        comparison() -> Expr, {
            sum()
                .and(many(cmp_op().and(sum())))
                .map(|(head, tail): (Expr, Vec<(CmpOp, Expr)>)| {
                    if tail.is_empty() {
                        head
                    } else {
                        Expr::Compare { head: Box::new(head), tail }
                    }
                })
        }
    }

    p! {
        negation() -> Expr, {
            many(not_op())
                .and(comparison())
                .map(|(ops, operand): (Vec<UnOp>, Expr)| prefixed(ops, operand))
        }
    }

    p! {
        conjunction() -> Expr, {
            negation()
                .and(many(and_op().with(negation())))
                .map(|(head, tail): (Expr, Vec<Expr>)| logic(LogicOp::And, head, tail))
        }
    }

    p! {
        expr() -> Expr, {
            conjunction()
                .and(many(or_op().with(conjunction())))
                .map(|(head, tail): (Expr, Vec<Expr>)| logic(LogicOp::Or, head, tail))
        }
    }

    p! {
        full_expr() -> Expr, {
            spaces().with(expr()).skip(eof())
        }
    }

    #[cfg(test)]
    mod test {
        use crate::ast::{ArithOp, CmpOp, Expr, Literal, LogicOp, UnOp};
        use anyhow::Result;
        use combine::EasyParser;
        #[test]
        fn test_arith_chain_is_flat() -> Result<()> {
            assert_eq!(
                Expr::arith(
                    Expr::int(1),
                    vec![
                        (ArithOp::Add, Expr::int(2)),
                        (ArithOp::Sub, Expr::int(3)),
                        (ArithOp::Add, Expr::int(4)),
                    ]
                ),
                super::full_expr().easy_parse("1 + 2 - 3 + 4").unwrap().0
            );
            Ok(())
        }
        #[test]
        fn test_precedence() -> Result<()> {
            assert_eq!(
                Expr::arith(
                    Expr::int(1),
                    vec![(
                        ArithOp::Add,
                        Expr::arith(Expr::int(2), vec![(ArithOp::Mul, Expr::int(3))])
                    )]
                ),
                super::full_expr().easy_parse("1 + 2 * 3").unwrap().0
            );
            Ok(())
        }
        #[test]
        fn test_unary_and_power() -> Result<()> {
            // -2 ** 2 is -(2 ** 2)
            assert_eq!(
                Expr::unary(
                    vec![UnOp::Neg],
                    Expr::Power(vec![Expr::int(2), Expr::int(2)])
                ),
                super::full_expr().easy_parse("-2 ** 2").unwrap().0
            );
            assert_eq!(
                Expr::Power(vec![Expr::int(2), Expr::unary(vec![UnOp::Neg], Expr::int(1))]),
                super::full_expr().easy_parse("2**-1").unwrap().0
            );
            Ok(())
        }
        #[test]
        fn test_comparison_chain() -> Result<()> {
            assert_eq!(
                Expr::compare(
                    Expr::int(1),
                    vec![(CmpOp::Lt, Expr::int(2)), (CmpOp::Le, Expr::int(3))]
                ),
                super::full_expr().easy_parse("1 < 2 <= 3").unwrap().0
            );
            assert_eq!(
                Expr::compare(
                    Expr::str("a"),
                    vec![(CmpOp::NotIn, Expr::List(vec![Expr::str("b")]))]
                ),
                super::full_expr().easy_parse("'a' not in ['b']").unwrap().0
            );
            Ok(())
        }
        #[test]
        fn test_logic() -> Result<()> {
            assert_eq!(
                Expr::Logic {
                    op: LogicOp::Or,
                    operands: vec![
                        Expr::Logic {
                            op: LogicOp::And,
                            operands: vec![Expr::bool(true), Expr::bool(false)],
                        },
                        Expr::unary(vec![UnOp::Not], Expr::bool(false)),
                    ],
                },
                super::full_expr()
                    .easy_parse("true and false or not false")
                    .unwrap()
                    .0
            );
            assert_eq!(
                super::full_expr().easy_parse("true && false || !false").unwrap().0,
                super::full_expr()
                    .easy_parse("true and false or not false")
                    .unwrap()
                    .0
            );
            Ok(())
        }
        #[test]
        fn test_lists_and_parens() -> Result<()> {
            assert_eq!(
                Expr::List(vec![Expr::int(1), Expr::float(2.5), Expr::str("x")]),
                super::full_expr().easy_parse("[ 1, 2.5, 'x', ]").unwrap().0
            );
            assert_eq!(
                Expr::List(vec![]),
                super::full_expr().easy_parse("[]").unwrap().0
            );
            assert_eq!(
                Expr::arith(
                    Expr::arith(Expr::int(1), vec![(ArithOp::Add, Expr::int(2))]),
                    vec![(ArithOp::Mul, Expr::int(3))]
                ),
                super::full_expr().easy_parse(" ( 1 + 2 ) * 3 ").unwrap().0
            );
            Ok(())
        }
        #[test]
        fn test_rejects_names() -> Result<()> {
            assert!(super::full_expr().easy_parse("__import__('os')").is_err());
            assert!(super::full_expr().easy_parse("x + 1").is_err());
            assert!(super::full_expr().easy_parse("1 +").is_err());
            assert!(super::full_expr().easy_parse("1 2").is_err());
            Ok(())
        }
        #[test]
        fn test_literal_passthrough() -> Result<()> {
            assert_eq!(
                Expr::Literal(Literal::Null),
                super::full_expr().easy_parse("None").unwrap().0
            );
            Ok(())
        }
    }
}
