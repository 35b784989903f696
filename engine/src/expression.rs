use std::cmp::Ordering;

use syntax::ast::{ArithOp, CmpOp, Expr, Literal, LogicOp, UnOp};
use syntax::{Template, TemplateError};

use crate::value::cmp_int_float;
use crate::{Error, Value};

/// Longest text or list that `*` repetition may build.
const MAX_REPEAT_LEN: usize = 1 << 20;

/// Reasons an expression can't be evaluated.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("expected {expected} operands, got {supplied}")]
    OperandCount { expected: usize, supplied: usize },
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Parse(#[from] syntax::Error),
    #[error("unsupported operand types for {op}: {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("bad operand type for unary {op}: {operand}")]
    BadUnary {
        op: &'static str,
        operand: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {0}")]
    Overflow(&'static str),
    #[error("result of {0} is too large")]
    TooLarge(&'static str),
}

/// Fill `template` with already-stringified operands, then parse and evaluate
/// the result as a restricted expression.
///
/// Bracket nesting deeper than `max_nesting` is refused before parsing.
pub fn evaluate(template: &str, operands: &[String], max_nesting: usize) -> Result<Value, Error> {
    let text = substitute(template, operands).map_err(|source| Error::Evaluation {
        expr: template.to_owned(),
        source,
    })?;
    if syntax::nesting_depth(&text) > max_nesting {
        return Err(Error::DepthExceeded(max_nesting));
    }
    log::trace!("evaluating expression: {text}");
    let result = match syntax::parse_expr(&text) {
        Ok(expr) => eval(&expr),
        Err(e) => Err(EvalError::from(e)),
    };
    result.map_err(|source| Error::Evaluation { expr: text, source })
}

fn substitute(template: &str, operands: &[String]) -> Result<String, EvalError> {
    let template = Template::parse(template)?;
    let expected = template.placeholder_count();
    if expected != operands.len() {
        return Err(EvalError::OperandCount {
            expected,
            supplied: operands.len(),
        });
    }
    Ok(template.render(operands)?)
}

fn eval(expr: &Expr) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(lit) => Ok(literal(lit)),
        Expr::List(items) => items.iter().map(eval).collect::<Result<_, _>>().map(Value::List),
        Expr::Unary { ops, operand } => {
            let mut value = eval(operand)?;
            for op in ops.iter().rev() {
                value = unary(*op, value)?;
            }
            Ok(value)
        }
        Expr::Power(operands) => {
            let mut operands = operands.iter().rev();
            let mut value = match operands.next() {
                Some(last) => eval(last)?,
                None => return Ok(Value::Null),
            };
            for base in operands {
                value = power(eval(base)?, value)?;
            }
            Ok(value)
        }
        Expr::Arith { head, tail } => {
            let mut value = eval(head)?;
            for (op, operand) in tail {
                value = arith(*op, value, eval(operand)?)?;
            }
            Ok(value)
        }
        Expr::Compare { head, tail } => {
            let mut left = eval(head)?;
            for (op, operand) in tail {
                let right = eval(operand)?;
                if !compare(*op, &left, &right)? {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
        Expr::Logic { op, operands } => {
            let mut value = Value::Null;
            for operand in operands {
                value = eval(operand)?;
                let decided = match op {
                    LogicOp::And => !value.is_truthy(),
                    LogicOp::Or => value.is_truthy(),
                };
                if decided {
                    break;
                }
            }
            Ok(value)
        }
    }
}

fn literal(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Str(s) => Value::Text(s.clone()),
    }
}

fn unary(op: UnOp, value: Value) -> Result<Value, EvalError> {
    let bad = |op, value: &Value| EvalError::BadUnary {
        op,
        operand: value.type_name(),
    };
    match (op, value) {
        (UnOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnOp::Neg, Value::Int(i)) => i.checked_neg().map(Value::Int).ok_or(EvalError::Overflow("-")),
        (UnOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnOp::Pos, value @ (Value::Int(_) | Value::Float(_))) => Ok(value),
        (UnOp::Neg, value) => Err(bad("-", &value)),
        (UnOp::Pos, value) => Err(bad("+", &value)),
    }
}

fn op_name(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "+",
        ArithOp::Sub => "-",
        ArithOp::Mul => "*",
        ArithOp::Div => "/",
        ArithOp::FloorDiv => "//",
        ArithOp::Mod => "%",
    }
}

fn mismatch(op: &'static str, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn arith(op: ArithOp, left: Value, right: Value) -> Result<Value, EvalError> {
    let name = op_name(op);
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => int_arith(op, l, r),
        (l @ (Value::Int(_) | Value::Float(_)), r @ (Value::Int(_) | Value::Float(_))) => {
            float_arith(op, as_float(&l), as_float(&r))
        }
        (Value::Text(l), Value::Text(r)) if op == ArithOp::Add => Ok(Value::Text(l + &r)),
        (Value::List(mut l), Value::List(r)) if op == ArithOp::Add => {
            l.extend(r);
            Ok(Value::List(l))
        }
        (Value::Text(s), Value::Int(n)) | (Value::Int(n), Value::Text(s)) if op == ArithOp::Mul => {
            let count = repeat_count(n, s.len())?;
            Ok(Value::Text(s.repeat(count)))
        }
        (Value::List(items), Value::Int(n)) | (Value::Int(n), Value::List(items))
            if op == ArithOp::Mul =>
        {
            let count = repeat_count(n, items.len())?;
            let mut out = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                out.extend(items.iter().cloned());
            }
            Ok(Value::List(out))
        }
        (l, r) => Err(mismatch(name, &l, &r)),
    }
}

fn repeat_count(n: i64, unit_len: usize) -> Result<usize, EvalError> {
    let count = usize::try_from(n).unwrap_or(0);
    if unit_len == 0 {
        return Ok(0);
    }
    match unit_len.checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(count),
        _ => Err(EvalError::TooLarge("*")),
    }
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => f64::NAN,
    }
}

fn int_arith(op: ArithOp, l: i64, r: i64) -> Result<Value, EvalError> {
    let overflow = EvalError::Overflow(op_name(op));
    let result = match op {
        ArithOp::Add => l.checked_add(r),
        ArithOp::Sub => l.checked_sub(r),
        ArithOp::Mul => l.checked_mul(r),
        ArithOp::Div => return float_arith(op, l as f64, r as f64),
        ArithOp::FloorDiv | ArithOp::Mod if r == 0 => return Err(EvalError::DivisionByZero),
        // quotient rounds toward negative infinity:
        ArithOp::FloorDiv => l.checked_div(r).map(|q| {
            if l % r != 0 && ((l < 0) != (r < 0)) {
                q - 1
            } else {
                q
            }
        }),
        // remainder takes the sign of the divisor:
        ArithOp::Mod => l.checked_rem(r).map(|m| {
            if m != 0 && ((m < 0) != (r < 0)) {
                m + r
            } else {
                m
            }
        }),
    };
    result.map(Value::Int).ok_or(overflow)
}

fn float_arith(op: ArithOp, l: f64, r: f64) -> Result<Value, EvalError> {
    let divides = matches!(op, ArithOp::Div | ArithOp::FloorDiv | ArithOp::Mod);
    if divides && r == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let result = match op {
        ArithOp::Add => l + r,
        ArithOp::Sub => l - r,
        ArithOp::Mul => l * r,
        ArithOp::Div => l / r,
        ArithOp::FloorDiv => (l / r).floor(),
        ArithOp::Mod => l - r * (l / r).floor(),
    };
    Ok(Value::Float(result))
}

fn power(base: Value, exp: Value) -> Result<Value, EvalError> {
    match (&base, &exp) {
        // these bases never overflow, whatever the exponent:
        (Value::Int(0), Value::Int(e)) if *e >= 0 => Ok(Value::Int(if *e == 0 { 1 } else { 0 })),
        (Value::Int(1), Value::Int(e)) if *e >= 0 => Ok(Value::Int(1)),
        (Value::Int(-1), Value::Int(e)) if *e >= 0 => Ok(Value::Int(if e % 2 == 0 { 1 } else { -1 })),
        (Value::Int(b), Value::Int(e)) if *e >= 0 => {
            let e = u32::try_from(*e).map_err(|_| EvalError::Overflow("**"))?;
            b.checked_pow(e).map(Value::Int).ok_or(EvalError::Overflow("**"))
        }
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (b, e) = (as_float(&base), as_float(&exp));
            if b == 0.0 && e < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(b.powf(e)))
        }
        _ => Err(mismatch("**", &base, &exp)),
    }
}

fn compare(op: CmpOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    let ordered = |name| ordering(name, left, right);
    Ok(match op {
        CmpOp::Eq => left == right,
        CmpOp::Ne => left != right,
        CmpOp::Lt => ordered("<")? == Ordering::Less,
        CmpOp::Le => ordered("<=")? != Ordering::Greater,
        CmpOp::Gt => ordered(">")? == Ordering::Greater,
        CmpOp::Ge => ordered(">=")? != Ordering::Less,
        CmpOp::In => right.contains(left).ok_or_else(|| mismatch("in", left, right))?,
        CmpOp::NotIn => !right
            .contains(left)
            .ok_or_else(|| mismatch("not in", left, right))?,
    })
}

fn ordering(op: &'static str, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    let ord = match (left, right) {
        (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
        (Value::Int(i), Value::Float(f)) => cmp_int_float(*i, *f),
        (Value::Float(f), Value::Int(i)) => cmp_int_float(*i, *f).map(Ordering::reverse),
        (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
        (Value::Text(l), Value::Text(r)) => Some(l.cmp(r)),
        _ => None,
    };
    // NaN compares false every way round; report it as a mismatch
    ord.ok_or_else(|| mismatch(op, left, right))
}
