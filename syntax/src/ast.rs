/// A literal value written directly in expression text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`, `None`
    Null,
    /// `true`, `false`, `True`, `False`
    Bool(bool),
    /// `42`
    Int(i64),
    /// `4.2`, `1e3`
    Float(f64),
    /// `"text"`, `'text'`, `"""text"""`, `'''text'''`
    Str(String),
}

/// Prefix operators. Stored as a list on [`Expr::Unary`] so that
/// `not not not x` doesn't nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `not x`, `!x`
    Not,
}

/// Left-associative arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
}

/// Comparison operators. Chains like `a < b < c` mean `a < b and b < c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// A parsed expression.
///
/// Operator chains are kept flat (a head plus a tail of `(op, operand)` pairs)
/// rather than as nested binary nodes, so the depth of the tree only grows
/// with brackets, never with the length of a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// prefix operators, outermost first.
    Unary { ops: Vec<UnOp>, operand: Box<Expr> },
    /// `a ** b ** c`, evaluated right to left.
    Power(Vec<Expr>),
    /// `a + b - c`, evaluated left to right.
    Arith { head: Box<Expr>, tail: Vec<(ArithOp, Expr)> },
    /// `a < b <= c`
    Compare { head: Box<Expr>, tail: Vec<(CmpOp, Expr)> },
    /// `a and b and c`
    Logic { op: LogicOp, operands: Vec<Expr> },
}

// These methods are just to assist with writing more legible tests.
#[cfg(test)]
impl Expr {
    pub fn int(v: i64) -> Self {
        Self::Literal(Literal::Int(v))
    }
    pub fn float(v: f64) -> Self {
        Self::Literal(Literal::Float(v))
    }
    pub fn str(v: &str) -> Self {
        Self::Literal(Literal::Str(v.to_owned()))
    }
    pub fn bool(v: bool) -> Self {
        Self::Literal(Literal::Bool(v))
    }
    pub fn arith(head: Self, tail: Vec<(ArithOp, Self)>) -> Self {
        Self::Arith {
            head: Box::new(head),
            tail,
        }
    }
    pub fn compare(head: Self, tail: Vec<(CmpOp, Self)>) -> Self {
        Self::Compare {
            head: Box::new(head),
            tail,
        }
    }
    pub fn unary(ops: Vec<UnOp>, operand: Self) -> Self {
        Self::Unary {
            ops,
            operand: Box::new(operand),
        }
    }
}

/// One piece of a `{}`-style template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Literal text, copied as-is.
    Text(&'a str),
    /// `{}`
    Next,
    /// `{N}`
    Index(usize),
}
