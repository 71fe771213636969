//! Syntax node IR.
//!
//! A closed tagged union over the expression and statement shapes the
//! translator knows. Nodes are produced once by a reader and never mutated.

use serde::{Deserialize, Serialize};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Arithmetic and bitwise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

impl BinaryOperator {
    /// The structural tag of the operator, as the source language names it.
    pub fn tag(self) -> &'static str {
        match self {
            BinaryOperator::Add => "Add",
            BinaryOperator::Sub => "Sub",
            BinaryOperator::Mult => "Mult",
            BinaryOperator::MatMult => "MatMult",
            BinaryOperator::Div => "Div",
            BinaryOperator::Mod => "Mod",
            BinaryOperator::Pow => "Pow",
            BinaryOperator::LShift => "LShift",
            BinaryOperator::RShift => "RShift",
            BinaryOperator::BitOr => "BitOr",
            BinaryOperator::BitXor => "BitXor",
            BinaryOperator::BitAnd => "BitAnd",
            BinaryOperator::FloorDiv => "FloorDiv",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mult,
            "@" => BinaryOperator::MatMult,
            "/" => BinaryOperator::Div,
            "%" => BinaryOperator::Mod,
            "**" => BinaryOperator::Pow,
            "<<" => BinaryOperator::LShift,
            ">>" => BinaryOperator::RShift,
            "|" => BinaryOperator::BitOr,
            "^" => BinaryOperator::BitXor,
            "&" => BinaryOperator::BitAnd,
            "//" => BinaryOperator::FloorDiv,
            _ => return None,
        };
        Some(op)
    }
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOperator {
    And,
    Or,
}

impl BooleanOperator {
    pub fn tag(self) -> &'static str {
        match self {
            BooleanOperator::And => "And",
            BooleanOperator::Or => "Or",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "and" => Some(BooleanOperator::And),
            "or" => Some(BooleanOperator::Or),
            _ => None,
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CompareOperator {
    pub fn tag(self) -> &'static str {
        match self {
            CompareOperator::Eq => "Eq",
            CompareOperator::NotEq => "NotEq",
            CompareOperator::Lt => "Lt",
            CompareOperator::LtE => "LtE",
            CompareOperator::Gt => "Gt",
            CompareOperator::GtE => "GtE",
            CompareOperator::Is => "Is",
            CompareOperator::IsNot => "IsNot",
            CompareOperator::In => "In",
            CompareOperator::NotIn => "NotIn",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "==" => CompareOperator::Eq,
            "!=" | "<>" => CompareOperator::NotEq,
            "<" => CompareOperator::Lt,
            "<=" => CompareOperator::LtE,
            ">" => CompareOperator::Gt,
            ">=" => CompareOperator::GtE,
            "is" => CompareOperator::Is,
            "is not" => CompareOperator::IsNot,
            "in" => CompareOperator::In,
            "not in" => CompareOperator::NotIn,
            _ => return None,
        };
        Some(op)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Literal constant values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ellipsis,
}

/// A keyword argument of a call. `arg` is `None` for `**mapping`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

/// One `key: value` entry of a dict literal. `key` is `None` for `**mapping`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictEntry {
    pub key: Option<Expr>,
    pub value: Expr,
}

/// Expression nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `func(args...)`. Keyword arguments are kept apart from positional ones.
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },

    Name(String),

    Constant(Constant),

    /// `value.attr`
    Attribute { value: Box<Expr>, attr: String },

    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// `a and b and c` keeps all operands in one node.
    BooleanOp {
        op: BooleanOperator,
        values: Vec<Expr>,
    },

    /// `left op0 comparators[0] op1 comparators[1] ...`
    Compare {
        left: Box<Expr>,
        ops: Vec<CompareOperator>,
        comparators: Vec<Expr>,
    },

    /// `value[index]`
    Subscript { value: Box<Expr>, index: Box<Expr> },

    Dict(Vec<DictEntry>),

    List(Vec<Expr>),

    Tuple(Vec<Expr>),

    /// A construct the reader recognised but that has no IR shape
    /// (lambdas, comprehensions, unary operators, slices...).
    Other { kind: String },
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn int(value: i64) -> Self {
        Expr::Constant(Constant::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Constant(Constant::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Constant(Constant::Str(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Constant(Constant::Bool(value))
    }

    pub fn none() -> Self {
        Expr::Constant(Constant::None)
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
            keywords: Vec::new(),
        }
    }

    pub fn attribute(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn boolean(op: BooleanOperator, values: Vec<Expr>) -> Self {
        Expr::BooleanOp { op, values }
    }

    pub fn compare(left: Expr, op: CompareOperator, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    pub fn subscript(value: Expr, index: Expr) -> Self {
        Expr::Subscript {
            value: Box::new(value),
            index: Box::new(index),
        }
    }

    pub fn dict(entries: Vec<(Option<Expr>, Expr)>) -> Self {
        Expr::Dict(
            entries
                .into_iter()
                .map(|(key, value)| DictEntry { key, value })
                .collect(),
        )
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }

    pub fn tuple(items: Vec<Expr>) -> Self {
        Expr::Tuple(items)
    }

    pub fn other(kind: impl Into<String>) -> Self {
        Expr::Other { kind: kind.into() }
    }

    /// Name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Expr::Call { .. } => "Call",
            Expr::Name(_) => "Name",
            Expr::Constant(_) => "Constant",
            Expr::Attribute { .. } => "Attribute",
            Expr::BinaryOp { .. } => "BinOp",
            Expr::BooleanOp { .. } => "BoolOp",
            Expr::Compare { .. } => "Compare",
            Expr::Subscript { .. } => "Subscript",
            Expr::Dict(_) => "Dict",
            Expr::List(_) => "List",
            Expr::Tuple(_) => "Tuple",
            Expr::Other { kind } => kind,
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    /// Positional parameter names, in order.
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            body,
        }
    }
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `t0 = t1 = ... = value`
    Assign { targets: Vec<Expr>, value: Expr },

    /// A bare expression evaluated for its effect (or a docstring).
    Expr(Expr),

    Return(Option<Expr>),

    FunctionDef(FunctionDef),

    /// `for target in iter: body` (`orelse` is the loop's `else:` block)
    ForEach {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },

    /// `if test: body`; `elif` chains nest inside `orelse`.
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },

    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },

    /// A statement the reader recognised but that has no IR shape
    /// (classes, try, with, imports, augmented assignment...).
    Other { kind: String },
}

impl Stmt {
    pub fn assign(targets: Vec<Expr>, value: Expr) -> Self {
        Stmt::Assign { targets, value }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(value)
    }

    pub fn function(def: FunctionDef) -> Self {
        Stmt::FunctionDef(def)
    }

    pub fn for_each(target: Expr, iter: Expr, body: Vec<Stmt>) -> Self {
        Stmt::ForEach {
            target,
            iter,
            body,
            orelse: Vec::new(),
        }
    }

    pub fn if_stmt(test: Expr, body: Vec<Stmt>) -> Self {
        Stmt::If {
            test,
            body,
            orelse: Vec::new(),
        }
    }

    pub fn while_loop(test: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While {
            test,
            body,
            orelse: Vec::new(),
        }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        Stmt::Other { kind: kind.into() }
    }

    /// Name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Stmt::Assign { .. } => "Assign",
            Stmt::Expr(_) => "Expr",
            Stmt::Return(_) => "Return",
            Stmt::FunctionDef(_) => "FunctionDef",
            Stmt::ForEach { .. } => "For",
            Stmt::If { .. } => "If",
            Stmt::While { .. } => "While",
            Stmt::Other { kind } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinaryOperator::from_symbol("//"), Some(BinaryOperator::FloorDiv));
        assert_eq!(BinaryOperator::from_symbol("@"), Some(BinaryOperator::MatMult));
        assert_eq!(BinaryOperator::from_symbol("&&"), None);
        assert_eq!(CompareOperator::from_symbol("not in"), Some(CompareOperator::NotIn));
        assert_eq!(CompareOperator::from_symbol("is not"), Some(CompareOperator::IsNot));
        assert_eq!(BooleanOperator::from_symbol("or"), Some(BooleanOperator::Or));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Expr::other("Lambda").kind_name(), "Lambda");
        assert_eq!(Expr::tuple(vec![]).kind_name(), "Tuple");
        assert_eq!(Stmt::other("ClassDef").kind_name(), "ClassDef");
        assert_eq!(Stmt::return_stmt(None).kind_name(), "Return");
    }

    #[test]
    fn test_serializes_externally_tagged() {
        let stmt = Stmt::assign(vec![Expr::name("x")], Expr::int(1));
        insta::assert_json_snapshot!(stmt, @r#"
        {
          "Assign": {
            "targets": [
              {
                "Name": "x"
              }
            ],
            "value": {
              "Constant": {
                "Int": 1
              }
            }
          }
        }
        "#);
    }
}
