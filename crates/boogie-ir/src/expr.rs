// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::decl::Variable;
use num::BigInt;

/// Literal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(BigInt),
    /// Decimal real literal, kept textual, e.g. `1.5`
    Real(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    /// Integer division (`div`)
    Div,
    Mod,
    /// Real division (`/`)
    RealDiv,
}

/// Boogie expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    /// Variable or constant reference
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    /// `map[i, ..]`
    MapSelect {
        map: Box<Expr>,
        indexes: Vec<Expr>,
    },
    /// `map[i, .. := value]`
    MapStore {
        map: Box<Expr>,
        indexes: Vec<Expr>,
        value: Box<Expr>,
    },
    Old(Box<Expr>),
    /// `(forall v: T, .. :: body)`
    Forall {
        vars: Vec<Variable>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(BigInt::from(value)))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Eq, left, right)
    }

    pub fn neq(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Neq, left, right)
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn select(map: Expr, indexes: Vec<Expr>) -> Self {
        Expr::MapSelect {
            map: Box::new(map),
            indexes,
        }
    }

    pub fn store(map: Expr, indexes: Vec<Expr>, value: Expr) -> Self {
        Expr::MapStore {
            map: Box::new(map),
            indexes,
            value: Box::new(value),
        }
    }

    pub fn old(expr: Expr) -> Self {
        Expr::Old(Box::new(expr))
    }

    pub fn forall(vars: Vec<Variable>, body: Expr) -> Self {
        Expr::Forall {
            vars,
            body: Box::new(body),
        }
    }

    /// The identifier name, if this expression is a plain variable reference
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }
}

impl std::ops::Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Expr::unary(UnaryOp::Not, self)
    }
}
