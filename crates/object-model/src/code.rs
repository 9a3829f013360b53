// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structured method bodies
//!
//! This is the decompiler's output: a statement tree over resolved expressions. Operands
//! already refer to model entities (`MethodId`, `FieldId`, `LocalId`), so consumers never
//! resolve names.

use crate::ids::{FieldId, LocalId, MethodId, TypeId};
use crate::types::TypeRef;

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Real(f64),
    String(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Implies,
}

/// A resolved method call
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: MethodId,
    /// Receiver, `None` for static calls
    pub this_argument: Option<Box<Expression>>,
    pub arguments: Vec<Expression>,
}

impl MethodCall {
    pub fn new_static(method: MethodId, arguments: Vec<Expression>) -> Self {
        Self {
            method,
            this_argument: None,
            arguments,
        }
    }

    pub fn new_instance(method: MethodId, receiver: Expression, arguments: Vec<Expression>) -> Self {
        Self {
            method,
            this_argument: Some(Box::new(receiver)),
            arguments,
        }
    }

    /// Whether the receiver is the literal `this` reference
    pub fn has_this_receiver(&self) -> bool {
        matches!(self.this_argument.as_deref(), Some(Expression::ThisReference))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Constant),
    /// The zero/null value of a type
    DefaultValue(TypeRef),
    ThisReference,
    /// Parameter of the enclosing method, by position
    Parameter(u16),
    Local(LocalId),
    FieldRead {
        field: FieldId,
        instance: Option<Box<Expression>>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    MethodCall(MethodCall),
    CreateObject {
        ty: TypeId,
        constructor: MethodId,
        arguments: Vec<Expression>,
    },
    /// Value returned by the method; only meaningful in postconditions
    ReturnValue,
    /// Pre-state value; only meaningful in postconditions
    Old(Box<Expression>),
}

impl Expression {
    pub fn int(value: i64) -> Self {
        Expression::Constant(Constant::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Expression::Constant(Constant::Bool(value))
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn field(field: FieldId, instance: Option<Expression>) -> Self {
        Expression::FieldRead {
            field,
            instance: instance.map(Box::new),
        }
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum TargetExpression {
    Local(LocalId),
    Parameter(u16),
    Field {
        field: FieldId,
        instance: Option<Box<Expression>>,
    },
}

impl TargetExpression {
    pub fn field(field: FieldId, instance: Option<Expression>) -> Self {
        TargetExpression::Field {
            field,
            instance: instance.map(Box::new),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its effects, typically a call
    Expression(Expression),
    Assign {
        target: TargetExpression,
        source: Expression,
    },
    LocalDeclaration {
        local: LocalId,
        initial_value: Option<Expression>,
    },
    Block(Vec<Statement>),
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Return(Option<Expression>),
    Throw(Expression),
    Assert(Expression),
    Assume(Expression),
    /// Sequence point: the wrapped statement starts at `offset` in the original bytecode
    Located {
        offset: u32,
        statement: Box<Statement>,
    },
}

impl Statement {
    pub fn assign(target: TargetExpression, source: Expression) -> Self {
        Statement::Assign { target, source }
    }

    pub fn call(call: MethodCall) -> Self {
        Statement::Expression(Expression::MethodCall(call))
    }
}

/// A local variable declared by a body
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDef {
    pub name: String,
    pub ty: TypeRef,
}

/// Decompiled body of a method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodBody {
    pub block: Vec<Statement>,
    /// Indexed by `LocalId`
    pub locals: Vec<LocalDef>,
    /// Types the decompiler produced while building this body (closure classes and the like)
    pub private_helper_types: Vec<TypeId>,
}

impl MethodBody {
    pub fn new(block: Vec<Statement>) -> Self {
        Self {
            block,
            locals: vec![],
            private_helper_types: vec![],
        }
    }

    pub fn local(&self, id: LocalId) -> Option<&LocalDef> {
        self.locals.get(id.index())
    }
}
