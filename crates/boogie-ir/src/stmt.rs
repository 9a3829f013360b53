// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::decl::Attribute;
use crate::expr::Expr;

/// Boogie commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `target := value;`
    Assign { target: String, value: Expr },
    /// `assert {:attr} .. condition;`
    Assert {
        attributes: Vec<Attribute>,
        condition: Expr,
    },
    /// `assume {:attr} .. condition;`
    Assume {
        attributes: Vec<Attribute>,
        condition: Expr,
    },
    /// `call outs := procedure(args);`
    Call {
        procedure: String,
        args: Vec<Expr>,
        outs: Vec<String>,
    },
    Havoc { vars: Vec<String> },
    If {
        condition: Expr,
        then_branch: StmtList,
        else_branch: Option<StmtList>,
    },
    While { condition: Expr, body: StmtList },
    Break,
    Return,
    Goto { labels: Vec<String> },
    Label(String),
}

impl Stmt {
    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            target: target.into(),
            value,
        }
    }

    pub fn assert(condition: Expr) -> Self {
        Stmt::Assert {
            attributes: vec![],
            condition,
        }
    }

    pub fn assume(condition: Expr) -> Self {
        Stmt::Assume {
            attributes: vec![],
            condition,
        }
    }

    /// `assume {:attribute} true;`, a marker for the verifier
    pub fn marker(attribute: Attribute) -> Self {
        Stmt::Assume {
            attributes: vec![attribute],
            condition: Expr::bool(true),
        }
    }

    pub fn call(procedure: impl Into<String>, args: Vec<Expr>, outs: Vec<String>) -> Self {
        Stmt::Call {
            procedure: procedure.into(),
            args,
            outs,
        }
    }
}

/// An ordered block of commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StmtList(pub Vec<Stmt>);

impl StmtList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a StmtList {
    type Item = &'a Stmt;
    type IntoIter = std::slice::Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Accumulates commands while a body is being translated
#[derive(Debug, Default)]
pub struct StmtListBuilder {
    stmts: Vec<Stmt>,
}

impl StmtListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn add_all(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        self.stmts.extend(stmts);
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn collect(self) -> StmtList {
        StmtList(self.stmts)
    }
}
