// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Text rendering of Boogie programs.
//!
//! Declarations are printed in program order:
//! ```ignore
//! type Ref;
//! const unique null: Ref;
//! var $Heap: [Ref][Field]Box;
//! procedure {:attr} Name(x$in: int) returns ($result: int);
//!   requires <pre-condition>;
//!   modifies <var1>, <var2>;
//!   ensures <post-condition>;
//! implementation {:inline 1} Name(x$in: int) returns ($result: int)
//! {
//!   var x: int;
//!
//!   <body>
//! }
//! ```

use crate::decl::{Attribute, AttrParam, Declaration, Function, Implementation, Procedure, Variable};
use crate::expr::{BinaryOp, Expr, Literal, UnaryOp};
use crate::program::Program;
use crate::stmt::{Stmt, StmtList};
use crate::types::Type;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

const INDENT: usize = 2;

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Real => write!(f, "real"),
            Type::Ref => write!(f, "Ref"),
            Type::Field => write!(f, "Field"),
            Type::Box => write!(f, "Box"),
            Type::TypeValue => write!(f, "Type"),
            Type::Named(name) => write!(f, "{}", name),
            Type::Map { keys, value } => write!(f, "[{}]{}", keys.iter().join(", "), value),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Real(r) => write!(f, "{}", r),
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Implies => "==>",
            BinaryOp::Iff => "<==>",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::RealDiv => "/",
        };
        write!(f, "{}", op)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(l) => write!(f, "{}", l),
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Unary { op, operand } => write!(f, "{}({})", op, operand),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::FunctionCall { name, args } => write!(f, "{}({})", name, args.iter().join(", ")),
            Expr::MapSelect { map, indexes } => write!(f, "{}[{}]", map, indexes.iter().join(", ")),
            Expr::MapStore {
                map,
                indexes,
                value,
            } => write!(f, "{}[{} := {}]", map, indexes.iter().join(", "), value),
            Expr::Old(e) => write!(f, "old({})", e),
            Expr::Forall { vars, body } => write!(f, "(forall {} :: {})", vars.iter().join(", "), body),
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{:{}", self.key)?;
        if !self.params.is_empty() {
            let params = self
                .params
                .iter()
                .map(|p| match p {
                    AttrParam::Expr(e) => e.to_string(),
                    AttrParam::String(s) => format!("\"{}\"", escape_string(s)),
                })
                .join(", ");
            write!(f, " {}", params)?;
        }
        write!(f, "}}")
    }
}

/// Escapes `s` for use inside a Boogie string literal
fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

fn write_attributes(f: &mut Formatter<'_>, attributes: &[Attribute]) -> fmt::Result {
    for attribute in attributes {
        write!(f, "{} ", attribute)?;
    }
    Ok(())
}

fn write_signature(f: &mut Formatter<'_>, in_params: &[Variable], out_params: &[Variable]) -> fmt::Result {
    write!(f, "({})", in_params.iter().join(", "))?;
    if !out_params.is_empty() {
        write!(f, " returns ({})", out_params.iter().join(", "))?;
    }
    Ok(())
}

fn write_stmt_list(f: &mut Formatter<'_>, stmts: &StmtList, indent: usize) -> fmt::Result {
    for stmt in stmts {
        write_stmt(f, stmt, indent)?;
    }
    Ok(())
}

fn write_block(f: &mut Formatter<'_>, stmts: &StmtList, indent: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    write_stmt_list(f, stmts, indent + INDENT)?;
    write!(f, "{:width$}}}", "", width = indent)
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, indent: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = indent)?;
    match stmt {
        Stmt::Assign { target, value } => writeln!(f, "{} := {};", target, value),
        Stmt::Assert {
            attributes,
            condition,
        } => {
            write!(f, "assert ")?;
            write_attributes(f, attributes)?;
            writeln!(f, "{};", condition)
        }
        Stmt::Assume {
            attributes,
            condition,
        } => {
            write!(f, "assume ")?;
            write_attributes(f, attributes)?;
            writeln!(f, "{};", condition)
        }
        Stmt::Call {
            procedure,
            args,
            outs,
        } => {
            write!(f, "call ")?;
            if !outs.is_empty() {
                write!(f, "{} := ", outs.iter().join(", "))?;
            }
            writeln!(f, "{}({});", procedure, args.iter().join(", "))
        }
        Stmt::Havoc { vars } => writeln!(f, "havoc {};", vars.iter().join(", ")),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            write!(f, "if ({}) ", condition)?;
            write_block(f, then_branch, indent)?;
            if let Some(else_branch) = else_branch {
                write!(f, " else ")?;
                write_block(f, else_branch, indent)?;
            }
            writeln!(f)
        }
        Stmt::While { condition, body } => {
            write!(f, "while ({}) ", condition)?;
            write_block(f, body, indent)?;
            writeln!(f)
        }
        Stmt::Break => writeln!(f, "break;"),
        Stmt::Return => writeln!(f, "return;"),
        Stmt::Goto { labels } => writeln!(f, "goto {};", labels.iter().join(", ")),
        Stmt::Label(label) => writeln!(f, "{}:", label),
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl Display for StmtList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt_list(f, self, 0)
    }
}

impl Display for Procedure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "procedure ")?;
        write_attributes(f, &self.attributes)?;
        write!(f, "{}", self.name)?;
        write_signature(f, &self.in_params, &self.out_params)?;
        writeln!(f, ";")?;
        for requires in &self.requires {
            let free = if requires.free { "free " } else { "" };
            writeln!(f, "  {}requires {};", free, requires.condition)?;
        }
        if !self.modifies.is_empty() {
            writeln!(f, "  modifies {};", self.modifies.iter().join(", "))?;
        }
        for ensures in &self.ensures {
            let free = if ensures.free { "free " } else { "" };
            writeln!(f, "  {}ensures {};", free, ensures.condition)?;
        }
        Ok(())
    }
}

impl Display for Implementation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "implementation ")?;
        write_attributes(f, &self.attributes)?;
        write!(f, "{}", self.name)?;
        write_signature(f, &self.in_params, &self.out_params)?;
        writeln!(f)?;
        writeln!(f, "{{")?;
        for local in &self.locals {
            writeln!(f, "  var {};", local)?;
        }
        if !self.locals.is_empty() && !self.body.is_empty() {
            writeln!(f)?;
        }
        write_stmt_list(f, &self.body, INDENT)?;
        writeln!(f, "}}")
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "function ")?;
        write_attributes(f, &self.attributes)?;
        write!(f, "{}({}): {}", self.name, self.params.iter().join(", "), self.result)?;
        match &self.body {
            Some(body) => writeln!(f, " {{ {} }}", body),
            None => writeln!(f, ";"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for declaration in self.declarations() {
            match declaration {
                Declaration::TypeDecl(name) => writeln!(f, "type {};", name)?,
                Declaration::Constant { var, unique } => {
                    let unique = if *unique { "unique " } else { "" };
                    writeln!(f, "const {}{};", unique, var)?
                }
                Declaration::GlobalVariable(var) => writeln!(f, "var {};", var)?,
                Declaration::Function(function) => write!(f, "{}", function)?,
                Declaration::Axiom(e) => writeln!(f, "axiom {};", e)?,
                Declaration::Procedure(id) => write!(f, "{}", self.procedure(*id))?,
                Declaration::Implementation(imp) => write!(f, "{}", imp)?,
            }
        }
        Ok(())
    }
}
