// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Boogie IR
//!
//! A small AST for the Boogie intermediate verification language, as produced by the bytecode
//! translator. Procedures live in an arena owned by `Program` and are addressed by
//! `ProcedureId`, so a declaration can be referenced (and patched) after it was emitted.
//! Text rendering is provided through `Display` (see `writer`).

mod decl;
mod expr;
mod program;
mod stmt;
mod types;
mod writer;

pub use decl::{
    Attribute, AttrParam, Declaration, Ensures, Function, Implementation, Procedure, Requires,
    Variable,
};
pub use expr::{BinaryOp, Expr, Literal, UnaryOp};
pub use program::{ProcedureId, Program};
pub use stmt::{Stmt, StmtList, StmtListBuilder};
pub use types::Type;
