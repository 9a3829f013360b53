// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Top-level declarations: procedures, implementations, functions, globals and axioms

use crate::expr::Expr;
use crate::program::ProcedureId;
use crate::stmt::StmtList;
use crate::types::Type;

/// Parameter of an attribute: `{:key expr, "string"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrParam {
    Expr(Expr),
    String(String),
}

/// A Boogie attribute such as `{:inline 1}` or `{:sourceFile "a.cs"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub params: Vec<AttrParam>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, params: Vec<AttrParam>) -> Self {
        Self {
            key: key.into(),
            params,
        }
    }

    /// An attribute without parameters, e.g. `{:entrypoint}`
    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, vec![])
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, vec![AttrParam::Expr(Expr::int(value))])
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, vec![AttrParam::String(value.into())])
    }
}

/// A typed variable: formal, local, global or constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn expr(&self) -> Expr {
        Expr::Ident(self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requires {
    pub condition: Expr,
    pub free: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensures {
    pub condition: Expr,
    pub free: bool,
}

/// A procedure signature with its contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    pub in_params: Vec<Variable>,
    pub out_params: Vec<Variable>,
    pub requires: Vec<Requires>,
    pub modifies: Vec<String>,
    pub ensures: Vec<Ensures>,
    pub attributes: Vec<Attribute>,
}

impl Procedure {
    pub fn new(name: impl Into<String>, in_params: Vec<Variable>, out_params: Vec<Variable>) -> Self {
        Self {
            name: name.into(),
            in_params,
            out_params,
            requires: vec![],
            modifies: vec![],
            ensures: vec![],
            attributes: vec![],
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.iter().any(|a| a.key == key)
    }
}

/// A body bound to a previously declared procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implementation {
    pub procedure: ProcedureId,
    pub name: String,
    pub in_params: Vec<Variable>,
    pub out_params: Vec<Variable>,
    pub locals: Vec<Variable>,
    pub body: StmtList,
    pub attributes: Vec<Attribute>,
}

impl Implementation {
    /// Creates an implementation whose signature mirrors `decl`
    pub fn for_procedure(
        id: ProcedureId,
        decl: &Procedure,
        locals: Vec<Variable>,
        body: StmtList,
    ) -> Self {
        Self {
            procedure: id,
            name: decl.name.clone(),
            in_params: decl.in_params.clone(),
            out_params: decl.out_params.clone(),
            locals,
            body,
            attributes: vec![],
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// An uninterpreted or defined mathematical function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Variable>,
    pub result: Type,
    pub body: Option<Expr>,
    pub attributes: Vec<Attribute>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<Variable>, result: Type) -> Self {
        Self {
            name: name.into(),
            params,
            result,
            body: None,
            attributes: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `type Name;`
    TypeDecl(String),
    Constant { var: Variable, unique: bool },
    GlobalVariable(Variable),
    Function(Function),
    Axiom(Expr),
    /// Reference into the procedure arena of the owning `Program`
    Procedure(ProcedureId),
    Implementation(Implementation),
}
