// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::decl::{Declaration, Implementation, Procedure, Variable};

/// Stable key of a procedure in a `Program`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcedureId(u32);

impl ProcedureId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A Boogie program: the ordered top-level declarations plus the procedure arena they
/// refer to
#[derive(Debug, Clone, Default)]
pub struct Program {
    procedures: Vec<Procedure>,
    declarations: Vec<Declaration>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `procedure` to the arena and appends its declaration to the program
    pub fn declare_procedure(&mut self, procedure: Procedure) -> ProcedureId {
        let id = ProcedureId(self.procedures.len() as u32);
        self.procedures.push(procedure);
        self.declarations.push(Declaration::Procedure(id));
        id
    }

    pub fn procedure(&self, id: ProcedureId) -> &Procedure {
        &self.procedures[id.index()]
    }

    pub fn procedure_mut(&mut self, id: ProcedureId) -> &mut Procedure {
        &mut self.procedures[id.index()]
    }

    pub fn procedures(&self) -> impl Iterator<Item = (ProcedureId, &Procedure)> {
        self.procedures
            .iter()
            .enumerate()
            .map(|(i, p)| (ProcedureId(i as u32), p))
    }

    pub fn find_procedure(&self, name: &str) -> Option<ProcedureId> {
        self.procedures().find(|(_, p)| p.name == name).map(|(id, _)| id)
    }

    pub fn add_top_level_declaration(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn implementations(&self) -> impl Iterator<Item = &Implementation> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Implementation(imp) => Some(imp),
            _ => None,
        })
    }

    pub fn implementations_of(&self, id: ProcedureId) -> impl Iterator<Item = &Implementation> {
        self.implementations().filter(move |imp| imp.procedure == id)
    }

    pub fn global_variables(&self) -> impl Iterator<Item = &Variable> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::GlobalVariable(var) => Some(var),
            _ => None,
        })
    }

    pub fn axioms(&self) -> impl Iterator<Item = &crate::Expr> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Axiom(e) => Some(e),
            _ => None,
        })
    }
}
