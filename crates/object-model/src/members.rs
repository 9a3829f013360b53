// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Fields, methods and their parameters

use crate::attributes::CustomAttribute;
use crate::code::MethodBody;
use crate::contracts::MethodContract;
use crate::ids::{FieldId, MethodId, TypeId};
use crate::types::TypeRef;

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub id: FieldId,
    pub containing_type: TypeId,
    pub name: String,
    pub ty: TypeRef,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    /// `ref` and `out` parameters
    pub is_by_reference: bool,
    pub is_out: bool,
}

impl Parameter {
    pub fn by_value(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            is_by_reference: false,
            is_out: false,
        }
    }

    pub fn by_reference(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            is_by_reference: true,
            is_out: false,
        }
    }

    pub fn out(name: &str, ty: TypeRef) -> Self {
        Self {
            is_out: true,
            ..Self::by_reference(name, ty)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Normal,
    /// Instance constructor (`.ctor`)
    Constructor,
    /// Type initializer (`.cctor`)
    StaticConstructor,
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub id: MethodId,
    pub containing_type: TypeId,
    pub name: String,
    pub kind: MethodKind,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub is_static: bool,
    pub is_abstract: bool,
    /// Implemented outside the program (extern, runtime-provided)
    pub is_external: bool,
    /// Compiler-generated accessor names such as `add_Changed`
    pub is_special_name: bool,
    pub attributes: Vec<CustomAttribute>,
    pub contract: Option<MethodContract>,
    pub body: Option<MethodBody>,
}

impl MethodDef {
    pub fn new(id: MethodId, containing_type: TypeId, name: &str, kind: MethodKind) -> Self {
        Self {
            id,
            containing_type,
            name: name.to_string(),
            kind,
            parameters: vec![],
            return_type: TypeRef::Void,
            is_static: kind == MethodKind::StaticConstructor,
            is_abstract: false,
            is_external: false,
            is_special_name: kind != MethodKind::Normal,
            attributes: vec![],
            contract: None,
            body: None,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn is_static_constructor(&self) -> bool {
        self.kind == MethodKind::StaticConstructor
    }

    /// Compiler-generated event accessors (`add_X` / `remove_X`)
    pub fn is_event_accessor(&self) -> bool {
        self.is_special_name && (self.name.starts_with("add_") || self.name.starts_with("remove_"))
    }
}
