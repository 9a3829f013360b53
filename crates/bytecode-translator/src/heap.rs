// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Heap encodings
//!
//! A heap decides how instance fields are stored in Boogie. The translator only talks to it
//! through `Heap`: field declarations, reads, writes (appended to a builder), the dynamic
//! type of an instance, and the allocation procedure. Static fields are plain globals in
//! every encoding.

use crate::options::HeapRepresentation;
use boogie_ir::{Declaration, Expr, Function, Stmt, StmtListBuilder, Type, Variable};
use object_model::{FieldId, ObjectModel};

pub const HEAP_VARIABLE: &str = "$Heap";
pub const DYNAMIC_TYPE_FUNCTION: &str = "$DynamicType";
pub const ALLOCATION_PROCEDURE: &str = "Alloc";

/// How the accessed slot is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// Field of a value-type instance
    Struct,
    /// Field of a heap-allocated object
    Heap,
}

impl AccessType {
    pub fn for_field(env: &ObjectModel, field: FieldId) -> Self {
        if env.type_def(env.field(field).containing_type).is_struct() {
            AccessType::Struct
        } else {
            AccessType::Heap
        }
    }
}

pub trait Heap {
    /// Declarations the encoding needs in every program
    fn prelude(&self) -> Vec<Declaration>;

    /// Declaration backing the instance field `name` of Boogie type `ty`
    fn field_declaration(&self, name: &str, ty: &Type) -> Declaration;

    fn read_heap(&self, instance: Expr, field: &str, access: AccessType, ty: &Type) -> Expr;

    fn write_heap(
        &self,
        instance: Expr,
        field: &str,
        value: Expr,
        access: AccessType,
        ty: &Type,
        builder: &mut StmtListBuilder,
    );

    fn dynamic_type(&self, instance: Expr) -> Expr {
        Expr::call(DYNAMIC_TYPE_FUNCTION, vec![instance])
    }

    fn allocation_procedure(&self) -> &str {
        ALLOCATION_PROCEDURE
    }
}

pub fn heap_for(representation: HeapRepresentation) -> Box<dyn Heap> {
    match representation {
        HeapRepresentation::SplitFields => Box::new(SplitFieldsHeap),
        HeapRepresentation::TwoDInt => Box::new(TwoDimensionalHeap::new(Type::Int)),
        HeapRepresentation::TwoDBox | HeapRepresentation::General => {
            Box::new(TwoDimensionalHeap::new(Type::Box))
        }
    }
}

/// Every instance field is its own map `F$C.f: [Ref]T`
#[derive(Debug, Default)]
pub struct SplitFieldsHeap;

impl Heap for SplitFieldsHeap {
    fn prelude(&self) -> Vec<Declaration> {
        vec![]
    }

    fn field_declaration(&self, name: &str, ty: &Type) -> Declaration {
        Declaration::GlobalVariable(Variable::new(name, Type::map(vec![Type::Ref], ty.clone())))
    }

    fn read_heap(&self, instance: Expr, field: &str, _access: AccessType, _ty: &Type) -> Expr {
        Expr::select(Expr::ident(field), vec![instance])
    }

    fn write_heap(
        &self,
        instance: Expr,
        field: &str,
        value: Expr,
        _access: AccessType,
        _ty: &Type,
        builder: &mut StmtListBuilder,
    ) {
        builder.add(Stmt::assign(
            field,
            Expr::store(Expr::ident(field), vec![instance], value),
        ));
    }
}

/// A single `$Heap: [Ref][Field]cell` map; fields are unique `Field` constants. Values are
/// converted to and from the cell type.
#[derive(Debug)]
pub struct TwoDimensionalHeap {
    cell: Type,
}

impl TwoDimensionalHeap {
    pub fn new(cell: Type) -> Self {
        Self { cell }
    }

    fn cell_name(&self) -> &'static str {
        match self.cell {
            Type::Int => "Int",
            _ => "Box",
        }
    }

    /// Value types that need converting, with their names in the conversion functions
    fn converted_types(&self) -> Vec<(&'static str, Type)> {
        let mut types = vec![("Bool", Type::Bool), ("Ref", Type::Ref), ("Real", Type::Real)];
        if self.cell != Type::Int {
            types.insert(0, ("Int", Type::Int));
        }
        types
    }

    fn value_name(&self, ty: &Type) -> Option<&'static str> {
        self.converted_types()
            .into_iter()
            .find(|(_, t)| t == ty)
            .map(|(name, _)| name)
    }

    fn from_cell(&self, cell: Expr, ty: &Type) -> Expr {
        match self.value_name(ty) {
            Some(name) => Expr::call(format!("{}2{}", self.cell_name(), name), vec![cell]),
            None => cell,
        }
    }

    fn to_cell(&self, value: Expr, ty: &Type) -> Expr {
        match self.value_name(ty) {
            Some(name) => Expr::call(format!("{}2{}", name, self.cell_name()), vec![value]),
            None => value,
        }
    }

    fn heap_type(&self) -> Type {
        Type::map(vec![Type::Ref], Type::map(vec![Type::Field], self.cell.clone()))
    }
}

impl Heap for TwoDimensionalHeap {
    fn prelude(&self) -> Vec<Declaration> {
        let mut decls = vec![Declaration::TypeDecl("Field".to_string())];
        if self.cell == Type::Box {
            decls.push(Declaration::TypeDecl("Box".to_string()));
        }
        decls.push(Declaration::GlobalVariable(Variable::new(
            HEAP_VARIABLE,
            self.heap_type(),
        )));
        for (name, ty) in self.converted_types() {
            decls.push(Declaration::Function(Function::new(
                format!("{}2{}", self.cell_name(), name),
                vec![Variable::new("c", self.cell.clone())],
                ty.clone(),
            )));
            decls.push(Declaration::Function(Function::new(
                format!("{}2{}", name, self.cell_name()),
                vec![Variable::new("v", ty)],
                self.cell.clone(),
            )));
        }
        decls
    }

    fn field_declaration(&self, name: &str, _ty: &Type) -> Declaration {
        Declaration::Constant {
            var: Variable::new(name, Type::Field),
            unique: true,
        }
    }

    fn read_heap(&self, instance: Expr, field: &str, _access: AccessType, ty: &Type) -> Expr {
        let cell = Expr::select(
            Expr::select(Expr::ident(HEAP_VARIABLE), vec![instance]),
            vec![Expr::ident(field)],
        );
        self.from_cell(cell, ty)
    }

    fn write_heap(
        &self,
        instance: Expr,
        field: &str,
        value: Expr,
        _access: AccessType,
        ty: &Type,
        builder: &mut StmtListBuilder,
    ) {
        let object = Expr::select(Expr::ident(HEAP_VARIABLE), vec![instance.clone()]);
        let updated = Expr::store(object, vec![Expr::ident(field)], self.to_cell(value, ty));
        builder.add(Stmt::assign(
            HEAP_VARIABLE,
            Expr::store(Expr::ident(HEAP_VARIABLE), vec![instance], updated),
        ));
    }
}
