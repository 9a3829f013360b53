// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Object Model
//!
//! The resolved program representation the bytecode translator consumes: units, type
//! definitions, fields, methods with structured bodies, custom attributes and contracts.
//! Entities live in arenas indexed by interned keys (`TypeId`, `MethodId`, ...), so identity
//! is a key comparison. The model is read-only once built; use `ModelBuilder` to create one.

mod attributes;
mod builder;
mod code;
mod contracts;
mod debug;
mod ids;
mod members;
mod types;

pub use attributes::{ConstantValue, CustomAttribute, MetadataConstant, MetadataExpression};
pub use builder::ModelBuilder;
pub use code::{
    BinaryOperator, Constant, Expression, LocalDef, MethodBody, MethodCall, Statement,
    TargetExpression, UnaryOperator,
};
pub use contracts::{MethodContract, Postcondition, Precondition};
pub use debug::{DebugSymbols, SourceLocation};
pub use ids::{FieldId, LocalId, MethodId, TypeId, UnitId};
pub use members::{FieldDef, MethodDef, MethodKind, Parameter};
pub use types::{HelperMember, PrimitiveType, TypeDef, TypeKind, TypeRef};

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Assembly,
    Module,
}

/// An assembly or a stand-alone module
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub entry_point: Option<MethodId>,
    /// Top-level (non-nested) types in declaration order
    pub types: Vec<TypeId>,
}

/// The complete, resolved program
#[derive(Debug, Clone, Default)]
pub struct ObjectModel {
    units: Vec<Unit>,
    types: Vec<TypeDef>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
}

impl ObjectModel {
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    /// Fully qualified name, e.g. `Geometry.Shapes.Point` or `Outer.Inner` for nested types
    pub fn type_full_name(&self, id: TypeId) -> String {
        let def = self.type_def(id);
        match def.containing_type {
            Some(outer) => format!("{}.{}", self.type_full_name(outer), def.name),
            None if def.namespace.is_empty() => def.name.clone(),
            None => format!("{}.{}", def.namespace, def.name),
        }
    }

    pub fn type_ref_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Void => "System.Void".to_string(),
            TypeRef::Primitive(p) => p.full_name().to_string(),
            TypeRef::Named(id) => self.type_full_name(*id),
            TypeRef::Array(elem) => format!("{}[]", self.type_ref_name(elem)),
        }
    }

    /// Human-readable signature used in diagnostics, e.g. `Shapes.Point.Move(System.Int32)`
    pub fn method_signature(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!(
            "{}.{}({})",
            self.type_full_name(method.containing_type),
            method.name,
            method
                .parameters
                .iter()
                .map(|p| self.type_ref_name(&p.ty))
                .join(", ")
        )
    }

    pub fn type_kind(&self, ty: &TypeRef) -> Option<TypeKind> {
        match ty {
            TypeRef::Named(id) => Some(self.type_def(*id).kind),
            _ => None,
        }
    }

    pub fn is_struct(&self, ty: &TypeRef) -> bool {
        self.type_kind(ty) == Some(TypeKind::Struct)
    }

    pub fn is_enum(&self, ty: &TypeRef) -> bool {
        self.type_kind(ty) == Some(TypeKind::Enum)
    }

    /// Follows `unspecialized` links back to the generic definition
    pub fn unspecialized(&self, id: TypeId) -> TypeId {
        let mut current = id;
        while let Some(next) = self.type_def(current).unspecialized {
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    pub fn find_type(&self, full_name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .find(|t| self.type_full_name(t.id) == full_name)
            .map(|t| t.id)
    }

    /// Two methods are equivalent when they agree on name, staticness, return type and
    /// parameter list (types and by-reference flags)
    pub fn methods_are_equivalent(&self, a: MethodId, b: MethodId) -> bool {
        let (ma, mb) = (self.method(a), self.method(b));
        ma.name == mb.name
            && ma.is_static == mb.is_static
            && ma.return_type == mb.return_type
            && ma.parameters.len() == mb.parameters.len()
            && ma
                .parameters
                .iter()
                .zip(&mb.parameters)
                .all(|(pa, pb)| pa.ty == pb.ty && pa.is_by_reference == pb.is_by_reference)
    }

    /// Declared methods of `ty` with the given name
    pub fn methods_named<'a>(
        &'a self,
        ty: TypeId,
        name: &'a str,
    ) -> impl Iterator<Item = MethodId> + 'a {
        self.type_def(ty)
            .methods
            .iter()
            .copied()
            .filter(move |m| self.method(*m).name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_type_names() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let outer = builder.add_type(unit, "App.Core", "Outer", TypeKind::Class);
        let inner = builder.add_nested_type(outer, "Inner", TypeKind::Struct);
        let model = builder.build();

        assert_eq!(model.type_full_name(outer), "App.Core.Outer");
        assert_eq!(model.type_full_name(inner), "App.Core.Outer.Inner");
        assert_eq!(model.unit(unit).types, vec![outer]);
        assert!(model.is_struct(&TypeRef::Named(inner)));
        assert_eq!(model.find_type("App.Core.Outer.Inner"), Some(inner));
    }

    #[test]
    fn test_method_signature_and_equivalence() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let list = builder.add_type(unit, "Lib", "List", TypeKind::Class);
        let stubs = builder.add_type(unit, "Lib", "ListStubs", TypeKind::Class);

        let add = builder.add_method(list, "Add");
        builder
            .method_mut(add)
            .parameters
            .push(Parameter::by_value("item", TypeRef::int32()));
        let stub_add = builder.add_method(stubs, "Add");
        builder
            .method_mut(stub_add)
            .parameters
            .push(Parameter::by_value("value", TypeRef::int32()));
        let other = builder.add_method(stubs, "Add");
        builder
            .method_mut(other)
            .parameters
            .push(Parameter::by_reference("value", TypeRef::int32()));
        let model = builder.build();

        assert_eq!(model.method_signature(add), "Lib.List.Add(System.Int32)");
        assert!(model.methods_are_equivalent(add, stub_add));
        assert!(!model.methods_are_equivalent(add, other));
        assert_eq!(model.methods_named(stubs, "Add").count(), 2);
    }

    #[test]
    fn test_unspecialized_follows_chain() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let generic = builder.add_type(unit, "Lib", "Handler", TypeKind::Delegate);
        let instance = builder.add_type(unit, "Lib", "Handler_Int32", TypeKind::Delegate);
        builder.type_mut(instance).unspecialized = Some(generic);
        let model = builder.build();

        assert_eq!(model.unspecialized(instance), generic);
        assert_eq!(model.unspecialized(generic), generic);
    }
}
