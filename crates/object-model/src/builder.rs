// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Incremental construction of an `ObjectModel`
//!
//! Front ends (and tests) add units, types and members one at a time and receive their
//! keys back. Containment lists (`Unit::types`, `TypeDef::fields`, ...) are maintained
//! by the builder.

use crate::{
    FieldDef, FieldId, MethodDef, MethodId, MethodKind, ObjectModel, TypeDef, TypeId, TypeKind,
    TypeRef, Unit, UnitId, UnitKind,
};

#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: ObjectModel,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_assembly(&mut self, name: &str) -> UnitId {
        self.add_unit(name, UnitKind::Assembly)
    }

    pub fn add_module(&mut self, name: &str) -> UnitId {
        self.add_unit(name, UnitKind::Module)
    }

    fn add_unit(&mut self, name: &str, kind: UnitKind) -> UnitId {
        let id = UnitId::new(self.model.units.len());
        self.model.units.push(Unit {
            id,
            name: name.to_string(),
            kind,
            entry_point: None,
            types: vec![],
        });
        id
    }

    pub fn set_entry_point(&mut self, unit: UnitId, method: MethodId) {
        self.model.units[unit.index()].entry_point = Some(method);
    }

    /// Adds a top-level type to `unit`
    pub fn add_type(&mut self, unit: UnitId, namespace: &str, name: &str, kind: TypeKind) -> TypeId {
        let id = self.new_type(unit, namespace, name, kind);
        self.model.units[unit.index()].types.push(id);
        id
    }

    pub fn add_class(&mut self, unit: UnitId, namespace: &str, name: &str) -> TypeId {
        self.add_type(unit, namespace, name, TypeKind::Class)
    }

    pub fn add_struct(&mut self, unit: UnitId, namespace: &str, name: &str) -> TypeId {
        self.add_type(unit, namespace, name, TypeKind::Struct)
    }

    pub fn add_nested_type(&mut self, outer: TypeId, name: &str, kind: TypeKind) -> TypeId {
        let (unit, namespace) = {
            let outer_def = &self.model.types[outer.index()];
            (outer_def.unit, outer_def.namespace.clone())
        };
        let id = self.new_type(unit, &namespace, name, kind);
        self.model.types[id.index()].containing_type = Some(outer);
        self.model.types[outer.index()].nested_types.push(id);
        id
    }

    /// Adds a type that is not listed by any unit or outer type, such as a generic
    /// parameter or a decompiler helper type
    pub fn add_detached_type(
        &mut self,
        unit: UnitId,
        namespace: &str,
        name: &str,
        kind: TypeKind,
    ) -> TypeId {
        self.new_type(unit, namespace, name, kind)
    }

    fn new_type(&mut self, unit: UnitId, namespace: &str, name: &str, kind: TypeKind) -> TypeId {
        let id = TypeId::new(self.model.types.len());
        self.model
            .types
            .push(TypeDef::new(id, unit, namespace, name, kind));
        id
    }

    pub fn add_field(&mut self, ty: TypeId, name: &str, field_ty: TypeRef, is_static: bool) -> FieldId {
        let id = self.add_detached_field(ty, name, field_ty, is_static);
        self.model.types[ty.index()].fields.push(id);
        id
    }

    /// Adds a field without listing it among the declared fields of `ty`
    pub fn add_detached_field(
        &mut self,
        ty: TypeId,
        name: &str,
        field_ty: TypeRef,
        is_static: bool,
    ) -> FieldId {
        let id = FieldId::new(self.model.fields.len());
        self.model.fields.push(FieldDef {
            id,
            containing_type: ty,
            name: name.to_string(),
            ty: field_ty,
            is_static,
        });
        id
    }

    pub fn add_method(&mut self, ty: TypeId, name: &str) -> MethodId {
        self.add_method_of_kind(ty, name, MethodKind::Normal)
    }

    pub fn add_constructor(&mut self, ty: TypeId) -> MethodId {
        self.add_method_of_kind(ty, ".ctor", MethodKind::Constructor)
    }

    pub fn add_static_constructor(&mut self, ty: TypeId) -> MethodId {
        self.add_method_of_kind(ty, ".cctor", MethodKind::StaticConstructor)
    }

    pub fn add_method_of_kind(&mut self, ty: TypeId, name: &str, kind: MethodKind) -> MethodId {
        let id = self.add_detached_method(ty, name, kind);
        self.model.types[ty.index()].methods.push(id);
        id
    }

    /// Adds a method without listing it among the declared methods of `ty`
    pub fn add_detached_method(&mut self, ty: TypeId, name: &str, kind: MethodKind) -> MethodId {
        let id = MethodId::new(self.model.methods.len());
        self.model.methods.push(MethodDef::new(id, ty, name, kind));
        id
    }

    pub fn type_mut(&mut self, id: TypeId) -> &mut TypeDef {
        &mut self.model.types[id.index()]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDef {
        &mut self.model.methods[id.index()]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDef {
        &mut self.model.fields[id.index()]
    }

    pub fn build(self) -> ObjectModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimitiveType;

    #[test]
    fn test_builder_maintains_containment() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_module("Lib.netmodule");
        let point = builder.add_struct(unit, "Geometry", "Point");
        let x = builder.add_field(point, "X", TypeRef::int32(), false);
        let origin = builder.add_field(
            point,
            "Origin",
            TypeRef::Named(point),
            true,
        );
        let ctor = builder.add_constructor(point);
        let cctor = builder.add_static_constructor(point);
        let helper = builder.add_detached_method(point, "<Lambda>b__0", MethodKind::Normal);
        let model = builder.build();

        let def = model.type_def(point);
        assert_eq!(def.fields, vec![x, origin]);
        assert_eq!(def.methods, vec![ctor, cctor]);
        assert!(!def.methods.contains(&helper));
        assert!(model.method(cctor).is_static);
        assert!(model.method(cctor).is_static_constructor());
        assert!(model.method(ctor).is_constructor());
        assert!(!model.method(ctor).is_static);
        assert_eq!(model.unit(unit).kind, UnitKind::Module);
        assert_eq!(
            model.field(x).ty,
            TypeRef::Primitive(PrimitiveType::Int32)
        );
    }

    #[test]
    fn test_entry_point() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let program = builder.add_class(unit, "", "Program");
        let main = builder.add_method(program, "Main");
        builder.method_mut(main).is_static = true;
        builder.set_entry_point(unit, main);
        let model = builder.build();

        assert_eq!(model.unit(unit).entry_point, Some(main));
        assert_eq!(model.type_full_name(program), "Program");
    }
}
