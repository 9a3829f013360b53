// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Type definitions and type references

use crate::attributes::CustomAttribute;
use crate::ids::{FieldId, MethodId, TypeId, UnitId};

/// The kind of a type definition.
///
/// The set is closed: the translator matches on it exhaustively, and anything the
/// decompiler could not place in one of the known kinds arrives as `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    GenericParameter,
    Unrecognized,
}

/// Built-in types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveType {
    Boolean,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    IntPtr,
    Float32,
    Float64,
    String,
    Object,
}

impl PrimitiveType {
    /// Name as it appears in signatures, e.g. `System.Int32`
    pub fn full_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "System.Boolean",
            PrimitiveType::Char => "System.Char",
            PrimitiveType::Int8 => "System.SByte",
            PrimitiveType::Int16 => "System.Int16",
            PrimitiveType::Int32 => "System.Int32",
            PrimitiveType::Int64 => "System.Int64",
            PrimitiveType::UInt8 => "System.Byte",
            PrimitiveType::UInt16 => "System.UInt16",
            PrimitiveType::UInt32 => "System.UInt32",
            PrimitiveType::UInt64 => "System.UInt64",
            PrimitiveType::IntPtr => "System.IntPtr",
            PrimitiveType::Float32 => "System.Single",
            PrimitiveType::Float64 => "System.Double",
            PrimitiveType::String => "System.String",
            PrimitiveType::Object => "System.Object",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveType::Char
                | PrimitiveType::Int8
                | PrimitiveType::Int16
                | PrimitiveType::Int32
                | PrimitiveType::Int64
                | PrimitiveType::UInt8
                | PrimitiveType::UInt16
                | PrimitiveType::UInt32
                | PrimitiveType::UInt64
                | PrimitiveType::IntPtr
        )
    }

    pub fn is_floating_point(self) -> bool {
        matches!(self, PrimitiveType::Float32 | PrimitiveType::Float64)
    }

    /// Strings and `object` are reference types
    pub fn is_reference(self) -> bool {
        matches!(self, PrimitiveType::String | PrimitiveType::Object)
    }
}

/// A reference to a type as it appears in signatures, fields and expressions
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveType),
    Named(TypeId),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn int32() -> Self {
        TypeRef::Primitive(PrimitiveType::Int32)
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveType::Boolean)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }
}

/// Members that the decompiler synthesized for a type (closure fields, lifted methods,
/// display classes) and that are not part of the declared member lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperMember {
    Field(FieldId),
    Method(MethodId),
    Type(TypeId),
}

/// A type definition
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub id: TypeId,
    pub unit: UnitId,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    pub name: String,
    pub kind: TypeKind,
    /// Enclosing type for nested types
    pub containing_type: Option<TypeId>,
    /// Base class followed by implemented interfaces
    pub base_types: Vec<TypeId>,
    pub generic_parameters: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    pub nested_types: Vec<TypeId>,
    pub private_helper_members: Vec<HelperMember>,
    pub attributes: Vec<CustomAttribute>,
    /// Generic definition this type is an instance of
    pub unspecialized: Option<TypeId>,
}

impl TypeDef {
    pub fn new(id: TypeId, unit: UnitId, namespace: &str, name: &str, kind: TypeKind) -> Self {
        Self {
            id,
            unit,
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            containing_type: None,
            base_types: vec![],
            generic_parameters: vec![],
            fields: vec![],
            methods: vec![],
            nested_types: vec![],
            private_helper_members: vec![],
            attributes: vec![],
            unspecialized: None,
        }
    }

    pub fn is_struct(&self) -> bool {
        self.kind == TypeKind::Struct
    }
}
