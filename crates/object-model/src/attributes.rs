// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Custom attributes attached to types and methods

use crate::ids::TypeId;

/// Value of a constant attribute argument
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Bool(bool),
    Char(char),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    String(String),
    Null,
}

/// A constant attribute argument. `enum_type` is set when the constant is a member of an enum.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataConstant {
    pub value: ConstantValue,
    pub enum_type: Option<TypeId>,
}

impl MetadataConstant {
    pub fn new(value: ConstantValue) -> Self {
        Self {
            value,
            enum_type: None,
        }
    }

    pub fn enum_member(enum_type: TypeId, value: i32) -> Self {
        Self {
            value: ConstantValue::Int32(value),
            enum_type: Some(enum_type),
        }
    }
}

/// Argument of a custom attribute
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataExpression {
    Constant(MetadataConstant),
    /// `typeof(T)`
    TypeOf(TypeId),
}

/// A custom attribute application, e.g. `[Stub(typeof(ListStubs))]`
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttribute {
    /// Full name of the attribute type, e.g. `BytecodeTranslator.StubAttribute`
    pub type_name: String,
    pub arguments: Vec<MetadataExpression>,
}

impl CustomAttribute {
    pub fn new(type_name: &str, arguments: Vec<MetadataExpression>) -> Self {
        Self {
            type_name: type_name.to_string(),
            arguments,
        }
    }
}
