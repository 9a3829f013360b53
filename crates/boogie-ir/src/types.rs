// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

/// Boogie types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    /// Unbounded integer
    Int,
    Real,
    /// Object references, declared by the translator prelude as `type Ref;`
    Ref,
    /// Field names of the two-dimensional heap
    Field,
    /// Boxed heap cells
    Box,
    /// Runtime type values (`$DynamicType(o)`)
    TypeValue,
    /// Any other user-declared type
    Named(String),
    /// Map type, e.g. `[Ref]int`
    Map { keys: Vec<Type>, value: Box<Type> },
}

impl Type {
    pub fn map(keys: Vec<Type>, value: Type) -> Self {
        Type::Map {
            keys,
            value: Box::new(value),
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Type::Ref)
    }
}
