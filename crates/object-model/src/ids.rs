// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Interned entity keys
//!
//! Every entity of the model lives in an arena owned by `ObjectModel` and is addressed by a
//! stable integer key. Keys are cheap to copy and compare, and double as map keys in the
//! translator.

use std::fmt;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// Position of the entity in its arena
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

entity_id!(
    /// Key of an assembly or module
    UnitId,
    "unit#"
);
entity_id!(
    /// Key of a type definition (including generic parameters)
    TypeId,
    "type#"
);
entity_id!(
    /// Key of a method definition
    MethodId,
    "method#"
);
entity_id!(
    /// Key of a field definition
    FieldId,
    "field#"
);
entity_id!(
    /// Key of a local variable, scoped to the body that declares it
    LocalId,
    "local#"
);
