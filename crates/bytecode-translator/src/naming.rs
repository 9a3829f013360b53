// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Boogie names for translated entities

use object_model::{FieldId, MethodId, MethodKind, ObjectModel, TypeId, TypeRef};

/// Replaces every character Boogie does not accept in identifiers with `_`
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "_.$#'`~^\\?".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn type_name(env: &ObjectModel, ty: TypeId) -> String {
    sanitize(&env.type_full_name(ty))
}

pub fn type_ref_name(env: &ObjectModel, ty: &TypeRef) -> String {
    sanitize(&env.type_ref_name(ty))
}

/// Conversion operators overload on their result type alone
const CONVERSION_OPERATORS: [&str; 2] = ["op_Implicit", "op_Explicit"];

/// `Ns.C.M$System.Int32`; constructors become `#ctor` and type initializers `#cctor`.
/// Conversion operators also carry their result type, e.g.
/// `Ns.Money.op_Explicit$Ns.Money$System.Int64`.
pub fn procedure_name(env: &ObjectModel, method: MethodId) -> String {
    let def = env.method(method);
    let member = match def.kind {
        MethodKind::Normal => sanitize(&def.name),
        MethodKind::Constructor => "#ctor".to_string(),
        MethodKind::StaticConstructor => "#cctor".to_string(),
    };
    let mut name = format!("{}.{}", type_name(env, def.containing_type), member);
    for param in &def.parameters {
        name.push('$');
        name.push_str(&type_ref_name(env, &param.ty));
        if param.is_by_reference {
            name.push('^');
        }
    }
    if def.kind == MethodKind::Normal && CONVERSION_OPERATORS.contains(&def.name.as_str()) {
        name.push('$');
        name.push_str(&type_ref_name(env, &def.return_type));
    }
    name
}

/// `F$Ns.C.f`
pub fn field_name(env: &ObjectModel, field: FieldId) -> String {
    let def = env.field(field);
    format!(
        "F${}.{}",
        type_name(env, def.containing_type),
        sanitize(&def.name)
    )
}

pub fn static_constructor_name(env: &ObjectModel, ty: TypeId) -> String {
    format!("{}.#cctor", type_name(env, ty))
}

pub fn default_struct_ctor_name(env: &ObjectModel, ty: TypeId) -> String {
    format!("{}.#default_ctor", type_name(env, ty))
}

pub fn struct_copy_ctor_name(env: &ObjectModel, ty: TypeId) -> String {
    format!("{}.#copy_ctor", type_name(env, ty))
}

/// Name of the nullary function standing for the type at runtime
pub fn type_constructor_name(env: &ObjectModel, ty: TypeId) -> String {
    format!("T${}", type_name(env, ty))
}
