// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Procedures the translator synthesizes for types: static initializers and the default
//! and copy constructors of structs

use crate::heap::AccessType;
use crate::naming;
use crate::sink::Sink;
use boogie_ir::{
    Attribute, Declaration, Expr, Implementation, Procedure, Stmt, StmtListBuilder, Type,
};
use log::debug;
use object_model::{TypeId, TypeRef};

/// `T.#cctor()` assigning the default value to every static field of `ty`
pub fn create_static_constructor(sink: &mut Sink, ty: TypeId) {
    let env = sink.env();
    let name = naming::static_constructor_name(env, ty);
    debug!("synthesizing static initializer `{}`", name);
    let decl = sink
        .program_mut()
        .declare_procedure(Procedure::new(name, vec![], vec![]));

    sink.begin_method(None);
    let mut builder = StmtListBuilder::new();
    initialize_fields(sink, ty, None, &mut builder);
    add_implementation(sink, decl, builder, None);
}

/// `T.#default_ctor(this)` assigning the default value to every instance field of `ty`
pub fn create_default_struct_constructor(sink: &mut Sink, ty: TypeId) {
    let decl = sink.find_or_create_procedure_for_default_struct_ctor(ty);
    let this = Expr::ident("this");

    sink.begin_method(None);
    let mut builder = StmtListBuilder::new();
    initialize_fields(sink, ty, Some(this), &mut builder);
    add_implementation(sink, decl, builder, Some(Attribute::int("inline", 1)));
}

/// `T.#copy_ctor(this) returns (other)`: a fresh instance of the same dynamic type whose
/// fields are copies of those of `this`. Struct-typed fields are copied recursively.
pub fn create_struct_copy_constructor(sink: &mut Sink, ty: TypeId) {
    let env = sink.env();
    let decl = sink.find_or_create_procedure_for_struct_copy(ty);
    let this = Expr::ident("this");
    let other = Expr::ident("other");

    sink.begin_method(None);
    let mut builder = StmtListBuilder::new();
    builder.add(Stmt::call(
        sink.heap().allocation_procedure(),
        vec![],
        vec!["other".to_string()],
    ));
    builder.add(Stmt::assume(Expr::eq(
        sink.heap().dynamic_type(other.clone()),
        sink.heap().dynamic_type(this.clone()),
    )));

    for field in &env.type_def(ty).fields {
        let def = env.field(*field);
        if def.is_static {
            continue;
        }
        let var = sink.find_or_create_field_variable(*field);
        let field_type = sink.boogie_type(&def.ty);
        let mut value = sink
            .heap()
            .read_heap(this.clone(), &var.name, AccessType::Struct, &field_type);
        if let TypeRef::Named(field_struct) = &def.ty {
            if env.is_struct(&def.ty) {
                let copy_ctor = sink.find_or_create_procedure_for_struct_copy(*field_struct);
                let copy = sink.create_fresh_local(Type::Ref);
                builder.add(Stmt::call(
                    sink.procedure_name(copy_ctor),
                    vec![value],
                    vec![copy.name.clone()],
                ));
                value = copy.expr();
            }
        }
        sink.heap().write_heap(
            other.clone(),
            &var.name,
            value,
            AccessType::Struct,
            &field_type,
            &mut builder,
        );
    }
    add_implementation(sink, decl, builder, Some(Attribute::int("inline", 1)));
}

/// Assigns the default value to every field of `ty` in declaration order: the instance
/// fields of `instance`, or the static fields when there is no instance
pub(crate) fn initialize_fields(
    sink: &mut Sink,
    ty: TypeId,
    instance: Option<Expr>,
    builder: &mut StmtListBuilder,
) {
    let env = sink.env();
    for field in &env.type_def(ty).fields {
        let def = env.field(*field);
        if def.is_static != instance.is_none() {
            continue;
        }
        let var = sink.find_or_create_field_variable(*field);
        let value = default_field_value(sink, &def.ty, builder);
        match &instance {
            Some(object) => {
                let field_type = sink.boogie_type(&def.ty);
                sink.heap().write_heap(
                    object.clone(),
                    &var.name,
                    value,
                    AccessType::for_field(env, *field),
                    &field_type,
                    builder,
                );
            }
            None => builder.add(Stmt::assign(var.name, value)),
        }
    }
}

/// Struct-typed fields get a fresh default-constructed instance
fn default_field_value(sink: &mut Sink, ty: &TypeRef, builder: &mut StmtListBuilder) -> Expr {
    let struct_type = match ty {
        TypeRef::Named(id) if sink.env().is_struct(ty) => *id,
        _ => return sink.default_value(ty),
    };
    let ctor = sink.find_or_create_procedure_for_default_struct_ctor(struct_type);
    let object = sink.create_fresh_local(Type::Ref);
    builder.add(Stmt::call(
        sink.heap().allocation_procedure(),
        vec![],
        vec![object.name.clone()],
    ));
    builder.add(Stmt::call(
        sink.procedure_name(ctor),
        vec![object.expr()],
        vec![],
    ));
    object.expr()
}

fn add_implementation(
    sink: &mut Sink,
    decl: boogie_ir::ProcedureId,
    builder: StmtListBuilder,
    attribute: Option<Attribute>,
) {
    let locals = sink.local_vars();
    let program = sink.program_mut();
    let mut implementation =
        Implementation::for_procedure(decl, program.procedure(decl), locals, builder.collect());
    if let Some(attribute) = attribute {
        implementation = implementation.with_attribute(attribute);
    }
    program.add_top_level_declaration(Declaration::Implementation(implementation));
}
