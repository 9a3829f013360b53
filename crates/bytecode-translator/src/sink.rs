// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! The translation context
//!
//! One `Sink` exists per run. It owns the output program and every mapping from object
//! model entities to their Boogie counterparts, and it is the only place such mappings are
//! created: all lookups are get-or-create, so a type, method or field is mapped once no
//! matter how many times (or from where) it is referenced.

use crate::contract_translator;
use crate::error::TranslationError;
use crate::heap::{heap_for, Heap, ALLOCATION_PROCEDURE, DYNAMIC_TYPE_FUNCTION};
use crate::naming;
use crate::options::TranslatorOptions;
use crate::stubs;
use boogie_ir::{
    BinaryOp, Declaration, Ensures, Expr, Function, Procedure, ProcedureId, Program, Type, Variable,
};
use indexmap::IndexMap;
use log::{debug, info};
use object_model::{
    FieldId, LocalId, MethodId, ObjectModel, PrimitiveType, TypeId, TypeRef, UnitId,
};
use std::collections::{BTreeMap, BTreeSet};

pub const NULL: &str = "null";
pub const EXCEPTION_VARIABLE: &str = "$Exception";
pub const ALLOC_VARIABLE: &str = "$Alloc";
pub const SUBTYPE_FUNCTION: &str = "$Subtype";

/// Type-level information of a translated class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Nullary function standing for the type, e.g. `T$Shapes.Circle`
    pub constructor: String,
}

/// How a source parameter is represented in the procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub index: usize,
    pub name: String,
    pub is_by_reference: bool,
    /// Source type, used to copy struct arguments at call sites
    pub ty: TypeRef,
    /// The in-formal (`p$in`) carrying the incoming value. Absent for `out` parameters.
    pub in_parameter_copy: Option<Variable>,
    /// The local working copy of a by-value parameter, or the out-formal of a by-reference one
    pub out_parameter_copy: Variable,
}

impl MethodParameter {
    /// Whether a caller passes a value in for this parameter
    pub fn takes_input(&self) -> bool {
        self.in_parameter_copy.is_some()
    }
}

/// A declared procedure together with the variables its bodies use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureInfo {
    pub decl: ProcedureId,
    pub formal_map: Vec<MethodParameter>,
    pub this_variable: Option<Variable>,
    pub return_variable: Option<Variable>,
    /// Holds the exception raised by a callee, even when this method swallows it
    pub local_exc_variable: Variable,
    pub label_variable: Variable,
}

impl ProcedureInfo {
    pub fn formal(&self, index: u16) -> Option<&MethodParameter> {
        self.formal_map.get(index as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LocalKey {
    Source(LocalId),
    Fresh(usize),
}

pub struct Sink<'env> {
    env: &'env ObjectModel,
    options: TranslatorOptions,
    heap: Box<dyn Heap>,
    program: Program,

    translated_types: BTreeSet<TypeId>,
    type_infos: BTreeMap<TypeId, TypeInfo>,
    type_constructors: BTreeMap<TypeId, String>,
    type_references: BTreeSet<TypeId>,
    delegate_types: BTreeSet<TypeId>,

    /// Keyed by the stub-resolved method
    procedures: BTreeMap<MethodId, ProcedureInfo>,
    contract_errors: BTreeMap<MethodId, TranslationError>,
    default_struct_ctors: BTreeMap<TypeId, ProcedureId>,
    struct_copy_ctors: BTreeMap<TypeId, ProcedureId>,

    field_variables: BTreeMap<FieldId, Variable>,
    string_literals: BTreeMap<String, Variable>,

    /// Locals of the method being translated, in creation order
    local_var_map: IndexMap<LocalKey, Variable>,
    fresh_counter: usize,
    /// Numbers the `captureState` points of the method being translated
    state_counter: usize,
    /// Numbers instrumented branches across the whole program
    branch_counter: usize,
    method_being_translated: Option<MethodId>,
}

impl<'env> Sink<'env> {
    pub fn new(env: &'env ObjectModel, options: TranslatorOptions) -> Self {
        let heap = heap_for(options.heap_representation);
        let mut sink = Self {
            env,
            options,
            heap,
            program: Program::new(),
            translated_types: BTreeSet::new(),
            type_infos: BTreeMap::new(),
            type_constructors: BTreeMap::new(),
            type_references: BTreeSet::new(),
            delegate_types: BTreeSet::new(),
            procedures: BTreeMap::new(),
            contract_errors: BTreeMap::new(),
            default_struct_ctors: BTreeMap::new(),
            struct_copy_ctors: BTreeMap::new(),
            field_variables: BTreeMap::new(),
            string_literals: BTreeMap::new(),
            local_var_map: IndexMap::new(),
            fresh_counter: 0,
            state_counter: 0,
            branch_counter: 0,
            method_being_translated: None,
        };
        sink.add_prelude();
        sink
    }

    fn add_prelude(&mut self) {
        let program = &mut self.program;
        program.add_top_level_declaration(Declaration::TypeDecl("Ref".to_string()));
        program.add_top_level_declaration(Declaration::TypeDecl("Type".to_string()));
        program.add_top_level_declaration(Declaration::Constant {
            var: Variable::new(NULL, Type::Ref),
            unique: true,
        });
        program.add_top_level_declaration(Declaration::Function(Function::new(
            DYNAMIC_TYPE_FUNCTION,
            vec![Variable::new("o", Type::Ref)],
            Type::TypeValue,
        )));
        program.add_top_level_declaration(Declaration::Function(Function::new(
            SUBTYPE_FUNCTION,
            vec![
                Variable::new("t", Type::TypeValue),
                Variable::new("u", Type::TypeValue),
            ],
            Type::Bool,
        )));
        for decl in self.heap.prelude() {
            program.add_top_level_declaration(decl);
        }
        if self.options.model_exceptions.is_modeled() {
            program.add_top_level_declaration(Declaration::GlobalVariable(Variable::new(
                EXCEPTION_VARIABLE,
                Type::Ref,
            )));
        }

        program.add_top_level_declaration(Declaration::GlobalVariable(Variable::new(
            ALLOC_VARIABLE,
            Type::map(vec![Type::Ref], Type::Bool),
        )));
        let result = Expr::ident("o");
        let allocated = Expr::select(Expr::ident(ALLOC_VARIABLE), vec![result.clone()]);
        let mut alloc = Procedure::new(
            ALLOCATION_PROCEDURE,
            vec![],
            vec![Variable::new("o", Type::Ref)],
        );
        alloc.modifies.push(ALLOC_VARIABLE.to_string());
        alloc.ensures = vec![
            Ensures {
                condition: Expr::neq(result, Expr::ident(NULL)),
                free: false,
            },
            Ensures {
                condition: !Expr::old(allocated.clone()),
                free: false,
            },
            Ensures {
                condition: allocated,
                free: false,
            },
        ];
        program.declare_procedure(alloc);
    }

    // ==============================================================================
    // Accessors

    pub fn env(&self) -> &'env ObjectModel {
        self.env
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    pub fn heap(&self) -> &dyn Heap {
        self.heap.as_ref()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    pub fn into_program(self) -> Program {
        self.program
    }

    pub fn is_delegate_type(&self, ty: TypeId) -> bool {
        self.delegate_types.contains(&ty)
    }

    pub fn has_type_reference(&self, ty: TypeId) -> bool {
        self.type_references.contains(&ty)
    }

    // ==============================================================================
    // Assemblies and types

    pub fn begin_assembly(&mut self, unit: UnitId) {
        info!("translating assembly `{}`", self.env.unit(unit).name);
    }

    pub fn end_assembly(&mut self, unit: UnitId) {
        debug!("done with assembly `{}`", self.env.unit(unit).name);
    }

    /// Whether `ty` should be translated now: it passes the exemption policy and has not
    /// been translated before
    pub fn translate_type(&mut self, ty: TypeId) -> bool {
        let full_name = self.env.type_full_name(ty);
        if !self.options.should_translate(&full_name) {
            debug!("type `{}` is exempt from translation", full_name);
            return false;
        }
        self.translated_types.insert(ty)
    }

    fn find_or_create_type_constructor(&mut self, ty: TypeId) -> String {
        if let Some(name) = self.type_constructors.get(&ty) {
            return name.clone();
        }
        let name = naming::type_constructor_name(self.env, ty);
        self.program
            .add_top_level_declaration(Declaration::Function(Function::new(
                name.clone(),
                vec![],
                Type::TypeValue,
            )));
        self.type_constructors.insert(ty, name.clone());
        name
    }

    pub fn find_or_define_type(&mut self, ty: TypeId) -> TypeInfo {
        if let Some(info) = self.type_infos.get(&ty) {
            return info.clone();
        }
        let info = TypeInfo {
            constructor: self.find_or_create_type_constructor(ty),
        };
        self.type_infos.insert(ty, info.clone());
        info
    }

    /// The runtime type value of `ty`
    pub fn find_or_create_type_reference(&mut self, ty: TypeId) -> Expr {
        if self.type_references.insert(ty) {
            debug!("referencing type `{}`", self.env.type_full_name(ty));
        }
        Expr::call(self.find_or_create_type_constructor(ty), vec![])
    }

    pub fn add_delegate_type(&mut self, ty: TypeId) {
        self.delegate_types.insert(ty);
    }

    /// Emits `axiom $Subtype(T$C(), T$B());` for every base type of `ty`
    pub fn declare_parents(&mut self, ty: TypeId, constructor: &str) {
        let env = self.env;
        for base in &env.type_def(ty).base_types {
            let parent = self.find_or_create_type_reference(*base);
            let fact = Expr::call(
                SUBTYPE_FUNCTION,
                vec![Expr::call(constructor, vec![]), parent],
            );
            self.program
                .add_top_level_declaration(Declaration::Axiom(fact));
        }
    }

    // ==============================================================================
    // Types and values

    pub fn boogie_type(&self, ty: &TypeRef) -> Type {
        match ty {
            TypeRef::Primitive(PrimitiveType::Boolean) => Type::Bool,
            TypeRef::Primitive(p) if p.is_floating_point() => Type::Real,
            TypeRef::Primitive(p) if p.is_reference() => Type::Ref,
            TypeRef::Primitive(_) => Type::Int,
            TypeRef::Named(_) if self.env.is_enum(ty) => Type::Int,
            TypeRef::Named(_) => Type::Ref,
            TypeRef::Array(_) => Type::Ref,
            // never the type of a variable
            TypeRef::Void => Type::Int,
        }
    }

    /// Default value of a non-struct type
    pub fn default_value(&self, ty: &TypeRef) -> Expr {
        match self.boogie_type(ty) {
            Type::Bool => Expr::bool(false),
            Type::Int => Expr::int(0),
            Type::Real => Expr::Literal(boogie_ir::Literal::Real("0.0".to_string())),
            _ => Expr::ident(NULL),
        }
    }

    pub fn find_or_create_string_literal(&mut self, value: &str) -> Expr {
        if let Some(var) = self.string_literals.get(value) {
            return var.expr();
        }
        let var = Variable::new(
            format!("$string_literal_{}", self.string_literals.len()),
            Type::Ref,
        );
        self.program.add_top_level_declaration(Declaration::Constant {
            var: var.clone(),
            unique: true,
        });
        self.string_literals.insert(value.to_string(), var.clone());
        var.expr()
    }

    // ==============================================================================
    // Fields

    /// Global for a static field, heap declaration for an instance field
    pub fn find_or_create_field_variable(&mut self, field: FieldId) -> Variable {
        if let Some(var) = self.field_variables.get(&field) {
            return var.clone();
        }
        let def = self.env.field(field);
        let name = naming::field_name(self.env, field);
        let ty = self.boogie_type(&def.ty);
        let decl = if def.is_static {
            Declaration::GlobalVariable(Variable::new(name.clone(), ty))
        } else {
            self.heap.field_declaration(&name, &ty)
        };
        let var = match &decl {
            Declaration::GlobalVariable(var) | Declaration::Constant { var, .. } => var.clone(),
            _ => Variable::new(name, Type::Field),
        };
        debug!("declared field variable `{}`", var.name);
        self.program.add_top_level_declaration(decl);
        self.field_variables.insert(field, var.clone());
        var
    }

    // ==============================================================================
    // Procedures

    /// Returns the procedure for `method` (or its stub), declaring it on first request.
    ///
    /// The declaration is registered before its contract is translated, so contracts can
    /// refer to the method itself. If the contract cannot be translated the procedure stays
    /// declared without it and the error is kept for `contract_error`.
    pub fn find_or_create_procedure(&mut self, method: MethodId) -> ProcedureInfo {
        let key = stubs::resolve_stub(self.env, method).unwrap_or(method);
        if let Some(info) = self.procedures.get(&key) {
            return info.clone();
        }

        let env = self.env;
        let def = env.method(key);
        let mut in_params = vec![];
        let mut out_params = vec![];
        let this_variable = (!def.is_static).then(|| Variable::new("this", Type::Ref));
        in_params.extend(this_variable.clone());

        let mut formal_map = vec![];
        for (index, param) in def.parameters.iter().enumerate() {
            let name = naming::sanitize(&param.name);
            let ty = self.boogie_type(&param.ty);
            let (in_parameter_copy, out_parameter_copy) = if param.is_by_reference {
                // a `ref` parameter carries a value in as well as out
                let input = (!param.is_out)
                    .then(|| Variable::new(format!("{}$in", name), ty.clone()));
                in_params.extend(input.clone());
                let out = Variable::new(name.clone(), ty);
                out_params.push(out.clone());
                (input, out)
            } else {
                let input = Variable::new(format!("{}$in", name), ty.clone());
                in_params.push(input.clone());
                (Some(input), Variable::new(name.clone(), ty))
            };
            formal_map.push(MethodParameter {
                index,
                name,
                is_by_reference: param.is_by_reference,
                ty: param.ty.clone(),
                in_parameter_copy,
                out_parameter_copy,
            });
        }

        let return_variable = (!def.return_type.is_void())
            .then(|| Variable::new("$result", self.boogie_type(&def.return_type)));
        out_params.extend(return_variable.clone());

        let name = naming::procedure_name(env, key);
        debug!("declaring procedure `{}`", name);
        let decl = self
            .program
            .declare_procedure(Procedure::new(name, in_params, out_params));
        let info = ProcedureInfo {
            decl,
            formal_map,
            this_variable,
            return_variable,
            local_exc_variable: Variable::new("$localExc", Type::Ref),
            label_variable: Variable::new("$label", Type::Int),
        };
        self.procedures.insert(key, info.clone());

        if let Some(contract) = &def.contract {
            match contract_translator::translate_contract(self, key, contract) {
                Ok(translated) => {
                    let proc = self.program.procedure_mut(decl);
                    proc.requires = translated.requires;
                    proc.ensures = translated.ensures;
                    proc.modifies = translated.modifies;
                }
                Err(err) => {
                    self.contract_errors.insert(key, err);
                }
            }
        }
        if self.options.monotonic_heap {
            self.program
                .procedure_mut(decl)
                .ensures
                .push(allocation_is_monotonic());
        }
        info
    }

    pub fn procedure_info(&self, method: MethodId) -> Option<&ProcedureInfo> {
        let key = stubs::resolve_stub(self.env, method).unwrap_or(method);
        self.procedures.get(&key)
    }

    /// The error raised while translating the contract of `method` (or its stub), if any
    pub fn contract_error(&self, method: MethodId) -> Option<&TranslationError> {
        let key = stubs::resolve_stub(self.env, method).unwrap_or(method);
        self.contract_errors.get(&key)
    }

    pub fn procedure_name(&self, id: ProcedureId) -> String {
        self.program.procedure(id).name.clone()
    }

    /// `T.#default_ctor(this: Ref)`
    pub fn find_or_create_procedure_for_default_struct_ctor(&mut self, ty: TypeId) -> ProcedureId {
        if let Some(id) = self.default_struct_ctors.get(&ty) {
            return *id;
        }
        let proc = Procedure::new(
            naming::default_struct_ctor_name(self.env, ty),
            vec![Variable::new("this", Type::Ref)],
            vec![],
        );
        let id = self.program.declare_procedure(proc);
        self.default_struct_ctors.insert(ty, id);
        id
    }

    /// `T.#copy_ctor(this: Ref) returns (other: Ref)`
    pub fn find_or_create_procedure_for_struct_copy(&mut self, ty: TypeId) -> ProcedureId {
        if let Some(id) = self.struct_copy_ctors.get(&ty) {
            return *id;
        }
        let proc = Procedure::new(
            naming::struct_copy_ctor_name(self.env, ty),
            vec![Variable::new("this", Type::Ref)],
            vec![Variable::new("other", Type::Ref)],
        );
        let id = self.program.declare_procedure(proc);
        self.struct_copy_ctors.insert(ty, id);
        id
    }

    // ==============================================================================
    // Locals

    /// Starts a new body: forgets the locals of the previous one. `None` for synthesized
    /// bodies that have no source method.
    pub fn begin_method(&mut self, method: Option<MethodId>) {
        self.local_var_map.clear();
        self.state_counter = 0;
        self.method_being_translated = method;
    }

    pub fn find_or_create_local(&mut self, local: LocalId) -> Option<Variable> {
        if let Some(var) = self.local_var_map.get(&LocalKey::Source(local)) {
            return Some(var.clone());
        }
        let method = self.method_being_translated?;
        let def = self.env.method(method).body.as_ref()?.local(local)?;
        let mut name = naming::sanitize(&def.name);
        if self.local_var_map.values().any(|v| v.name == name) {
            name = format!("{}${}", name, local.index());
        }
        let var = Variable::new(name, self.boogie_type(&def.ty));
        self.local_var_map
            .insert(LocalKey::Source(local), var.clone());
        Some(var)
    }

    pub fn create_fresh_local(&mut self, ty: Type) -> Variable {
        let id = self.fresh_counter;
        self.fresh_counter += 1;
        let var = Variable::new(format!("$tmp{}", id), ty);
        self.local_var_map.insert(LocalKey::Fresh(id), var.clone());
        var
    }

    /// Locals allocated since the last `begin_method`, in creation order
    pub fn local_vars(&self) -> Vec<Variable> {
        self.local_var_map.values().cloned().collect()
    }

    // ==============================================================================
    // Instrumentation

    /// Next model state number of the current method
    pub fn next_capture_state(&mut self) -> usize {
        let id = self.state_counter;
        self.state_counter += 1;
        id
    }

    /// Next branch number, unique in the program
    pub fn next_branch(&mut self) -> usize {
        let id = self.branch_counter;
        self.branch_counter += 1;
        id
    }
}

/// `free ensures (forall o: Ref :: (old($Alloc)[o] ==> $Alloc[o]));`
fn allocation_is_monotonic() -> Ensures {
    let o = Variable::new("o", Type::Ref);
    let allocated = |alloc: Expr| Expr::select(alloc, vec![o.expr()]);
    Ensures {
        condition: Expr::forall(
            vec![o.clone()],
            Expr::binary(
                BinaryOp::Implies,
                allocated(Expr::old(Expr::ident(ALLOC_VARIABLE))),
                allocated(Expr::ident(ALLOC_VARIABLE)),
            ),
        ),
        free: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_model::{LocalDef, MethodBody, ModelBuilder, Parameter};

    #[test]
    fn test_procedure_lookup_is_idempotent() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let calc = builder.add_class(unit, "App", "Calc");
        let add = builder.add_method(calc, "Add");
        {
            let m = builder.method_mut(add);
            m.parameters.push(Parameter::by_value("a", TypeRef::int32()));
            m.parameters.push(Parameter::by_reference("b", TypeRef::int32()));
            m.return_type = TypeRef::int32();
        }
        let env = builder.build();
        let mut sink = Sink::new(&env, TranslatorOptions::default());

        let first = sink.find_or_create_procedure(add);
        let second = sink.find_or_create_procedure(add);
        assert_eq!(first, second);
        assert_eq!(sink.program().procedures().count(), 2);

        let decl = sink.program().procedure(first.decl);
        assert_eq!(decl.name, "App.Calc.Add$System.Int32$System.Int32^");
        let ins: Vec<_> = decl.in_params.iter().map(|v| v.name.as_str()).collect();
        let outs: Vec<_> = decl.out_params.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(ins, vec!["this", "a$in", "b$in"]);
        assert_eq!(outs, vec!["b", "$result"]);
        assert!(first.formal_map[1].takes_input());
        assert_eq!(first.formal_map[0].out_parameter_copy.name, "a");
    }

    #[test]
    fn test_out_parameter_has_no_input() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let parser = builder.add_class(unit, "App", "Parser");
        let try_parse = builder.add_method(parser, "TryParse");
        {
            let m = builder.method_mut(try_parse);
            m.is_static = true;
            m.parameters.push(Parameter::by_value("text", TypeRef::Primitive(PrimitiveType::String)));
            m.parameters.push(Parameter::out("value", TypeRef::int32()));
            m.return_type = TypeRef::boolean();
        }
        let env = builder.build();
        let mut sink = Sink::new(&env, TranslatorOptions::default());

        let info = sink.find_or_create_procedure(try_parse);
        let decl = sink.program().procedure(info.decl);
        let ins: Vec<_> = decl.in_params.iter().map(|v| v.name.as_str()).collect();
        let outs: Vec<_> = decl.out_params.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(ins, vec!["text$in"]);
        assert_eq!(outs, vec!["value", "$result"]);
        assert!(!info.formal_map[1].takes_input());
        assert!(info.formal_map[1].is_by_reference);
    }

    #[test]
    fn test_monotonic_heap_adds_free_ensures() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let c = builder.add_class(unit, "App", "C");
        let m = builder.add_method(c, "M");
        let env = builder.build();

        let mut sink = Sink::new(&env, TranslatorOptions::default());
        let info = sink.find_or_create_procedure(m);
        assert!(sink.program().procedure(info.decl).ensures.is_empty());

        let options = TranslatorOptions {
            monotonic_heap: true,
            ..Default::default()
        };
        let mut sink = Sink::new(&env, options);
        let info = sink.find_or_create_procedure(m);
        assert_eq!(
            sink.program().procedure(info.decl).to_string(),
            "procedure App.C.M(this: Ref);
  \
             free ensures (forall o: Ref :: (old($Alloc)[o] ==> $Alloc[o]));
"
        );
    }

    #[test]
    fn test_field_variables() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let counter = builder.add_class(unit, "App", "Counter");
        let count = builder.add_field(counter, "count", TypeRef::int32(), true);
        let next = builder.add_field(counter, "next", TypeRef::Named(counter), false);
        let env = builder.build();
        let mut sink = Sink::new(&env, TranslatorOptions::default());

        let count_var = sink.find_or_create_field_variable(count);
        assert_eq!(count_var, Variable::new("F$App.Counter.count", Type::Int));
        assert_eq!(sink.find_or_create_field_variable(count), count_var);
        let next_var = sink.find_or_create_field_variable(next);
        assert_eq!(next_var, Variable::new("F$App.Counter.next", Type::Field));
        assert_eq!(
            sink.program()
                .global_variables()
                .filter(|v| v.name.starts_with("F$"))
                .count(),
            1
        );
    }

    #[test]
    fn test_locals_are_reset_per_method() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let c = builder.add_class(unit, "App", "C");
        let m = builder.add_method(c, "M");
        let mut body = MethodBody::new(vec![]);
        body.locals.push(LocalDef {
            name: "i".to_string(),
            ty: TypeRef::int32(),
        });
        builder.method_mut(m).body = Some(body);
        let env = builder.build();
        let mut sink = Sink::new(&env, TranslatorOptions::default());

        sink.begin_method(Some(m));
        let i = sink.find_or_create_local(LocalId::new(0));
        assert_eq!(i, Some(Variable::new("i", Type::Int)));
        let tmp = sink.create_fresh_local(Type::Ref);
        assert_eq!(sink.local_vars(), vec![Variable::new("i", Type::Int), tmp]);
        assert_eq!(sink.find_or_create_local(LocalId::new(7)), None);

        sink.begin_method(None);
        assert!(sink.local_vars().is_empty());
    }

    #[test]
    fn test_translate_type_once() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let c = builder.add_class(unit, "App", "C");
        let env = builder.build();
        let mut sink = Sink::new(&env, TranslatorOptions::default());

        assert!(sink.translate_type(c));
        assert!(!sink.translate_type(c));
        assert_eq!(sink.find_or_define_type(c), sink.find_or_define_type(c));
    }
}
