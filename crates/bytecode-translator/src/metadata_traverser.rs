// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Top-down traversal of units, types and members
//!
//! Every type gets a `TypeFrame` for the duration of its traversal. Helper types produced by
//! the bodies of its methods are queued in that frame and translated before the traversal of
//! the type returns, so they never leak into a sibling.

use crate::error::{TranslationError, TranslationResult};
use crate::method_translator::{MethodOutcome, MethodTranslator};
use crate::options::TypeInfoLevel;
use crate::report::TranslationReport;
use crate::sink::Sink;
use crate::synthesis;
use log::{debug, info};
use object_model::{
    DebugSymbols, FieldId, HelperMember, MethodId, TypeId, TypeKind, UnitId, UnitKind,
};
use std::collections::BTreeMap;

/// State scoped to the type being traversed
#[derive(Debug, Default)]
pub struct TypeFrame {
    pub private_types: Vec<TypeId>,
    pub saw_cctor: bool,
}

pub struct MetadataTraverser<'a, 'env> {
    sink: &'a mut Sink<'env>,
    debug_symbols: &'a BTreeMap<UnitId, DebugSymbols>,
    current_debug_symbols: Option<&'a DebugSymbols>,
    entry_point: Option<MethodId>,
    frames: Vec<TypeFrame>,
    report: TranslationReport,
}

impl<'a, 'env> MetadataTraverser<'a, 'env> {
    pub fn new(sink: &'a mut Sink<'env>, debug_symbols: &'a BTreeMap<UnitId, DebugSymbols>) -> Self {
        Self {
            sink,
            debug_symbols,
            current_debug_symbols: None,
            entry_point: None,
            frames: vec![],
            report: TranslationReport::default(),
        }
    }

    pub fn report(&self) -> &TranslationReport {
        &self.report
    }

    pub fn into_report(self) -> TranslationReport {
        self.report
    }

    /// Translates every unit in order. Only an unclassifiable type stops the run.
    pub fn translate_assemblies(&mut self, units: &[UnitId]) -> TranslationResult<()> {
        let env = self.sink.env();
        for unit in units {
            match env.unit(*unit).kind {
                UnitKind::Assembly => {
                    self.sink.begin_assembly(*unit);
                    let result = self.traverse_module(*unit);
                    self.sink.end_assembly(*unit);
                    result?;
                }
                UnitKind::Module => self.traverse_module(*unit)?,
            }
        }
        Ok(())
    }

    fn traverse_module(&mut self, unit: UnitId) -> TranslationResult<()> {
        let env = self.sink.env();
        let def = env.unit(unit);
        self.current_debug_symbols = self.debug_symbols.get(&unit);
        if def.entry_point.is_some() {
            self.entry_point = def.entry_point;
        }
        for ty in &def.types {
            self.traverse_type(*ty)?;
        }
        Ok(())
    }

    pub fn traverse_type(&mut self, ty: TypeId) -> TranslationResult<()> {
        if !self.sink.translate_type(ty) {
            return Ok(());
        }
        let env = self.sink.env();
        if env.type_def(ty).kind == TypeKind::GenericParameter {
            return Ok(());
        }
        info!("translating type `{}`", env.type_full_name(ty));

        self.frames.push(TypeFrame::default());
        let result = self.classify(ty);
        self.frames.pop();
        result
    }

    fn classify(&mut self, ty: TypeId) -> TranslationResult<()> {
        let env = self.sink.env();
        let def = env.type_def(ty);
        match def.kind {
            TypeKind::Class => {
                let info = self.sink.find_or_define_type(ty);
                self.traverse_members(ty)?;
                if !self.frame().is_some_and(|frame| frame.saw_cctor) {
                    synthesis::create_static_constructor(self.sink, ty);
                }
                if self.sink.options().type_info == TypeInfoLevel::WithSubtyping {
                    self.sink.declare_parents(ty, &info.constructor);
                }
            }
            TypeKind::Delegate => {
                // every instantiation maps to its generic definition; members are not visited
                let generic = env.unspecialized(ty);
                if !self.sink.is_delegate_type(generic) {
                    debug!("registering delegate type `{}`", env.type_full_name(generic));
                    self.sink.add_delegate_type(generic);
                }
            }
            TypeKind::Interface => {
                self.sink.find_or_create_type_reference(ty);
                self.traverse_members(ty)?;
            }
            TypeKind::Enum => return Ok(()),
            TypeKind::Struct => {
                self.sink.find_or_create_type_reference(ty);
                synthesis::create_default_struct_constructor(self.sink, ty);
                synthesis::create_struct_copy_constructor(self.sink, ty);
                self.traverse_members(ty)?;
            }
            TypeKind::GenericParameter => return Ok(()),
            TypeKind::Unrecognized => {
                return Err(TranslationError::UnclassifiableType {
                    name: env.type_full_name(ty),
                })
            }
        }
        self.traverse_helper_members(ty)?;
        self.drain_private_types()
    }

    fn traverse_members(&mut self, ty: TypeId) -> TranslationResult<()> {
        let def = self.sink.env().type_def(ty);
        for param in &def.generic_parameters {
            self.traverse_type(*param)?;
        }
        for field in &def.fields {
            self.traverse_field(*field);
        }
        for method in &def.methods {
            self.traverse_method(*method);
        }
        for nested in &def.nested_types {
            self.traverse_type(*nested)?;
        }
        Ok(())
    }

    fn traverse_helper_members(&mut self, ty: TypeId) -> TranslationResult<()> {
        let def = self.sink.env().type_def(ty);
        for member in &def.private_helper_members {
            match member {
                HelperMember::Field(field) => self.traverse_field(*field),
                HelperMember::Method(method) => self.traverse_method(*method),
                HelperMember::Type(helper) => self.traverse_type(*helper)?,
            }
        }
        Ok(())
    }

    fn drain_private_types(&mut self) -> TranslationResult<()> {
        loop {
            let queued = match self.frames.last_mut() {
                Some(frame) => std::mem::take(&mut frame.private_types),
                None => return Ok(()),
            };
            if queued.is_empty() {
                return Ok(());
            }
            for ty in queued {
                self.traverse_type(ty)?;
            }
        }
    }

    fn traverse_field(&mut self, field: FieldId) {
        self.sink.find_or_create_field_variable(field);
    }

    fn traverse_method(&mut self, method: MethodId) {
        let env = self.sink.env();
        if env.method(method).is_static_constructor() {
            if let Some(frame) = self.frames.last_mut() {
                frame.saw_cctor = true;
            }
        }
        let outcome =
            MethodTranslator::new(self.sink, self.current_debug_symbols, self.entry_point)
                .translate(method);
        self.report.record(env, method, &outcome);
        if let MethodOutcome::Implemented { helper_types, .. } = outcome {
            if !helper_types.is_empty() {
                debug!(
                    "queued {} helper type(s) of `{}`",
                    helper_types.len(),
                    env.method_signature(method)
                );
            }
            if let Some(frame) = self.frames.last_mut() {
                frame.private_types.extend(helper_types);
            }
        }
    }

    fn frame(&self) -> Option<&TypeFrame> {
        self.frames.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TranslatorOptions;
    use object_model::{MethodBody, ModelBuilder, ObjectModel, TypeRef};

    fn traverse<'e>(
        env: &'e ObjectModel,
        units: &[UnitId],
    ) -> (Sink<'e>, TranslationResult<()>, usize) {
        let debug_symbols = BTreeMap::new();
        let mut sink = Sink::new(env, TranslatorOptions::default());
        let (result, open_frames) = {
            let mut traverser = MetadataTraverser::new(&mut sink, &debug_symbols);
            let result = traverser.translate_assemblies(units);
            (result, traverser.frames.len())
        };
        (sink, result, open_frames)
    }

    #[test]
    fn test_helper_types_are_drained_with_their_owner() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let a = builder.add_class(unit, "App", "A");
        let b = builder.add_class(unit, "App", "B");
        let closure = builder.add_detached_type(unit, "App", "A_Closure", TypeKind::Class);
        builder.add_method(closure, "Invoke");
        let run = builder.add_method(a, "Run");
        let mut body = MethodBody::new(vec![]);
        body.private_helper_types.push(closure);
        builder.method_mut(run).body = Some(body);
        let env = builder.build();

        let (sink, result, open_frames) = traverse(&env, &[unit]);
        assert_eq!(result, Ok(()));
        assert_eq!(open_frames, 0);
        let program = sink.program();
        let position = |name: &str| program.find_procedure(name).unwrap().index();
        assert!(position("App.A_Closure.Invoke") < position("App.B.#cctor"));
        assert!(position("App.A.#cctor") < position("App.B.#cctor"));
    }

    #[test]
    fn test_unrecognized_type_is_fatal_and_frames_unwind() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let outer = builder.add_class(unit, "App", "Outer");
        builder.add_nested_type(outer, "Strange", TypeKind::Unrecognized);
        let env = builder.build();

        let (_, result, open_frames) = traverse(&env, &[unit]);
        assert_eq!(
            result,
            Err(TranslationError::UnclassifiableType {
                name: "App.Outer.Strange".to_string()
            })
        );
        assert_eq!(open_frames, 0);
    }

    #[test]
    fn test_explicit_static_constructor_suppresses_synthesis() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let registry = builder.add_class(unit, "App", "Registry");
        builder.add_field(registry, "count", TypeRef::int32(), true);
        let cctor = builder.add_static_constructor(registry);
        builder.method_mut(cctor).body = Some(MethodBody::new(vec![]));
        let env = builder.build();

        let (sink, result, _) = traverse(&env, &[unit]);
        assert_eq!(result, Ok(()));
        let cctors: Vec<_> = sink
            .program()
            .implementations()
            .filter(|i| i.name == "App.Registry.#cctor")
            .collect();
        assert_eq!(cctors.len(), 1);
        assert_eq!(
            sink.program()
                .procedures()
                .filter(|(_, p)| p.name == "App.Registry.#cctor")
                .count(),
            1
        );
    }

    #[test]
    fn test_delegate_registers_generic_definition() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let handler = builder.add_type(unit, "App", "Handler", TypeKind::Delegate);
        let invoke = builder.add_method(handler, "Invoke");
        builder.method_mut(invoke).body = Some(MethodBody::new(vec![]));
        let instance = builder.add_detached_type(unit, "App", "Handler_Int32", TypeKind::Delegate);
        builder.type_mut(instance).unspecialized = Some(handler);
        let env = builder.build();

        let debug_symbols = BTreeMap::new();
        let mut sink = Sink::new(&env, TranslatorOptions::default());
        {
            let mut traverser = MetadataTraverser::new(&mut sink, &debug_symbols);
            assert_eq!(traverser.traverse_type(instance), Ok(()));
            assert_eq!(traverser.frames.len(), 0);
        }
        assert!(sink.is_delegate_type(handler));
        assert!(!sink.is_delegate_type(instance));

        let (sink, result, _) = traverse(&env, &[unit]);
        assert_eq!(result, Ok(()));
        assert!(sink.is_delegate_type(handler));
        assert!(sink.procedure_info(invoke).is_none());
        assert!(sink.program().find_procedure("App.Handler.#cctor").is_none());
    }

    #[test]
    fn test_interface_members_without_static_initializer() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let shape = builder.add_type(unit, "App", "IShape", TypeKind::Interface);
        let area = builder.add_method(shape, "Area");
        {
            let m = builder.method_mut(area);
            m.is_abstract = true;
            m.return_type = TypeRef::int32();
        }
        let env = builder.build();

        let (sink, result, open_frames) = traverse(&env, &[unit]);
        assert_eq!(result, Ok(()));
        assert_eq!(open_frames, 0);
        assert!(sink.has_type_reference(shape));
        assert!(sink.program().find_procedure("App.IShape.Area").is_some());
        assert!(sink.program().find_procedure("App.IShape.#cctor").is_none());
        assert_eq!(sink.program().implementations().count(), 0);
    }
}
