// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation of a single method to a procedure and, when it has a body, an implementation
//!
//! The procedure is created first (with its contract) so that every call site agrees on it.
//! The implementation seeds each parameter's working variable from its in-formal (by-value
//! parameters get a local copy, `ref` parameters their out-formal), prepends the default field
//! initialization of constructors, and then translates the body.

use crate::attributes::translate_attributes;
use crate::ctor_analysis::is_deferring_ctor;
use crate::error::TranslationError;
use crate::sink::{ProcedureInfo, Sink};
use crate::stubs;
use crate::synthesis;
use crate::translation::StatementTranslator;
use boogie_ir::{Attribute, Declaration, Expr, Implementation, Stmt, Variable};
use log::{debug, error, warn};
use object_model::{DebugSymbols, MethodId, TypeId};

const ENTRY_POINT_ATTRIBUTE: &str = "entrypoint";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOutcome {
    /// Not translated at all (event accessors)
    Skipped,
    /// Procedure declared, no implementation (abstract, external or bodiless methods)
    DeclaredOnly,
    Implemented {
        /// Private helper types produced by the body, to be translated with the enclosing type
        helper_types: Vec<TypeId>,
        /// The custom attributes could not be translated and were left off the procedure
        attributes_skipped: bool,
    },
    /// The procedure stays declared without an implementation
    Failed(TranslationError),
}

pub struct MethodTranslator<'a, 'env> {
    sink: &'a mut Sink<'env>,
    debug_symbols: Option<&'a DebugSymbols>,
    entry_point: Option<MethodId>,
}

impl<'a, 'env> MethodTranslator<'a, 'env> {
    pub fn new(
        sink: &'a mut Sink<'env>,
        debug_symbols: Option<&'a DebugSymbols>,
        entry_point: Option<MethodId>,
    ) -> Self {
        Self {
            sink,
            debug_symbols,
            entry_point,
        }
    }

    pub fn translate(&mut self, method: MethodId) -> MethodOutcome {
        let env = self.sink.env();
        let def = env.method(method);
        if def.is_event_accessor() {
            debug!("skipping event accessor `{}`", env.method_signature(method));
            return MethodOutcome::Skipped;
        }
        if let Some(stub) = stubs::resolve_stub(env, method) {
            debug!(
                "`{}` is replaced by stub `{}`",
                env.method_signature(method),
                env.method_signature(stub)
            );
        }

        let info = self.sink.find_or_create_procedure(method);
        if let Some(err) = self.sink.contract_error(method) {
            error!(
                "cannot translate contract of `{}`: {}",
                env.method_signature(method),
                err
            );
            return MethodOutcome::Failed(err.clone());
        }
        if def.is_abstract || def.is_external || def.body.is_none() {
            return MethodOutcome::DeclaredOnly;
        }

        match self.translate_body(method, &info) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("cannot translate `{}`: {}", env.method_signature(method), err);
                MethodOutcome::Failed(err)
            }
        }
    }

    fn translate_body(
        &mut self,
        method: MethodId,
        info: &ProcedureInfo,
    ) -> Result<MethodOutcome, TranslationError> {
        let env = self.sink.env();
        let def = env.method(method);
        self.sink.begin_method(Some(method));

        if self.entry_point == Some(method) {
            let decl = self.sink.program_mut().procedure_mut(info.decl);
            if !decl.has_attribute(ENTRY_POINT_ATTRIBUTE) {
                decl.add_attribute(Attribute::flag(ENTRY_POINT_ATTRIBUTE));
            }
        }

        let mut translator = StatementTranslator::new(self.debug_symbols, Some(method));
        for param in &info.formal_map {
            if let Some(input) = &param.in_parameter_copy {
                translator
                    .stmt_builder
                    .add(Stmt::assign(param.out_parameter_copy.name.clone(), input.expr()));
            }
        }

        let block = def
            .body
            .as_ref()
            .map(|body| body.block.as_slice())
            .unwrap_or_default();
        let initializes_fields = def.is_static_constructor()
            || (def.is_constructor() && !is_deferring_ctor(env, method, block));
        if initializes_fields {
            let instance = def.is_constructor().then(|| Expr::ident("this"));
            synthesis::initialize_fields(
                self.sink,
                def.containing_type,
                instance,
                &mut translator.stmt_builder,
            );
        }

        let attributes = match translate_attributes(env, &def.attributes) {
            Ok(attributes) => Some(attributes),
            Err(err) => {
                warn!(
                    "skipping custom attributes of `{}`: {}",
                    env.method_signature(method),
                    err
                );
                None
            }
        };

        let helper_types = translator.translate_method(self.sink, method)?;

        let mut locals: Vec<Variable> = info
            .formal_map
            .iter()
            .filter(|param| !param.is_by_reference)
            .map(|param| param.out_parameter_copy.clone())
            .collect();
        locals.extend(self.sink.local_vars());
        if self.sink.options().model_exceptions.is_modeled() {
            locals.push(info.local_exc_variable.clone());
        }
        locals.push(info.label_variable.clone());

        let program = self.sink.program_mut();
        if let Some(attributes) = &attributes {
            let decl = program.procedure_mut(info.decl);
            for attribute in attributes {
                if !decl.has_attribute(&attribute.key) {
                    decl.add_attribute(attribute.clone());
                }
            }
        }
        let implementation = Implementation::for_procedure(
            info.decl,
            program.procedure(info.decl),
            locals,
            translator.collect(),
        );
        program.add_top_level_declaration(Declaration::Implementation(implementation));

        Ok(MethodOutcome::Implemented {
            helper_types,
            attributes_skipped: attributes.is_none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ExceptionModel, HeapRepresentation, TranslatorOptions};
    use object_model::{
        ConstantValue, CustomAttribute, Expression, MetadataConstant, MetadataExpression,
        MethodBody, MethodCall, ModelBuilder, Parameter, Statement, TypeRef,
    };

    fn options() -> TranslatorOptions {
        TranslatorOptions {
            heap_representation: HeapRepresentation::SplitFields,
            model_exceptions: ExceptionModel::None,
            ..Default::default()
        }
    }

    fn implementation(sink: &Sink, method: MethodId) -> String {
        let decl = sink.procedure_info(method).unwrap().decl;
        sink.program()
            .implementations_of(decl)
            .map(|i| i.to_string())
            .collect()
    }

    #[test]
    fn test_parameter_marshaling_and_locals() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let math = builder.add_class(unit, "App", "Math");
        let inc = builder.add_method(math, "Inc");
        {
            let m = builder.method_mut(inc);
            m.is_static = true;
            m.parameters.push(Parameter::by_value("step", TypeRef::int32()));
            m.parameters.push(Parameter::by_reference("x", TypeRef::int32()));
            m.body = Some(MethodBody::new(vec![Statement::assign(
                object_model::TargetExpression::Parameter(1),
                Expression::binary(
                    object_model::BinaryOperator::Add,
                    Expression::Parameter(1),
                    Expression::Parameter(0),
                ),
            )]));
        }
        let env = builder.build();
        let mut sink = Sink::new(&env, options());

        let outcome = MethodTranslator::new(&mut sink, None, Some(inc)).translate(inc);
        assert_eq!(
            outcome,
            MethodOutcome::Implemented {
                helper_types: vec![],
                attributes_skipped: false
            }
        );
        assert_eq!(
            implementation(&sink, inc),
            "implementation App.Math.Inc$System.Int32$System.Int32^(step$in: int, x$in: int) returns (x: int)\n\
             {\n  var step: int;\n  var $label: int;\n\n  \
             step := step$in;\n  \
             x := x$in;\n  \
             x := (x + step);\n}\n"
        );
        let decl = sink.procedure_info(inc).unwrap().decl;
        assert!(sink.program().procedure(decl).has_attribute("entrypoint"));
    }

    #[test]
    fn test_constructor_field_initialization() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let node = builder.add_class(unit, "App", "Node");
        builder.add_field(node, "value", TypeRef::int32(), false);
        builder.add_field(node, "count", TypeRef::int32(), true);
        let plain = builder.add_constructor(node);
        builder.method_mut(plain).body = Some(MethodBody::new(vec![]));
        let deferring = builder.add_constructor(node);
        {
            let m = builder.method_mut(deferring);
            m.parameters.push(Parameter::by_value("v", TypeRef::int32()));
            m.body = Some(MethodBody::new(vec![Statement::call(MethodCall::new_instance(
                plain,
                Expression::ThisReference,
                vec![],
            ))]));
        }
        let cctor = builder.add_static_constructor(node);
        builder.method_mut(cctor).body = Some(MethodBody::new(vec![]));
        let env = builder.build();
        let mut sink = Sink::new(&env, options());

        let mut translator = MethodTranslator::new(&mut sink, None, None);
        for method in [plain, deferring, cctor] {
            assert!(matches!(
                translator.translate(method),
                MethodOutcome::Implemented { .. }
            ));
        }

        assert!(implementation(&sink, plain)
            .contains("  F$App.Node.value := F$App.Node.value[this := 0];\n"));
        assert!(!implementation(&sink, plain).contains("F$App.Node.count := 0"));
        assert!(!implementation(&sink, deferring).contains("F$App.Node.value :="));
        assert!(implementation(&sink, deferring).contains("  call App.Node.#ctor(this);\n"));
        assert_eq!(
            implementation(&sink, cctor),
            "implementation App.Node.#cctor()\n{\n  var $label: int;\n\n  \
             F$App.Node.count := 0;\n}\n"
        );
    }

    #[test]
    fn test_declared_only_skipped_and_attributes() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let shape = builder.add_class(unit, "App", "Shape");
        let area = builder.add_method(shape, "Area");
        builder.method_mut(area).is_abstract = true;
        let add_changed = builder.add_method_of_kind(shape, "add_Changed", object_model::MethodKind::Normal);
        builder.method_mut(add_changed).is_special_name = true;
        let draw = builder.add_method(shape, "Draw");
        {
            let m = builder.method_mut(draw);
            m.body = Some(MethodBody::new(vec![]));
            m.attributes.push(CustomAttribute::new(
                "Lib.WeightAttribute",
                vec![MetadataExpression::Constant(MetadataConstant::new(
                    ConstantValue::Float64(0.5),
                ))],
            ));
        }
        let env = builder.build();
        let mut sink = Sink::new(&env, options());
        let mut translator = MethodTranslator::new(&mut sink, None, None);

        assert_eq!(translator.translate(area), MethodOutcome::DeclaredOnly);
        assert_eq!(translator.translate(add_changed), MethodOutcome::Skipped);
        assert_eq!(
            translator.translate(draw),
            MethodOutcome::Implemented {
                helper_types: vec![],
                attributes_skipped: true
            }
        );
        assert!(sink.procedure_info(add_changed).is_none());
        assert_eq!(sink.program().implementations().count(), 1);
    }
}
