// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translates object model expressions to Boogie expressions
//!
//! Side effects of an expression (calls, allocations) are appended to the statement builder
//! the translator was created with. In a contract there is no builder and side effects are
//! rejected.

use crate::error::{TranslationError, TranslationResult};
use crate::heap::AccessType;
use crate::options::DereferenceCheck;
use crate::sink::{ProcedureInfo, Sink, EXCEPTION_VARIABLE, NULL};
use boogie_ir::{BinaryOp, Expr, Literal, Stmt, StmtList, StmtListBuilder, Type, UnaryOp};
use object_model::{
    BinaryOperator, Constant, Expression, MethodCall, MethodId, TypeId, TypeRef, UnaryOperator,
};

pub struct ExpressionTranslator<'b> {
    /// Results of `traverse`, most recent last
    pub translated_expressions: Vec<Expr>,
    builder: Option<&'b mut StmtListBuilder>,
    scope: Option<MethodId>,
    contract_context: bool,
}

impl<'b> ExpressionTranslator<'b> {
    pub fn new(builder: &'b mut StmtListBuilder, scope: Option<MethodId>) -> Self {
        Self {
            translated_expressions: vec![],
            builder: Some(builder),
            scope,
            contract_context: false,
        }
    }

    /// A translator for a contract clause of `scope`: parameters denote their incoming
    /// values and side effects are rejected
    pub fn for_contract(scope: MethodId) -> Self {
        Self {
            translated_expressions: vec![],
            builder: None,
            scope: Some(scope),
            contract_context: true,
        }
    }

    /// Translates `expr` and pushes the result on `translated_expressions`
    pub fn traverse(&mut self, sink: &mut Sink, expr: &Expression) -> TranslationResult<()> {
        let translated = self.translate(sink, expr)?;
        self.translated_expressions.push(translated);
        Ok(())
    }

    pub fn translate(&mut self, sink: &mut Sink, expr: &Expression) -> TranslationResult<Expr> {
        match expr {
            Expression::Constant(c) => self.constant(sink, c),
            Expression::DefaultValue(ty) => self.default_value(sink, ty),
            Expression::ThisReference => Ok(Expr::ident("this")),
            Expression::Parameter(index) => self.parameter(sink, *index),
            Expression::Local(local) => sink
                .find_or_create_local(*local)
                .map(|var| var.expr())
                .ok_or_else(|| {
                    TranslationError::Unexpected(format!("{} is not declared by the body", local))
                }),
            Expression::FieldRead { field, instance } => {
                let var = sink.find_or_create_field_variable(*field);
                let env = sink.env();
                let def = env.field(*field);
                match instance {
                    Some(instance) if !def.is_static => {
                        let object = self.translate(sink, instance)?;
                        self.dereference_check(sink, &object)?;
                        let ty = sink.boogie_type(&def.ty);
                        Ok(sink.heap().read_heap(
                            object,
                            &var.name,
                            AccessType::for_field(env, *field),
                            &ty,
                        ))
                    }
                    _ => Ok(var.expr()),
                }
            }
            Expression::Unary { op, operand } => {
                let operand = self.translate(sink, operand)?;
                let op = match op {
                    UnaryOperator::Not => UnaryOp::Not,
                    UnaryOperator::Negate => UnaryOp::Neg,
                };
                Ok(Expr::unary(op, operand))
            }
            Expression::Binary { op, left, right } => {
                let left = self.translate(sink, left)?;
                let right = self.translate(sink, right)?;
                Ok(Expr::binary(binary_op(*op), left, right))
            }
            Expression::MethodCall(call) => self
                .translate_call(sink, call)?
                .ok_or(TranslationError::MalformedExpression {
                    expected: 1,
                    found: 0,
                }),
            Expression::CreateObject {
                ty,
                constructor,
                arguments,
            } => {
                self.require_builder("object creation")?;
                let info = sink.find_or_create_procedure(*constructor);
                let (mut args, outs) = self.call_arguments(sink, &info, arguments)?;
                let object = sink.create_fresh_local(Type::Ref);
                let type_value = sink.find_or_create_type_reference(*ty);
                args.insert(0, object.expr());
                let stmts = vec![
                    Stmt::call(
                        sink.heap().allocation_procedure(),
                        vec![],
                        vec![object.name.clone()],
                    ),
                    Stmt::assume(Expr::eq(sink.heap().dynamic_type(object.expr()), type_value)),
                    Stmt::call(sink.procedure_name(info.decl), args, outs),
                ];
                self.emit(stmts)?;
                self.exception_check(sink)?;
                Ok(object.expr())
            }
            Expression::ReturnValue => {
                let scope = self.scope_info(sink)?;
                scope
                    .return_variable
                    .as_ref()
                    .map(|var| var.expr())
                    .ok_or_else(|| {
                        TranslationError::Translation(
                            "return value of a method without result".to_string(),
                        )
                    })
            }
            Expression::Old(inner) => Ok(Expr::old(self.translate(sink, inner)?)),
        }
    }

    /// Emits a call; returns the temporary holding the result of a non-void callee
    pub fn translate_call(
        &mut self,
        sink: &mut Sink,
        call: &MethodCall,
    ) -> TranslationResult<Option<Expr>> {
        self.require_builder("a method call")?;
        let info = sink.find_or_create_procedure(call.method);
        let mut receiver = vec![];
        if info.this_variable.is_some() {
            let this = call.this_argument.as_deref().ok_or_else(|| {
                TranslationError::Unexpected(format!(
                    "instance method `{}` called without receiver",
                    sink.env().method_signature(call.method)
                ))
            })?;
            let this = self.translate(sink, this)?;
            self.dereference_check(sink, &this)?;
            receiver.push(this);
        }
        let (args, mut outs) = self.call_arguments(sink, &info, &call.arguments)?;
        let result = info
            .return_variable
            .as_ref()
            .map(|var| sink.create_fresh_local(var.ty.clone()));
        outs.extend(result.iter().map(|var| var.name.clone()));

        receiver.extend(args);
        self.emit([Stmt::call(sink.procedure_name(info.decl), receiver, outs)])?;
        self.exception_check(sink)?;
        Ok(result.map(|var| var.expr()))
    }

    /// Splits call arguments into in-arguments and the out-variables bound to by-reference
    /// parameters. A `ref` argument is both; an `out` argument is only bound. Structs passed
    /// by value are copied.
    fn call_arguments(
        &mut self,
        sink: &mut Sink,
        callee: &ProcedureInfo,
        arguments: &[Expression],
    ) -> TranslationResult<(Vec<Expr>, Vec<String>)> {
        if arguments.len() != callee.formal_map.len() {
            return Err(TranslationError::Unexpected(format!(
                "`{}` expects {} argument(s), found {}",
                sink.procedure_name(callee.decl),
                callee.formal_map.len(),
                arguments.len()
            )));
        }
        let mut args = vec![];
        let mut outs = vec![];
        for (param, argument) in callee.formal_map.iter().zip(arguments) {
            if param.takes_input() {
                let mut value = self.translate(sink, argument)?;
                if !param.is_by_reference {
                    if let Some(struct_type) = struct_to_copy(sink, &param.ty, argument) {
                        value = self.copy_struct(sink, struct_type, value)?;
                    }
                }
                args.push(value);
            }
            if param.is_by_reference {
                outs.push(self.by_reference_target(sink, argument)?);
            }
        }
        Ok((args, outs))
    }

    fn by_reference_target(&mut self, sink: &mut Sink, argument: &Expression) -> TranslationResult<String> {
        match argument {
            Expression::Local(_) | Expression::Parameter(_) => match self.translate(sink, argument)? {
                Expr::Ident(name) => Ok(name),
                other => Err(TranslationError::Translation(format!(
                    "by-reference argument `{}` is not a variable",
                    other
                ))),
            },
            _ => Err(TranslationError::Translation(
                "by-reference argument must be a local or a parameter".to_string(),
            )),
        }
    }

    /// `call $tmp := T.#copy_ctor(value);`
    pub fn copy_struct(&mut self, sink: &mut Sink, ty: TypeId, value: Expr) -> TranslationResult<Expr> {
        let copy_ctor = sink.find_or_create_procedure_for_struct_copy(ty);
        let copy = sink.create_fresh_local(Type::Ref);
        self.emit([Stmt::call(
            sink.procedure_name(copy_ctor),
            vec![value],
            vec![copy.name.clone()],
        )])?;
        Ok(copy.expr())
    }

    /// Guards a dereference of `object` as configured. `this` is never null and contracts
    /// are not instrumented.
    pub fn dereference_check(&mut self, sink: &Sink, object: &Expr) -> TranslationResult<()> {
        if self.builder.is_none() || object.as_ident() == Some("this") {
            return Ok(());
        }
        let non_null = Expr::neq(object.clone(), Expr::ident(NULL));
        match sink.options().dereference {
            DereferenceCheck::Assert => self.emit([Stmt::assert(non_null)]),
            DereferenceCheck::Assume => self.emit([Stmt::assume(non_null)]),
            DereferenceCheck::None => Ok(()),
        }
    }

    fn constant(&self, sink: &mut Sink, constant: &Constant) -> TranslationResult<Expr> {
        Ok(match constant {
            Constant::Bool(b) => Expr::bool(*b),
            Constant::Int(i) => Expr::int(*i),
            Constant::Real(r) => Expr::Literal(Literal::Real(real_literal(*r)?)),
            Constant::String(s) => sink.find_or_create_string_literal(s),
            Constant::Null => Expr::ident(NULL),
        })
    }

    /// A struct default is a fresh instance run through the default constructor
    fn default_value(&mut self, sink: &mut Sink, ty: &TypeRef) -> TranslationResult<Expr> {
        let struct_type = match ty {
            TypeRef::Named(id) if sink.env().is_struct(ty) => *id,
            _ => return Ok(sink.default_value(ty)),
        };
        self.require_builder("a struct default value")?;
        let ctor = sink.find_or_create_procedure_for_default_struct_ctor(struct_type);
        let object = sink.create_fresh_local(Type::Ref);
        self.emit([
            Stmt::call(
                sink.heap().allocation_procedure(),
                vec![],
                vec![object.name.clone()],
            ),
            Stmt::call(sink.procedure_name(ctor), vec![object.expr()], vec![]),
        ])?;
        Ok(object.expr())
    }

    fn parameter(&self, sink: &Sink, index: u16) -> TranslationResult<Expr> {
        let info = self.scope_info(sink)?;
        let param = info.formal(index).ok_or_else(|| {
            TranslationError::Unexpected(format!("no parameter at position {}", index))
        })?;
        // a contract sees the incoming value of a by-value parameter and the outgoing value
        // of a by-reference one
        let var = match (&param.in_parameter_copy, self.contract_context) {
            (Some(input), true) if !param.is_by_reference => input,
            _ => &param.out_parameter_copy,
        };
        Ok(var.expr())
    }

    fn scope_info<'s>(&self, sink: &'s Sink) -> TranslationResult<&'s ProcedureInfo> {
        let method = self.scope.ok_or_else(|| {
            TranslationError::Unexpected("parameter reference outside of a method".to_string())
        })?;
        sink.procedure_info(method).ok_or_else(|| {
            TranslationError::Unexpected(format!(
                "no procedure declared for `{}`",
                sink.env().method_signature(method)
            ))
        })
    }

    fn require_builder(&self, what: &str) -> TranslationResult<()> {
        if self.builder.is_none() {
            return Err(TranslationError::Translation(format!(
                "{} is not allowed in a contract",
                what
            )));
        }
        Ok(())
    }

    fn emit(&mut self, stmts: impl IntoIterator<Item = Stmt>) -> TranslationResult<()> {
        match self.builder.as_deref_mut() {
            Some(builder) => {
                builder.add_all(stmts);
                Ok(())
            }
            None => Err(TranslationError::Translation(
                "side effects are not allowed in a contract".to_string(),
            )),
        }
    }

    /// `if ($Exception != null) { return; }` after a call, when exceptions are modeled
    fn exception_check(&mut self, sink: &Sink) -> TranslationResult<()> {
        if !sink.options().model_exceptions.is_modeled() {
            return Ok(());
        }
        self.emit([Stmt::If {
            condition: Expr::neq(Expr::ident(EXCEPTION_VARIABLE), Expr::ident(NULL)),
            then_branch: StmtList(vec![Stmt::Return]),
            else_branch: None,
        }])
    }
}

/// The struct type to copy when a value of type `ty` read by `source` is stored elsewhere.
/// Fresh values (calls, allocations, defaults) are not shared and need no copy.
pub fn struct_to_copy(sink: &Sink, ty: &TypeRef, source: &Expression) -> Option<TypeId> {
    let TypeRef::Named(id) = ty else {
        return None;
    };
    let aliases = matches!(
        source,
        Expression::Local(_) | Expression::Parameter(_) | Expression::FieldRead { .. }
    );
    (aliases && sink.env().is_struct(ty)).then_some(*id)
}

/// Decimal text of a real constant; Boogie reals always carry a decimal point
fn real_literal(value: f64) -> TranslationResult<String> {
    if !value.is_finite() {
        return Err(TranslationError::Translation(format!(
            "real constant `{}` has no Boogie literal",
            value
        )));
    }
    let text = value.to_string();
    if text.contains('.') {
        Ok(text)
    } else {
        Ok(format!("{}.0", text))
    }
}

fn binary_op(op: BinaryOperator) -> BinaryOp {
    match op {
        BinaryOperator::Add => BinaryOp::Add,
        BinaryOperator::Sub => BinaryOp::Sub,
        BinaryOperator::Mul => BinaryOp::Mul,
        BinaryOperator::Div => BinaryOp::Div,
        BinaryOperator::Mod => BinaryOp::Mod,
        BinaryOperator::Eq => BinaryOp::Eq,
        BinaryOperator::Neq => BinaryOp::Neq,
        BinaryOperator::Lt => BinaryOp::Lt,
        BinaryOperator::Le => BinaryOp::Lte,
        BinaryOperator::Gt => BinaryOp::Gt,
        BinaryOperator::Ge => BinaryOp::Gte,
        BinaryOperator::And => BinaryOp::And,
        BinaryOperator::Or => BinaryOp::Or,
        BinaryOperator::Implies => BinaryOp::Implies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ExceptionModel, HeapRepresentation, TranslatorOptions};
    use object_model::{ModelBuilder, ObjectModel, Parameter};

    fn render_expression(
        sink: &mut Sink,
        scope: Option<MethodId>,
        expr: &Expression,
    ) -> TranslationResult<(String, String)> {
        let mut builder = StmtListBuilder::new();
        let translated = ExpressionTranslator::new(&mut builder, scope).translate(sink, expr)?;
        Ok((translated.to_string(), builder.collect().to_string()))
    }

    struct Fixture {
        env: ObjectModel,
        get: MethodId,
        set: MethodId,
        value: object_model::FieldId,
    }

    fn fixture() -> Fixture {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let cell = builder.add_class(unit, "App", "Cell");
        let value = builder.add_field(cell, "value", TypeRef::int32(), false);
        let get = builder.add_method(cell, "Get");
        builder.method_mut(get).return_type = TypeRef::int32();
        let set = builder.add_method(cell, "Set");
        builder
            .method_mut(set)
            .parameters
            .push(Parameter::by_value("v", TypeRef::int32()));
        Fixture {
            env: builder.build(),
            get,
            set,
            value,
        }
    }

    fn options() -> TranslatorOptions {
        TranslatorOptions {
            heap_representation: HeapRepresentation::SplitFields,
            model_exceptions: ExceptionModel::None,
            ..Default::default()
        }
    }

    #[test]
    fn test_call_with_result_uses_fresh_local() {
        let f = fixture();
        let mut sink = Sink::new(&f.env, options());
        sink.begin_method(None);
        let mut builder = StmtListBuilder::new();
        let mut translator = ExpressionTranslator::new(&mut builder, None);
        let call = Expression::binary(
            BinaryOperator::Add,
            Expression::MethodCall(MethodCall::new_instance(f.get, Expression::ThisReference, vec![])),
            Expression::int(1),
        );
        translator.traverse(&mut sink, &call).unwrap();
        assert_eq!(translator.translated_expressions.len(), 1);
        assert_eq!(translator.translated_expressions[0].to_string(), "($tmp0 + 1)");
        assert_eq!(builder.collect().to_string(), "call $tmp0 := App.Cell.Get(this);\n");
    }

    #[test]
    fn test_void_call_is_not_an_expression() {
        let f = fixture();
        let mut sink = Sink::new(&f.env, options());
        let mut builder = StmtListBuilder::new();
        let mut translator = ExpressionTranslator::new(&mut builder, None);
        let call = Expression::MethodCall(MethodCall::new_instance(
            f.set,
            Expression::ThisReference,
            vec![Expression::int(3)],
        ));
        assert_eq!(
            translator.translate(&mut sink, &call),
            Err(TranslationError::MalformedExpression {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_contract_context() {
        let f = fixture();
        let mut sink = Sink::new(&f.env, options());
        sink.find_or_create_procedure(f.set);

        let mut translator = ExpressionTranslator::for_contract(f.set);
        let read = Expression::field(f.value, Some(Expression::ThisReference));
        let cond = Expression::binary(BinaryOperator::Le, Expression::Parameter(0), read);
        translator.traverse(&mut sink, &cond).unwrap();
        assert_eq!(
            translator.translated_expressions[0].to_string(),
            "(v$in <= F$App.Cell.value[this])"
        );

        let call = Expression::MethodCall(MethodCall::new_instance(f.get, Expression::ThisReference, vec![]));
        assert!(matches!(
            translator.translate(&mut sink, &call),
            Err(TranslationError::Translation(_))
        ));
    }

    #[test]
    fn test_exception_check_after_call() {
        let f = fixture();
        let mut sink = Sink::new(
            &f.env,
            TranslatorOptions {
                heap_representation: HeapRepresentation::SplitFields,
                ..Default::default()
            },
        );
        let mut builder = StmtListBuilder::new();
        let mut translator = ExpressionTranslator::new(&mut builder, None);
        let call = MethodCall::new_instance(f.set, Expression::ThisReference, vec![Expression::int(3)]);
        assert_eq!(translator.translate_call(&mut sink, &call), Ok(None));
        assert_eq!(
            builder.collect().to_string(),
            "call App.Cell.Set$System.Int32(this, 3);\nif (($Exception != null)) {\n  return;\n}\n"
        );
    }

    #[test]
    fn test_ref_and_out_arguments() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let counter = builder.add_class(unit, "App", "Counter");
        let inc = builder.add_method(counter, "Inc");
        {
            let m = builder.method_mut(inc);
            m.is_static = true;
            m.parameters.push(Parameter::by_value("step", TypeRef::int32()));
            m.parameters.push(Parameter::by_reference("x", TypeRef::int32()));
        }
        let reset = builder.add_method(counter, "Reset");
        {
            let m = builder.method_mut(reset);
            m.is_static = true;
            m.parameters.push(Parameter::out("x", TypeRef::int32()));
        }
        let run = builder.add_method(counter, "Run");
        builder
            .method_mut(run)
            .parameters
            .push(Parameter::by_value("total", TypeRef::int32()));
        let env = builder.build();
        let mut sink = Sink::new(&env, options());
        sink.find_or_create_procedure(run);
        sink.begin_method(Some(run));

        let mut stmts = StmtListBuilder::new();
        let mut translator = ExpressionTranslator::new(&mut stmts, Some(run));
        let by_ref = MethodCall::new_static(inc, vec![Expression::int(2), Expression::Parameter(0)]);
        assert_eq!(translator.translate_call(&mut sink, &by_ref), Ok(None));
        let out = MethodCall::new_static(reset, vec![Expression::Parameter(0)]);
        assert_eq!(translator.translate_call(&mut sink, &out), Ok(None));
        assert_eq!(
            stmts.collect().to_string(),
            "call total := App.Counter.Inc$System.Int32$System.Int32^(2, total);\n\
             call total := App.Counter.Reset$System.Int32^();\n"
        );
    }

    #[test]
    fn test_struct_argument_is_copied() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("Geo");
        let point = builder.add_struct(unit, "Geo", "Point");
        let canvas = builder.add_class(unit, "Geo", "Canvas");
        let plot = builder.add_method(canvas, "Plot");
        {
            let m = builder.method_mut(plot);
            m.is_static = true;
            m.parameters.push(Parameter::by_value("p", TypeRef::Named(point)));
        }
        let redraw = builder.add_method(canvas, "Redraw");
        builder
            .method_mut(redraw)
            .parameters
            .push(Parameter::by_value("q", TypeRef::Named(point)));
        let env = builder.build();
        let mut sink = Sink::new(&env, options());
        sink.find_or_create_procedure(redraw);
        sink.begin_method(Some(redraw));

        let mut stmts = StmtListBuilder::new();
        let mut translator = ExpressionTranslator::new(&mut stmts, Some(redraw));
        let call = MethodCall::new_static(plot, vec![Expression::Parameter(0)]);
        assert_eq!(translator.translate_call(&mut sink, &call), Ok(None));
        let fresh = MethodCall::new_static(plot, vec![Expression::DefaultValue(TypeRef::Named(point))]);
        assert_eq!(translator.translate_call(&mut sink, &fresh), Ok(None));
        assert_eq!(
            stmts.collect().to_string(),
            "call $tmp0 := Geo.Point.#copy_ctor(q);\n\
             call Geo.Canvas.Plot$Geo.Point($tmp0);\n\
             call $tmp1 := Alloc();\n\
             call Geo.Point.#default_ctor($tmp1);\n\
             call Geo.Canvas.Plot$Geo.Point($tmp1);\n"
        );
    }

    #[test]
    fn test_dereference_checks() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let cell = builder.add_class(unit, "App", "Cell");
        let value = builder.add_field(cell, "value", TypeRef::int32(), false);
        let copy_from = builder.add_method(cell, "CopyFrom");
        builder
            .method_mut(copy_from)
            .parameters
            .push(Parameter::by_value("other", TypeRef::Named(cell)));
        let env = builder.build();
        let read_other = Expression::field(value, Some(Expression::Parameter(0)));
        let read_this = Expression::field(value, Some(Expression::ThisReference));

        let mut rendered = vec![];
        for dereference in [DereferenceCheck::Assume, DereferenceCheck::Assert, DereferenceCheck::None] {
            let mut sink = Sink::new(
                &env,
                TranslatorOptions {
                    dereference,
                    ..options()
                },
            );
            sink.find_or_create_procedure(copy_from);
            rendered.push(render_expression(&mut sink, Some(copy_from), &read_other).unwrap());
            assert_eq!(
                render_expression(&mut sink, Some(copy_from), &read_this).unwrap().1,
                ""
            );

            // contract clauses stay uninstrumented
            let mut contract = ExpressionTranslator::for_contract(copy_from);
            assert_eq!(
                contract.translate(&mut sink, &read_other).unwrap().to_string(),
                "F$App.Cell.value[other$in]"
            );
        }
        let read = "F$App.Cell.value[other]".to_string();
        assert_eq!(
            rendered,
            vec![
                (read.clone(), "assume (other != null);\n".to_string()),
                (read.clone(), "assert (other != null);\n".to_string()),
                (read, "".to_string()),
            ]
        );
    }

    #[test]
    fn test_real_constants() {
        let env = ModelBuilder::new().build();
        let mut sink = Sink::new(&env, options());
        let real = |r: f64| Expression::Constant(Constant::Real(r));

        for (value, text) in [(1.0, "1.0"), (2.5, "2.5"), (1e20, "100000000000000000000.0"), (-0.25, "-0.25")] {
            assert_eq!(render_expression(&mut sink, None, &real(value)).unwrap().0, text);
        }
        for value in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                render_expression(&mut sink, None, &real(value)),
                Err(TranslationError::Translation(_))
            ));
        }
    }
}
