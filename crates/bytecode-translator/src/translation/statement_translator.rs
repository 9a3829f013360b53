// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translates method bodies to Boogie statements

use crate::error::{TranslationError, TranslationResult};
use crate::heap::AccessType;
use crate::sink::{Sink, EXCEPTION_VARIABLE};
use crate::translation::expression_translator::{struct_to_copy, ExpressionTranslator};
use boogie_ir::{AttrParam, Attribute, Expr, Stmt, StmtList, StmtListBuilder};
use object_model::{DebugSymbols, Expression, MethodId, Statement, TargetExpression, TypeId, TypeRef};

const CAPTURE_STATE_ATTRIBUTE: &str = "captureState";
const BRANCH_ATTRIBUTE: &str = "breadcrumb";

pub struct StatementTranslator<'d> {
    pub stmt_builder: StmtListBuilder,
    debug_symbols: Option<&'d DebugSymbols>,
    scope: Option<MethodId>,
}

impl<'d> StatementTranslator<'d> {
    pub fn new(debug_symbols: Option<&'d DebugSymbols>, scope: Option<MethodId>) -> Self {
        Self {
            stmt_builder: StmtListBuilder::new(),
            debug_symbols,
            scope,
        }
    }

    /// Translates the body of `method` and returns the private helper types its
    /// decompilation produced
    pub fn translate_method(
        &mut self,
        sink: &mut Sink,
        method: MethodId,
    ) -> TranslationResult<Vec<TypeId>> {
        let Some(body) = &sink.env().method(method).body else {
            return Ok(vec![]);
        };
        self.traverse_all(sink, &body.block)?;
        Ok(body.private_helper_types.clone())
    }

    pub fn traverse_all(&mut self, sink: &mut Sink, stmts: &[Statement]) -> TranslationResult<()> {
        for stmt in stmts {
            self.traverse(sink, stmt)?;
        }
        Ok(())
    }

    pub fn traverse(&mut self, sink: &mut Sink, stmt: &Statement) -> TranslationResult<()> {
        match stmt {
            Statement::Expression(Expression::MethodCall(call)) => {
                let mut translator = ExpressionTranslator::new(&mut self.stmt_builder, self.scope);
                translator.translate_call(sink, call)?;
            }
            Statement::Expression(expr) => {
                // evaluated for its side effects only
                self.expression(sink, expr)?;
            }
            Statement::Assign { target, source } => self.assignment(sink, target, source)?,
            Statement::LocalDeclaration {
                local,
                initial_value,
            } => {
                // the declaration itself is collected with the other locals
                sink.find_or_create_local(*local);
                if let Some(value) = initial_value {
                    self.assignment(sink, &TargetExpression::Local(*local), value)?;
                }
            }
            Statement::Block(stmts) => self.traverse_all(sink, stmts)?,
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.expression(sink, condition)?;
                let then_branch = self.branch(sink, then_branch)?;
                let else_branch = if else_branch.is_empty() && !sink.options().instrument_branches {
                    None
                } else {
                    Some(self.branch(sink, else_branch)?)
                };
                self.stmt_builder.add(Stmt::If {
                    condition,
                    then_branch,
                    else_branch,
                });
            }
            Statement::While { condition, body } => {
                // side effects of the condition are evaluated before the first iteration and
                // again at the end of every iteration
                let mut condition_effects = StmtListBuilder::new();
                let translated = ExpressionTranslator::new(&mut condition_effects, self.scope)
                    .translate(sink, condition)?;
                let condition_effects = condition_effects.collect();
                let mut body = self.branch(sink, body)?.0;
                body.extend(condition_effects.0.iter().cloned());
                self.stmt_builder.add_all(condition_effects.0);
                self.stmt_builder.add(Stmt::While {
                    condition: translated,
                    body: StmtList(body),
                });
            }
            Statement::Return(value) => {
                if let Some(value) = value {
                    let value = self.expression(sink, value)?;
                    let result = self.result_variable(sink)?;
                    self.stmt_builder.add(Stmt::assign(result, value));
                }
                self.stmt_builder.add(Stmt::Return);
            }
            Statement::Throw(exception) => {
                let exception = self.expression(sink, exception)?;
                if sink.options().model_exceptions.is_modeled() {
                    self.stmt_builder
                        .add(Stmt::assign(EXCEPTION_VARIABLE, exception));
                    self.stmt_builder.add(Stmt::Return);
                } else {
                    self.stmt_builder.add(Stmt::assume(Expr::bool(false)));
                }
            }
            Statement::Assert(condition) => {
                let condition = self.expression(sink, condition)?;
                self.stmt_builder.add(Stmt::assert(condition));
            }
            Statement::Assume(condition) => {
                let condition = self.expression(sink, condition)?;
                self.stmt_builder.add(Stmt::assume(condition));
            }
            Statement::Located { offset, statement } => {
                self.source_location(*offset);
                self.traverse(sink, statement)?;
            }
        }
        // control does not fall through a return or throw
        let falls_through = !matches!(
            stmt,
            Statement::Block(_)
                | Statement::Located { .. }
                | Statement::Return(_)
                | Statement::Throw(_)
        );
        if falls_through {
            self.capture_state(sink);
        }
        Ok(())
    }

    pub fn collect(self) -> StmtList {
        self.stmt_builder.collect()
    }

    fn expression(&mut self, sink: &mut Sink, expr: &Expression) -> TranslationResult<Expr> {
        ExpressionTranslator::new(&mut self.stmt_builder, self.scope).translate(sink, expr)
    }

    /// Translates a branch or loop body on its own builder, opened with a numbered marker
    /// when branches are instrumented
    fn branch(&self, sink: &mut Sink, stmts: &[Statement]) -> TranslationResult<StmtList> {
        let mut translator = StatementTranslator::new(self.debug_symbols, self.scope);
        if sink.options().instrument_branches {
            let id = sink.next_branch() as i64;
            translator
                .stmt_builder
                .add(Stmt::marker(Attribute::int(BRANCH_ATTRIBUTE, id)));
        }
        translator.traverse_all(sink, stmts)?;
        Ok(translator.collect())
    }

    /// `assume {:captureState "sN"} true;`
    fn capture_state(&mut self, sink: &mut Sink) {
        if sink.options().capture_state {
            let label = format!("s{}", sink.next_capture_state());
            self.stmt_builder
                .add(Stmt::marker(Attribute::string(CAPTURE_STATE_ATTRIBUTE, label)));
        }
    }

    /// `assert {:sourceFile "f"} {:sourceLine n} true;` for a known sequence point
    fn source_location(&mut self, offset: u32) {
        let (Some(symbols), Some(method)) = (self.debug_symbols, self.scope) else {
            return;
        };
        if let Some(location) = symbols.location(method, offset) {
            self.stmt_builder.add(Stmt::Assert {
                attributes: vec![
                    Attribute::new("sourceFile", vec![AttrParam::String(location.file.clone())]),
                    Attribute::int("sourceLine", location.line as i64),
                ],
                condition: Expr::bool(true),
            });
        }
    }

    fn assignment(
        &mut self,
        sink: &mut Sink,
        target: &TargetExpression,
        source: &Expression,
    ) -> TranslationResult<()> {
        let mut value = self.expression(sink, source)?;
        let target_type = self.target_type(sink, target)?;
        if let Some(struct_type) = struct_to_copy(sink, &target_type, source) {
            value = ExpressionTranslator::new(&mut self.stmt_builder, self.scope)
                .copy_struct(sink, struct_type, value)?;
        }

        match target {
            TargetExpression::Local(_) | TargetExpression::Parameter(_) => {
                let name = self
                    .expression(sink, &target_as_expression(target))?
                    .as_ident()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        TranslationError::Unexpected("assignment target is not a variable".to_string())
                    })?;
                self.stmt_builder.add(Stmt::assign(name, value));
            }
            TargetExpression::Field { field, instance } => {
                let var = sink.find_or_create_field_variable(*field);
                let env = sink.env();
                let def = env.field(*field);
                match instance {
                    Some(instance) if !def.is_static => {
                        let object = self.expression(sink, instance)?;
                        ExpressionTranslator::new(&mut self.stmt_builder, self.scope)
                            .dereference_check(sink, &object)?;
                        let ty = sink.boogie_type(&def.ty);
                        sink.heap().write_heap(
                            object,
                            &var.name,
                            value,
                            AccessType::for_field(env, *field),
                            &ty,
                            &mut self.stmt_builder,
                        );
                    }
                    _ => self.stmt_builder.add(Stmt::assign(var.name, value)),
                }
            }
        }
        Ok(())
    }

    fn target_type(&self, sink: &Sink, target: &TargetExpression) -> TranslationResult<TypeRef> {
        let env = sink.env();
        match target {
            TargetExpression::Local(local) => self
                .scope
                .and_then(|m| env.method(m).body.as_ref())
                .and_then(|body| body.local(*local))
                .map(|def| def.ty.clone())
                .ok_or_else(|| {
                    TranslationError::Unexpected(format!("{} is not declared by the body", local))
                }),
            TargetExpression::Parameter(index) => self
                .scope
                .and_then(|m| env.method(m).parameters.get(*index as usize))
                .map(|param| param.ty.clone())
                .ok_or_else(|| {
                    TranslationError::Unexpected(format!("no parameter at position {}", index))
                }),
            TargetExpression::Field { field, .. } => Ok(env.field(*field).ty.clone()),
        }
    }

    fn result_variable(&self, sink: &Sink) -> TranslationResult<String> {
        self.scope
            .and_then(|m| sink.procedure_info(m))
            .and_then(|info| info.return_variable.as_ref())
            .map(|var| var.name.clone())
            .ok_or_else(|| {
                TranslationError::Translation("returning a value from a void method".to_string())
            })
    }
}

fn target_as_expression(target: &TargetExpression) -> Expression {
    match target {
        TargetExpression::Local(local) => Expression::Local(*local),
        TargetExpression::Parameter(index) => Expression::Parameter(*index),
        TargetExpression::Field { field, instance } => Expression::FieldRead {
            field: *field,
            instance: instance.clone(),
        },
    }
}
