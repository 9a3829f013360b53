// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Detection of deferring constructors (`: this(...)`)

use object_model::{Expression, MethodId, ObjectModel, Statement, TargetExpression};

/// Whether the constructor `method` delegates to another constructor of its own type.
///
/// The body is searched in statement order for a constructor call on `this`. A call to a
/// constructor of the same type ends the search; a call to a base constructor is not
/// searched further.
pub fn is_deferring_ctor(env: &ObjectModel, method: MethodId, body: &[Statement]) -> bool {
    let finder = CtorCallFinder {
        env,
        containing_type: env.unspecialized(env.method(method).containing_type),
    };
    finder.statements(body)
}

struct CtorCallFinder<'a> {
    env: &'a ObjectModel,
    containing_type: object_model::TypeId,
}

impl CtorCallFinder<'_> {
    fn statements(&self, stmts: &[Statement]) -> bool {
        stmts.iter().any(|s| self.statement(s))
    }

    fn statement(&self, stmt: &Statement) -> bool {
        match stmt {
            Statement::Expression(e)
            | Statement::Throw(e)
            | Statement::Assert(e)
            | Statement::Assume(e) => self.expression(e),
            Statement::Assign { target, source } => {
                let in_target = match target {
                    TargetExpression::Field {
                        instance: Some(instance),
                        ..
                    } => self.expression(instance),
                    _ => false,
                };
                in_target || self.expression(source)
            }
            Statement::LocalDeclaration { initial_value, .. } => {
                initial_value.as_ref().is_some_and(|e| self.expression(e))
            }
            Statement::Block(stmts) => self.statements(stmts),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expression(condition)
                    || self.statements(then_branch)
                    || self.statements(else_branch)
            }
            Statement::While { condition, body } => {
                self.expression(condition) || self.statements(body)
            }
            Statement::Return(value) => value.as_ref().is_some_and(|e| self.expression(e)),
            Statement::Located { statement, .. } => self.statement(statement),
        }
    }

    fn expression(&self, expr: &Expression) -> bool {
        match expr {
            Expression::MethodCall(call) => {
                let target = self.env.method(call.method);
                if target.is_constructor() && call.has_this_receiver() {
                    return self.env.unspecialized(target.containing_type) == self.containing_type;
                }
                call.this_argument
                    .as_deref()
                    .is_some_and(|receiver| self.expression(receiver))
                    || call.arguments.iter().any(|a| self.expression(a))
            }
            Expression::FieldRead {
                instance: Some(instance),
                ..
            } => self.expression(instance),
            Expression::Unary { operand, .. } => self.expression(operand),
            Expression::Binary { left, right, .. } => {
                self.expression(left) || self.expression(right)
            }
            Expression::CreateObject { arguments, .. } => {
                arguments.iter().any(|a| self.expression(a))
            }
            Expression::Old(inner) => self.expression(inner),
            Expression::Constant(_)
            | Expression::DefaultValue(_)
            | Expression::ThisReference
            | Expression::Parameter(_)
            | Expression::Local(_)
            | Expression::FieldRead { instance: None, .. }
            | Expression::ReturnValue => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_model::{MethodCall, ModelBuilder, TypeRef};

    #[test]
    fn test_deferring_and_base_calls() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let base = builder.add_class(unit, "App", "Base");
        let derived = builder.add_class(unit, "App", "Derived");
        builder.type_mut(derived).base_types.push(base);
        let base_ctor = builder.add_constructor(base);
        let default_ctor = builder.add_constructor(derived);
        let sized_ctor = builder.add_constructor(derived);
        let helper = builder.add_method(derived, "Init");
        let env = builder.build();

        let this_call = |m| {
            Statement::call(MethodCall::new_instance(m, Expression::ThisReference, vec![]))
        };

        assert!(is_deferring_ctor(&env, sized_ctor, &[this_call(default_ctor)]));
        assert!(!is_deferring_ctor(&env, default_ctor, &[this_call(base_ctor)]));
        assert!(!is_deferring_ctor(&env, default_ctor, &[this_call(helper)]));
        assert!(!is_deferring_ctor(&env, default_ctor, &[]));

        // a self-delegating call nested in a block after a base call
        let body = vec![
            this_call(base_ctor),
            Statement::Block(vec![Statement::Located {
                offset: 4,
                statement: Box::new(this_call(default_ctor)),
            }]),
        ];
        assert!(is_deferring_ctor(&env, sized_ctor, &body));

        // a constructor call on another receiver is an ordinary call
        let other = Statement::call(MethodCall::new_instance(
            default_ctor,
            Expression::DefaultValue(TypeRef::Named(derived)),
            vec![],
        ));
        assert!(!is_deferring_ctor(&env, sized_ctor, &[other]));
    }
}
