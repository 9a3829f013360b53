// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Method contracts become `requires`, `ensures` and `modifies` clauses

use crate::error::{TranslationError, TranslationResult};
use crate::sink::Sink;
use crate::translation::ExpressionTranslator;
use boogie_ir::{Ensures, Expr, Requires};
use object_model::{Expression, MethodContract, MethodId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedContract {
    pub requires: Vec<Requires>,
    pub ensures: Vec<Ensures>,
    pub modifies: Vec<String>,
}

pub fn translate_contract(
    sink: &mut Sink,
    method: MethodId,
    contract: &MethodContract,
) -> TranslationResult<TranslatedContract> {
    let mut translated = TranslatedContract::default();
    for pre in &contract.preconditions {
        translated.requires.push(Requires {
            condition: translate_clause(sink, method, &pre.condition)?,
            free: false,
        });
    }
    for post in &contract.postconditions {
        translated.ensures.push(Ensures {
            condition: translate_clause(sink, method, &post.condition)?,
            free: false,
        });
    }
    for target in &contract.modified_variables {
        let expr = translate_clause(sink, method, target)?;
        let name = expr.as_ident().ok_or_else(|| {
            TranslationError::Translation(format!("cannot modify `{}`: not a variable", expr))
        })?;
        if !translated.modifies.iter().any(|m| m == name) {
            translated.modifies.push(name.to_string());
        }
    }
    Ok(translated)
}

/// Every clause is translated on its own and must produce exactly one expression
fn translate_clause(sink: &mut Sink, method: MethodId, expr: &Expression) -> TranslationResult<Expr> {
    let mut translator = ExpressionTranslator::for_contract(method);
    translator.traverse(sink, expr)?;
    let found = translator.translated_expressions.len();
    match translator.translated_expressions.pop() {
        Some(result) if found == 1 => Ok(result),
        _ => Err(TranslationError::MalformedExpression { expected: 1, found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{HeapRepresentation, TranslatorOptions};
    use object_model::{BinaryOperator, ModelBuilder, Parameter, TypeRef};

    #[test]
    fn test_contract_clauses() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let account = builder.add_class(unit, "Bank", "Account");
        let total = builder.add_field(account, "total", TypeRef::int32(), true);
        let deposit = builder.add_method(account, "Deposit");
        {
            let m = builder.method_mut(deposit);
            m.is_static = true;
            m.parameters.push(Parameter::by_value("amount", TypeRef::int32()));
            m.contract = Some(
                MethodContract::default()
                    .requires(Expression::binary(
                        BinaryOperator::Gt,
                        Expression::Parameter(0),
                        Expression::int(0),
                    ))
                    .ensures(Expression::binary(
                        BinaryOperator::Eq,
                        Expression::field(total, None),
                        Expression::binary(
                            BinaryOperator::Add,
                            Expression::Old(Box::new(Expression::field(total, None))),
                            Expression::Parameter(0),
                        ),
                    ))
                    .modifies(Expression::field(total, None))
                    .modifies(Expression::field(total, None)),
            );
        }
        let env = builder.build();
        let mut sink = Sink::new(
            &env,
            TranslatorOptions {
                heap_representation: HeapRepresentation::SplitFields,
                ..Default::default()
            },
        );

        let info = sink.find_or_create_procedure(deposit);
        assert!(sink.contract_error(deposit).is_none());
        assert_eq!(
            sink.program().procedure(info.decl).to_string(),
            "procedure Bank.Account.Deposit$System.Int32(amount$in: int);\n  \
             requires (amount$in > 0);\n  \
             modifies F$Bank.Account.total;\n  \
             ensures (F$Bank.Account.total == (old(F$Bank.Account.total) + amount$in));\n"
        );
    }

    #[test]
    fn test_modifies_requires_a_variable() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let c = builder.add_class(unit, "App", "C");
        let m = builder.add_method(c, "M");
        builder.method_mut(m).contract = Some(MethodContract::default().modifies(Expression::int(1)));
        let env = builder.build();
        let mut sink = Sink::new(&env, TranslatorOptions::default());

        let info = sink.find_or_create_procedure(m);
        assert!(matches!(
            sink.contract_error(m),
            Some(TranslationError::Translation(_))
        ));
        // the procedure stays declared, without the contract
        assert!(sink.program().procedure(info.decl).modifies.is_empty());
    }
}
