// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Custom attributes of a method become Boogie attributes of its procedure

use crate::error::{TranslationError, TranslationResult};
use boogie_ir::{AttrParam, Attribute, Expr};
use object_model::{ConstantValue, CustomAttribute, MetadataConstant, MetadataExpression, ObjectModel};

/// Translates all `attributes`, or none: a single unsupported argument fails the lot.
pub fn translate_attributes(
    env: &ObjectModel,
    attributes: &[CustomAttribute],
) -> TranslationResult<Vec<Attribute>> {
    attributes
        .iter()
        .map(|a| translate_attribute(env, a))
        .collect()
}

fn translate_attribute(env: &ObjectModel, attribute: &CustomAttribute) -> TranslationResult<Attribute> {
    let key = attribute
        .type_name
        .strip_suffix("Attribute")
        .unwrap_or(&attribute.type_name);
    let mut params = vec![];
    for argument in &attribute.arguments {
        // `typeof` arguments have no Boogie counterpart
        if let MetadataExpression::Constant(constant) = argument {
            params.push(translate_constant(env, constant)?);
        }
    }
    Ok(Attribute::new(key, params))
}

fn translate_constant(env: &ObjectModel, constant: &MetadataConstant) -> TranslationResult<AttrParam> {
    if let Some(enum_type) = constant.enum_type {
        return match constant.value {
            ConstantValue::Int32(v) => Ok(AttrParam::Expr(Expr::int(v as i64))),
            ConstantValue::Int64(v) => Ok(AttrParam::Expr(Expr::int(v))),
            ref other => Err(TranslationError::UnsupportedAttributeArgument(format!(
                "{:?} member of enum `{}`",
                other,
                env.type_full_name(enum_type)
            ))),
        };
    }
    match &constant.value {
        ConstantValue::Bool(b) => Ok(AttrParam::Expr(Expr::bool(*b))),
        ConstantValue::Int32(v) => Ok(AttrParam::Expr(Expr::int(*v as i64))),
        ConstantValue::String(s) => Ok(AttrParam::String(s.clone())),
        other => Err(TranslationError::UnsupportedAttributeArgument(format!(
            "{:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_model::{ModelBuilder, TypeKind};

    fn constant(value: ConstantValue) -> MetadataExpression {
        MetadataExpression::Constant(MetadataConstant::new(value))
    }

    #[test]
    fn test_translate_supported_arguments() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let level = builder.add_type(unit, "Lib", "Level", TypeKind::Enum);
        let env = builder.build();

        let attributes = vec![
            CustomAttribute::new(
                "Lib.CheckAttribute",
                vec![
                    constant(ConstantValue::Bool(true)),
                    constant(ConstantValue::Int32(3)),
                    constant(ConstantValue::String("fast".to_string())),
                    MetadataExpression::Constant(MetadataConstant::enum_member(level, 2)),
                    MetadataExpression::TypeOf(level),
                ],
            ),
            CustomAttribute::new("Lib.Pure", vec![]),
        ];
        let translated = translate_attributes(&env, &attributes).unwrap();
        let rendered: Vec<_> = translated.iter().map(|a| a.to_string()).collect();
        assert_eq!(rendered, vec!["{:Lib.Check true, 3, \"fast\", 2}", "{:Lib.Pure}"]);
    }

    #[test]
    fn test_unsupported_argument_fails_all() {
        let env = ModelBuilder::new().build();
        let attributes = vec![
            CustomAttribute::new("Lib.PureAttribute", vec![]),
            CustomAttribute::new("Lib.WeightAttribute", vec![constant(ConstantValue::Float64(0.5))]),
        ];
        assert!(matches!(
            translate_attributes(&env, &attributes),
            Err(TranslationError::UnsupportedAttributeArgument(_))
        ));
    }
}
