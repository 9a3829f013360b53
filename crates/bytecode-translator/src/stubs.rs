// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Stub substitution
//!
//! A method (or every method of a type) marked `[Stub(typeof(S))]` is replaced by the
//! equivalent method of `S`.

use object_model::{CustomAttribute, MetadataExpression, MethodId, ObjectModel, TypeId};

pub const STUB_ATTRIBUTE: &str = "BytecodeTranslator.StubAttribute";

/// The (unspecialized) type given as `typeof` first argument of the first attribute named
/// `attribute_name`
pub fn type_definition_from_attribute(
    env: &ObjectModel,
    attributes: &[CustomAttribute],
    attribute_name: &str,
) -> Option<TypeId> {
    let attribute = attributes.iter().find(|a| a.type_name == attribute_name)?;
    match attribute.arguments.first()? {
        MetadataExpression::TypeOf(ty) => Some(env.unspecialized(*ty)),
        MetadataExpression::Constant(_) => None,
    }
}

/// The stub replacing `method`, looked up through the method's own attributes first and
/// then those of its containing type
pub fn resolve_stub(env: &ObjectModel, method: MethodId) -> Option<MethodId> {
    let def = env.method(method);
    let stub_type = type_definition_from_attribute(env, &def.attributes, STUB_ATTRIBUTE)
        .or_else(|| {
            let containing = env.type_def(def.containing_type);
            type_definition_from_attribute(env, &containing.attributes, STUB_ATTRIBUTE)
        })?;
    env.methods_named(stub_type, &def.name)
        .find(|candidate| *candidate != method && env.methods_are_equivalent(method, *candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_model::{ConstantValue, MetadataConstant, ModelBuilder, Parameter, TypeKind, TypeRef};

    fn stub_attribute(ty: TypeId) -> CustomAttribute {
        CustomAttribute::new(STUB_ATTRIBUTE, vec![MetadataExpression::TypeOf(ty)])
    }

    #[test]
    fn test_method_level_stub() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let real = builder.add_class(unit, "Lib", "Io");
        let stubs = builder.add_class(unit, "Lib", "IoStubs");
        let read = builder.add_method(real, "Read");
        builder
            .method_mut(read)
            .parameters
            .push(Parameter::by_value("n", TypeRef::int32()));
        builder.method_mut(read).attributes.push(stub_attribute(stubs));
        let wrong = builder.add_method(stubs, "Read");
        let stub_read = builder.add_method(stubs, "Read");
        builder
            .method_mut(stub_read)
            .parameters
            .push(Parameter::by_value("count", TypeRef::int32()));
        let env = builder.build();

        assert_eq!(resolve_stub(&env, read), Some(stub_read));
        assert_eq!(resolve_stub(&env, stub_read), None);
        assert_eq!(resolve_stub(&env, wrong), None);
    }

    #[test]
    fn test_type_level_stub_and_unspecialized() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let generic_stubs = builder.add_class(unit, "Lib", "ListStubs");
        let instance = builder.add_detached_type(unit, "Lib", "ListStubs_Int32", TypeKind::Class);
        builder.type_mut(instance).unspecialized = Some(generic_stubs);
        let list = builder.add_class(unit, "Lib", "List");
        builder.type_mut(list).attributes.push(stub_attribute(instance));
        let clear = builder.add_method(list, "Clear");
        let stub_clear = builder.add_method(generic_stubs, "Clear");
        let env = builder.build();

        assert_eq!(resolve_stub(&env, clear), Some(stub_clear));
    }

    #[test]
    fn test_non_typeof_argument_is_ignored() {
        let mut builder = ModelBuilder::new();
        let unit = builder.add_assembly("App");
        let c = builder.add_class(unit, "Lib", "C");
        let m = builder.add_method(c, "M");
        builder.method_mut(m).attributes.push(CustomAttribute::new(
            STUB_ATTRIBUTE,
            vec![MetadataExpression::Constant(MetadataConstant::new(
                ConstantValue::String("Lib.CStubs".to_string()),
            ))],
        ));
        let env = builder.build();

        assert_eq!(resolve_stub(&env, m), None);
    }
}
