use crate::function_builder::FunctionBuilder;
use crate::registry::TypeRegistry;
use crate::types::*;
use jst_common::SourceLocation;

fn class(registry: &mut TypeRegistry, name: &str) -> (TypeId, TypeId) {
    let ctor = registry.create_constructor_type(name, Vec::<Param>::new(), Vec::<TypeId>::new());
    let instance = registry.instance_type(ctor).expect("constructor has an instance type");
    (ctor, instance)
}

#[test]
fn declared_property_on_prototype_is_inherited() {
    let mut registry = TypeRegistry::new();
    let (ctor, foo) = class(&mut registry, "Foo");
    let prototype = registry.prototype_of(ctor).expect("prototype");
    let method = registry.key("method");
    let method_type = registry.create_function_type(FunctionBuilder::new().returns(TypeId::NUMBER));
    let location = SourceLocation::new("foo.js", 3, 5);

    assert!(registry.define_declared_property(prototype, method, method_type, Some(location.clone())));
    assert!(registry.has_property(foo, method));
    assert!(!registry.has_own_property(foo, method));
    assert!(registry.has_own_property(prototype, method));
    assert!(registry.is_property_type_declared(foo, method));
    assert_eq!(registry.get_property_type(foo, method), method_type);

    let slot = registry.find_slot(foo, method).expect("slot");
    assert_eq!(slot.owner, prototype);
    assert_eq!(slot.source, Some(location));
}

#[test]
fn properties_are_inherited_across_superclasses() {
    let mut registry = TypeRegistry::new();
    let (base_ctor, _) = class(&mut registry, "Base");
    let (sub_ctor, sub) = class(&mut registry, "Sub");
    {
        let mut window = registry.open_window();
        window.set_superclass(sub_ctor, base_ctor);
    }
    let base_prototype = registry.prototype_of(base_ctor).expect("prototype");
    let name = registry.key("name");
    registry.define_declared_property(base_prototype, name, TypeId::STRING, None);
    assert_eq!(registry.get_property_type(sub, name), TypeId::STRING);
}

#[test]
fn compatible_shadowing_is_accepted() {
    let mut registry = TypeRegistry::new();
    let (ctor, foo) = class(&mut registry, "Foo");
    let prototype = registry.prototype_of(ctor).expect("prototype");
    let p = registry.key("p");
    let number_or_string = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    registry.define_declared_property(prototype, p, number_or_string, None);

    assert!(registry.define_declared_property(foo, p, TypeId::NUMBER, None));
    assert_eq!(registry.get_property_type(foo, p), TypeId::NUMBER);
    assert_eq!(registry.get_property_type(prototype, p), number_or_string);
}

#[test]
fn incompatible_shadowing_is_refused() {
    let mut registry = TypeRegistry::new();
    let (ctor, foo) = class(&mut registry, "Foo");
    let prototype = registry.prototype_of(ctor).expect("prototype");
    let p = registry.key("p");
    let number_or_string = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    registry.define_declared_property(prototype, p, number_or_string, None);

    assert!(!registry.define_declared_property(foo, p, TypeId::BOOLEAN, None));
    assert!(!registry.has_own_property(foo, p));
    assert_eq!(registry.get_property_type(foo, p), number_or_string);
}

#[test]
fn inferred_properties_widen() {
    let mut registry = TypeRegistry::new();
    let object = registry.create_object_type(None, None);
    let q = registry.key("q");
    assert!(registry.define_inferred_property(object, q, TypeId::NUMBER, None));
    assert!(registry.define_inferred_property(object, q, TypeId::STRING, None));

    let expected = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(registry.get_property_type(object, q), expected);
    assert!(registry.is_property_type_inferred(object, q));
    assert!(!registry.is_property_type_declared(object, q));
}

#[test]
fn declared_properties_beat_inferred_ones() {
    let mut registry = TypeRegistry::new();
    let object = registry.create_object_type(None, None);
    let q = registry.key("q");
    registry.define_inferred_property(object, q, TypeId::NUMBER, None);
    assert!(registry.define_declared_property(object, q, TypeId::BOOLEAN, None));
    assert!(registry.define_inferred_property(object, q, TypeId::STRING, None));

    assert_eq!(registry.get_property_type(object, q), TypeId::BOOLEAN);
    assert!(registry.is_property_type_declared(object, q));
}

#[test]
fn inferred_property_over_inherited_declaration_widens_own_slot() {
    let mut registry = TypeRegistry::new();
    let (ctor, foo) = class(&mut registry, "Foo");
    let prototype = registry.prototype_of(ctor).expect("prototype");
    let p = registry.key("p");
    registry.define_declared_property(prototype, p, TypeId::NUMBER, None);

    assert!(registry.define_inferred_property(foo, p, TypeId::STRING, None));
    let number_or_string = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    assert!(registry.has_own_property(foo, p));
    assert!(registry.is_property_type_inferred(foo, p));
    assert_eq!(registry.get_property_type(foo, p), number_or_string);
    assert_eq!(registry.get_property_type(prototype, p), TypeId::NUMBER);
    assert!(registry.is_property_type_declared(prototype, p));
}

#[test]
fn frozen_and_primitive_owners_are_refused() {
    let mut registry = TypeRegistry::new();
    let a = registry.key("a");
    let record = registry.create_record_type([(a, TypeId::NUMBER)]);
    let anonymous = registry.create_function_type(FunctionBuilder::new());
    let union = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);

    assert!(!registry.define_declared_property(record, a, TypeId::STRING, None));
    assert!(!registry.define_declared_property(anonymous, a, TypeId::STRING, None));
    assert!(!registry.define_declared_property(TypeId::NUMBER, a, TypeId::STRING, None));
    assert!(!registry.define_inferred_property(union, a, TypeId::STRING, None));
    assert_eq!(registry.get_property_type(record, a), TypeId::NUMBER);
}

#[test]
fn named_functions_hold_properties() {
    let mut registry = TypeRegistry::new();
    let f = registry.create_function_type(FunctionBuilder::new().with_name("f"));
    let cache = registry.key("cache");
    assert!(registry.define_declared_property(f, cache, TypeId::STRING, None));
    assert_eq!(registry.get_property_type(f, cache), TypeId::STRING);
}

#[test]
fn own_property_keys_keep_definition_order() {
    let mut registry = TypeRegistry::new();
    let object = registry.create_object_type(Some("Config"), None);
    let z = registry.key("z");
    let a = registry.key("a");
    let m = registry.key("m");
    for key in [z, a, m] {
        registry.define_declared_property(object, key, TypeId::NUMBER, None);
    }
    assert_eq!(registry.own_property_keys(object), vec![z, a, m]);
    assert!(registry.own_property_keys(TypeId::NUMBER).is_empty());
}

#[test]
fn missing_and_unknown_properties() {
    let mut registry = TypeRegistry::new();
    let object = registry.create_object_type(None, None);
    let known = registry.key("known");
    let unknown = registry.key("unknown");
    let missing = registry.key("missing");
    registry.define_declared_property(object, known, TypeId::NUMBER, None);
    registry.define_declared_property(object, unknown, TypeId::UNKNOWN, None);

    assert!(!registry.is_property_type_unknown(object, known));
    assert!(registry.is_property_type_unknown(object, unknown));
    assert!(registry.is_property_type_unknown(object, missing));
    assert!(!registry.has_property(object, missing));
    assert_eq!(registry.get_property_type(object, missing), TypeId::UNKNOWN);
}

#[test]
fn property_types_of_special_types() {
    let mut registry = TypeRegistry::new();
    let x = registry.key("x");
    assert_eq!(registry.get_property_type(TypeId::NONE, x), TypeId::NONE);
    assert_eq!(registry.get_property_type(TypeId::NO_OBJECT, x), TypeId::NONE);
    assert_eq!(registry.get_property_type(TypeId::UNKNOWN, x), TypeId::UNKNOWN);
    assert_eq!(registry.get_property_type(TypeId::CHECKED_UNKNOWN, x), TypeId::CHECKED_UNKNOWN);
    assert!(registry.has_property(TypeId::UNKNOWN, x));
    assert!(!registry.has_property(TypeId::NULL, x));
}

#[test]
fn union_properties_join_over_members() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo");
    let (_, bar) = class(&mut registry, "Bar");
    let (_, baz) = class(&mut registry, "Baz");
    let x = registry.key("x");
    registry.define_declared_property(foo, x, TypeId::NUMBER, None);
    registry.define_declared_property(bar, x, TypeId::STRING, None);

    let foo_or_bar = registry.create_union_type([foo, bar]);
    let foo_or_baz = registry.create_union_type([foo, baz]);
    let baz_or_null = registry.create_nullable_type(baz);
    let foo_or_null = registry.create_nullable_type(foo);

    let expected = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(registry.find_property_type(foo_or_bar, x), Some(expected));
    assert_eq!(registry.find_property_type(foo_or_baz, x), Some(TypeId::NUMBER));
    assert_eq!(registry.find_property_type(baz_or_null, x), None);
    assert_eq!(registry.get_property_type(baz_or_null, x), TypeId::UNKNOWN);
    assert!(registry.has_property(foo_or_null, x));
}

#[test]
fn primitives_find_properties_on_their_wrapper() {
    let mut registry = TypeRegistry::new();
    let length = registry.key("length");
    let char_at = registry.key("charAt");
    let to_fixed = registry.key("toFixed");

    assert_eq!(registry.autobox(TypeId::STRING), registry.native(NativeType::StringObject));
    assert_eq!(registry.autobox(TypeId::NULL), TypeId::NULL);
    assert_eq!(registry.find_property_type(TypeId::STRING, length), Some(TypeId::NUMBER));
    assert_eq!(registry.find_property_type(TypeId::NUMBER, length), None);
    assert!(registry.find_property_type(TypeId::NUMBER, to_fixed).is_some());

    let char_at_type = registry.find_property_type(TypeId::STRING, char_at).expect("charAt");
    assert_eq!(registry.function_data(char_at_type).map(|f| f.return_type), Some(TypeId::STRING));

    let color = registry.create_enum_type("Color", TypeId::STRING);
    let element = registry.enum_element_type(color).expect("element");
    assert_eq!(registry.find_property_type(element, length), Some(TypeId::NUMBER));
}

#[test]
fn templatized_properties_are_substituted() {
    let mut registry = TypeRegistry::new();
    let array = registry.native(NativeType::Array);
    let of_string = registry.create_templatized_type(array, [TypeId::STRING]);
    let pop = registry.key("pop");
    let push = registry.key("push");
    let length = registry.key("length");

    let expected_pop = registry.create_function_type(FunctionBuilder::new().returns(TypeId::STRING));
    let expected_push = registry.create_function_type(
        FunctionBuilder::new()
            .rest_param(TypeId::STRING)
            .returns(TypeId::NUMBER),
    );
    assert_eq!(registry.get_property_type(of_string, pop), expected_pop);
    assert_eq!(registry.get_property_type(of_string, push), expected_push);
    assert_eq!(registry.get_property_type(of_string, length), TypeId::NUMBER);
    assert!(registry.has_property(of_string, pop));
}
