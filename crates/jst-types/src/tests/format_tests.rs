use super::TypeFormatter;
use crate::function_builder::FunctionBuilder;
use crate::registry::TypeRegistry;
use crate::types::*;
use jst_common::{DiagnosticCollector, SourceLocation};

fn class(registry: &mut TypeRegistry, name: &str, params: Vec<Param>) -> (TypeId, TypeId) {
    let ctor = registry.create_constructor_type(name, params, Vec::<TypeId>::new());
    let instance = registry.instance_type(ctor).expect("constructor has an instance type");
    (ctor, instance)
}

#[test]
fn special_and_primitive_types() {
    let registry = TypeRegistry::new();
    let cases = [
        (TypeId::UNKNOWN, "?"),
        (TypeId::CHECKED_UNKNOWN, "??"),
        (TypeId::ALL, "*"),
        (TypeId::NONE, "None"),
        (TypeId::NO_OBJECT, "NoObject"),
        (TypeId::NULL, "null"),
        (TypeId::VOID, "undefined"),
        (TypeId::BOOLEAN, "boolean"),
        (TypeId::NUMBER, "number"),
        (TypeId::STRING, "string"),
        (TypeId::SYMBOL, "symbol"),
        (TypeId::BIGINT, "bigint"),
    ];
    for (type_id, expected) in cases {
        assert_eq!(registry.display(type_id), expected);
    }
    assert_eq!(registry.display(registry.native(NativeType::NoResolved)), "NoResolvedType");
    assert_eq!(registry.display(registry.native(NativeType::Function)), "Function");
    assert_eq!(registry.display(registry.native(NativeType::ArrayElementTemplate)), "T");
}

#[test]
fn unions_render_sorted() {
    let mut registry = TypeRegistry::new();
    let nullable_number = registry.create_nullable_type(TypeId::NUMBER);
    assert_eq!(registry.display(nullable_number), "(null|number)");
    assert_eq!(
        registry.display(registry.native(NativeType::NumberStringBoolean)),
        "(boolean|number|string)"
    );
    assert_eq!(registry.display(registry.native(NativeType::NullVoid)), "(null|undefined)");
}

#[test]
fn records_render_with_sorted_keys() {
    let mut registry = TypeRegistry::new();
    let b = registry.key("b");
    let a = registry.key("a");
    let record = registry.create_record_type([(b, TypeId::STRING), (a, TypeId::NUMBER)]);
    let empty = registry.create_record_type(Vec::<(PropertyKey, TypeId)>::new());
    let anonymous = registry.create_object_type(None, None);
    assert_eq!(registry.display(record), "{a: number, b: string}");
    assert_eq!(registry.display(empty), "{}");
    assert_eq!(registry.display(anonymous), "{}");
}

#[test]
fn functions_render_their_signature() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo", Vec::new());
    let method = registry.create_function_type(
        FunctionBuilder::new()
            .this_type(foo)
            .param(TypeId::NUMBER)
            .optional_param(TypeId::STRING)
            .rest_param(TypeId::NUMBER)
            .returns(TypeId::BOOLEAN),
    );
    let nothing = registry.create_function_type(FunctionBuilder::new());
    assert_eq!(
        registry.display(method),
        "function(this:Foo, number, string=, ...number): boolean"
    );
    assert_eq!(registry.display(nothing), "function(): ?");
}

#[test]
fn constructors_render_their_instance() {
    let mut registry = TypeRegistry::new();
    let (ctor, foo) = class(&mut registry, "Foo", vec![Param::required(TypeId::NUMBER)]);
    let prototype = registry.prototype_of(ctor).expect("prototype");
    assert_eq!(registry.display(ctor), "function(new:Foo, number)");
    assert_eq!(registry.display(foo), "Foo");
    assert_eq!(registry.display(prototype), "Foo.prototype");
}

#[test]
fn templatized_types_list_their_arguments() {
    let mut registry = TypeRegistry::new();
    let array = registry.native(NativeType::Array);
    let of_string = registry.create_templatized_type(array, [TypeId::STRING]);
    let nested = registry.create_templatized_type(array, [of_string]);
    assert_eq!(registry.display(of_string), "Array<string>");
    assert_eq!(registry.display(nested), "Array<Array<string>>");

    let k = registry.create_template_type("K", None);
    let v = registry.create_template_type("V", None);
    let ctor = registry.create_constructor_type("Pair", Vec::<Param>::new(), [k, v]);
    let pair = registry.instance_type(ctor).expect("instance");
    let bound = registry.create_templatized_type(pair, [TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(registry.display(bound), "Pair<string,number>");
}

#[test]
fn enums_and_elements() {
    let mut registry = TypeRegistry::new();
    let color = registry.create_enum_type("Color", TypeId::NUMBER);
    let element = registry.enum_element_type(color).expect("element");
    assert_eq!(registry.display(color), "enum{Color}");
    assert_eq!(registry.display(element), "Color<number>");
}

#[test]
fn named_types_render_by_state() {
    let mut registry = TypeRegistry::new();
    let (alias, missing) = {
        let mut window = registry.open_window();
        window.declare_type(ScopeId::GLOBAL, "Alias", TypeId::NUMBER);
        (
            window.create_named_type(ScopeId::GLOBAL, "Alias", SourceLocation::synthetic()),
            window.create_named_type(ScopeId::GLOBAL, "Missing", SourceLocation::synthetic()),
        )
    };
    assert_eq!(registry.display(alias), "Alias");

    registry.resolve_named_types(&mut DiagnosticCollector::new());
    assert_eq!(registry.display(alias), "number");
    assert_eq!(registry.display(missing), "Missing");
    assert_eq!(registry.display(registry.resolve(missing)), "Missing");
}

#[test]
fn deep_structure_is_cut_off() {
    let mut registry = TypeRegistry::new();
    let a = registry.key("a");
    let record = registry.create_record_type([(a, TypeId::NUMBER)]);
    let formatter = TypeFormatter::new(&registry).with_max_depth(0);
    assert_eq!(formatter.format_type(record), "{a: ...}");
    assert_eq!(TypeFormatter::new(&registry).format_type(record), "{a: number}");
}
