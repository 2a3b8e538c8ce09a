use crate::function_builder::FunctionBuilder;
use crate::options::LatticeOptions;
use crate::registry::TypeRegistry;
use crate::subtype::{SubtypeChecker, SubtypeResult};
use crate::types::*;

fn class(registry: &mut TypeRegistry, name: &str) -> (TypeId, TypeId) {
    let ctor = registry.create_constructor_type(name, Vec::<Param>::new(), Vec::<TypeId>::new());
    let instance = registry.instance_type(ctor).expect("constructor has an instance type");
    (ctor, instance)
}

fn subclass(registry: &mut TypeRegistry, name: &str, base_ctor: TypeId) -> (TypeId, TypeId) {
    let (ctor, instance) = class(registry, name);
    let mut window = registry.open_window();
    assert!(window.set_superclass(ctor, base_ctor));
    (ctor, instance)
}

fn function(registry: &mut TypeRegistry, params: &[TypeId], returns: TypeId) -> TypeId {
    let builder = params
        .iter()
        .fold(FunctionBuilder::new(), |builder, &param| builder.param(param))
        .returns(returns);
    registry.create_function_type(builder)
}

#[test]
fn top_and_bottom() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo");
    let union = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    for id in [TypeId::NULL, TypeId::NUMBER, TypeId::SYMBOL, foo, union, TypeId::NO_OBJECT] {
        assert!(registry.is_subtype_of(TypeId::NONE, id));
        assert!(registry.is_subtype_of(id, TypeId::ALL));
        assert!(!registry.is_subtype_of(TypeId::ALL, id));
        assert!(!registry.is_subtype_of(id, TypeId::NONE));
    }
}

#[test]
fn unknown_is_related_to_everything() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo");
    for id in [TypeId::NONE, TypeId::ALL, TypeId::NUMBER, foo] {
        for unknown in [TypeId::UNKNOWN, TypeId::CHECKED_UNKNOWN] {
            assert!(registry.is_subtype_of(unknown, id));
            assert!(registry.is_subtype_of(id, unknown));
        }
    }
}

#[test]
fn primitives_are_unrelated() {
    let registry = TypeRegistry::new();
    let primitives = [
        TypeId::NULL,
        TypeId::VOID,
        TypeId::BOOLEAN,
        TypeId::NUMBER,
        TypeId::STRING,
        TypeId::SYMBOL,
        TypeId::BIGINT,
    ];
    for &a in &primitives {
        for &b in &primitives {
            assert_eq!(registry.is_subtype_of(a, b), a == b, "{a:?} <: {b:?}");
        }
    }
}

#[test]
fn primitives_do_not_autobox() {
    let registry = TypeRegistry::new();
    assert!(!registry.is_subtype_of(TypeId::NUMBER, registry.native(NativeType::NumberObject)));
    assert!(!registry.is_subtype_of(TypeId::STRING, registry.native(NativeType::Object)));
    assert!(!registry.is_subtype_of(registry.native(NativeType::NumberObject), TypeId::NUMBER));
}

#[test]
fn no_object_sits_below_objects() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo");
    assert!(registry.is_subtype_of(TypeId::NO_OBJECT, foo));
    assert!(registry.is_subtype_of(TypeId::NO_OBJECT, registry.native(NativeType::Function)));
    assert!(!registry.is_subtype_of(TypeId::NO_OBJECT, TypeId::NUMBER));
    assert!(!registry.is_subtype_of(foo, TypeId::NO_OBJECT));
}

#[test]
fn everything_object_is_below_object() {
    let mut registry = TypeRegistry::new();
    let (ctor, foo) = class(&mut registry, "Foo");
    let object = registry.native(NativeType::Object);
    let a = registry.key("a");
    let record = registry.create_record_type([(a, TypeId::NUMBER)]);
    let f = function(&mut registry, &[TypeId::NUMBER], TypeId::STRING);
    for id in [foo, ctor, record, f, registry.native(NativeType::Array)] {
        assert!(registry.is_subtype_of(id, object), "{id:?}");
    }
    assert!(!registry.is_subtype_of(object, foo));
}

#[test]
fn unions_as_source_and_target() {
    let mut registry = TypeRegistry::new();
    let number_or_string = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    let wide = registry.create_union_type([TypeId::NUMBER, TypeId::STRING, TypeId::BOOLEAN]);
    assert!(registry.is_subtype_of(TypeId::NUMBER, number_or_string));
    assert!(!registry.is_subtype_of(TypeId::BOOLEAN, number_or_string));
    assert!(registry.is_subtype_of(number_or_string, wide));
    assert!(!registry.is_subtype_of(wide, number_or_string));
    assert!(!registry.is_subtype_of(number_or_string, TypeId::NUMBER));
}

#[test]
fn nominal_class_hierarchy() {
    let mut registry = TypeRegistry::new();
    let (base_ctor, base) = class(&mut registry, "Base");
    let (sub_ctor, sub) = subclass(&mut registry, "Sub", base_ctor);
    let (_, leaf) = subclass(&mut registry, "Leaf", sub_ctor);
    let (_, other) = class(&mut registry, "Other");

    assert!(registry.is_subtype_of(sub, base));
    assert!(registry.is_subtype_of(leaf, base));
    assert!(!registry.is_subtype_of(base, sub));
    assert!(!registry.is_subtype_of(other, base));
    assert!(!registry.is_subtype_of(base, other));
}

#[test]
fn classes_with_equal_shapes_stay_distinct() {
    let mut registry = TypeRegistry::new();
    let (_, first) = class(&mut registry, "First");
    let (_, second) = class(&mut registry, "Second");
    let x = registry.key("x");
    registry.define_declared_property(first, x, TypeId::NUMBER, None);
    registry.define_declared_property(second, x, TypeId::NUMBER, None);
    assert!(!registry.is_subtype_of(first, second));
}

#[test]
fn interfaces_are_nominal() {
    let mut registry = TypeRegistry::new();
    let shape = registry.create_interface_type("Shape", Vec::<TypeId>::new());
    let shape_instance = registry.instance_type(shape).expect("instance");
    let named = registry.create_interface_type("Named", Vec::<TypeId>::new());
    let named_instance = registry.instance_type(named).expect("instance");
    let (circle_ctor, circle) = class(&mut registry, "Circle");
    let (_, square) = class(&mut registry, "Square");
    {
        let mut window = registry.open_window();
        window.add_extended_interface(shape, named_instance);
        window.add_implemented_interface(circle_ctor, shape_instance);
    }

    assert!(registry.is_subtype_of(circle, shape_instance));
    assert!(registry.is_subtype_of(circle, named_instance));
    assert!(registry.is_subtype_of(shape_instance, named_instance));
    assert!(!registry.is_subtype_of(named_instance, shape_instance));
    assert!(!registry.is_subtype_of(square, shape_instance));
}

#[test]
fn record_interfaces_are_structural() {
    let mut registry = TypeRegistry::new();
    let point = registry.create_record_interface_type("Point", Vec::<TypeId>::new());
    let point_instance = registry.instance_type(point).expect("instance");
    let point_prototype = registry.prototype_of(point).expect("prototype");
    let x = registry.key("x");
    let y = registry.key("y");
    let z = registry.key("z");
    registry.define_declared_property(point_prototype, x, TypeId::NUMBER, None);
    registry.define_declared_property(point_prototype, y, TypeId::NUMBER, None);

    let (_, vector) = class(&mut registry, "Vector");
    registry.define_declared_property(vector, x, TypeId::NUMBER, None);
    registry.define_declared_property(vector, y, TypeId::NUMBER, None);
    let (_, half) = class(&mut registry, "Half");
    registry.define_declared_property(half, x, TypeId::NUMBER, None);

    let wide_record = registry.create_record_type([(x, TypeId::NUMBER), (y, TypeId::NUMBER), (z, TypeId::STRING)]);
    let wrong_record = registry.create_record_type([(x, TypeId::NUMBER), (y, TypeId::STRING)]);

    assert!(registry.is_subtype_of(vector, point_instance));
    assert!(registry.is_subtype_of(wide_record, point_instance));
    assert!(!registry.is_subtype_of(half, point_instance));
    assert!(!registry.is_subtype_of(wrong_record, point_instance));
}

#[test]
fn records_width_and_depth() {
    let mut registry = TypeRegistry::new();
    let a = registry.key("a");
    let b = registry.key("b");
    let nullable_number = registry.create_nullable_type(TypeId::NUMBER);
    let rec_a = registry.create_record_type([(a, TypeId::NUMBER)]);
    let rec_ab = registry.create_record_type([(a, TypeId::NUMBER), (b, TypeId::STRING)]);
    let rec_nullable = registry.create_record_type([(a, nullable_number)]);
    let rec_string = registry.create_record_type([(a, TypeId::STRING)]);
    let empty = registry.create_record_type(Vec::<(PropertyKey, TypeId)>::new());

    assert!(registry.is_subtype_of(rec_ab, rec_a));
    assert!(!registry.is_subtype_of(rec_a, rec_ab));
    assert!(registry.is_subtype_of(rec_a, rec_nullable));
    assert!(!registry.is_subtype_of(rec_nullable, rec_a));
    assert!(!registry.is_subtype_of(rec_a, rec_string));
    assert!(registry.is_subtype_of(rec_a, empty));
}

#[test]
fn missing_voidable_property_is_optional() {
    let mut registry = TypeRegistry::new();
    let a = registry.key("a");
    let b = registry.key("b");
    let optional_string = registry.create_optional_type(TypeId::STRING);
    let rec_a = registry.create_record_type([(a, TypeId::NUMBER)]);
    let rec_opt = registry.create_record_type([(a, TypeId::NUMBER), (b, optional_string)]);
    assert!(registry.is_subtype_of(rec_a, rec_opt));
}

#[test]
fn class_instances_match_records_by_shape() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo");
    let a = registry.key("a");
    registry.define_declared_property(foo, a, TypeId::NUMBER, None);
    let rec_a = registry.create_record_type([(a, TypeId::NUMBER)]);
    assert!(registry.is_subtype_of(foo, rec_a));
    assert!(!registry.is_subtype_of(rec_a, foo));
}

#[test]
fn function_return_is_covariant() {
    let mut registry = TypeRegistry::new();
    let nullable_string = registry.create_nullable_type(TypeId::STRING);
    let narrow = function(&mut registry, &[TypeId::NUMBER], TypeId::STRING);
    let wide = function(&mut registry, &[TypeId::NUMBER], nullable_string);
    assert!(registry.is_subtype_of(narrow, wide));
    assert!(!registry.is_subtype_of(wide, narrow));
}

#[test]
fn function_params_are_contravariant() {
    let mut registry = TypeRegistry::new();
    let (base_ctor, base) = class(&mut registry, "Base");
    let (_, sub) = subclass(&mut registry, "Sub", base_ctor);
    let takes_base = function(&mut registry, &[base], TypeId::VOID);
    let takes_sub = function(&mut registry, &[sub], TypeId::VOID);
    assert!(registry.is_subtype_of(takes_base, takes_sub));
    assert!(!registry.is_subtype_of(takes_sub, takes_base));
}

#[test]
fn function_arity() {
    let mut registry = TypeRegistry::new();
    let one = function(&mut registry, &[TypeId::NUMBER], TypeId::VOID);
    let two = function(&mut registry, &[TypeId::NUMBER, TypeId::STRING], TypeId::VOID);
    let optional = registry.create_function_type(
        FunctionBuilder::new()
            .optional_param(TypeId::NUMBER)
            .returns(TypeId::VOID),
    );
    let rest = registry.create_function_type(
        FunctionBuilder::new()
            .rest_param(TypeId::NUMBER)
            .returns(TypeId::VOID),
    );

    // Fewer parameters may stand in for more.
    assert!(registry.is_subtype_of(one, two));
    assert!(!registry.is_subtype_of(two, one));
    assert!(registry.is_subtype_of(optional, one));
    assert!(!registry.is_subtype_of(one, optional));
    assert!(registry.is_subtype_of(rest, one));
}

#[test]
fn functions_below_function_and_above_least() {
    let mut registry = TypeRegistry::new();
    let f = function(&mut registry, &[TypeId::NUMBER, TypeId::STRING], TypeId::BOOLEAN);
    let least = registry.native(NativeType::LeastFunction);
    let greatest = registry.native(NativeType::GreatestFunction);
    assert!(registry.is_subtype_of(f, registry.native(NativeType::Function)));
    assert!(registry.is_subtype_of(least, f));
    assert!(registry.is_subtype_of(f, greatest));
    assert!(!registry.is_subtype_of(f, TypeId::NUMBER));
}

#[test]
fn constructors_and_ordinary_functions() {
    let mut registry = TypeRegistry::new();
    let (ctor, _) = class(&mut registry, "Foo");
    let ordinary = registry.create_function_type(FunctionBuilder::new());
    assert!(registry.is_subtype_of(ctor, ordinary));
    assert!(!registry.is_subtype_of(ordinary, ctor));
}

#[test]
fn templatized_arguments_are_covariant() {
    let mut registry = TypeRegistry::new();
    let array = registry.native(NativeType::Array);
    let number_or_string = registry.create_union_type([TypeId::NUMBER, TypeId::STRING]);
    let of_string = registry.create_templatized_type(array, [TypeId::STRING]);
    let of_number = registry.create_templatized_type(array, [TypeId::NUMBER]);
    let of_either = registry.create_templatized_type(array, [number_or_string]);

    assert!(registry.is_subtype_of(of_string, of_either));
    assert!(!registry.is_subtype_of(of_either, of_string));
    assert!(!registry.is_subtype_of(of_number, of_string));
    assert!(registry.is_subtype_of(of_string, array));
    assert!(registry.is_subtype_of(array, of_string));
    assert!(registry.is_subtype_of(of_string, registry.native(NativeType::Object)));
    assert!(!registry.is_subtype_of(of_string, registry.native(NativeType::Date)));
}

#[test]
fn templates_compare_through_their_bound() {
    let mut registry = TypeRegistry::new();
    let free = registry.create_template_type("T", None);
    let bounded = registry.create_template_type("N", Some(TypeId::NUMBER));
    assert!(registry.is_subtype_of(free, TypeId::STRING));
    assert!(registry.is_subtype_of(bounded, TypeId::NUMBER));
    assert!(!registry.is_subtype_of(bounded, TypeId::STRING));
}

#[test]
fn enum_elements_follow_their_primitive() {
    let mut registry = TypeRegistry::new();
    let color = registry.create_enum_type("Color", TypeId::NUMBER);
    let element = registry.enum_element_type(color).expect("element");
    let size = registry.create_enum_type("Size", TypeId::NUMBER);
    let size_element = registry.enum_element_type(size).expect("element");
    let element_or_string = registry.create_union_type([element, TypeId::STRING]);

    assert!(registry.is_subtype_of(element, TypeId::NUMBER));
    assert!(!registry.is_subtype_of(TypeId::NUMBER, element));
    assert!(!registry.is_subtype_of(element, registry.native(NativeType::Object)));
    assert!(!registry.is_subtype_of(element, size_element));
    assert!(registry.is_subtype_of(element, element_or_string));
}

#[test]
fn named_types_delegate_to_their_target() {
    let mut registry = TypeRegistry::new();
    let (_, foo) = class(&mut registry, "Foo");
    let named = {
        let mut window = registry.open_window();
        let named = window.create_named_type(ScopeId::GLOBAL, "Foo", jst_common::SourceLocation::synthetic());
        window.bind_named_type(named, foo);
        named
    };
    assert!(registry.is_subtype_of(named, foo));
    assert!(registry.is_subtype_of(foo, named));
    assert!(!registry.is_subtype_of(named, TypeId::NUMBER));
}

#[test]
fn depth_limit_answers_true() {
    let nested = |registry: &mut TypeRegistry| {
        let a = registry.key("a");
        let b = registry.key("b");
        let inner_number = registry.create_record_type([(b, TypeId::NUMBER)]);
        let inner_string = registry.create_record_type([(b, TypeId::STRING)]);
        let outer_number = registry.create_record_type([(a, inner_number)]);
        let outer_string = registry.create_record_type([(a, inner_string)]);
        (outer_number, outer_string)
    };

    let mut registry = TypeRegistry::new();
    let (sub, sup) = nested(&mut registry);
    assert_eq!(registry.check_subtype(sub, sup), SubtypeResult::False);

    let mut limited = TypeRegistry::with_options(LatticeOptions::default().with_subtype_limits(1, 1_000));
    let (sub, sup) = nested(&mut limited);
    assert_eq!(limited.check_subtype(sub, sup), SubtypeResult::True);
    let mut checker = SubtypeChecker::new(&limited);
    assert!(checker.check_subtype(sub, sup).is_true());
}

#[test]
fn subtype_result_truthiness() {
    assert!(SubtypeResult::True.is_true());
    assert!(SubtypeResult::CycleDetected.is_true());
    assert!(SubtypeResult::DepthExceeded.is_true());
    assert!(SubtypeResult::False.is_false());
    assert_eq!(SubtypeResult::from_bool(false), SubtypeResult::False);
}
