use crate::types::*;

#[test]
fn native_ids_follow_discriminant_order() {
    for (index, native) in NativeType::ALL_NATIVES.iter().enumerate() {
        assert_eq!(native.index(), index);
        assert_eq!(native.type_id(), TypeId(index as u32));
    }
    assert_eq!(NativeType::Number.type_id(), TypeId::NUMBER);
    assert_eq!(NativeType::BigInt.type_id(), TypeId::BIGINT);
    assert_eq!(NativeType::ObjectPrototype.type_id().0, TypeId::FIRST_OBJECT_NATIVE);
}

#[test]
fn unknown_singletons() {
    assert!(TypeId::UNKNOWN.is_unknown_singleton());
    assert!(TypeId::CHECKED_UNKNOWN.is_unknown_singleton());
    assert!(!TypeId::ALL.is_unknown_singleton());
    assert!(!TypeId::NONE.is_unknown_singleton());
}

#[test]
fn ternary_logic() {
    use TernaryValue::*;
    assert_eq!(True.and(Unknown), Unknown);
    assert_eq!(False.and(Unknown), False);
    assert_eq!(True.or(Unknown), True);
    assert_eq!(False.or(Unknown), Unknown);
    assert_eq!(Unknown.not(), Unknown);
    assert_eq!(True.not(), False);
    assert_eq!(True.xor(True), False);
    assert_eq!(True.xor(Unknown), Unknown);
    assert!(Unknown.to_boolean(true));
    assert!(!Unknown.to_boolean(false));
    assert_eq!(TernaryValue::for_boolean(false), False);
}

#[test]
fn param_omittable() {
    assert!(!Param::required(TypeId::NUMBER).is_omittable());
    assert!(Param::optional(TypeId::NUMBER).is_omittable());
    assert!(Param::rest(TypeId::NUMBER).is_omittable());
}

#[test]
fn template_type_map_pads_missing_values() {
    let t = TypeId(100);
    let u = TypeId(101);
    let map = TemplateTypeMap::new([t, u], [TypeId::STRING]);
    assert_eq!(map.values.len(), 2);
    assert_eq!(map.resolved(t), TypeId::STRING);
    assert_eq!(map.resolved(u), TypeId::UNKNOWN);
    assert_eq!(map.get(u), Some(TypeId::UNKNOWN));
    assert_eq!(map.get(TypeId(102)), None);
    assert_eq!(map.resolved(TypeId(102)), TypeId::UNKNOWN);
    assert!(map.has_key(t));
    assert!(!map.is_empty());
}

#[test]
fn template_type_map_drops_extra_values() {
    let t = TypeId(100);
    let map = TemplateTypeMap::new([t], [TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![(t, TypeId::STRING)]);
}

#[test]
fn named_state_terminality() {
    assert!(!NamedState::Unresolved.is_terminal());
    assert!(NamedState::Resolved(TypeId::NUMBER).is_terminal());
    assert!(NamedState::Failed(TypeId::UNKNOWN).is_terminal());
}
