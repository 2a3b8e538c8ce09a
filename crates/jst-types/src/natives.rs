//! Native bootstrap.
//!
//! Creates every [`NativeType`] singleton in discriminant order, wires the
//! built-in classes together (constructor, `.prototype`, instance) and seeds
//! the property tables of the built-in prototypes from a static externs table.

use crate::registry::{FunctionKey, TypeRegistry};
use crate::types::*;
use smallvec::smallvec;
use std::sync::Arc;
use tracing::debug;

use ExternParam::{Optional, Required, Rest};
use NativeType as N;

impl NativeType {
    /// The fixed id of this native in every registry.
    #[inline]
    pub const fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }
}

// =============================================================================
// Externs seed table
// =============================================================================

/// Shape of a seeded property.
enum Shape {
    Value(NativeType),
    /// A method: parameters, then the return type.
    Method(&'static [ExternParam], NativeType),
}

#[derive(Copy, Clone)]
enum ExternParam {
    Required(NativeType),
    Optional(NativeType),
    Rest(NativeType),
}

/// Ambient declarations for the built-in prototypes.
const EXTERNS: &[(NativeType, &str, Shape)] = &[
    (N::ObjectPrototype, "toString", Shape::Method(&[], N::String)),
    (N::ObjectPrototype, "valueOf", Shape::Method(&[], N::All)),
    (N::ObjectPrototype, "hasOwnProperty", Shape::Method(&[Required(N::All)], N::Boolean)),
    (N::FunctionPrototype, "length", Shape::Value(N::Number)),
    (N::FunctionPrototype, "call", Shape::Method(&[Rest(N::All)], N::All)),
    (N::FunctionPrototype, "apply", Shape::Method(&[Optional(N::All), Optional(N::All)], N::All)),
    (N::FunctionPrototype, "bind", Shape::Method(&[Required(N::All), Rest(N::All)], N::Function)),
    (N::ArrayPrototype, "length", Shape::Value(N::Number)),
    (N::ArrayPrototype, "pop", Shape::Method(&[], N::ArrayElementTemplate)),
    (N::ArrayPrototype, "push", Shape::Method(&[Rest(N::ArrayElementTemplate)], N::Number)),
    (N::ArrayPrototype, "indexOf", Shape::Method(&[Required(N::ArrayElementTemplate)], N::Number)),
    (N::ArrayPrototype, "join", Shape::Method(&[Optional(N::String)], N::String)),
    (N::BooleanObjectPrototype, "valueOf", Shape::Method(&[], N::Boolean)),
    (N::NumberObjectPrototype, "toFixed", Shape::Method(&[Optional(N::Number)], N::String)),
    (N::NumberObjectPrototype, "valueOf", Shape::Method(&[], N::Number)),
    (N::StringObjectPrototype, "length", Shape::Value(N::Number)),
    (N::StringObjectPrototype, "charAt", Shape::Method(&[Required(N::Number)], N::String)),
    (
        N::StringObjectPrototype,
        "indexOf",
        Shape::Method(&[Required(N::String), Optional(N::Number)], N::Number),
    ),
    (N::StringObjectPrototype, "toUpperCase", Shape::Method(&[], N::String)),
    (N::SymbolObjectPrototype, "description", Shape::Value(N::String)),
    (N::BigIntObjectPrototype, "toString", Shape::Method(&[Optional(N::Number)], N::String)),
    (N::DatePrototype, "getTime", Shape::Method(&[], N::Number)),
    (N::RegExpPrototype, "source", Shape::Value(N::String)),
    (N::RegExpPrototype, "test", Shape::Method(&[Required(N::String)], N::Boolean)),
];

// =============================================================================
// Bootstrap
// =============================================================================

pub(crate) fn bootstrap(registry: &mut TypeRegistry) {
    push(registry, N::Unknown, TypeData::Unknown);
    push(registry, N::CheckedUnknown, TypeData::CheckedUnknown);
    push(registry, N::All, TypeData::All);
    push(registry, N::None, TypeData::None);
    push(registry, N::NoObject, TypeData::NoObject);
    push(registry, N::Null, TypeData::Null);
    push(registry, N::Void, TypeData::Void);
    push(registry, N::Boolean, TypeData::Boolean);
    push(registry, N::Number, TypeData::Number);
    push(registry, N::String, TypeData::String);
    push(registry, N::Symbol, TypeData::Symbol);
    push(registry, N::BigInt, TypeData::BigInt);

    // Object.prototype is the root of every prototype chain.
    native_class(registry, "Object", N::ObjectPrototype, None);
    push_instance(registry, "Object", N::Object, N::ObjectPrototype, N::ObjectConstructor, ObjectClass::Plain);

    native_class(registry, "Function", N::FunctionPrototype, Some(N::Object));
    let function_name = registry.intern("Function");
    let mut function_object = ObjectData::named(Some(function_name), Some(N::FunctionPrototype.type_id()));
    function_object.flags = ObjectFlags::INSTANCE | ObjectFlags::NATIVE;
    function_object.constructor = Some(N::FunctionConstructor.type_id());
    push(
        registry,
        N::Function,
        TypeData::Function(Box::new(FunctionData {
            object: function_object,
            kind: FunctionKind::Ordinary,
            params: smallvec![Param::rest(TypeId::UNKNOWN)],
            return_type: TypeId::UNKNOWN,
            this_type: None,
            template_keys: smallvec![],
            prototype: None,
            instance_type: None,
            implemented_interfaces: Vec::new(),
            extended_interfaces: Vec::new(),
        })),
    );

    let classes = [
        ("Array", N::ArrayPrototype, N::Array, ObjectClass::Array),
        ("Boolean", N::BooleanObjectPrototype, N::BooleanObject, ObjectClass::Plain),
        ("Number", N::NumberObjectPrototype, N::NumberObject, ObjectClass::Plain),
        ("String", N::StringObjectPrototype, N::StringObject, ObjectClass::Plain),
        ("Symbol", N::SymbolObjectPrototype, N::SymbolObject, ObjectClass::Plain),
        ("BigInt", N::BigIntObjectPrototype, N::BigIntObject, ObjectClass::Plain),
        ("Date", N::DatePrototype, N::Date, ObjectClass::Date),
        ("RegExp", N::RegExpPrototype, N::RegExp, ObjectClass::RegExp),
    ];
    for (name, proto, instance, class) in classes {
        native_class(registry, name, proto, Some(N::Object));
        let ctor = NativeType::ALL_NATIVES[proto.index() + 1];
        push_instance(registry, name, instance, proto, ctor, class);
    }

    let least = native_function(Param::rest(TypeId::ALL), TypeId::NONE);
    push(registry, N::LeastFunction, least);
    let greatest = native_function(Param::rest(TypeId::NONE), TypeId::ALL);
    push(registry, N::GreatestFunction, greatest);
    for native in [N::LeastFunction, N::GreatestFunction] {
        let key = registry.function_key(native.type_id());
        registry.functions.insert(key, native.type_id());
    }

    let element_name = registry.intern("T");
    push(
        registry,
        N::ArrayElementTemplate,
        TypeData::Template(TemplateData {
            name: element_name,
            bound: TypeId::UNKNOWN,
        }),
    );
    if let TypeData::Function(array_ctor) = registry.data_mut(N::ArrayConstructor.type_id()) {
        array_ctor.template_keys.push(N::ArrayElementTemplate.type_id());
    }

    native_union(registry, N::NullVoid, &[TypeId::NULL, TypeId::VOID]);
    native_union(
        registry,
        N::NumberStringBoolean,
        &[TypeId::BOOLEAN, TypeId::NUMBER, TypeId::STRING],
    );

    push(registry, N::NoResolved, TypeData::NoResolved(jst_common::Atom::NONE));
    registry.no_resolved.insert(jst_common::Atom::NONE, N::NoResolved.type_id());

    seed_externs(registry);

    debug!(
        natives = NativeType::COUNT,
        types = registry.type_count(),
        "native bootstrap complete"
    );
}

fn push(registry: &mut TypeRegistry, native: NativeType, data: TypeData) {
    let id = registry.alloc(data);
    debug_assert_eq!(id, native.type_id(), "native {native:?} bootstrapped out of order");
}

/// Push a native prototype followed by its constructor. The constructor's
/// instance is expected at the slot right after it.
fn native_class(registry: &mut TypeRegistry, name: &str, proto: NativeType, proto_parent: Option<NativeType>) {
    let ctor = NativeType::ALL_NATIVES[proto.index() + 1];
    let instance = NativeType::ALL_NATIVES[proto.index() + 2];

    let proto_name = registry.intern(&format!("{name}.prototype"));
    let mut proto_object = ObjectData::named(Some(proto_name), proto_parent.map(NativeType::type_id));
    proto_object.flags = ObjectFlags::PROTOTYPE | ObjectFlags::NATIVE;
    proto_object.constructor = Some(ctor.type_id());
    push(registry, proto, TypeData::Object(proto_object));

    let ctor_name = registry.intern(name);
    let prototype_key = registry.key("prototype");
    let mut ctor_object = ObjectData::named(Some(ctor_name), Some(N::FunctionPrototype.type_id()));
    ctor_object.flags = ObjectFlags::NATIVE;
    ctor_object.properties.insert(
        prototype_key,
        Property {
            type_id: proto.type_id(),
            inferred: false,
            source: None,
            owner: ctor.type_id(),
        },
    );
    push(
        registry,
        ctor,
        TypeData::Function(Box::new(FunctionData {
            object: ctor_object,
            kind: FunctionKind::Constructor,
            params: smallvec![Param::optional(TypeId::ALL)],
            return_type: TypeId::UNKNOWN,
            this_type: Some(instance.type_id()),
            template_keys: smallvec![],
            prototype: Some(proto.type_id()),
            instance_type: Some(instance.type_id()),
            implemented_interfaces: Vec::new(),
            extended_interfaces: Vec::new(),
        })),
    );
}

fn push_instance(
    registry: &mut TypeRegistry,
    name: &str,
    instance: NativeType,
    proto: NativeType,
    ctor: NativeType,
    class: ObjectClass,
) {
    let atom = registry.intern(name);
    let mut object = ObjectData::named(Some(atom), Some(proto.type_id()));
    object.flags = ObjectFlags::INSTANCE | ObjectFlags::NATIVE;
    object.class = class;
    object.constructor = Some(ctor.type_id());
    push(registry, instance, TypeData::Object(object));
}

fn native_function(param: Param, return_type: TypeId) -> TypeData {
    let mut object = ObjectData::named(None, Some(N::FunctionPrototype.type_id()));
    object.flags = ObjectFlags::NATIVE | ObjectFlags::INTERNED;
    TypeData::Function(Box::new(FunctionData {
        object,
        kind: FunctionKind::Ordinary,
        params: smallvec![param],
        return_type,
        this_type: None,
        template_keys: smallvec![],
        prototype: None,
        instance_type: None,
        implemented_interfaces: Vec::new(),
        extended_interfaces: Vec::new(),
    }))
}

fn native_union(registry: &mut TypeRegistry, native: NativeType, members: &[TypeId]) {
    let members: Arc<[TypeId]> = Arc::from(members);
    push(
        registry,
        native,
        TypeData::Union(UnionData {
            members: members.clone(),
        }),
    );
    registry.unions.insert(members, native.type_id());
}

fn seed_externs(registry: &mut TypeRegistry) {
    for (owner, name, shape) in EXTERNS {
        let type_id = match shape {
            Shape::Value(native) => native.type_id(),
            Shape::Method(params, returns) => {
                let params: ParamList = params
                    .iter()
                    .map(|param| match *param {
                        Required(native) => Param::required(native.type_id()),
                        Optional(native) => Param::optional(native.type_id()),
                        Rest(native) => Param::rest(native.type_id()),
                    })
                    .collect();
                registry.intern_function(FunctionKey {
                    kind: FunctionKind::Ordinary,
                    params,
                    return_type: returns.type_id(),
                    this_type: None,
                    template_keys: smallvec![],
                })
            }
        };
        let key = registry.key(name);
        registry.define_declared_property(owner.type_id(), key, type_id, None);
    }
}
