//! Type representation for the lattice.
//!
//! Every type value lives in the registry arena and is referred to by a
//! [`TypeId`]. The payload is a closed sum type, [`TypeData`], so every lattice
//! operation is an exhaustive match over kinds rather than a virtual dispatch
//! chain.
//!
//! ## Kinds
//!
//! | Kind | Payload | Identity |
//! |------|---------|----------|
//! | Unknown, CheckedUnknown, All, None, NoObject | - | singleton |
//! | Null, Void, Boolean, Number, String, Symbol, BigInt | - | singleton |
//! | Object (incl. Array/Date/RegExp instances) | [`ObjectData`] | nominal |
//! | Function | [`FunctionData`] | nominal for constructors, structural otherwise |
//! | Record | [`ObjectData`] | structural, interned by shape |
//! | Enum / EnumElement | [`EnumData`] / [`EnumElementData`] | nominal |
//! | Template | [`TemplateData`] | nominal per declaration |
//! | Templatized | [`TemplatizedData`] | interned by (raw, arguments) |
//! | Named | [`NamedData`] | forward reference, resolved once |
//! | Union | [`UnionData`] | interned by sorted members |
//! | NoResolved | name | interned by name |

use bitflags::bitflags;
use indexmap::IndexMap;
use jst_common::{Atom, SourceLocation};
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;

// =============================================================================
// TypeId
// =============================================================================

/// Handle to a type value owned by a [`TypeRegistry`](crate::TypeRegistry).
///
/// Native singletons occupy fixed low indices so the common primitives can be
/// named without a registry in hand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const UNKNOWN: TypeId = TypeId(0);
    pub const CHECKED_UNKNOWN: TypeId = TypeId(1);
    pub const ALL: TypeId = TypeId(2);
    pub const NONE: TypeId = TypeId(3);
    pub const NO_OBJECT: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const VOID: TypeId = TypeId(6);
    pub const BOOLEAN: TypeId = TypeId(7);
    pub const NUMBER: TypeId = TypeId(8);
    pub const STRING: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    pub const BIGINT: TypeId = TypeId(11);

    /// First index handed out after the primitive singletons.
    pub const FIRST_OBJECT_NATIVE: u32 = 12;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Either flavor of the unknown type.
    #[inline]
    pub fn is_unknown_singleton(self) -> bool {
        self == Self::UNKNOWN || self == Self::CHECKED_UNKNOWN
    }

    /// One of the value primitives (boolean, number, string, symbol, bigint).
    #[inline]
    pub fn is_value_primitive(self) -> bool {
        matches!(
            self,
            Self::BOOLEAN | Self::NUMBER | Self::STRING | Self::SYMBOL | Self::BIGINT
        )
    }
}

// =============================================================================
// TypeKind - closed discriminant
// =============================================================================

/// The kind of a type value, as reported by `TypeRegistry::kind`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Unknown,
    CheckedUnknown,
    All,
    None,
    NoObject,
    Null,
    Void,
    Boolean,
    Number,
    String,
    Symbol,
    BigInt,
    Object,
    Function,
    Array,
    Date,
    RegExp,
    Enum,
    EnumElement,
    Record,
    Named,
    Templatized,
    Union,
    Template,
    NoResolved,
}

impl TypeKind {
    /// Kinds whose values live in the object sub-lattice.
    pub fn is_object_family(self) -> bool {
        matches!(
            self,
            TypeKind::NoObject
                | TypeKind::Object
                | TypeKind::Function
                | TypeKind::Array
                | TypeKind::Date
                | TypeKind::RegExp
                | TypeKind::Enum
                | TypeKind::Record
                | TypeKind::Templatized
        )
    }
}

// =============================================================================
// NativeType - bootstrap singletons
// =============================================================================

/// Every singleton created when a registry is constructed.
///
/// The discriminant order is the bootstrap order, so the primitive variants
/// line up with the `TypeId` constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum NativeType {
    Unknown,
    CheckedUnknown,
    All,
    None,
    NoObject,
    Null,
    Void,
    Boolean,
    Number,
    String,
    Symbol,
    BigInt,
    ObjectPrototype,
    ObjectConstructor,
    Object,
    FunctionPrototype,
    FunctionConstructor,
    Function,
    ArrayPrototype,
    ArrayConstructor,
    Array,
    BooleanObjectPrototype,
    BooleanObjectConstructor,
    BooleanObject,
    NumberObjectPrototype,
    NumberObjectConstructor,
    NumberObject,
    StringObjectPrototype,
    StringObjectConstructor,
    StringObject,
    SymbolObjectPrototype,
    SymbolObjectConstructor,
    SymbolObject,
    BigIntObjectPrototype,
    BigIntObjectConstructor,
    BigIntObject,
    DatePrototype,
    DateConstructor,
    Date,
    RegExpPrototype,
    RegExpConstructor,
    RegExp,
    /// `function(...*): None`, below every function type.
    LeastFunction,
    /// `function(...None): *`, above every function type.
    GreatestFunction,
    /// Template key `T` of `Array`.
    ArrayElementTemplate,
    /// `(null|undefined)`
    NullVoid,
    /// `(boolean|number|string)`
    NumberStringBoolean,
    /// Placeholder used by unresolved references with no recorded name.
    NoResolved,
}

impl NativeType {
    pub const COUNT: usize = NativeType::NoResolved as usize + 1;

    pub const ALL_NATIVES: [NativeType; NativeType::COUNT] = [
        NativeType::Unknown,
        NativeType::CheckedUnknown,
        NativeType::All,
        NativeType::None,
        NativeType::NoObject,
        NativeType::Null,
        NativeType::Void,
        NativeType::Boolean,
        NativeType::Number,
        NativeType::String,
        NativeType::Symbol,
        NativeType::BigInt,
        NativeType::ObjectPrototype,
        NativeType::ObjectConstructor,
        NativeType::Object,
        NativeType::FunctionPrototype,
        NativeType::FunctionConstructor,
        NativeType::Function,
        NativeType::ArrayPrototype,
        NativeType::ArrayConstructor,
        NativeType::Array,
        NativeType::BooleanObjectPrototype,
        NativeType::BooleanObjectConstructor,
        NativeType::BooleanObject,
        NativeType::NumberObjectPrototype,
        NativeType::NumberObjectConstructor,
        NativeType::NumberObject,
        NativeType::StringObjectPrototype,
        NativeType::StringObjectConstructor,
        NativeType::StringObject,
        NativeType::SymbolObjectPrototype,
        NativeType::SymbolObjectConstructor,
        NativeType::SymbolObject,
        NativeType::BigIntObjectPrototype,
        NativeType::BigIntObjectConstructor,
        NativeType::BigIntObject,
        NativeType::DatePrototype,
        NativeType::DateConstructor,
        NativeType::Date,
        NativeType::RegExpPrototype,
        NativeType::RegExpConstructor,
        NativeType::RegExp,
        NativeType::LeastFunction,
        NativeType::GreatestFunction,
        NativeType::ArrayElementTemplate,
        NativeType::NullVoid,
        NativeType::NumberStringBoolean,
        NativeType::NoResolved,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// Ternary logic
// =============================================================================

/// Three-valued answer used by equality testing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TernaryValue {
    True,
    False,
    Unknown,
}

impl TernaryValue {
    pub fn for_boolean(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }

    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }

    pub fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }

    pub fn xor(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (a, b) => Self::for_boolean(a != b),
        }
    }

    /// Collapse to a boolean, mapping `Unknown` to `unknown_value`.
    pub fn to_boolean(self, unknown_value: bool) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Unknown => unknown_value,
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Key of an object property: a plain name or a well-known symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PropertyKey {
    Name(Atom),
    /// Well-known symbol identity such as `Symbol.iterator`.
    Symbol(Atom),
}

impl PropertyKey {
    pub fn atom(self) -> Atom {
        match self {
            PropertyKey::Name(atom) | PropertyKey::Symbol(atom) => atom,
        }
    }
}

/// A property slot on an object-family type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub type_id: TypeId,
    /// `true` when the type was inferred rather than declared.
    pub inferred: bool,
    /// Where the property was defined, if known.
    pub source: Option<SourceLocation>,
    /// The object that owns the slot.
    pub owner: TypeId,
}

impl Property {
    #[inline]
    pub fn is_declared(&self) -> bool {
        !self.inferred
    }
}

pub type PropertyMap = IndexMap<PropertyKey, Property, FxBuildHasher>;

bitflags! {
    /// Flags describing the role of an object type.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u16 {
        /// Instance type of a constructor or interface.
        const INSTANCE = 1 << 0;
        /// The `.prototype` object of a constructor or interface.
        const PROTOTYPE = 1 << 1;
        /// Compared by shape rather than by name (records, `@record` interfaces).
        const STRUCTURAL = 1 << 2;
        /// Created during native bootstrap.
        const NATIVE = 1 << 3;
        /// Instance type of an interface.
        const INTERFACE = 1 << 4;
        /// Interned by shape; the property table is frozen.
        const INTERNED = 1 << 5;
    }
}

/// Built-in class of an object instance, used to report Array/Date/RegExp kinds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    #[default]
    Plain,
    Array,
    Date,
    RegExp,
}

/// Payload shared by every kind that owns a property table.
#[derive(Clone, Debug, Default)]
pub struct ObjectData {
    pub name: Option<Atom>,
    /// Non-owning link to the implicit prototype (`__proto__`).
    pub implicit_prototype: Option<TypeId>,
    pub properties: PropertyMap,
    pub flags: ObjectFlags,
    pub class: ObjectClass,
    /// For instance and prototype objects: the constructor that owns them.
    pub constructor: Option<TypeId>,
}

impl ObjectData {
    pub fn named(name: Option<Atom>, implicit_prototype: Option<TypeId>) -> Self {
        Self {
            name,
            implicit_prototype,
            ..Self::default()
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

/// A formal parameter of a function type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

impl Param {
    pub const fn required(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: false,
            rest: false,
        }
    }

    pub const fn optional(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: true,
            rest: false,
        }
    }

    pub const fn rest(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: false,
            rest: true,
        }
    }

    /// Optional and rest parameters can both be omitted by a caller.
    #[inline]
    pub fn is_omittable(&self) -> bool {
        self.optional || self.rest
    }
}

pub type ParamList = SmallVec<[Param; 4]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FunctionKind {
    Ordinary,
    Constructor,
    Interface,
}

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub object: ObjectData,
    pub kind: FunctionKind,
    pub params: ParamList,
    pub return_type: TypeId,
    /// Declared `this` type (`function(this:T)`); for constructors, the instance type.
    pub this_type: Option<TypeId>,
    pub template_keys: SmallVec<[TypeId; 2]>,
    /// The `.prototype` object of a constructor or interface.
    pub prototype: Option<TypeId>,
    pub instance_type: Option<TypeId>,
    /// Instance types of interfaces implemented by a constructor.
    pub implemented_interfaces: Vec<TypeId>,
    /// Instance types of interfaces extended by an interface.
    pub extended_interfaces: Vec<TypeId>,
}

impl FunctionData {
    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == FunctionKind::Interface
    }

    #[inline]
    pub fn is_ordinary(&self) -> bool {
        self.kind == FunctionKind::Ordinary
    }

    /// Number of parameters a caller must supply.
    pub fn min_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.is_omittable()).count()
    }
}

// =============================================================================
// Enums
// =============================================================================

#[derive(Clone, Debug)]
pub struct EnumData {
    pub object: ObjectData,
    /// The unique element type of this enum.
    pub element: TypeId,
}

#[derive(Clone, Debug)]
pub struct EnumElementData {
    pub name: Atom,
    pub enum_type: TypeId,
    /// The primitive or object type the elements are drawn from.
    pub primitive: TypeId,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Clone, Debug)]
pub struct TemplateData {
    pub name: Atom,
    /// Upper bound; unknown when unconstrained.
    pub bound: TypeId,
}

/// Binding of template keys to concrete types.
///
/// Keys without a value (or bound to unknown) read back as unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TemplateTypeMap {
    pub keys: SmallVec<[TypeId; 2]>,
    pub values: SmallVec<[TypeId; 2]>,
}

impl TemplateTypeMap {
    pub fn new(keys: impl IntoIterator<Item = TypeId>, values: impl IntoIterator<Item = TypeId>) -> Self {
        let keys: SmallVec<[TypeId; 2]> = keys.into_iter().collect();
        let mut values: SmallVec<[TypeId; 2]> = values.into_iter().take(keys.len()).collect();
        while values.len() < keys.len() {
            values.push(TypeId::UNKNOWN);
        }
        Self { keys, values }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn has_key(&self, key: TypeId) -> bool {
        self.keys.contains(&key)
    }

    /// The value bound to `key`, or unknown when unbound.
    pub fn resolved(&self, key: TypeId) -> TypeId {
        self.keys
            .iter()
            .position(|&k| k == key)
            .and_then(|idx| self.values.get(idx).copied())
            .unwrap_or(TypeId::UNKNOWN)
    }

    /// The value bound to `key` if the map mentions it at all.
    pub fn get(&self, key: TypeId) -> Option<TypeId> {
        self.keys
            .iter()
            .position(|&k| k == key)
            .and_then(|idx| self.values.get(idx).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, TypeId)> + '_ {
        self.keys.iter().copied().zip(self.values.iter().copied())
    }
}

#[derive(Clone, Debug)]
pub struct TemplatizedData {
    pub raw: TypeId,
    pub map: TemplateTypeMap,
}

// =============================================================================
// Named types
// =============================================================================

/// Identifier of a declaration scope. The global scope always exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// Resolution state of a [`NamedData`]. Both resolved states are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NamedState {
    Unresolved,
    Resolved(TypeId),
    /// Resolution failed; the id is the placeholder carrying the name.
    Failed(TypeId),
}

impl NamedState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, NamedState::Unresolved)
    }
}

#[derive(Clone, Debug)]
pub struct NamedData {
    pub scope: ScopeId,
    pub name: Atom,
    pub location: SourceLocation,
    pub state: NamedState,
}

// =============================================================================
// Unions
// =============================================================================

/// A flattened, deduplicated set of at least two members, sorted by id.
#[derive(Clone, Debug)]
pub struct UnionData {
    pub members: Arc<[TypeId]>,
}

// =============================================================================
// TypeData
// =============================================================================

#[derive(Clone, Debug)]
pub enum TypeData {
    Unknown,
    CheckedUnknown,
    All,
    None,
    NoObject,
    Null,
    Void,
    Boolean,
    Number,
    String,
    Symbol,
    BigInt,
    Object(ObjectData),
    Function(Box<FunctionData>),
    Record(ObjectData),
    Enum(EnumData),
    EnumElement(EnumElementData),
    Template(TemplateData),
    Templatized(TemplatizedData),
    Named(NamedData),
    Union(UnionData),
    NoResolved(Atom),
}

impl TypeData {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeData::Unknown => TypeKind::Unknown,
            TypeData::CheckedUnknown => TypeKind::CheckedUnknown,
            TypeData::All => TypeKind::All,
            TypeData::None => TypeKind::None,
            TypeData::NoObject => TypeKind::NoObject,
            TypeData::Null => TypeKind::Null,
            TypeData::Void => TypeKind::Void,
            TypeData::Boolean => TypeKind::Boolean,
            TypeData::Number => TypeKind::Number,
            TypeData::String => TypeKind::String,
            TypeData::Symbol => TypeKind::Symbol,
            TypeData::BigInt => TypeKind::BigInt,
            TypeData::Object(obj) => match obj.class {
                ObjectClass::Plain => TypeKind::Object,
                ObjectClass::Array => TypeKind::Array,
                ObjectClass::Date => TypeKind::Date,
                ObjectClass::RegExp => TypeKind::RegExp,
            },
            TypeData::Function(_) => TypeKind::Function,
            TypeData::Record(_) => TypeKind::Record,
            TypeData::Enum(_) => TypeKind::Enum,
            TypeData::EnumElement(_) => TypeKind::EnumElement,
            TypeData::Template(_) => TypeKind::Template,
            TypeData::Templatized(_) => TypeKind::Templatized,
            TypeData::Named(_) => TypeKind::Named,
            TypeData::Union(_) => TypeKind::Union,
            TypeData::NoResolved(_) => TypeKind::NoResolved,
        }
    }

    /// The property table, for kinds that own one.
    pub fn object_data(&self) -> Option<&ObjectData> {
        match self {
            TypeData::Object(obj) | TypeData::Record(obj) => Some(obj),
            TypeData::Function(func) => Some(&func.object),
            TypeData::Enum(data) => Some(&data.object),
            _ => None,
        }
    }

    pub fn object_data_mut(&mut self) -> Option<&mut ObjectData> {
        match self {
            TypeData::Object(obj) | TypeData::Record(obj) => Some(obj),
            TypeData::Function(func) => Some(&mut func.object),
            TypeData::Enum(data) => Some(&mut data.object),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionData> {
        match self {
            TypeData::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn union_members(&self) -> Option<&Arc<[TypeId]>> {
        match self {
            TypeData::Union(union) => Some(&union.members),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
