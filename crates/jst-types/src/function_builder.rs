//! Builder for function types.
//!
//! ```ignore
//! let f = registry.create_function_type(
//!     FunctionBuilder::new()
//!         .param(TypeId::NUMBER)
//!         .optional_param(TypeId::STRING)
//!         .returns(TypeId::BOOLEAN),
//! );
//! assert_eq!(registry.display(f), "function(number, string=): boolean");
//! ```
//!
//! Anonymous functions are interned by signature. A named function gets a
//! fresh id so it can carry its own properties.

use crate::registry::{FunctionKey, TypeRegistry};
use crate::types::*;
use smallvec::SmallVec;
use tracing::trace;

#[derive(Clone, Debug)]
pub struct FunctionBuilder {
    name: Option<String>,
    kind: FunctionKind,
    params: ParamList,
    return_type: TypeId,
    this_type: Option<TypeId>,
    template_keys: SmallVec<[TypeId; 2]>,
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionBuilder {
    /// An ordinary function with no parameters returning unknown.
    pub fn new() -> Self {
        Self {
            name: None,
            kind: FunctionKind::Ordinary,
            params: ParamList::new(),
            return_type: TypeId::UNKNOWN,
            this_type: None,
            template_keys: SmallVec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn param(mut self, type_id: TypeId) -> Self {
        self.params.push(Param::required(type_id));
        self
    }

    pub fn optional_param(mut self, type_id: TypeId) -> Self {
        self.params.push(Param::optional(type_id));
        self
    }

    /// Add a rest parameter. Parameters added after it are dropped.
    pub fn rest_param(mut self, type_id: TypeId) -> Self {
        self.params.push(Param::rest(type_id));
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn returns(mut self, type_id: TypeId) -> Self {
        self.return_type = type_id;
        self
    }

    /// `function(this:T)`
    pub fn this_type(mut self, type_id: TypeId) -> Self {
        self.this_type = Some(type_id);
        self
    }

    /// `function(new:T)`: a constructor type producing `instance`.
    pub fn constructs(mut self, instance: TypeId) -> Self {
        self.kind = FunctionKind::Constructor;
        self.this_type = Some(instance);
        self
    }

    pub fn template_keys(mut self, keys: impl IntoIterator<Item = TypeId>) -> Self {
        self.template_keys.extend(keys);
        self
    }

    fn into_key(mut self) -> (Option<String>, FunctionKey) {
        if let Some(rest) = self.params.iter().position(|p| p.rest) {
            self.params.truncate(rest + 1);
        }
        (
            self.name,
            FunctionKey {
                kind: self.kind,
                params: self.params,
                return_type: self.return_type,
                this_type: self.this_type,
                template_keys: self.template_keys,
            },
        )
    }
}

impl TypeRegistry {
    pub fn create_function_type(&mut self, builder: FunctionBuilder) -> TypeId {
        let (name, key) = builder.into_key();
        match name {
            None => self.intern_function(key),
            Some(name) => {
                let atom = self.names.intern(&name);
                let object = ObjectData::named(Some(atom), Some(self.native(NativeType::FunctionPrototype)));
                self.alloc(function_data(object, key))
            }
        }
    }

    /// Look up or create the anonymous function with this signature.
    pub(crate) fn intern_function(&mut self, key: FunctionKey) -> TypeId {
        if let Some(&existing) = self.functions.get(&key) {
            return existing;
        }
        let mut object = ObjectData::named(None, Some(self.native(NativeType::FunctionPrototype)));
        object.flags = ObjectFlags::INTERNED;
        let id = self.alloc(function_data(object, key.clone()));
        trace!(function = id.0, params = key.params.len(), "interned function type");
        self.functions.insert(key, id);
        id
    }

    /// The signature of a function type, as used for interning.
    pub(crate) fn function_key(&self, id: TypeId) -> FunctionKey {
        match self.data(id) {
            TypeData::Function(func) => FunctionKey {
                kind: func.kind,
                params: func.params.clone(),
                return_type: func.return_type,
                this_type: func.this_type,
                template_keys: func.template_keys.clone(),
            },
            other => panic!("function_key called on {:?}", other.kind()),
        }
    }
}

fn function_data(object: ObjectData, key: FunctionKey) -> TypeData {
    let instance_type = match key.kind {
        FunctionKind::Constructor => key.this_type,
        _ => None,
    };
    TypeData::Function(Box::new(FunctionData {
        object,
        kind: key.kind,
        params: key.params,
        return_type: key.return_type,
        this_type: key.this_type,
        template_keys: key.template_keys,
        prototype: None,
        instance_type,
        implemented_interfaces: Vec::new(),
        extended_interfaces: Vec::new(),
    }))
}
