//! Type formatter - render a `TypeId` in annotation syntax.
//!
//! | Type | Rendering |
//! |------|-----------|
//! | Unknown / CheckedUnknown / All | `?` / `??` / `*` |
//! | Void | `undefined` |
//! | union | `(number|string)`, members sorted by rendering |
//! | record | `{a: number, b: string}`, keys sorted |
//! | function | `function(this:T, number, string=, ...number): R` |
//! | constructor | `function(new:Foo, number)` |
//! | templatized | `Array<string>` |
//! | enum / element | `enum{Color}` / `Color<number>` |
//!
//! Self-referential structure is cut off with `...` past a fixed depth.

use crate::registry::TypeRegistry;
use crate::types::*;

const MAX_FORMAT_DEPTH: u32 = 16;

/// Renders types of one registry.
///
/// ```ignore
/// let formatter = TypeFormatter::new(&registry);
/// assert_eq!(formatter.format_type(TypeId::VOID), "undefined");
/// ```
pub struct TypeFormatter<'a> {
    registry: &'a TypeRegistry,
    max_depth: u32,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            max_depth: MAX_FORMAT_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn format_type(&self, type_id: TypeId) -> String {
        self.format_at(type_id, 0)
    }

    fn format_at(&self, type_id: TypeId, depth: u32) -> String {
        if depth > self.max_depth {
            return "...".to_string();
        }
        let reg = self.registry;
        match reg.data(type_id) {
            TypeData::Unknown => "?".to_string(),
            TypeData::CheckedUnknown => "??".to_string(),
            TypeData::All => "*".to_string(),
            TypeData::None => "None".to_string(),
            TypeData::NoObject => "NoObject".to_string(),
            TypeData::Null => "null".to_string(),
            TypeData::Void => "undefined".to_string(),
            TypeData::Boolean => "boolean".to_string(),
            TypeData::Number => "number".to_string(),
            TypeData::String => "string".to_string(),
            TypeData::Symbol => "symbol".to_string(),
            TypeData::BigInt => "bigint".to_string(),
            TypeData::Object(object) => match object.name {
                Some(name) => reg.names().resolve(name).to_string(),
                None => self.format_properties(object, depth),
            },
            TypeData::Record(object) => self.format_properties(object, depth),
            TypeData::Function(func) => self.format_function(func, depth),
            TypeData::Enum(data) => {
                let name = data.object.name.map_or("", |name| reg.names().resolve(name));
                format!("enum{{{name}}}")
            }
            TypeData::EnumElement(element) => format!(
                "{}<{}>",
                reg.names().resolve(element.name),
                self.format_at(element.primitive, depth + 1)
            ),
            TypeData::Template(template) => reg.names().resolve(template.name).to_string(),
            TypeData::Templatized(templatized) => {
                let args: Vec<String> = templatized
                    .map
                    .values
                    .iter()
                    .map(|&arg| self.format_at(arg, depth + 1))
                    .collect();
                format!("{}<{}>", self.format_at(templatized.raw, depth + 1), args.join(","))
            }
            TypeData::Named(named) => match named.state {
                NamedState::Resolved(target) => self.format_at(target, depth + 1),
                NamedState::Unresolved | NamedState::Failed(_) => reg.names().resolve(named.name).to_string(),
            },
            TypeData::Union(union) => {
                let mut members: Vec<String> = union
                    .members
                    .iter()
                    .map(|&member| self.format_at(member, depth + 1))
                    .collect();
                members.sort();
                format!("({})", members.join("|"))
            }
            TypeData::NoResolved(name) if name.is_none() => "NoResolvedType".to_string(),
            TypeData::NoResolved(name) => reg.names().resolve(*name).to_string(),
        }
    }

    fn format_properties(&self, object: &ObjectData, depth: u32) -> String {
        if object.properties.is_empty() {
            return "{}".to_string();
        }
        let names = self.registry.names();
        let mut entries: Vec<(&str, TypeId)> = object
            .properties
            .iter()
            .map(|(key, prop)| (names.resolve(key.atom()), prop.type_id))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let fields: Vec<String> = entries
            .into_iter()
            .map(|(name, type_id)| format!("{name}: {}", self.format_at(type_id, depth + 1)))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }

    fn format_function(&self, func: &FunctionData, depth: u32) -> String {
        let names = self.registry.names();
        if func.object.flags.contains(ObjectFlags::INSTANCE) {
            if let Some(name) = func.object.name {
                return names.resolve(name).to_string();
            }
        }

        let mut parts: Vec<String> = Vec::with_capacity(func.params.len() + 1);
        match (func.kind, func.this_type) {
            (FunctionKind::Constructor, Some(instance)) => {
                parts.push(format!("new:{}", self.format_at(instance, depth + 1)));
            }
            (FunctionKind::Ordinary, Some(this)) => {
                parts.push(format!("this:{}", self.format_at(this, depth + 1)));
            }
            _ => {}
        }
        for param in &func.params {
            let rendered = self.format_at(param.type_id, depth + 1);
            parts.push(if param.rest {
                format!("...{rendered}")
            } else if param.optional {
                format!("{rendered}=")
            } else {
                rendered
            });
        }

        let signature = format!("function({})", parts.join(", "));
        if !func.is_ordinary() && func.return_type.is_unknown_singleton() {
            signature
        } else {
            format!("{signature}: {}", self.format_at(func.return_type, depth + 1))
        }
    }
}

impl TypeRegistry {
    /// Render `type_id` in annotation syntax.
    pub fn display(&self, type_id: TypeId) -> String {
        TypeFormatter::new(self).format_type(type_id)
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
