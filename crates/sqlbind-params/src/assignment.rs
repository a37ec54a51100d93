//! Parameter name assignment
//!
//! Names are resolved once per method from its parameter metadata and then
//! reused, read-only, for every call.
//!
//! - `find(@named("M") a, @named("N") b)` -> `{0: "M", 1: "N"}`
//! - `find(a, b)` -> `{0: "0", 1: "1"}`
//! - `find(a, RowBounds, b)` -> `{0: "0", 2: "1"}`

use crate::descriptor::ParamDescriptor;
use sqlbind_core::{NamedParams, ParamMap, Shape, Value};
use std::collections::BTreeMap;

/// Prefix of the generic aliases (`param1`, `param2`, ...)
pub const GENERIC_NAME_PREFIX: &str = "param";

const COLLECTION_KEY: &str = "collection";
const LIST_KEY: &str = "list";
const ARRAY_KEY: &str = "array";

/// Frozen mapping from original argument position to logical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAssignment {
    /// Original positional index -> resolved name, ascending by index
    names: BTreeMap<usize, String>,

    /// Any parameter of the method carries an explicit name
    has_explicit_names: bool,

    use_actual_names: bool,
}

impl NameAssignment {
    /// Resolve names for a method's parameters
    ///
    /// Special parameters are skipped. Explicit names win; otherwise the
    /// declared name is used when `use_actual_names` is set and the metadata
    /// has one; otherwise the name is the count of names assigned so far.
    pub fn resolve(params: &[ParamDescriptor], use_actual_names: bool) -> Self {
        let mut names = BTreeMap::new();
        let mut has_explicit_names = false;

        for (index, param) in params.iter().enumerate() {
            if param.kind.is_special() {
                continue;
            }

            let name = match &param.name_hint {
                Some(hint) => {
                    has_explicit_names = true;
                    hint.clone()
                }
                None => use_actual_names
                    .then(|| param.declared_name.clone())
                    .flatten()
                    .unwrap_or_else(|| names.len().to_string()),
            };

            names.insert(index, name);
        }

        tracing::debug!(
            names = ?names,
            has_explicit_names,
            "resolved parameter names"
        );

        Self {
            names,
            has_explicit_names,
            use_actual_names,
        }
    }

    /// Resolved names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.names.values().map(String::as_str).collect()
    }

    /// `(original index, name)` pairs in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(|(index, name)| (*index, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn has_explicit_names(&self) -> bool {
        self.has_explicit_names
    }

    /// Bind call arguments into a named parameter context
    ///
    /// A lone unnamed argument is passed through (collections and arrays are
    /// wrapped under canonical keys). Otherwise every argument is stored under
    /// its resolved name and under `paramN`, unless `paramN` is itself one of
    /// the resolved names. Duplicate resolved names overwrite silently.
    pub fn bind(&self, args: Option<&[Value]>) -> NamedParams {
        let args = match args {
            Some(args) if !self.names.is_empty() => args,
            _ => return NamedParams::Absent,
        };

        if !self.has_explicit_names && self.names.len() == 1 {
            if let Some((&index, _)) = self.names.iter().next() {
                let actual_name = if self.use_actual_names {
                    self.names.get(&0).map(String::as_str)
                } else {
                    None
                };
                return Self::wrap_to_map_if_collection(arg_at(args, index), actual_name);
            }
        }

        let mut params = ParamMap::new();
        for (position, (&index, name)) in self.names.iter().enumerate() {
            let value = arg_at(args, index);

            let generic_name = format!("{}{}", GENERIC_NAME_PREFIX, position + 1);
            if !self.names.values().any(|existing| *existing == generic_name) {
                params.insert(generic_name, value.clone());
            }

            if params.insert(name.clone(), value).is_some() {
                tracing::trace!(name = %name, "parameter name bound more than once");
            }
        }

        tracing::trace!(names = ?params.names(), "bound named parameters");
        NamedParams::Map(params)
    }

    /// Wrap a lone collection or array under its canonical keys
    ///
    /// Collections land under `collection` (and `list` when list-shaped),
    /// arrays under `array`; `actual_name`, when given, is added as an alias.
    /// Any other value passes through unchanged.
    pub fn wrap_to_map_if_collection(value: Value, actual_name: Option<&str>) -> NamedParams {
        let mut params = ParamMap::new();

        match value.shape() {
            Shape::Sequence { list_shaped } => {
                params.insert(COLLECTION_KEY, value.clone());
                if list_shaped {
                    params.insert(LIST_KEY, value.clone());
                }
            }
            Shape::FixedArray => {
                params.insert(ARRAY_KEY, value.clone());
            }
            Shape::Null | Shape::Scalar | Shape::Mapping => return NamedParams::Single(value),
        }

        if let Some(name) = actual_name {
            params.insert(name, value);
        }
        NamedParams::Map(params)
    }
}

fn arg_at(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}
