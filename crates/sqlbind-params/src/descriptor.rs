//! Parameter metadata supplied by the method registration step

use serde::{Deserialize, Serialize};

/// Parameter classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// A bindable argument
    #[default]
    Ordinary,

    /// Pagination window (offset/limit), consumed by the execution layer
    RowBounds,

    /// Result callback, consumed by the execution layer
    ResultHandler,
}

impl ParamKind {
    /// Special parameters never receive a name or a positional slot
    pub fn is_special(&self) -> bool {
        matches!(self, Self::RowBounds | Self::ResultHandler)
    }
}

/// Metadata for one method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Declared type, informational
    pub type_name: String,

    #[serde(default)]
    pub kind: ParamKind,

    /// Explicit name given by the method author
    #[serde(default)]
    pub name_hint: Option<String>,

    /// Name of the parameter in the method's declaration, when known
    #[serde(default)]
    pub declared_name: Option<String>,
}

impl ParamDescriptor {
    /// An ordinary parameter with no naming information
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: ParamKind::Ordinary,
            name_hint: None,
            declared_name: None,
        }
    }

    pub fn row_bounds() -> Self {
        Self {
            kind: ParamKind::RowBounds,
            ..Self::new("RowBounds")
        }
    }

    pub fn result_handler() -> Self {
        Self {
            kind: ParamKind::ResultHandler,
            ..Self::new("ResultHandler")
        }
    }

    /// Attach an explicit name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name_hint = Some(name.into());
        self
    }

    /// Attach the declared name
    pub fn declared(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }
}

/// Registration record for one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMetadata {
    /// Unique method id, e.g. `UserMapper.findById`
    pub id: String,

    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

impl MethodMetadata {
    pub fn new(id: impl Into<String>, params: Vec<ParamDescriptor>) -> Self {
        Self {
            id: id.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_kinds() {
        assert!(!ParamKind::Ordinary.is_special());
        assert!(ParamDescriptor::row_bounds().kind.is_special());
        assert!(ParamDescriptor::result_handler().kind.is_special());
    }

    #[test]
    fn deserialize_metadata() {
        let metadata: MethodMetadata = serde_json::from_str(
            r#"{
                "id": "UserMapper.find",
                "params": [
                    {"type_name": "i64", "name_hint": "id"},
                    {"type_name": "RowBounds", "kind": "row_bounds"},
                    {"type_name": "String", "declared_name": "name"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(metadata.params.len(), 3);
        assert_eq!(metadata.params[0], ParamDescriptor::new("i64").named("id"));
        assert_eq!(metadata.params[1].kind, ParamKind::RowBounds);
        assert_eq!(metadata.params[2].declared_name.as_deref(), Some("name"));
    }
}
