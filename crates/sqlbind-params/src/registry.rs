//! Per-method name assignment registry
//!
//! Name resolution is paid once per method. Assignments are stored behind
//! an `Arc` and shared read-only by every subsequent call.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = MethodRegistry::new(BindingConfig::default());
//! registry.register(&metadata);
//!
//! // Every call reuses the frozen assignment
//! let params = registry.bind("UserMapper.find", Some(&args))?;
//! ```

use crate::assignment::NameAssignment;
use crate::descriptor::MethodMetadata;
use sqlbind_core::{BindingConfig, ErrorCode, NamedParams, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of resolved name assignments keyed by method id
pub struct MethodRegistry {
    config: BindingConfig,

    /// Method id -> frozen assignment
    methods: RwLock<HashMap<String, Arc<NameAssignment>>>,
}

impl MethodRegistry {
    pub fn new(config: BindingConfig) -> Self {
        Self {
            config,
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Resolve and store a method's name assignment
    ///
    /// Registering an id twice keeps the first assignment.
    pub fn register(&self, metadata: &MethodMetadata) -> Arc<NameAssignment> {
        if let Some(existing) = self.get(&metadata.id) {
            return existing;
        }

        let assignment = Arc::new(NameAssignment::resolve(
            &metadata.params,
            self.config.use_actual_param_name,
        ));

        let mut methods = self.methods.write().unwrap_or_else(PoisonError::into_inner);
        let stored = methods
            .entry(metadata.id.clone())
            .or_insert_with(|| Arc::clone(&assignment));

        tracing::debug!(method = %metadata.id, names = ?stored.names(), "registered method");
        Arc::clone(stored)
    }

    /// Register every method described by a JSON array of metadata records
    pub fn register_json(&self, json: &str) -> Result<usize, RegistryError> {
        let records: Vec<MethodMetadata> = serde_json::from_str(json)
            .map_err(|e| RegistryError::InvalidMetadata(e.to_string()))?;

        for record in &records {
            self.register(record);
        }

        Ok(records.len())
    }

    /// Look up a method's assignment
    pub fn get(&self, method_id: &str) -> Option<Arc<NameAssignment>> {
        let methods = self.methods.read().unwrap_or_else(PoisonError::into_inner);
        methods.get(method_id).map(Arc::clone)
    }

    /// Bind call arguments for a registered method
    pub fn bind(
        &self,
        method_id: &str,
        args: Option<&[Value]>,
    ) -> Result<NamedParams, RegistryError> {
        let assignment = self
            .get(method_id)
            .ok_or_else(|| RegistryError::UnknownMethod(method_id.to_string()))?;

        Ok(assignment.bind(args))
    }

    pub fn contains(&self, method_id: &str) -> bool {
        let methods = self.methods.read().unwrap_or_else(PoisonError::into_inner);
        methods.contains_key(method_id)
    }

    pub fn len(&self) -> usize {
        self.methods.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new(BindingConfig::default())
    }
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Method '{0}' is not registered")]
    UnknownMethod(String),

    #[error("Invalid method metadata: {0}")]
    InvalidMetadata(String),
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownMethod(_) => ErrorCode::ParamUnknownMethod,
            Self::InvalidMetadata(_) => ErrorCode::ConfigInvalid,
        }
    }
}
