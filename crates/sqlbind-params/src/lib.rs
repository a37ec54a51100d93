//! Parameter naming and binding
//!
//! This crate handles:
//! - Describing method parameters (explicit names, declared names, special kinds)
//! - Resolving a stable name for every bindable parameter, once per method
//! - Binding call arguments into a named parameter context
//! - Caching name assignments per method for concurrent reuse
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sqlbind_params::{MethodRegistry, MethodMetadata, ParamDescriptor};
//!
//! let registry = MethodRegistry::default();
//! registry.register(&MethodMetadata::new("UserMapper.find", vec![
//!     ParamDescriptor::new("i64").named("id"),
//!     ParamDescriptor::row_bounds(),
//! ]));
//! let params = registry.bind("UserMapper.find", Some(&args))?;
//! ```

pub mod descriptor;
pub mod assignment;
pub mod registry;

pub use descriptor::{MethodMetadata, ParamDescriptor, ParamKind};
pub use assignment::{NameAssignment, GENERIC_NAME_PREFIX};
pub use registry::{MethodRegistry, RegistryError};
