//! Backend selection and the constructor registry.
//!
//! Object storage is pluggable: a node's Object alternative is a boxed
//! [`NodeObject`], and which implementation stands behind it is decided at
//! runtime from a *request string*. The request carries a schema name, the
//! key into a process-wide registry of constructors:
//!
//! - an empty request selects the built-in in-memory backend;
//! - `"mapper:EAST/config.xml"` selects the backend registered as `mapper`;
//! - `"config.xml"` selects the backend registered as `xml` (the
//!   extension-like suffix);
//! - `"mem"` selects the backend registered as `mem` (the whole string).
//!
//! `http`/`https` requests are explicitly not handled here; fetching remote
//! documents belongs to an external collaborator. Any other unknown schema
//! fails with [`BackendError::BackendNotFound`].
//!
//! The registry is the sole plugin boundary: adapters for file formats or
//! experiment databases call [`register`] at startup and are from then on
//! constructible by request string, without this crate knowing about them.
//!
//! ```
//! use hdata::backend::{self, InMemoryObject};
//!
//! backend::register("demo", || Box::new(InMemoryObject::new()));
//! let obj = backend::create("demo:whatever").unwrap();
//! assert!(obj.is_empty());
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use tracing::debug;

use crate::Result;
use crate::node::NodeObject;

pub mod errors;
pub mod in_memory;

pub use errors::BackendError;
pub use in_memory::InMemoryObject;

/// A registered backend constructor.
pub type Creator = Box<dyn Fn() -> Box<dyn NodeObject> + Send + Sync>;

/// Registry mapping schema names to backend constructors.
///
/// One process-wide instance lives behind [`registry`]; its lifecycle is
/// process start to process end. Registration is runtime-dynamic so that
/// backends outside this crate can plug in.
#[derive(Default)]
pub struct Registry {
    creators: Mutex<HashMap<String, Creator>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `creator` under `schema`. Returns false when the schema
    /// was already taken; the existing registration wins.
    pub fn register(&self, schema: impl Into<String>, creator: Creator) -> bool {
        let schema = schema.into();
        let mut creators = self.creators.lock().expect("registry poisoned");
        if creators.contains_key(&schema) {
            return false;
        }
        debug!(schema, "backend registered");
        creators.insert(schema, creator);
        true
    }

    /// Returns true if a constructor is registered under `schema`.
    pub fn contains(&self, schema: &str) -> bool {
        self.creators
            .lock()
            .expect("registry poisoned")
            .contains_key(schema)
    }

    /// Constructs the backend registered under `schema`.
    pub fn construct(&self, schema: &str) -> Result<Box<dyn NodeObject>> {
        let creators = self.creators.lock().expect("registry poisoned");
        match creators.get(schema) {
            Some(creator) => {
                debug!(schema, "loading backend");
                Ok(creator())
            }
            None => Err(BackendError::BackendNotFound {
                schema: schema.to_string(),
            }
            .into()),
        }
    }
}

/// The process-wide backend registry.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

/// Registers `creator` under `schema` in the process-wide registry.
pub fn register<F>(schema: impl Into<String>, creator: F) -> bool
where
    F: Fn() -> Box<dyn NodeObject> + Send + Sync + 'static,
{
    registry().register(schema, Box::new(creator))
}

/// The backend used when no schema is requested.
pub fn default_backend() -> Box<dyn NodeObject> {
    Box::new(InMemoryObject::new())
}

/// Extracts the schema name from a request string.
///
/// The schema is the substring before the first `:` when one is present,
/// otherwise the extension-like suffix after the last `.`, otherwise the
/// whole string. An empty request has no schema.
pub fn extract_schema(request: &str) -> Option<&str> {
    if request.is_empty() {
        return None;
    }
    if let Some(pos) = request.find(':') {
        return Some(&request[..pos]);
    }
    if let Some(pos) = request.rfind('.') {
        return Some(&request[pos + 1..]);
    }
    Some(request)
}

/// Constructs a backend for `request` per the schema-extraction rule.
///
/// An empty request yields the default in-memory backend. The caller is
/// responsible for binding the returned backend to its owning node.
pub fn create(request: &str) -> Result<Box<dyn NodeObject>> {
    let Some(schema) = extract_schema(request) else {
        return Ok(default_backend());
    };
    if schema == "http" || schema == "https" {
        return Err(BackendError::UnsupportedScheme {
            scheme: schema.to_string(),
        }
        .into());
    }
    registry().construct(schema)
}
