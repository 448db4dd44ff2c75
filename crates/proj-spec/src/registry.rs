//! Registry mapping `(kind, type)` to specification factories.
//!
//! # Example
//!
//! ```
//! use proj_spec::{Specification, SpecificationParams, SpecificationRegistry};
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let registry = SpecificationRegistry::with_builtins();
//! let params = SpecificationParams::new(
//!     "my-task",
//!     "1.0.0",
//!     "/work/my-task",
//!     json!({
//!         "kind": "extension",
//!         "type": "task",
//!         "metadata": { "name": "my-task" },
//!         "task": { "path": "lib/task.js" }
//!     }),
//! )
//! .unwrap();
//! let spec = registry.create(params).await.unwrap();
//! assert_eq!(spec.name().unwrap(), "my-task");
//! # });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extension::{
    self, ExtensionSpecification, MiddlewareValidator, ProjectShimValidator, TaskValidator,
    ValidateConfig,
};
use crate::project::{PROJECT_TYPES, ProjectSpecification};
use crate::specification::{Specification, SpecificationParams};

pub const PROJECT_KIND: &str = "project";
pub const EXTENSION_KIND: &str = "extension";

/// Builds a ready specification of one concrete variant.
#[async_trait]
pub trait SpecificationFactory: Send + Sync + fmt::Debug {
    async fn create(&self, params: SpecificationParams) -> Result<Box<dyn Specification>>;
}

/// Factory for [`ProjectSpecification`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectFactory;

#[async_trait]
impl SpecificationFactory for ProjectFactory {
    async fn create(&self, params: SpecificationParams) -> Result<Box<dyn Specification>> {
        Ok(Box::new(ProjectSpecification::init(params).await?))
    }
}

/// Factory for [`ExtensionSpecification`] with a fixed validator.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFactory<V> {
    validator: V,
}

impl<V> ExtensionFactory<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl<V> SpecificationFactory for ExtensionFactory<V>
where
    V: ValidateConfig + Clone + 'static,
{
    async fn create(&self, params: SpecificationParams) -> Result<Box<dyn Specification>> {
        let spec = ExtensionSpecification::init(params, self.validator.clone()).await?;
        Ok(Box::new(spec))
    }
}

/// Registry key. `spec_type` is `None` for kinds without a type dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecificationKey {
    pub kind: String,
    pub spec_type: Option<String>,
}

impl SpecificationKey {
    pub fn new(kind: impl Into<String>, spec_type: Option<&str>) -> Self {
        Self {
            kind: kind.into(),
            spec_type: spec_type.map(String::from),
        }
    }
}

impl fmt::Display for SpecificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.spec_type {
            Some(ty) => write!(f, "{}/{}", self.kind, ty),
            None => f.write_str(&self.kind),
        }
    }
}

/// Open registry of specification variants.
#[derive(Debug, Clone, Default)]
pub struct SpecificationRegistry {
    factories: HashMap<SpecificationKey, Arc<dyn SpecificationFactory>>,
}

impl SpecificationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the built-in project and extension variants.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for project_type in PROJECT_TYPES {
            registry.insert(
                SpecificationKey::new(PROJECT_KIND, Some(project_type)),
                Arc::new(ProjectFactory),
            );
        }
        registry.insert(
            SpecificationKey::new(EXTENSION_KIND, Some(extension::TASK)),
            Arc::new(ExtensionFactory::new(TaskValidator)),
        );
        registry.insert(
            SpecificationKey::new(EXTENSION_KIND, Some(extension::SERVER_MIDDLEWARE)),
            Arc::new(ExtensionFactory::new(MiddlewareValidator)),
        );
        registry.insert(
            SpecificationKey::new(EXTENSION_KIND, Some(extension::PROJECT_SHIM)),
            Arc::new(ExtensionFactory::new(ProjectShimValidator)),
        );
        registry
    }

    /// Register a factory for `(kind, spec_type)`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSpecification`] when `kind` or a given `spec_type` is empty.
    pub fn register(
        &mut self,
        kind: &str,
        spec_type: Option<&str>,
        factory: impl SpecificationFactory + 'static,
    ) -> Result<()> {
        if kind.trim().is_empty() {
            return Err(Error::invalid("cannot register a specification without a kind"));
        }
        if spec_type.is_some_and(|ty| ty.trim().is_empty()) {
            return Err(Error::invalid(format!(
                "cannot register kind '{kind}' with an empty type"
            )));
        }
        self.insert(SpecificationKey::new(kind, spec_type), Arc::new(factory));
        Ok(())
    }

    fn insert(&mut self, key: SpecificationKey, factory: Arc<dyn SpecificationFactory>) {
        if self.factories.insert(key.clone(), factory).is_some() {
            debug!(key = %key, "replaced specification factory");
        }
    }

    pub fn contains(&self, kind: &str, spec_type: Option<&str>) -> bool {
        self.factories
            .contains_key(&SpecificationKey::new(kind, spec_type))
    }

    /// All registered keys, sorted.
    pub fn registered(&self) -> Vec<SpecificationKey> {
        let mut keys: Vec<SpecificationKey> = self.factories.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build and initialize the variant registered for the params' kind and type.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSpecificationKind`] when nothing is registered for the
    /// pair; otherwise whatever the variant's initialization returns.
    pub async fn create(&self, params: SpecificationParams) -> Result<Box<dyn Specification>> {
        let key = SpecificationKey::new(params.kind(), params.spec_type());
        let Some(factory) = self.factories.get(&key) else {
            return Err(Error::UnknownSpecificationKind {
                kind: key.kind,
                spec_type: key.spec_type,
            });
        };
        debug!(key = %key, id = params.id(), "creating specification");
        factory.create(params).await
    }
}
