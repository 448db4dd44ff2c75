//! Specification identity and base initialization.
//!
//! Every declared project or extension becomes one specification. Callers
//! never hold a half-built one: [`SpecificationParams`] carries the raw
//! inputs, and [`SpecificationBase::init`] consumes them and only returns
//! once the configuration is checked and initialized.

use std::any::Any;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::configuration::{Configuration, ConfigurationView};
use crate::error::{Error, Result};
use crate::version::SpecVersion;

/// Raw construction parameters for a specification.
#[derive(Debug, Clone)]
pub struct SpecificationParams {
    id: String,
    version: String,
    module_path: PathBuf,
    configuration: Value,
}

impl SpecificationParams {
    /// Check the construction-time requirements and bundle the inputs.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSpecification`] when `id` is empty, when
    /// `configuration` is not an object, or when it has no string `kind`.
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        module_path: impl Into<PathBuf>,
        configuration: Value,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid("specification id is required"));
        }
        if !configuration.is_object() {
            return Err(Error::invalid(format!(
                "configuration of '{id}' must be an object"
            )));
        }
        match configuration.get("kind") {
            Some(Value::String(kind)) if !kind.is_empty() => {}
            _ => {
                return Err(Error::invalid(format!(
                    "configuration of '{id}' has no valid kind"
                )));
            }
        }
        Ok(Self {
            id,
            version: version.into(),
            module_path: module_path.into(),
            configuration,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn configuration(&self) -> &Value {
        &self.configuration
    }

    /// `configuration.kind`, checked non-empty by [`new`](Self::new).
    pub fn kind(&self) -> &str {
        self.configuration
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn spec_type(&self) -> Option<&str> {
        self.configuration.get("type").and_then(Value::as_str)
    }
}

/// Accessor contract every specification variant honors.
///
/// Identity accessors delegate to the owned configuration. Values handed
/// out are read-only and stable for the lifetime of the specification.
pub trait Specification: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;

    fn version(&self) -> &str;

    /// Root directory used to resolve relative resources.
    fn module_path(&self) -> &Path;

    fn configuration(&self) -> &dyn Configuration;

    /// Downcasting hook for callers that need a concrete variant.
    fn as_any(&self) -> &dyn Any;

    fn name(&self) -> Result<&str> {
        self.configuration().name()
    }

    fn kind(&self) -> Result<&str> {
        self.configuration().kind()
    }

    fn spec_type(&self) -> Option<&str> {
        self.configuration().spec_type()
    }

    fn object(&self) -> &Value {
        self.configuration().object()
    }

    fn spec_version(&self) -> Result<Option<SpecVersion>> {
        self.configuration().spec_version()
    }
}

/// Shared state of every specification: identity plus its configuration.
#[derive(Debug)]
pub struct SpecificationBase<C = ConfigurationView> {
    id: String,
    version: String,
    module_path: PathBuf,
    configuration: C,
}

impl SpecificationBase<ConfigurationView> {
    /// Initialize with a plain [`ConfigurationView`].
    pub async fn init(params: SpecificationParams) -> Result<Self> {
        Self::init_with(params, |view| view).await
    }
}

impl<C: Configuration> SpecificationBase<C> {
    /// Initialize with a configuration built from the plain view by `wrap`.
    ///
    /// Identity fields and `specVersion` are checked before the
    /// configuration's own `init` runs, so nothing downstream ever starts on
    /// a record without a name or kind.
    #[instrument(skip_all, fields(id = %params.id))]
    pub async fn init_with<F>(params: SpecificationParams, wrap: F) -> Result<Self>
    where
        F: FnOnce(ConfigurationView) -> C,
    {
        let SpecificationParams {
            id,
            version,
            module_path,
            configuration,
        } = params;

        let mut configuration = wrap(ConfigurationView::new(configuration, id.clone()));
        configuration.name()?;
        configuration.kind()?;
        if let Some(spec_version) = configuration.spec_version()? {
            spec_version.ensure_supported()?;
        }
        configuration.init().await?;

        debug!(
            kind = configuration.kind().unwrap_or_default(),
            spec_type = configuration.spec_type().unwrap_or_default(),
            module_path = %module_path.display(),
            "base initialization complete"
        );
        Ok(Self {
            id,
            version,
            module_path,
            configuration,
        })
    }

    /// The concrete configuration.
    pub fn config(&self) -> &C {
        &self.configuration
    }
}

impl<C: Configuration + 'static> Specification for SpecificationBase<C> {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn module_path(&self) -> &Path {
        &self.module_path
    }

    fn configuration(&self) -> &dyn Configuration {
        &self.configuration
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(configuration: Value) -> SpecificationParams {
        SpecificationParams::new("id-1", "1.0.0", "/work/module", configuration).unwrap()
    }

    #[test]
    fn test_params_require_id() {
        let err = SpecificationParams::new("", "1.0.0", "/m", json!({ "kind": "project" }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
    }

    #[test]
    fn test_params_require_kind() {
        let err = SpecificationParams::new("id", "1.0.0", "/m", json!({ "metadata": {} }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));

        let err = SpecificationParams::new("id", "1.0.0", "/m", json!({ "kind": 5 })).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
    }

    #[test]
    fn test_params_require_object() {
        let err = SpecificationParams::new("id", "1.0.0", "/m", json!(["kind"])).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
    }

    #[test]
    fn test_params_accessors() {
        let p = params(json!({ "kind": "extension", "type": "task" }));
        assert_eq!(p.id(), "id-1");
        assert_eq!(p.version(), "1.0.0");
        assert_eq!(p.module_path(), Path::new("/work/module"));
        assert_eq!(p.kind(), "extension");
        assert_eq!(p.spec_type(), Some("task"));
    }

    #[tokio::test]
    async fn test_init_delegates_accessors() {
        let spec = SpecificationBase::init(params(json!({
            "kind": "project",
            "type": "module",
            "metadata": { "name": "shared" }
        })))
        .await
        .unwrap();

        assert_eq!(spec.id(), "id-1");
        assert_eq!(spec.version(), "1.0.0");
        assert_eq!(spec.module_path(), Path::new("/work/module"));
        assert_eq!(spec.name().unwrap(), "shared");
        assert_eq!(spec.kind().unwrap(), "project");
        assert_eq!(spec.spec_type(), Some("module"));
        assert_eq!(spec.object()["metadata"]["name"], "shared");
        assert_eq!(spec.config().specification_id(), "id-1");
    }

    #[tokio::test]
    async fn test_init_rejects_missing_name() {
        let err = SpecificationBase::init(params(json!({ "kind": "project" })))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedConfiguration { .. }));
    }

    #[tokio::test]
    async fn test_init_rejects_old_spec_version() {
        let err = SpecificationBase::init(params(json!({
            "specVersion": "1.0",
            "kind": "project",
            "metadata": { "name": "legacy" }
        })))
        .await
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedSpecVersion { .. }));
    }

    #[tokio::test]
    async fn test_downcast_through_trait_object() {
        let spec: Box<dyn Specification> = Box::new(
            SpecificationBase::init(params(json!({
                "kind": "project",
                "metadata": { "name": "p" }
            })))
            .await
            .unwrap(),
        );
        assert!(spec.as_any().downcast_ref::<SpecificationBase>().is_some());
    }
}
