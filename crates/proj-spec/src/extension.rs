//! Build-time extension specifications.
//!
//! An extension (a custom task, a server middleware, a project shim) is a
//! specification whose configuration must pass a type-specific validation
//! step before anyone can use it. Initialization walks a fixed lifecycle:
//!
//! ```text
//! Uninitialized -> BaseInitialized -> Validated -> Ready
//!        \______________\_______________\__________-> Failed
//! ```
//!
//! Domain failures from a validator ([`Error::Validation`]) are re-raised as
//! [`Error::ExtensionValidation`], naming the extension's type and name.
//! Any other error passes through unchanged.

use std::any::Any;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::configuration::{Configuration, field};
use crate::error::{Error, Result, ValidationError};
use crate::specification::{Specification, SpecificationBase, SpecificationParams};

/// Extension type for custom build tasks.
pub const TASK: &str = "task";
/// Extension type for development server middleware.
pub const SERVER_MIDDLEWARE: &str = "server-middleware";
/// Extension type for configuration shims applied to other projects.
pub const PROJECT_SHIM: &str = "project-shim";

/// Capability of checking an extension configuration.
#[async_trait]
pub trait ValidateConfig: Send + Sync + fmt::Debug {
    /// Return [`Error::Validation`] for configuration problems.
    async fn validate_config(&self, configuration: &dyn Configuration) -> Result<()>;
}

/// Where an extension is in its initialization.
///
/// Only [`Ready`](Self::Ready) is ever observed on a constructed
/// [`ExtensionSpecification`]; a failed initialization returns `Err` instead of
/// a value. The other variants name the steps reported in `tracing` events
/// while `init` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    BaseInitialized,
    Validated,
    Ready,
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::BaseInitialized => "base-initialized",
            Self::Validated => "validated",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

struct Lifecycle<'a> {
    id: &'a str,
    state: LifecycleState,
}

impl<'a> Lifecycle<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            id,
            state: LifecycleState::Uninitialized,
        }
    }

    fn advance(&mut self, next: LifecycleState) {
        debug!(id = self.id, from = %self.state, to = %next, "extension lifecycle");
        self.state = next;
    }

    fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!(id = self.id, at = %self.state, error = %e, "extension initialization failed");
            self.state = LifecycleState::Failed;
        }
        result
    }
}

/// A ready extension specification.
///
/// Values exist only after every lifecycle step succeeded.
#[derive(Debug)]
pub struct ExtensionSpecification<V> {
    base: SpecificationBase,
    validator: V,
}

impl<V: ValidateConfig> ExtensionSpecification<V> {
    /// Run base initialization, then `validator`.
    ///
    /// # Errors
    ///
    /// Base initialization errors are returned before the validator runs.
    /// An extension without a `type` fails with
    /// [`Error::InvalidSpecification`]. Validator failures are returned as
    /// described in the module docs.
    #[instrument(skip_all, fields(id = %params.id()))]
    pub async fn init(params: SpecificationParams, validator: V) -> Result<Self> {
        let id = params.id().to_string();
        let mut lifecycle = Lifecycle::new(&id);

        let base = lifecycle.check(SpecificationBase::init(params).await)?;
        let identity = base
            .spec_type()
            .ok_or_else(|| Error::invalid(format!("extension '{id}' declares no type")))
            .and_then(|ty| Ok((ty.to_string(), base.name()?.to_string())));
        let (extension_type, name) = lifecycle.check(identity)?;
        lifecycle.advance(LifecycleState::BaseInitialized);

        let validated = match validator.validate_config(base.configuration()).await {
            Err(Error::Validation(source)) => Err(Error::ExtensionValidation {
                extension_type,
                name,
                source,
            }),
            other => other,
        };
        lifecycle.check(validated)?;
        lifecycle.advance(LifecycleState::Validated);
        lifecycle.advance(LifecycleState::Ready);

        Ok(Self { base, validator })
    }

    /// Always [`LifecycleState::Ready`].
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Ready
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }
}

impl<V: ValidateConfig + 'static> Specification for ExtensionSpecification<V> {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn version(&self) -> &str {
        self.base.version()
    }

    fn module_path(&self) -> &Path {
        self.base.module_path()
    }

    fn configuration(&self) -> &dyn Configuration {
        self.base.configuration()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn require_string(configuration: &dyn Configuration, path: &str) -> Result<()> {
    match field(configuration.object(), path) {
        None | Some(Value::Null) => Err(ValidationError::missing_field(path).into()),
        Some(Value::String(s)) if !s.is_empty() => Ok(()),
        Some(_) => Err(ValidationError::invalid_field(path, "a non-empty string").into()),
    }
}

/// `task` extensions name the module implementing the task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskValidator;

#[async_trait]
impl ValidateConfig for TaskValidator {
    async fn validate_config(&self, configuration: &dyn Configuration) -> Result<()> {
        require_string(configuration, "task.path")
    }
}

/// `server-middleware` extensions name the module implementing the middleware.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiddlewareValidator;

#[async_trait]
impl ValidateConfig for MiddlewareValidator {
    async fn validate_config(&self, configuration: &dyn Configuration) -> Result<()> {
        require_string(configuration, "middleware.path")
    }
}

/// `project-shim` extensions carry a `shims` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectShimValidator;

#[async_trait]
impl ValidateConfig for ProjectShimValidator {
    async fn validate_config(&self, configuration: &dyn Configuration) -> Result<()> {
        match field(configuration.object(), "shims") {
            None => Err(ValidationError::missing_field("shims").into()),
            Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(ValidationError::invalid_field("shims", "an object").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug)]
    struct FailingValidator(&'static str);

    #[async_trait]
    impl ValidateConfig for FailingValidator {
        async fn validate_config(&self, _configuration: &dyn Configuration) -> Result<()> {
            Err(ValidationError::new(self.0).into())
        }
    }

    #[derive(Debug)]
    struct ForeignValidator;

    #[async_trait]
    impl ValidateConfig for ForeignValidator {
        async fn validate_config(&self, _configuration: &dyn Configuration) -> Result<()> {
            Err(Error::foreign(std::io::Error::other("socket closed")))
        }
    }

    #[derive(Debug, Default)]
    struct RecordingValidator {
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ValidateConfig for RecordingValidator {
        async fn validate_config(&self, _configuration: &dyn Configuration) -> Result<()> {
            self.called.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn params(configuration: Value) -> SpecificationParams {
        SpecificationParams::new("ext-1", "0.1.0", "/ext", configuration).unwrap()
    }

    fn task(name: &str) -> Value {
        json!({
            "kind": "extension",
            "type": "task",
            "metadata": { "name": name },
            "task": { "path": "lib/task.js" }
        })
    }

    #[tokio::test]
    async fn test_domain_failure_is_wrapped() {
        let validator = FailingValidator("missing field X");
        let err = ExtensionSpecification::init(params(task("myExt")), validator)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to validate configuration of task extension myExt: missing field X"
        );
        match err {
            Error::ExtensionValidation { source, .. } => {
                assert_eq!(source, ValidationError::new("missing field X"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_foreign_failure_passes_through() {
        let err = ExtensionSpecification::init(params(task("myExt")), ForeignValidator)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Foreign(_)));
        assert_eq!(err.to_string(), "socket closed");
    }

    #[tokio::test]
    async fn test_success_ends_ready_with_stable_accessors() {
        let spec = ExtensionSpecification::init(params(task("myExt")), TaskValidator)
            .await
            .unwrap();
        assert_eq!(spec.state(), LifecycleState::Ready);
        for _ in 0..3 {
            assert_eq!(spec.id(), "ext-1");
            assert_eq!(spec.name().unwrap(), "myExt");
            assert_eq!(spec.kind().unwrap(), "extension");
            assert_eq!(spec.spec_type(), Some("task"));
        }
    }

    #[test]
    fn test_lifecycle_records_failure_step() {
        let mut lifecycle = Lifecycle::new("ext-1");
        lifecycle.advance(LifecycleState::BaseInitialized);
        assert!(lifecycle.check(Ok(())).is_ok());
        assert_eq!(lifecycle.state, LifecycleState::BaseInitialized);

        let failed: Result<()> = Err(ValidationError::new("bad").into());
        assert!(lifecycle.check(failed).is_err());
        assert_eq!(lifecycle.state, LifecycleState::Failed);
        assert_eq!(lifecycle.state.to_string(), "failed");
    }

    #[tokio::test]
    async fn test_base_failure_precedes_validation() {
        let validator = RecordingValidator::default();
        let called = validator.called.clone();
        let err = ExtensionSpecification::init(
            params(json!({ "kind": "extension", "type": "task" })),
            validator,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::MalformedConfiguration { .. }));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_missing_type_fails_before_validation() {
        let validator = RecordingValidator::default();
        let called = validator.called.clone();
        let err = ExtensionSpecification::init(
            params(json!({ "kind": "extension", "metadata": { "name": "x" } })),
            validator,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_task_validator_requires_path() {
        let err = ExtensionSpecification::init(
            params(json!({ "kind": "extension", "type": "task", "metadata": { "name": "t" } })),
            TaskValidator,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to validate configuration of task extension t: missing field task.path"
        );
    }

    #[tokio::test]
    async fn test_middleware_validator_rejects_non_string() {
        let err = ExtensionSpecification::init(
            params(json!({
                "kind": "extension",
                "type": "server-middleware",
                "metadata": { "name": "cors" },
                "middleware": { "path": 12 }
            })),
            MiddlewareValidator,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to validate configuration of server-middleware extension cors: \
             field middleware.path must be a non-empty string"
        );
    }

    #[tokio::test]
    async fn test_project_shim_validator() {
        let ok = ExtensionSpecification::init(
            params(json!({
                "kind": "extension",
                "type": "project-shim",
                "metadata": { "name": "shim" },
                "shims": { "configurations": {} }
            })),
            ProjectShimValidator,
        )
        .await;
        assert!(ok.is_ok());

        let err = ExtensionSpecification::init(
            params(json!({
                "kind": "extension",
                "type": "project-shim",
                "metadata": { "name": "shim" },
                "shims": ["nope"]
            })),
            ProjectShimValidator,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().ends_with("field shims must be an object"));
    }
}
