//! Read-only views over raw configuration records.
//!
//! A raw record is free-form structured data with a small required core:
//!
//! ```yaml
//! specVersion: "3.0"
//! kind: project
//! type: library
//! metadata:
//!   name: my.lib
//! builder:
//!   resources:
//!     excludes:
//!       - "test/**"
//! ```
//!
//! The record is owned by its view and never mutated after construction.
//! Derived state computed during [`Configuration::init`] lives beside it.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pattern::expand_excludes;
use crate::version::SpecVersion;

/// Look up a dotted path (`"builder.resources.excludes"`) in a record.
pub fn field<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(object, |current, key| current.as_object()?.get(key))
}

fn required_str<'a>(object: &'a Value, path: &str) -> Result<&'a str> {
    field(object, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::malformed(path))
}

/// Accessor contract shared by every configuration flavour.
///
/// Implementors only provide [`object`](Configuration::object); the identity
/// accessors read from it. Override [`init`](Configuration::init) to compute
/// derived state asynchronously. `init` is called exactly once, by the owning
/// specification, before anyone else sees the configuration.
#[async_trait]
pub trait Configuration: Send + Sync + std::fmt::Debug {
    /// The wrapped raw record. Callers must treat it as read-only.
    fn object(&self) -> &Value;

    /// `metadata.name`, unmodified.
    fn name(&self) -> Result<&str> {
        required_str(self.object(), "metadata.name")
    }

    /// `kind`, unmodified.
    fn kind(&self) -> Result<&str> {
        required_str(self.object(), "kind")
    }

    /// `type`, if the kind has one.
    fn spec_type(&self) -> Option<&str> {
        self.object().get("type").and_then(Value::as_str)
    }

    /// `specVersion`, if declared.
    fn spec_version(&self) -> Result<Option<SpecVersion>> {
        match self.object().get("specVersion") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => SpecVersion::parse(raw).map(Some),
            // Unquoted YAML versions arrive as floats (`2.10` reads as `2.1`).
            Some(_) => Err(Error::malformed("specVersion")),
        }
    }

    async fn init(&mut self) -> Result<()> {
        tokio::task::yield_now().await;
        Ok(())
    }
}

/// Plain view over a raw record.
#[derive(Debug, Clone)]
pub struct ConfigurationView {
    object: Value,
    specification_id: String,
}

impl ConfigurationView {
    /// Wrap `object` on behalf of the specification with id `specification_id`.
    pub fn new(object: Value, specification_id: impl Into<String>) -> Self {
        Self {
            object,
            specification_id: specification_id.into(),
        }
    }

    /// Id of the specification that owns this view.
    pub fn specification_id(&self) -> &str {
        &self.specification_id
    }
}

impl Configuration for ConfigurationView {
    fn object(&self) -> &Value {
        &self.object
    }
}

/// Configuration of a `project` record.
///
/// Adds the resource exclude list, resolved to absolute patterns under the
/// project's resource prefix during `init`.
#[derive(Debug, Clone)]
pub struct ProjectConfiguration {
    view: ConfigurationView,
    resource_excludes: Vec<String>,
}

impl ProjectConfiguration {
    pub const EXCLUDES_FIELD: &'static str = "builder.resources.excludes";

    pub fn new(view: ConfigurationView) -> Self {
        Self {
            view,
            resource_excludes: Vec::new(),
        }
    }

    pub fn specification_id(&self) -> &str {
        self.view.specification_id()
    }

    /// Absolute path prefix under which this project's resources are served.
    ///
    /// Libraries live below `/resources/<namespace>/`; everything else at `/`.
    pub fn resource_prefix(&self) -> Result<String> {
        match self.spec_type() {
            Some("library") | Some("theme-library") => {
                let namespace = match field(self.object(), "metadata.namespace") {
                    None | Some(Value::Null) => self.name()?.replace('.', "/"),
                    Some(Value::String(ns)) => ns.trim_matches('/').to_string(),
                    Some(_) => return Err(Error::malformed("metadata.namespace")),
                };
                Ok(format!("/resources/{namespace}/"))
            }
            _ => Ok("/".to_string()),
        }
    }

    /// Declared excludes as written, relative to the resource prefix.
    pub fn declared_excludes(&self) -> Result<Vec<&str>> {
        let value = match field(self.object(), Self::EXCLUDES_FIELD) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(value) => value,
        };
        let Some(entries) = value.as_array() else {
            return Err(Error::malformed(Self::EXCLUDES_FIELD));
        };
        entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .ok_or_else(|| Error::malformed(Self::EXCLUDES_FIELD))
            })
            .collect()
    }

    /// Absolute exclude patterns. Empty until `init` has run.
    pub fn resource_excludes(&self) -> &[String] {
        &self.resource_excludes
    }
}

#[async_trait]
impl Configuration for ProjectConfiguration {
    fn object(&self) -> &Value {
        self.view.object()
    }

    async fn init(&mut self) -> Result<()> {
        self.view.init().await?;
        let prefix = self.resource_prefix()?;
        let excludes = self.declared_excludes()?;
        let mut patterns = Vec::with_capacity(excludes.len());
        expand_excludes(&mut patterns, &excludes, &prefix);
        debug!(
            specification = self.view.specification_id(),
            prefix = %prefix,
            count = patterns.len(),
            "resolved resource excludes"
        );
        self.resource_excludes = patterns;
        Ok(())
    }
}
