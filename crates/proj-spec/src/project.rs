//! Project specifications.

use std::any::Any;
use std::path::Path;

use crate::configuration::{Configuration, ProjectConfiguration};
use crate::error::Result;
use crate::specification::{Specification, SpecificationBase, SpecificationParams};

pub const APPLICATION: &str = "application";
pub const LIBRARY: &str = "library";
pub const MODULE: &str = "module";
pub const THEME_LIBRARY: &str = "theme-library";

/// Project types known to the built-in registry.
pub const PROJECT_TYPES: [&str; 4] = [APPLICATION, LIBRARY, MODULE, THEME_LIBRARY];

/// A ready project specification.
#[derive(Debug)]
pub struct ProjectSpecification {
    base: SpecificationBase<ProjectConfiguration>,
}

impl ProjectSpecification {
    pub async fn init(params: SpecificationParams) -> Result<Self> {
        let base = SpecificationBase::init_with(params, ProjectConfiguration::new).await?;
        Ok(Self { base })
    }

    /// Absolute resource exclude patterns, in declaration order.
    pub fn resource_excludes(&self) -> &[String] {
        self.base.config().resource_excludes()
    }

    pub fn resource_prefix(&self) -> Result<String> {
        self.base.config().resource_prefix()
    }
}

impl Specification for ProjectSpecification {
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
        self.base.config()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
