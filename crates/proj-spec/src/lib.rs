//! Specification and configuration resolution for project builds.
//!
//! This crate turns raw, declarative project descriptions into validated
//! specifications that the rest of the build pipeline queries uniformly,
//! whatever their kind or type.

pub mod configuration;
pub mod error;
pub mod extension;
pub mod loader;
pub mod pattern;
pub mod project;
pub mod registry;
pub mod specification;
pub mod version;

pub use configuration::{Configuration, ConfigurationView, ProjectConfiguration};
pub use error::{Error, Result, ValidationError};
pub use extension::{
    ExtensionSpecification, LifecycleState, MiddlewareValidator, ProjectShimValidator,
    TaskValidator, ValidateConfig,
};
pub use loader::{CONFIG_FILENAME, SpecificationLoader};
pub use pattern::expand_excludes;
pub use project::ProjectSpecification;
pub use registry::{SpecificationFactory, SpecificationKey, SpecificationRegistry};
pub use specification::{Specification, SpecificationBase, SpecificationParams};
pub use version::SpecVersion;
