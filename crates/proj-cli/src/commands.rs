//! Command implementations

use std::path::Path;

use colored::Colorize;
use proj_spec::{ProjectSpecification, Specification, SpecificationLoader};

use crate::error::{CliError, Result};

/// Module id derived from the canonical directory name.
fn module_id(path: &Path) -> Result<String> {
    let root = SpecificationLoader::resolve_module_path(path)?;
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CliError::user(format!(
                "cannot derive a module id from {}",
                root.display()
            ))
        })
}

async fn load(path: &Path, version: &str) -> Result<Vec<Box<dyn Specification>>> {
    let id = module_id(path)?;
    tracing::debug!(id = %id, path = %path.display(), "loading module");
    let loader = SpecificationLoader::default();
    Ok(loader.load(path, &id, version).await?)
}

fn describe(spec: &dyn Specification) -> Result<String> {
    let kind = spec.kind()?;
    let label = match spec.spec_type() {
        Some(ty) => format!("{kind}/{ty}"),
        None => kind.to_string(),
    };
    Ok(format!("{} {} ({})", label.cyan(), spec.name()?.bold(), spec.id()))
}

pub async fn run_check(path: &Path, version: &str) -> Result<()> {
    let specs = load(path, version).await?;
    for spec in &specs {
        println!("{} {}", "ok".green().bold(), describe(spec.as_ref())?);
    }
    println!("{} specification(s) ready", specs.len());
    Ok(())
}

pub async fn run_excludes(path: &Path) -> Result<()> {
    let specs = load(path, "0.0.0").await?;
    let project = specs
        .iter()
        .find_map(|spec| spec.as_any().downcast_ref::<ProjectSpecification>())
        .ok_or_else(|| CliError::user(format!("no project declared in {}", path.display())))?;
    for pattern in project.resource_excludes() {
        println!("{pattern}");
    }
    Ok(())
}
