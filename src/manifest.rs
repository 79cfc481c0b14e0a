//! Manifest loading
//!
//! Reads resources from (multi-document) YAML the way the host would receive
//! them: as dynamic objects. Resources without a creation timestamp are
//! stamped with the load time, as if they had just been created.

use crate::error::{Error, Result};
use crate::models::{DynamicObject, NopResource};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Parse every non-empty YAML document in `contents`
pub fn load_str(contents: &str, now: DateTime<Utc>) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_str(contents) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        let mut object: DynamicObject = serde_yaml::from_value(value)?;
        if object.ensure_creation_timestamp(now) {
            tracing::debug!(
                resource = object.name().unwrap_or_default(),
                "Stamped creation timestamp"
            );
        }
        objects.push(object);
    }
    Ok(objects)
}

/// Read and parse a manifest file
pub fn load_file(path: &Path, now: DateTime<Utc>) -> Result<Vec<DynamicObject>> {
    let contents = std::fs::read_to_string(path)?;
    load_str(&contents, now)
}

/// Convert dynamic objects into NopResources, failing on the first bad one
pub fn into_resources(objects: Vec<DynamicObject>) -> Result<Vec<NopResource>> {
    objects.into_iter().map(NopResource::try_from).collect()
}

/// A problem found in one manifest document
#[derive(Debug)]
pub struct ManifestProblem {
    /// Zero-based position of the document
    pub index: usize,
    pub name: Option<String>,
    pub error: Error,
}

impl fmt::Display for ManifestProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "document {} ({}): {}", self.index + 1, name, self.error),
            None => write!(f, "document {}: {}", self.index + 1, self.error),
        }
    }
}

/// Check every document and report all problems found
pub fn validate(objects: &[DynamicObject]) -> Vec<ManifestProblem> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (index, object) in objects.iter().enumerate() {
        let name = object.name().map(str::to_string);
        let mut report = |error: Error| {
            problems.push(ManifestProblem {
                index,
                name: name.clone(),
                error,
            })
        };

        match &name {
            None => report(Error::InvalidManifest(
                "metadata.name is required".to_string(),
            )),
            Some(n) if !seen.insert(n.clone()) => report(Error::InvalidManifest(format!(
                "duplicate resource name {:?}",
                n
            ))),
            Some(_) => {}
        }

        match NopResource::try_from(object.clone()) {
            Ok(resource) => {
                let rules = &resource.spec.for_provider.condition_after;
                for (i, rule) in rules.iter().enumerate() {
                    if rule.condition_type.is_empty() {
                        report(Error::InvalidManifest(format!(
                            "conditionAfter[{}].conditionType must not be empty",
                            i
                        )));
                    }
                }
            }
            Err(error) => report(error),
        }
    }

    problems
}
