// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated project identifiers
//!
//! Every document path is namespaced under a project id, so an id must never
//! be able to escape the storage root. Validation fails closed: nothing is
//! sanitized or clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from project id validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectIdError {
    #[error("project id is empty")]
    Empty,
    #[error("project id contains a path separator")]
    Separator,
    #[error("project id is a path traversal risk")]
    Traversal,
    #[error("project id contains a control character")]
    Control,
}

/// Identifier for a project, validated against path traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Validate and wrap a raw id
    pub fn new(raw: impl Into<String>) -> Result<Self, ProjectIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ProjectIdError::Empty);
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(ProjectIdError::Separator);
        }
        if raw == "." || raw.contains("..") {
            return Err(ProjectIdError::Traversal);
        }
        if raw.chars().any(char::is_control) {
            return Err(ProjectIdError::Control);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ProjectIdError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> String {
        id.0
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
