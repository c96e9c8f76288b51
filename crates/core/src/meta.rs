// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project metadata documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry in the root `projects.json` index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
}

/// Per-project metadata, stored alongside state and config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: String,
    pub name: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_status() -> String {
    "draft".to_string()
}

impl ProjectMeta {
    /// Fresh metadata for a project created at `now`
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: default_status(),
            created_at: now,
            updated_at: now,
            description: String::new(),
            tags: Vec::new(),
        }
    }
}
