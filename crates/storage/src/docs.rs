// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project document layout and typed accessors
//!
//! Fixed document names per artifact type: a project owns a state document,
//! a config document, metadata, uploads, and one output document per
//! executed stage. A root index lists known projects.

use crate::{DocStore, StorageError};
use cg_core::{GenerationConfig, ProjectId, ProjectMeta, ProjectRef, State};
use std::path::PathBuf;

/// Directory holding all project subtrees
pub const PROJECTS_DIR: &str = "projects";
/// Root index of known projects
pub const PROJECTS_INDEX: &str = "projects.json";

/// Per-project documents
pub const STATE_DOC: &str = "state.json";
pub const CONFIG_DOC: &str = "config.json";
pub const META_DOC: &str = "meta.json";
/// Directory for uploaded source files
pub const UPLOADS_DIR: &str = "uploads";

/// Stage output documents
pub const PARSED_DOC: &str = "parsed.json";
pub const INDEX_DOC: &str = "index.json";
pub const SUMMARY_DOC: &str = "summary.json";
pub const QUIZ_DOC: &str = "quiz.json";
pub const IMAGES_DOC: &str = "images.json";
pub const SLIDES_DOC: &str = "slides.json";
pub const PUBLISH_MANIFEST_DOC: &str = "publish/xiaohongshu/manifest.json";

/// A project's directory, relative to the store root
pub fn project_dir(project: &ProjectId) -> PathBuf {
    PathBuf::from(PROJECTS_DIR).join(project.as_str())
}

pub fn state_path(project: &ProjectId) -> PathBuf {
    project_dir(project).join(STATE_DOC)
}

pub fn config_path(project: &ProjectId) -> PathBuf {
    project_dir(project).join(CONFIG_DOC)
}

pub fn meta_path(project: &ProjectId) -> PathBuf {
    project_dir(project).join(META_DOC)
}

pub fn upload_path(project: &ProjectId, filename: &str) -> PathBuf {
    project_dir(project).join(UPLOADS_DIR).join(filename)
}

/// A stage output document inside a project's directory
pub fn output_path(project: &ProjectId, doc: &str) -> PathBuf {
    project_dir(project).join(doc)
}

impl DocStore {
    /// Read a project's state document
    pub fn read_state(&self, project: &ProjectId) -> Result<Option<State>, StorageError> {
        self.read(state_path(project))
    }

    /// Write a project's state document
    pub fn write_state(&self, project: &ProjectId, state: &State) -> Result<(), StorageError> {
        self.write(state_path(project), state)
    }

    /// Read a project's run configuration
    pub fn read_config(
        &self,
        project: &ProjectId,
    ) -> Result<Option<GenerationConfig>, StorageError> {
        self.read(config_path(project))
    }

    /// Write a project's run configuration
    pub fn write_config(
        &self,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StorageError> {
        self.write(config_path(project), config)
    }

    /// Read a project's metadata
    pub fn read_meta(&self, project: &ProjectId) -> Result<Option<ProjectMeta>, StorageError> {
        self.read(meta_path(project))
    }

    /// Write a project's metadata
    pub fn write_meta(
        &self,
        project: &ProjectId,
        meta: &ProjectMeta,
    ) -> Result<(), StorageError> {
        self.write(meta_path(project), meta)
    }

    /// Read the project index; absent means no projects yet
    pub fn read_index(&self) -> Result<Vec<ProjectRef>, StorageError> {
        Ok(self.read(PROJECTS_INDEX)?.unwrap_or_default())
    }

    /// List metadata for every indexed project, skipping entries whose meta
    /// document is missing
    pub fn list_projects(&self) -> Result<Vec<ProjectMeta>, StorageError> {
        let mut projects = Vec::new();
        for entry in self.read_index()? {
            let Ok(project) = ProjectId::new(&entry.id) else {
                continue;
            };
            if let Some(meta) = self.read_meta(&project)? {
                projects.push(meta);
            }
        }
        Ok(projects)
    }

    /// Write a project's metadata and ensure it appears in the index
    pub fn register_project(
        &self,
        project: &ProjectId,
        meta: &ProjectMeta,
    ) -> Result<(), StorageError> {
        self.write_meta(project, meta)?;
        let mut index = self.read_index()?;
        if !index.iter().any(|r| r.id == project.as_str()) {
            index.push(ProjectRef {
                id: project.as_str().to_string(),
            });
            self.write(PROJECTS_INDEX, &index)?;
        }
        Ok(())
    }

    /// Remove a project from the index and delete its directory
    pub fn delete_project(&self, project: &ProjectId) -> Result<(), StorageError> {
        let mut index = self.read_index()?;
        index.retain(|r| r.id != project.as_str());
        self.write(PROJECTS_INDEX, &index)?;
        self.remove_dir(project_dir(project))
    }
}

#[cfg(test)]
#[path = "docs_tests.rs"]
mod tests;
