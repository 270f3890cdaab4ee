/*  Copyright (C) 2023 by the sfdk-modules developers
    This file is part of sfdk-modules.

    sfdk-modules validates input and post-processes build artifacts for
    the SDK command line tool.

    sfdk-modules is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    sfdk-modules is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::path::Path;

use serde::Serialize;

use crate::host::{BuildEngine, DeviceRegistry, FileSystem};

pub use crate::validators::lists::{validate_check_levels, validate_check_suites, validate_search_output_dir_option};
pub use crate::validators::names::{validate_build_target, validate_device};
pub use crate::validators::paths::{
    validate_directory, validate_spec_file, validate_workspace_directory, validate_workspace_file,
    validate_workspace_path,
};

mod lists;
mod names;
mod paths;

/// The outcome of a validation: the flag and the reason of the failure.
///
/// Serialized as `[true, ""]` or `[false, "reason"]`.
#[derive(Debug, PartialEq, Serialize)]
pub struct Validation(pub bool, pub String);

impl Validation {
    pub fn valid() -> Self {
        Validation(true, String::new())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Validation(false, reason.into())
    }

    pub fn is_valid(&self) -> bool {
        self.0
    }

    pub fn reason(&self) -> &str {
        &self.1
    }
}

/// The validators the host can refer to by name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Kind {
    Directory,
    WorkspacePath,
    WorkspaceDirectory,
    WorkspaceFile,
    SpecFile,
    BuildTarget,
    Device,
    CheckLevels,
    CheckSuites,
    SearchOutputDir,
}

impl TryFrom<&str> for Kind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "directory" =>
                Ok(Kind::Directory),
            "workspace-path" =>
                Ok(Kind::WorkspacePath),
            "workspace-directory" =>
                Ok(Kind::WorkspaceDirectory),
            "workspace-file" =>
                Ok(Kind::WorkspaceFile),
            "spec-file" =>
                Ok(Kind::SpecFile),
            "build-target" =>
                Ok(Kind::BuildTarget),
            "device" =>
                Ok(Kind::Device),
            "check-levels" =>
                Ok(Kind::CheckLevels),
            "check-suites" =>
                Ok(Kind::CheckSuites),
            "search-output-dir" =>
                Ok(Kind::SearchOutputDir),
            _ =>
                Err(format!(r#"Unknown validator "{value}""#)),
        }
    }
}

/// The capabilities the validators may need.
pub struct Context<'a> {
    pub fs: &'a dyn FileSystem,
    pub engine: &'a dyn BuildEngine,
    pub devices: &'a dyn DeviceRegistry,
    pub workspace: Option<&'a Path>,
}

impl Kind {
    pub fn validate(&self, value: &str, context: &Context) -> Validation {
        let workspace = || context.workspace.ok_or_else(|| Validation::invalid("The workspace directory is not configured"));
        let result = match self {
            Kind::Directory =>
                validate_directory(context.fs, value),
            Kind::WorkspacePath =>
                workspace().map_or_else(|e| e, |root| validate_workspace_path(context.fs, root, value)),
            Kind::WorkspaceDirectory =>
                workspace().map_or_else(|e| e, |root| validate_workspace_directory(context.fs, root, value)),
            Kind::WorkspaceFile =>
                workspace().map_or_else(|e| e, |root| validate_workspace_file(context.fs, root, value)),
            Kind::SpecFile =>
                validate_spec_file(context.fs, value),
            Kind::BuildTarget =>
                validate_build_target(context.engine, value),
            Kind::Device =>
                validate_device(context.devices, value),
            Kind::CheckLevels =>
                validate_check_levels(value),
            Kind::CheckSuites =>
                validate_check_suites(value),
            Kind::SearchOutputDir =>
                validate_search_output_dir_option(value),
        };
        log::debug!("{:?} validation of {:?}: {:?}", self, value, result);
        result
    }
}
