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

use crate::host::{clean_path, FileSystem, SEPARATOR};
use crate::validators::Validation;

pub fn validate_directory(fs: &dyn FileSystem, value: &str) -> Validation {
    let path = Path::new(value);
    if !fs.exists(path) {
        return Validation::invalid(format!("No such directory: \"{value}\""));
    }
    if !fs.is_dir(path) {
        return Validation::invalid(format!("Not a directory: \"{value}\""));
    }
    Validation::valid()
}

fn validate_file(fs: &dyn FileSystem, value: &str) -> Validation {
    let path = Path::new(value);
    if !fs.exists(path) {
        return Validation::invalid(format!("No such file: \"{value}\""));
    }
    if !fs.is_file(path) {
        return Validation::invalid(format!("Not a file: \"{value}\""));
    }
    Validation::valid()
}

/// An existing file or directory inside the workspace.
pub fn validate_workspace_path(fs: &dyn FileSystem, workspace: &Path, value: &str) -> Validation {
    if !fs.exists(Path::new(value)) {
        return Validation::invalid(format!("No such file or directory: \"{value}\""));
    }
    validate_under_workspace(fs, workspace, value)
}

pub fn validate_workspace_directory(fs: &dyn FileSystem, workspace: &Path, value: &str) -> Validation {
    match validate_directory(fs, value) {
        result if !result.is_valid() => result,
        _ => validate_under_workspace(fs, workspace, value),
    }
}

pub fn validate_workspace_file(fs: &dyn FileSystem, workspace: &Path, value: &str) -> Validation {
    match validate_file(fs, value) {
        result if !result.is_valid() => result,
        _ => validate_under_workspace(fs, workspace, value),
    }
}

// The path has to be given in its canonical form, otherwise the build
// engine would see a different path than the user meant.
fn validate_under_workspace(fs: &dyn FileSystem, workspace: &Path, value: &str) -> Validation {
    let path = Path::new(value);
    let canonical = fs.canonicalize(path);
    let clean = clean_path(path).ok();
    if has_redundant_components(value) || canonical.is_none() || canonical != clean {
        return Validation::invalid(format!(
            "Symbolic links and redundant path components are not allowed: \"{value}\""
        ));
    }

    let workspace = fs.canonicalize(workspace).unwrap_or_else(|| workspace.to_path_buf());
    match canonical {
        Some(canonical) if canonical.starts_with(&workspace) =>
            Validation::valid(),
        _ =>
            Validation::invalid(format!(
                "Not under the workspace directory \"{}\": \"{value}\"",
                workspace.display()
            )),
    }
}

// A leading "./" and a trailing separator are tolerated.
fn has_redundant_components(value: &str) -> bool {
    let segments: Vec<&str> = value.split(SEPARATOR).collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().any(|(index, segment)| match *segment {
        ".." => true,
        "." => index > 0,
        "" => index > 0 && index < last,
        _ => false,
    })
}

/// The spec file, or the YAML file it is generated from.
pub fn validate_spec_file(fs: &dyn FileSystem, value: &str) -> Validation {
    let path = Path::new(value);
    if fs.is_file(path) || fs.is_file(&path.with_extension("yaml")) {
        return Validation::valid();
    }
    validate_file(fs, value)
}
