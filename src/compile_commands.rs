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

//! Makes a compilation database produced inside the build engine usable
//! on the host.
//!
//! The compiler is replaced with the target's tool wrapper, the paths
//! pointing to shared directories are mapped to the host paths, and the
//! system paths are moved under the target's sysroot.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::host::{update_file, BuildEngine, Console, FileSystem, Options, SEPARATOR};

pub use crate::compile_commands::compiler::looks_like_a_compiler;
pub use crate::compile_commands::paths::PathMapping;

mod compiler;
mod paths;

pub const FILE_NAME: &str = "compile_commands.json";
pub const SEARCH_DEPTH: usize = 1;
pub const TARGET_OPTION: &str = "target";

/// The compilation database entry, the keys kept in their original order.
pub type CompileUnit = Map<String, Value>;

/// This error type encompasses any error that can be returned by this module.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Syntax error")]
    SyntaxError(#[from] serde_json::Error),
    #[error("The \"target\" option is not set")]
    MissingTarget,
    #[error("No such build target: \"{0}\"")]
    UnknownTarget(String),
}

/// The target specific part of the rewrite.
#[derive(Debug, PartialEq)]
pub struct Target {
    pub name: String,
    pub tools_path: String,
}

impl Target {
    pub fn resolve(options: &dyn Options, engine: &dyn BuildEngine) -> Result<Self, Error> {
        let name = options.option_argument(TARGET_OPTION)
            .ok_or(Error::MissingTarget)?;
        let tools_path = engine.tools_path(&name)
            .ok_or_else(|| Error::UnknownTarget(name.clone()))?;

        Ok(Target { name, tools_path: tools_path.to_string_lossy().to_string() })
    }

    fn compiler(&self) -> String {
        format!("{}{}gcc", self.tools_path.trim_end_matches(SEPARATOR), SEPARATOR)
    }
}

/// Find the compilation databases around the directory and rewrite them
/// in place. Returns the rewritten files.
///
/// Nothing is written for a database which fails to parse.
pub fn rewrite_compile_commands(
    directory: &Path,
    fs: &dyn FileSystem,
    options: &dyn Options,
    engine: &dyn BuildEngine,
    mapping: &PathMapping,
    console: &dyn Console,
) -> Result<Vec<PathBuf>, Error> {
    let files = fs.find_files(directory, FILE_NAME, SEARCH_DEPTH)?;
    if files.is_empty() {
        log::debug!("no {} found under {:?}", FILE_NAME, directory);
        return Ok(files);
    }

    let target = Target::resolve(options, engine)?;
    for file in &files {
        log::debug!("rewriting {:?} for target {}", file, target.name);
        update_file(fs, file, |content| rewrite(content, file, &target, mapping, console))?;
    }

    Ok(files)
}

/// The text transformation of a single compilation database.
pub fn rewrite(
    content: &str,
    file: &Path,
    target: &Target,
    mapping: &PathMapping,
    console: &dyn Console,
) -> Result<String, Error> {
    let units: Vec<CompileUnit> = serde_json::from_str(content)?;
    let mut filter = UnitFilter::new(file, console);
    let compiler = target.compiler();

    let retained: Vec<CompileUnit> = units.into_iter()
        .filter(|unit| filter.accept(unit))
        .collect();

    // The compiler is set after the path mapping, the tool directory is a
    // host path already.
    let mapped = mapping.apply(&serde_json::to_string_pretty(&retained)?, &target.name);
    let mut retained: Vec<CompileUnit> = serde_json::from_str(&mapped)?;
    for unit in retained.iter_mut() {
        if let Some(executable) = executable_mut(unit) {
            *executable = Value::String(compiler.clone());
        }
    }

    Ok(serde_json::to_string_pretty(&retained)?)
}

fn executable(unit: &CompileUnit) -> Option<&str> {
    unit.get("arguments")
        .and_then(Value::as_array)
        .and_then(|arguments| arguments.first())
        .and_then(Value::as_str)
}

fn executable_mut(unit: &mut CompileUnit) -> Option<&mut Value> {
    unit.get_mut("arguments")
        .and_then(Value::as_array_mut)
        .and_then(|arguments| arguments.first_mut())
}

/// Decides which units survive, and warns once per distinct reason.
struct UnitFilter<'a> {
    file: &'a Path,
    console: &'a dyn Console,
    command_field_seen: bool,
    missing_arguments_seen: bool,
    unrecognized_seen: HashSet<String>,
}

impl<'a> UnitFilter<'a> {
    fn new(file: &'a Path, console: &'a dyn Console) -> Self {
        UnitFilter {
            file,
            console,
            command_field_seen: false,
            missing_arguments_seen: false,
            unrecognized_seen: HashSet::new(),
        }
    }

    fn accept(&mut self, unit: &CompileUnit) -> bool {
        if unit.contains_key("command") {
            if !self.command_field_seen {
                self.command_field_seen = true;
                self.console.warning(&format!(
                    "{}: The \"command\" field is not supported, affected entries are skipped",
                    self.file.display()
                ));
            }
            return false;
        }
        match executable(unit) {
            Some(executable) if looks_like_a_compiler(executable) =>
                true,
            Some(executable) => {
                if self.unrecognized_seen.insert(executable.to_string()) {
                    self.console.warning(&format!(
                        "{}: Unrecognized command \"{}\", affected entries are skipped",
                        self.file.display(),
                        executable
                    ));
                }
                false
            }
            None => {
                if !self.missing_arguments_seen {
                    self.missing_arguments_seen = true;
                    self.console.warning(&format!(
                        "{}: Entries without \"arguments\" are skipped",
                        self.file.display()
                    ));
                }
                false
            }
        }
    }
}
