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

//! Capabilities the host tool provides to the module functions.
//!
//! Every function takes the capabilities it needs as explicit parameters,
//! so the same code runs against the local machine or a test double.

use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

pub mod local;

/// The path separator used in the artifacts produced by the build engine.
pub const SEPARATOR: char = '/';

/// Filesystem queries and file access.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Resolves symbolic links and redundant components. None when the
    /// path does not exist.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;

    /// Finds files with the given name under the root, looking at most
    /// `max_depth` directory levels below it.
    fn find_files(&self, root: &Path, name: &str, max_depth: usize) -> std::io::Result<Vec<PathBuf>>;

    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Replaces the content of the file.
    fn write(&self, path: &Path, content: &str) -> std::io::Result<()>;
}

/// Devices registered in the SDK.
pub trait DeviceRegistry {
    fn is_device(&self, name: &str) -> bool;
}

/// The build engine and its build targets.
pub trait BuildEngine {
    fn is_build_target(&self, name: &str) -> bool;

    /// The host directory holding the tools for the given target.
    fn tools_path(&self, target: &str) -> Option<PathBuf>;

    /// Makes the secret key available for signing inside the build engine.
    fn import_gpg_key(&self, id: &str, passphrase_file: Option<&Path>) -> Result<(), String>;
}

/// The options given for the current invocation.
pub trait Options {
    fn is_option_set(&self, name: &str) -> bool;

    fn option_argument(&self, name: &str) -> Option<String>;
}

/// Where the user visible warnings go.
pub trait Console {
    fn warning(&self, message: &str);
}

/// Read the file, apply the transformation and write the result back.
///
/// The file is left untouched when the transformation fails.
pub fn update_file<E, F>(fs: &dyn FileSystem, path: &Path, transform: F) -> Result<(), E>
    where E: From<std::io::Error>,
          F: FnOnce(&str) -> Result<String, E>
{
    let content = fs.read_to_string(path)?;
    let result = transform(&content)?;
    fs.write(path, &result)?;

    Ok(())
}

/// Lexical normalization: removes `.` and `..` components and makes the
/// path absolute. Does not touch the filesystem.
pub fn clean_path(path: &Path) -> std::io::Result<PathBuf> {
    path.absolutize().map(|x| x.to_path_buf())
}
