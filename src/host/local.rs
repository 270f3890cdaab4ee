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

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::configuration::{Configuration, Target};
use crate::host::{BuildEngine, Console, DeviceRegistry, FileSystem, Options};

/// The filesystem of the machine the tool runs on.
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }

    fn find_files(&self, root: &Path, name: &str, max_depth: usize) -> std::io::Result<Vec<PathBuf>> {
        let mut result = vec![];
        let mut directories = vec![];

        // The root has to be readable, the rest is best effort.
        for entry in std::fs::read_dir(root)? {
            collect(entry?.path(), name, &mut result, &mut directories, 1);
        }
        while let Some((directory, depth)) = directories.pop() {
            if depth > max_depth {
                continue;
            }
            match std::fs::read_dir(&directory) {
                Ok(entries) =>
                    for entry in entries.flatten() {
                        collect(entry.path(), name, &mut result, &mut directories, depth + 1);
                    }
                Err(error) =>
                    log::debug!("skipping directory {:?}: {}", directory, error),
            }
        }

        result.sort();
        Ok(result)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");
        // Create scope for the file, so it will be closed when the scope is over.
        {
            let mut file = File::create(&temp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&temp, path)
    }
}

fn collect(path: PathBuf, name: &str, files: &mut Vec<PathBuf>, directories: &mut Vec<(PathBuf, usize)>, depth: usize) {
    if path.is_dir() {
        directories.push((path, depth));
    } else if path.file_name().map_or(false, |file_name| file_name == name) {
        files.push(path);
    }
}

/// Build engine and device registry backed by the configuration.
pub struct ConfiguredSdk {
    devices: Vec<String>,
    targets: Vec<Target>,
    signing_keys: Option<PathBuf>,
    gpg: PathBuf,
}

impl From<&Configuration> for ConfiguredSdk {
    fn from(value: &Configuration) -> Self {
        let (targets, signing_keys) = match &value.build_engine {
            Some(engine) => (engine.targets.clone(), engine.signing_keys.clone()),
            None => (vec![], None),
        };
        ConfiguredSdk {
            devices: value.devices.clone(),
            targets,
            signing_keys,
            gpg: PathBuf::from("gpg"),
        }
    }
}

impl DeviceRegistry for ConfiguredSdk {
    fn is_device(&self, name: &str) -> bool {
        self.devices.iter().any(|device| device == name)
    }
}

impl BuildEngine for ConfiguredSdk {
    fn is_build_target(&self, name: &str) -> bool {
        self.targets.iter().any(|target| target.name == name)
    }

    fn tools_path(&self, target: &str) -> Option<PathBuf> {
        self.targets.iter()
            .find(|candidate| candidate.name == target)
            .map(|candidate| candidate.tools_path.clone())
    }

    /// Export the secret key from the host keyring into the directory
    /// the build engine imports signing keys from.
    fn import_gpg_key(&self, id: &str, passphrase_file: Option<&Path>) -> Result<(), String> {
        let keys = self.signing_keys.as_ref()
            .ok_or_else(|| String::from("The signing keys directory is not configured"))?;
        if let Some(file) = passphrase_file {
            if !file.exists() {
                return Err(format!("The passphrase file does not exist: \"{}\"", file.display()));
            }
        }

        let mut command = Command::new(&self.gpg);
        command.args(["--batch", "--armor"]);
        if let Some(file) = passphrase_file {
            command.args(["--pinentry-mode", "loopback", "--passphrase-file"]);
            command.arg(file);
        }
        command.args(["--export-secret-keys", id]);
        log::debug!("running {:?}", command);

        let output = command.output()
            .map_err(|error| format!("Failed to run \"{}\": {}", self.gpg.display(), error))?;
        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }
        if output.stdout.is_empty() {
            return Err(format!("No secret key found for \"{}\"", id));
        }

        std::fs::create_dir_all(keys)
            .and_then(|_| std::fs::write(keys.join(key_file_name(id)), &output.stdout))
            .map_err(|error| format!("Failed to store the key: {}", error))
    }
}

fn key_file_name(id: &str) -> String {
    let sanitized: String = id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '@' { c } else { '_' })
        .collect();
    format!("{}.asc", sanitized)
}

/// The option state from the configuration.
pub struct ConfiguredOptions {
    options: BTreeMap<String, String>,
}

impl From<&Configuration> for ConfiguredOptions {
    fn from(value: &Configuration) -> Self {
        ConfiguredOptions { options: value.options.clone() }
    }
}

impl Options for ConfiguredOptions {
    fn is_option_set(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    fn option_argument(&self, name: &str) -> Option<String> {
        self.options.get(name).cloned()
    }
}

/// Warnings go to the log.
pub struct LogConsole;

impl Console for LogConsole {
    fn warning(&self, message: &str) {
        log::warn!("{}", message);
    }
}
