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

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::host::{BuildEngine, Console, DeviceRegistry, FileSystem, Options};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// A directory under the system temp directory, removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "sfdk-modules-{prefix}-{}-{seq}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).expect("temporary directory should be writable");
        // Symbolic links in the temp directory path (macOS) would fail the workspace checks.
        let path = std::fs::canonicalize(&path).expect("temporary directory should exist");
        TempDir { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let file = self.path.join(relative);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("parent directory should be writable");
        }
        std::fs::write(&file, content).expect("temporary file should be writable");
        file
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let directory = self.path.join(relative);
        std::fs::create_dir_all(&directory).expect("temporary directory should be writable");
        directory
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Files kept in memory, directories are implied by the file paths.
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, String>>,
    writes: RefCell<usize>,
}

impl MemoryFileSystem {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        MemoryFileSystem {
            files: RefCell::new(
                files.iter()
                    .map(|(path, content)| (PathBuf::from(path), content.to_string()))
                    .collect()
            ),
            writes: RefCell::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files.borrow().keys().any(|file| file != path && file.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        if self.exists(path) {
            Some(path.to_path_buf())
        } else {
            None
        }
    }

    fn find_files(&self, root: &Path, name: &str, max_depth: usize) -> std::io::Result<Vec<PathBuf>> {
        if !self.is_dir(root) {
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"));
        }
        let result = self.files.borrow().keys()
            .filter(|file| file.file_name().map_or(false, |file_name| file_name == name))
            .filter(|file| match file.strip_prefix(root) {
                Ok(relative) => relative.components().count() <= max_depth + 1,
                Err(_) => false,
            })
            .cloned()
            .collect();
        Ok(result)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.files.borrow().get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        *self.writes.borrow_mut() += 1;
        self.files.borrow_mut().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

/// Build engine and device registry with a fixed content.
#[derive(Default)]
pub struct FakeSdk {
    pub devices: Vec<String>,
    pub targets: HashMap<String, PathBuf>,
    pub import_failure: Option<String>,
    pub imports: RefCell<Vec<(String, Option<PathBuf>)>>,
}

impl FakeSdk {
    pub fn with_target(name: &str, tools_path: &str) -> Self {
        FakeSdk {
            targets: HashMap::from([(name.to_string(), PathBuf::from(tools_path))]),
            ..Default::default()
        }
    }
}

impl DeviceRegistry for FakeSdk {
    fn is_device(&self, name: &str) -> bool {
        self.devices.iter().any(|device| device == name)
    }
}

impl BuildEngine for FakeSdk {
    fn is_build_target(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    fn tools_path(&self, target: &str) -> Option<PathBuf> {
        self.targets.get(target).cloned()
    }

    fn import_gpg_key(&self, id: &str, passphrase_file: Option<&Path>) -> Result<(), String> {
        self.imports.borrow_mut().push((id.to_string(), passphrase_file.map(Path::to_path_buf)));
        match &self.import_failure {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

pub struct MapOptions(pub HashMap<String, String>);

impl MapOptions {
    pub fn with(options: &[(&str, &str)]) -> Self {
        MapOptions(options.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl Options for MapOptions {
    fn is_option_set(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    fn option_argument(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Keeps the warnings for later inspection.
#[derive(Default)]
pub struct RecordingConsole {
    pub warnings: RefCell<Vec<String>>,
}

impl RecordingConsole {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl Console for RecordingConsole {
    fn warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}
