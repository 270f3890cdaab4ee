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
use std::path::PathBuf;

use serde::Deserialize;

// Represents the state the host hands over for one invocation.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Configuration {
    pub build_engine: Option<Engine>,
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

// Represents the build engine the tool talks to.
//
// The build engine runs in a sandbox, some host directories are mounted
// into it. The mount points are what the generated artifacts refer to,
// the host paths are what the user can open.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Engine {
    pub shared_home: Option<SharedPath>,
    pub shared_src: Option<SharedPath>,
    pub shared_targets: PathBuf,
    #[serde(default)]
    pub targets: Vec<Target>,
    pub signing_keys: Option<PathBuf>,
}

// A directory shared between the host and the build engine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SharedPath {
    pub mount_point: String,
    pub host_path: String,
}

// A build target known by the build engine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Target {
    pub name: String,
    pub tools_path: PathBuf,
}

impl Configuration {
    /// The workspace is the host side of the shared source directory.
    pub fn workspace(&self) -> Option<PathBuf> {
        self.build_engine.as_ref()
            .and_then(|engine| engine.shared_src.as_ref())
            .map(|shared| PathBuf::from(&shared.host_path))
    }
}

pub mod io {
    use std::io::stdin;

    use thiserror::Error;

    use super::*;

    /// This error type encompasses any error that can be returned by this module.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("IO error")]
        IoError(#[from] std::io::Error),
        #[error("Syntax error")]
        SyntaxError(#[from] serde_json::Error),
    }

    /// Load the content of the given file and parse it as Configuration.
    pub fn from_file(file: &std::path::Path) -> Result<Configuration, Error> {
        let reader = std::fs::OpenOptions::new().read(true).open(file)?;
        let result = from_reader(reader)?;

        Ok(result)
    }

    pub fn from_stdin() -> Result<Configuration, Error> {
        let reader = stdin();
        let result = from_reader(reader)?;

        Ok(result)
    }

    /// Load the content of the given stream and parse it as Configuration.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Configuration, serde_json::Error> {
        serde_json::from_reader(reader)
    }

}
