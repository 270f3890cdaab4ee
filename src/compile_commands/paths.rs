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

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::configuration::{Engine, SharedPath};
use crate::host::SEPARATOR;

/// Substitutions turning build engine paths into host paths.
///
/// Works on the serialized JSON text. Every inserted path is escaped as
/// JSON string content, so the result stays parseable.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMapping {
    pub shared_home: Option<SharedPath>,
    pub shared_src: Option<SharedPath>,
    pub shared_targets: String,
}

impl From<&Engine> for PathMapping {
    fn from(value: &Engine) -> Self {
        PathMapping {
            shared_home: value.shared_home.clone(),
            shared_src: value.shared_src.clone(),
            shared_targets: value.shared_targets.to_string_lossy().to_string(),
        }
    }
}

impl PathMapping {
    /// The root of the target's file system as seen from the host.
    pub fn sysroot(&self, target: &str) -> String {
        format!("{}{}{}", self.shared_targets.trim_end_matches(SEPARATOR), SEPARATOR, target)
    }

    pub fn apply(&self, text: &str, target: &str) -> String {
        let mut result = text.to_string();
        for shared in [&self.shared_home, &self.shared_src].into_iter().flatten() {
            result = replace_mount_point(&result, shared);
        }
        replace_root_paths(&result, &self.sysroot(target))
    }
}

// The mount point matches only as a whole path component, so "/home/src1"
// does not match in "/home/src10". Trailing separators are not significant.
fn replace_mount_point(text: &str, shared: &SharedPath) -> String {
    let mount_point = shared.mount_point.trim_end_matches(SEPARATOR);
    if mount_point.is_empty() {
        log::debug!("mount point {:?} ignored", shared.mount_point);
        return text.to_string();
    }
    let pattern = format!(r#"{}({}|"|$)"#, regex::escape(&escape_json(mount_point)), SEPARATOR);
    let host_path = escape_json(shared.host_path.trim_end_matches(SEPARATOR));
    match Regex::new(&pattern) {
        Ok(regex) =>
            regex.replace_all(text, |caps: &Captures| format!("{}{}", host_path, &caps[1]))
                .into_owned(),
        Err(error) => {
            log::debug!("mount point {:?} not usable as pattern: {}", shared.mount_point, error);
            text.to_string()
        }
    }
}

// The string may start with a flag ("-I/usr/include") or an equal sign
// ("=/usr/include"), relative paths like "src/usr" are left alone.
fn replace_root_paths(text: &str, sysroot: &str) -> String {
    let sysroot = escape_json(sysroot);
    ROOT_PATH.replace_all(text, |caps: &Captures| {
        format!("\"{}{}{}{}{}", &caps[1], sysroot, SEPARATOR, &caps[2], &caps[3])
    }).into_owned()
}

lazy_static! {
    static ref ROOT_PATH: Regex = Regex::new(r#""((?:-[^"/]*)?=?)/+(usr|lib|opt)(/|")"#).unwrap();
}

fn escape_json(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}
