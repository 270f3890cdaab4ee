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
use regex::Regex;

pub const BUILD_ARGUMENT: &str = "--build";
pub const EXPORT_COMPILE_COMMANDS: &str = "-DCMAKE_EXPORT_COMPILE_COMMANDS=ON";

/// Drop the definitions that would override the build engine's toolchain.
///
/// The IDE passes its own compilers and prefix path, those are not valid
/// inside the build engine. A `--build` invocation is left untouched.
pub fn filter_cmake_arguments(arguments: &[String]) -> Vec<String> {
    if is_build_invocation(arguments) {
        return arguments.to_vec();
    }
    arguments.iter()
        .filter(|argument| {
            let overrides = TOOLCHAIN_OVERRIDE.is_match(argument);
            if overrides {
                log::debug!("dropping cmake argument {:?}", argument);
            }
            !overrides
        })
        .cloned()
        .collect()
}

/// The build has to leave a compilation database behind.
///
/// The flag is a configure time definition, a `--build` invocation would
/// reject it and is left untouched.
pub fn append_build_flag(arguments: &[String]) -> Vec<String> {
    let mut result = arguments.to_vec();
    if is_build_invocation(arguments) {
        return result;
    }
    if !result.iter().any(|argument| argument == EXPORT_COMPILE_COMMANDS) {
        result.push(EXPORT_COMPILE_COMMANDS.to_string());
    }
    result
}

fn is_build_invocation(arguments: &[String]) -> bool {
    arguments.first().map(String::as_str) == Some(BUILD_ARGUMENT)
}

lazy_static! {
    static ref TOOLCHAIN_OVERRIDE: Regex = Regex::new(
        r"^-D(CMAKE_C_COMPILER|CMAKE_CXX_COMPILER|CMAKE_PREFIX_PATH|QT_QMAKE_EXECUTABLE)(:[A-Z]+)?="
    ).unwrap();
}
