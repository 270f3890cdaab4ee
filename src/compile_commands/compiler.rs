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

use crate::host::SEPARATOR;

/// C and C++ compiler drivers, optionally with a cross compile prefix.
pub fn looks_like_a_compiler(executable: &str) -> bool {
    let base_name = match executable.rsplit_once(SEPARATOR) {
        Some((_, base_name)) => base_name,
        None => executable,
    };
    COMPILER.is_match(base_name)
}

lazy_static! {
    static ref COMPILER: Regex = Regex::new(r"^(.*-)?(gcc|g\+\+|c\+\+|cc|c89|c99)$").unwrap();
}
