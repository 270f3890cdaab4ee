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

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::validators::Validation;

/// Validates a list like "static,+unit,-system".
///
/// Each element is a name with an optional sign, adding to or removing
/// from the default selection.
pub fn validate_check_levels(value: &str) -> Validation {
    validate_list(value, "level", |name| LEVELS.contains(name))
}

pub fn validate_check_suites(value: &str) -> Validation {
    validate_list(value, "suite", |_| true)
}

pub fn validate_search_output_dir_option(value: &str) -> Validation {
    match value {
        "quiet" | "verbose" => Validation::valid(),
        _ => Validation::invalid("Invalid keyword used"),
    }
}

fn validate_list<F>(value: &str, kind: &str, known: F) -> Validation
    where F: Fn(&str) -> bool
{
    for element in value.split(',') {
        let name = element.strip_prefix(&['+', '-'][..]).unwrap_or(element);
        if !NAME.is_match(name) || !known(name) {
            return Validation::invalid(format!("Not a valid {kind} name: \"{name}\""));
        }
    }
    Validation::valid()
}

lazy_static! {
    static ref NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();

    static ref LEVELS: HashSet<&'static str> = {
        let mut set = HashSet::new();

        set.insert("static");
        set.insert("source");
        set.insert("package");
        set.insert("dynamic");
        set.insert("unit");
        set.insert("system");

        set.shrink_to_fit();
        set
    };
}
