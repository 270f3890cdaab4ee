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

//! Formats the options forwarded to the packaging tool.

use lazy_static::lazy_static;
use nom::bytes::complete::{tag, take_while1};
use nom::combinator::{all_consuming, map, opt};
use nom::sequence::pair;
use nom::IResult;

/// Selects the packaging tool as the receiver of the next argument.
pub const TOOL_SELECTION_FLAG: &str = "-Xmb2";

/// Options the packaging tool understands. "[no-]" marks the ones with a
/// negated form.
pub const PACKAGING_OPTIONS: &[&str] = &[
    "[no-]fix-version",
    "[no-]snapshot",
    "force-no-snapshot",
    "[no-]task",
    "no-pull-build-requires",
    "[no-]search-output-dir",
    "output-dir",
    "output-prefix",
    "specfile",
];

lazy_static! {
    static ref OPTION_NAMES: Vec<String> = flat_map_expand(PACKAGING_OPTIONS, |pattern| expand_option_pattern(pattern));
}

/// Map every element into a sequence and concatenate the results.
pub fn flat_map_expand<T, U, I, F>(list: &[T], f: F) -> Vec<U>
    where F: FnMut(&T) -> I,
          I: IntoIterator<Item = U>
{
    list.iter().flat_map(f).collect()
}

/// Wrap the default formatted flags of the option with the tool selection
/// flag. None when the option is not for the packaging tool.
pub fn wrap_option(name: &str, flags: &[String]) -> Option<Vec<String>> {
    if !OPTION_NAMES.iter().any(|known| known == name) {
        return None;
    }
    Some(flat_map_expand(flags, |flag| [TOOL_SELECTION_FLAG.to_string(), flag.clone()]))
}

/// "[no-]task" expands to "task" and "no-task".
pub fn expand_option_pattern(pattern: &str) -> Vec<String> {
    match all_consuming(option_pattern)(pattern) {
        Ok((_, (true, name))) => vec![name.to_string(), format!("no-{name}")],
        Ok((_, (false, name))) => vec![name.to_string()],
        Err(error) => {
            log::debug!("invalid option pattern {:?}: {}", pattern, error);
            vec![]
        }
    }
}

fn option_pattern(input: &str) -> IResult<&str, (bool, &str)> {
    pair(
        map(opt(tag("[no-]")), |negatable| negatable.is_some()),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.'),
    )(input)
}
