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

use crate::host::{BuildEngine, DeviceRegistry};
use crate::validators::Validation;

pub fn validate_build_target(engine: &dyn BuildEngine, value: &str) -> Validation {
    if engine.is_build_target(value) {
        Validation::valid()
    } else {
        Validation::invalid(format!("No such build target: \"{value}\""))
    }
}

pub fn validate_device(devices: &dyn DeviceRegistry, value: &str) -> Validation {
    if devices.is_device(value) {
        Validation::valid()
    } else {
        Validation::invalid(format!("No such device: \"{value}\""))
    }
}
