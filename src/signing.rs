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

use std::path::PathBuf;

use crate::host::{BuildEngine, Options};

pub const SIGNING_USER_OPTION: &str = "package.signing-user";
pub const SIGNING_PASSPHRASE_FILE_OPTION: &str = "package.signing-passphrase-file";

/// Make the signing key of the selected user available to the build engine.
///
/// Does nothing unless the signing user option is set.
pub fn provision_signing_key(options: &dyn Options, engine: &dyn BuildEngine) -> Result<(), String> {
    let user = match options.option_argument(SIGNING_USER_OPTION) {
        Some(user) if options.is_option_set(SIGNING_USER_OPTION) => user,
        _ => {
            log::debug!("{} is not set, no key to import", SIGNING_USER_OPTION);
            return Ok(());
        }
    };
    let passphrase_file = options.option_argument(SIGNING_PASSPHRASE_FILE_OPTION)
        .filter(|file| !file.is_empty())
        .map(PathBuf::from);

    log::debug!("importing the GPG key of {:?}", user);
    engine.import_gpg_key(&user, passphrase_file.as_deref())
        .map_err(|error| format!("Failed to import the GPG key \"{user}\": {error}"))
}

#[cfg(test)]
mod test {
    use crate::fixtures::{FakeSdk, MapOptions};

    use super::*;

    #[test]
    fn test_without_user() {
        let sdk = FakeSdk::default();

        let result = provision_signing_key(&MapOptions::with(&[]), &sdk);

        assert_eq!(Ok(()), result);
        assert!(sdk.imports.borrow().is_empty());
    }

    #[test]
    fn test_with_user() {
        let sdk = FakeSdk::default();
        let options = MapOptions::with(&[(SIGNING_USER_OPTION, "user@example.com")]);

        let result = provision_signing_key(&options, &sdk);

        assert_eq!(Ok(()), result);
        assert_eq!(vec![(String::from("user@example.com"), None)], *sdk.imports.borrow());
    }

    #[test]
    fn test_with_passphrase_file() {
        let sdk = FakeSdk::default();
        let options = MapOptions::with(&[
            (SIGNING_USER_OPTION, "user@example.com"),
            (SIGNING_PASSPHRASE_FILE_OPTION, "/home/user/.passphrase"),
        ]);

        let result = provision_signing_key(&options, &sdk);

        assert_eq!(Ok(()), result);
        assert_eq!(
            vec![(String::from("user@example.com"), Some(PathBuf::from("/home/user/.passphrase")))],
            *sdk.imports.borrow()
        );
    }

    #[test]
    fn test_import_failure() {
        let sdk = FakeSdk {
            import_failure: Some(String::from("Bad passphrase")),
            ..Default::default()
        };
        let options = MapOptions::with(&[(SIGNING_USER_OPTION, "user@example.com")]);

        let result = provision_signing_key(&options, &sdk);

        assert_eq!(Err(String::from("Failed to import the GPG key \"user@example.com\": Bad passphrase")), result);
    }
}
