//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::env;

/// Overrides the executable invoked for version control operations.
pub const ENZI_GIT: &str = "ENZI_GIT";
/// Default log level when `--log` is not given.
pub const ENZI_LOG: &str = "ENZI_LOG";

/// Reads the environment variable `key`, treating an empty value as not set.
pub fn get(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(v) if v.trim().is_empty() == false => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_is_unset() {
        env::set_var("ENZI_TEST_EMPTY_VAR", "  ");
        assert_eq!(get("ENZI_TEST_EMPTY_VAR"), None);
        env::set_var("ENZI_TEST_SET_VAR", "git2");
        assert_eq!(get("ENZI_TEST_SET_VAR"), Some(String::from("git2")));
        assert_eq!(get("ENZI_TEST_MISSING_VAR"), None);
    }
}
