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

//! Closed-schema access to a parsed manifest table.
//!
//! Every lookup remembers the dotted path of the section it came from so that
//! errors point at the offending key.

use super::manifest::ManifestError;
use toml::{Table, Value};

/// A table located at `path` within a manifest.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    path: String,
    table: &'a Table,
}

impl<'a> Section<'a> {
    /// Wraps the top-level table of a manifest.
    pub fn root(table: &'a Table) -> Self {
        Self {
            path: String::new(),
            table: table,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the dotted path of `key` within this section.
    pub fn key_path(&self, key: &str) -> String {
        match self.path.is_empty() {
            true => key.to_string(),
            false => format!("{}.{}", self.path, key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Rejects the first key in document order that is not in `keys`.
    pub fn allow(&self, keys: &[&str]) -> Result<(), ManifestError> {
        match self.table.keys().find(|k| keys.contains(&k.as_str()) == false) {
            Some(k) => Err(ManifestError::UnknownKey(self.key_path(k))),
            None => Ok(()),
        }
    }

    /// Iterates over the section's entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.table.iter()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.table.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&'a Value, ManifestError> {
        self.get(key)
            .ok_or_else(|| ManifestError::MissingKey(self.key_path(key)))
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&'a str>, ManifestError> {
        match self.get(key) {
            Some(v) => Ok(Some(as_str(&self.key_path(key), v)?)),
            None => Ok(None),
        }
    }

    pub fn require_str(&self, key: &str) -> Result<&'a str, ManifestError> {
        as_str(&self.key_path(key), self.require(key)?)
    }

    /// Accesses the string list at `key`; a lone string is accepted when `lenient` is set.
    pub fn get_strings(
        &self,
        key: &str,
        lenient: bool,
    ) -> Result<Option<Vec<String>>, ManifestError> {
        match self.get(key) {
            Some(Value::String(s)) if lenient == true => Ok(Some(vec![s.clone()])),
            Some(v) => Ok(Some(as_strings(&self.key_path(key), v)?)),
            None => Ok(None),
        }
    }

    pub fn get_table(&self, key: &str) -> Result<Option<Section<'a>>, ManifestError> {
        match self.get(key) {
            Some(v) => Ok(Some(self.child(key, v)?)),
            None => Ok(None),
        }
    }

    pub fn require_table(&self, key: &str) -> Result<Section<'a>, ManifestError> {
        self.child(key, self.require(key)?)
    }

    /// Enters the entry `key` of this section, which must hold a table.
    pub fn child(&self, key: &str, value: &'a Value) -> Result<Section<'a>, ManifestError> {
        match value {
            Value::Table(t) => Ok(Section {
                path: self.key_path(key),
                table: t,
            }),
            _ => Err(ManifestError::WrongType(self.key_path(key), "a table")),
        }
    }
}

pub fn as_str<'a>(path: &str, value: &'a Value) -> Result<&'a str, ManifestError> {
    match value {
        Value::String(s) => Ok(s.as_str()),
        _ => Err(ManifestError::WrongType(path.to_string(), "a string")),
    }
}

pub fn as_bool(path: &str, value: &Value) -> Result<bool, ManifestError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        _ => Err(ManifestError::WrongType(path.to_string(), "a boolean")),
    }
}

pub fn as_strings(path: &str, value: &Value) -> Result<Vec<String>, ManifestError> {
    let err = || ManifestError::WrongType(path.to_string(), "an array of strings");
    match value {
        Value::Array(arr) => arr
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                _ => Err(err()),
            })
            .collect(),
        _ => Err(err()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EX1: &str = r#"
[package]
name = "demo"
license = "MIT"

[filesets]
rtl = ["a.sv"]
"#;

    #[test]
    fn paths() {
        let table: Table = toml::from_str(EX1).unwrap();
        let root = Section::root(&table);
        assert_eq!(root.key_path("package"), "package");

        let pkg = root.require_table("package").unwrap();
        assert_eq!(pkg.path(), "package");
        assert_eq!(pkg.require_str("name").unwrap(), "demo");
        assert_eq!(
            pkg.require("version"),
            Err(ManifestError::MissingKey(String::from("package.version")))
        );
        assert_eq!(
            pkg.allow(&["name", "version", "authors"]),
            Err(ManifestError::UnknownKey(String::from("package.license")))
        );

        let filesets = root.require_table("filesets").unwrap();
        assert_eq!(
            filesets.require_table("rtl").unwrap_err(),
            ManifestError::WrongType(String::from("filesets.rtl"), "a table")
        );
        assert_eq!(filesets.get_strings("rtl", false).unwrap(), Some(vec![String::from("a.sv")]));
        assert_eq!(pkg.get_strings("name", true).unwrap(), Some(vec![String::from("demo")]));
        assert_eq!(pkg.get_strings("name", false).is_err(), true);
    }
}
