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

use super::manifest::{Package, DEFAULT_MANIFEST};
use crate::error::{Error, Hint, LastError};
use crate::util::environment;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Directory under the root that holds everything enzi writes.
const BUILD_DIR: &str = "build";

/// The runtime settings shared by every command.
#[derive(Debug, PartialEq)]
pub struct Context {
    root: PathBuf,
    manifest: String,
    git: Option<String>,
}

impl Context {
    pub fn new() -> Context {
        Context {
            root: PathBuf::from("."),
            manifest: String::from(DEFAULT_MANIFEST),
            git: None,
        }
    }

    /// Sets the root directory of the working package. By default this is the
    /// current working directory.
    pub fn root(mut self, dir: Option<PathBuf>) -> Result<Context, Error> {
        let dir = match dir {
            Some(d) => d,
            None => env::current_dir()
                .map_err(|e| Error::RootNotFound(PathBuf::from("."), LastError(e.to_string())))?,
        };
        self.root = fs::canonicalize(&dir)
            .map_err(|e| Error::RootNotFound(dir.clone(), LastError(e.to_string())))?;
        Ok(self)
    }

    /// Sets the file name of the root manifest. By default this is `Enzi.toml`.
    ///
    /// Only the root package reads this name; dependencies always use the default.
    pub fn manifest(mut self, name: Option<String>) -> Result<Context, Error> {
        if let Some(name) = name {
            if name.contains(|c| c == '/' || c == '\\') || name.trim().is_empty() {
                return Err(Error::ManifestNameIsPath(name, Hint::ConfigIsFileName));
            }
            self.manifest = name;
        }
        Ok(self)
    }

    /// Sets the git executable from the environment variable `key`.
    pub fn git(mut self, key: &str) -> Context {
        self.git = environment::get(key);
        self
    }

    pub fn get_root(&self) -> &PathBuf {
        &self.root
    }

    pub fn get_manifest_name(&self) -> &str {
        &self.manifest
    }

    pub fn get_git(&self) -> Option<&String> {
        self.git.as_ref()
    }

    pub fn get_build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    /// Access the directory of bare repositories for url dependencies.
    pub fn get_database_dir(&self) -> PathBuf {
        self.get_build_dir().join("database")
    }

    /// Access the directory of checked out url dependencies.
    pub fn get_checkouts_dir(&self) -> PathBuf {
        self.get_build_dir().join("deps")
    }

    /// Returns the path of the root manifest, which must exist.
    pub fn manifest_path(&self) -> Result<PathBuf, Error> {
        let path = self.root.join(&self.manifest);
        match path.is_file() {
            true => Ok(path),
            false => Err(Error::ManifestNotFound(
                self.manifest.clone(),
                self.root.clone(),
                Hint::RootFlag,
            )),
        }
    }

    /// Reads the manifest of the working package.
    pub fn load_root(&self) -> Result<Package, Error> {
        Ok(Package::load(&self.manifest_path()?)?)
    }
}
