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

use super::helps::init;
use crate::core::context::Context;
use crate::core::extgit::ExtGit;
use crate::core::manifest::DEFAULT_MANIFEST;
use crate::core::template;
use crate::error::{Error, LastError};
use std::fs;
use std::path::{Path, PathBuf};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help};

/// Creates a new package directory under the root.
#[derive(Debug, PartialEq)]
pub struct Init {
    name: String,
}

impl Init {
    pub fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(init::HELP))?;
        Ok(Init {
            name: cli.require(Arg::positional("name"))?,
        })
    }

    pub fn run(self, c: &Context) -> proc::Result {
        let git = ExtGit::new().command(c.get_git().cloned());
        let path = Self::scaffold(c.get_root(), &self.name, &git)?;
        log::info!("created package {:?} at {:?}", self.name, path);
        Ok(())
    }

    /// Creates the directory `<parent>/<name>` holding a `src` directory and a
    /// new manifest, then places it under version control.
    ///
    /// The package is usable without git, so git failures are only reported.
    pub fn scaffold(parent: &Path, name: &str, git: &ExtGit) -> Result<PathBuf, Error> {
        let name = name.trim();
        if name.is_empty() == true
            || name.contains(|c| c == '/' || c == '\\')
            || name == "."
            || name == ".."
        {
            return Err(Error::InvalidPackageName(name.to_string()));
        }
        let path = parent.join(name);
        if path.exists() == true {
            return Err(Error::PackageExists(path));
        }
        let fail =
            |e: std::io::Error| Error::PackageNotCreated(path.clone(), LastError(e.to_string()));
        fs::create_dir_all(path.join("src")).map_err(fail)?;

        let authors: Vec<String> = git.config_get("user.name").into_iter().collect();
        fs::write(path.join(DEFAULT_MANIFEST), template::manifest(name, &authors)).map_err(fail)?;

        let repo = git.clone().path(path.clone());
        if let Err(e) = repo.init().and_then(|_| repo.add(DEFAULT_MANIFEST)) {
            log::warn!("package {:?} is not under version control: {}", name, e);
        }
        Ok(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::manifest::Package;

    #[test]
    fn creates_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = Init::scaffold(dir.path(), "adder", &ExtGit::new()).unwrap();
        assert_eq!(path, dir.path().join("adder"));
        assert_eq!(path.join("src").is_dir(), true);
        assert_eq!(path.join(".git").is_dir(), true);
        let pkg = Package::load(&path.join(DEFAULT_MANIFEST)).unwrap();
        assert_eq!(pkg.get_name(), "adder");
        assert_eq!(pkg.get_version().to_string(), "0.1.0");

        assert_eq!(
            Init::scaffold(dir.path(), "adder", &ExtGit::new()),
            Err(Error::PackageExists(dir.path().join("adder")))
        );
    }

    #[test]
    fn missing_git_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let git = ExtGit::new().command(Some(String::from("enzi-no-such-git")));
        let path = Init::scaffold(dir.path(), "adder", &git).unwrap();
        assert_eq!(path.join(DEFAULT_MANIFEST).is_file(), true);
        assert_eq!(path.join(".git").exists(), false);
    }

    #[test]
    fn rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", " ", "a/b", "..", "a\\b"] {
            assert_eq!(
                matches!(
                    Init::scaffold(dir.path(), name, &ExtGit::new()),
                    Err(Error::InvalidPackageName(_))
                ),
                true
            );
        }
    }
}
