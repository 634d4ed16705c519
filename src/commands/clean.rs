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

use super::helps::clean;
use crate::core::context::Context;
use crate::error::{Error, LastError};
use crate::util::prompt;
use std::fs;
use std::path::Path;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help};

/// Removes every file enzi generated under the root.
#[derive(Debug, PartialEq)]
pub struct Clean {
    yes: bool,
}

impl Clean {
    pub fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(clean::HELP))?;
        Ok(Clean {
            yes: cli.check(Arg::flag("yes").switch('y'))?,
        })
    }

    pub fn run(self, c: &Context) -> proc::Result {
        // only touch directories that belong to a package
        if let Err(e) = c.manifest_path() {
            log::warn!("{}", e);
            log::info!("nothing to do");
            return Ok(());
        }
        let dir = c.get_build_dir();
        if dir.exists() == false {
            log::info!("nothing to do");
            return Ok(());
        }
        if self.yes == false {
            let answer = prompt::prompt(&format!("remove the build directory {:?}", dir))
                .map_err(|e| Error::BuildNotRemoved(dir.clone(), LastError(e.to_string())))?;
            if answer == false {
                log::info!("nothing to do");
                return Ok(());
            }
        }
        Self::remove(&dir)?;
        log::info!("finished cleaning {:?}", dir);
        Ok(())
    }

    /// Deletes `dir` and everything inside it.
    fn remove(dir: &Path) -> Result<(), Error> {
        fs::remove_dir_all(dir)
            .map_err(|e| Error::BuildNotRemoved(dir.to_path_buf(), LastError(e.to_string())))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::manifest::DEFAULT_MANIFEST;

    #[test]
    fn removes_build_directory() {
        let dir = tempfile::tempdir().unwrap();
        let c = Context::new().root(Some(dir.path().to_path_buf())).unwrap();
        fs::write(c.get_root().join(DEFAULT_MANIFEST), "").unwrap();
        fs::create_dir_all(c.get_checkouts_dir().join("x-0123")).unwrap();
        fs::write(c.get_build_dir().join("sim.plan.json"), "{}\n").unwrap();

        Clean { yes: true }.run(&c).unwrap();
        assert_eq!(c.get_build_dir().exists(), false);
        assert_eq!(c.get_root().join(DEFAULT_MANIFEST).exists(), true);
        // running again finds nothing to remove
        Clean { yes: true }.run(&c).unwrap();
    }

    #[test]
    fn keeps_directory_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let c = Context::new().root(Some(dir.path().to_path_buf())).unwrap();
        fs::create_dir_all(c.get_build_dir()).unwrap();
        Clean { yes: true }.run(&c).unwrap();
        assert_eq!(c.get_build_dir().exists(), true);
    }
}
