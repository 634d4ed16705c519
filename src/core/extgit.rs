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

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::util::anyerror::{AnyError, Fault};

/// A series of git commands necessary to run through subprocesses rather than libgit2 bindings.
#[derive(Debug, Clone)]
pub struct ExtGit {
    command: String,
    root: PathBuf,
}

impl ExtGit {
    /// Creates an empty `ExtGit` struct.
    pub fn new() -> Self {
        Self {
            command: String::from("git"),
            root: PathBuf::new(),
        }
    }

    /// Sets the command for calling git through processes.
    ///
    /// By `s` is `None`, the command assumes git is on path and is simply `git`.
    pub fn command(mut self, s: Option<String>) -> Self {
        self.command = s.unwrap_or(String::from("git"));
        self
    }

    /// Sets the directory from where to call `git`.
    pub fn path(mut self, p: PathBuf) -> Self {
        self.root = p;
        self
    }

    /// Runs git with `args` and captures its standard output.
    fn run(&self, args: &[&str]) -> Result<String, Fault> {
        let mut proc = Command::new(&self.command);
        proc.args(args);
        if self.root.as_os_str().is_empty() == false {
            proc.current_dir(&self.root);
        }
        let output = proc.output()?;
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
            Some(num) => Err(AnyError(format!(
                "git {} exited with error code {}: {}",
                args.first().unwrap_or(&""),
                num,
                String::from_utf8_lossy(&output.stderr).trim()
            )))?,
            None => Err(AnyError(format!("git terminated by signal")))?,
        }
    }

    /// Clones the repository at `url` into `dest` without a working tree.
    ///
    /// Runs the command: `git clone --bare --quiet <url> <dest>`.
    pub fn clone_bare(&self, url: &str, dest: &Path) -> Result<(), Fault> {
        let dest = dest.to_string_lossy();
        self.run(&["clone", "--bare", "--quiet", url, &dest])?;
        Ok(())
    }

    /// Updates every branch and tag of the bare repository at `self.root`.
    ///
    /// Runs the command: `git fetch --quiet --tags --force origin +refs/heads/*:refs/heads/*`.
    pub fn fetch(&self) -> Result<(), Fault> {
        self.run(&[
            "fetch",
            "--quiet",
            "--tags",
            "--force",
            "origin",
            "+refs/heads/*:refs/heads/*",
        ])?;
        Ok(())
    }

    /// Lists every reference as `<object> <peeled object> <refname>`, where the peeled
    /// object is empty unless the reference is an annotated tag.
    pub fn refs(&self) -> Result<String, Fault> {
        self.run(&[
            "for-each-ref",
            "--format=%(objectname) %(*objectname) %(refname)",
        ])
    }

    /// Lists every commit reachable from any reference, newest first.
    pub fn rev_list(&self) -> Result<String, Fault> {
        self.run(&["rev-list", "--all"])
    }

    /// Creates an empty repository at `self.root`.
    pub fn init(&self) -> Result<(), Fault> {
        self.run(&["init", "--quiet"])?;
        Ok(())
    }

    /// Stages `file` of the repository at `self.root`.
    pub fn add(&self, file: &str) -> Result<(), Fault> {
        self.run(&["add", "--", file])?;
        Ok(())
    }

    /// Reads the configured value of `key`, which is `None` when it is not set.
    pub fn config_get(&self, key: &str) -> Option<String> {
        match self.run(&["config", "--get", key]) {
            Ok(v) if v.trim().is_empty() == false => Some(v.trim().to_string()),
            _ => None,
        }
    }

    /// Clones the local repository at `src` into `dest` and detaches it at `commit`.
    pub fn checkout(&self, src: &Path, dest: &Path, commit: &str) -> Result<(), Fault> {
        let src = src.to_string_lossy();
        let dest_str = dest.to_string_lossy();
        self.run(&["clone", "--quiet", "--no-checkout", &src, &dest_str])?;
        self.clone()
            .path(dest.to_path_buf())
            .run(&["checkout", "--quiet", "--detach", commit])?;
        Ok(())
    }
}
