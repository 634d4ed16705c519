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

use super::manifest::{FilesetRef, Package, Target};
use super::resolver::ResolvedGraph;
use crate::error::LastError;
use glob::{MatchOptions, Pattern};
use serde_derive::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CompositionError {
    #[error("target {0} includes unknown fileset {1:?}")]
    UnknownFileset(String, String),
    #[error("file {0:?} listed in fileset {1:?} of package {2:?} does not exist")]
    MissingFile(PathBuf, String, String),
    #[error("pattern {0:?} in fileset {1:?} of package {2:?} matches no files")]
    NoMatch(String, String, String),
    #[error("pattern {0:?} in fileset {1:?} is invalid: {2}")]
    BadPattern(String, String, LastError),
    #[error("file {0:?} has an unsupported type; expected one of .v, .vh, .sv, .svh, .vhd, .vhdl")]
    UnsupportedFileType(PathBuf),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Verilog,
    SystemVerilog,
    Vhdl,
}

impl Language {
    /// Detects the language of `file` from its extension, ignoring case.
    pub fn detect(file: &Path) -> Option<Self> {
        let ext = file.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "v" | "vh" => Some(Self::Verilog),
            "sv" | "svh" => Some(Self::SystemVerilog),
            "vhd" | "vhdl" => Some(Self::Vhdl),
            _ => None,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Verilog => "Verilog",
                Self::SystemVerilog => "SystemVerilog",
                Self::Vhdl => "VHDL",
            }
        )
    }
}

/// A source file in compile order.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct FileEntry {
    path: PathBuf,
    language: Language,
    package: String,
}

impl FileEntry {
    pub fn get_path(&self) -> &PathBuf {
        &self.path
    }

    pub fn get_language(&self) -> Language {
        self.language
    }

    /// Names the package that declares the fileset holding this file.
    pub fn get_package(&self) -> &str {
        &self.package
    }
}

fn is_pattern(file: &str) -> bool {
    file.contains(|c| c == '*' || c == '?' || c == '[')
}

/// Lists the files of fileset `fset` in package `pkg` as canonical paths in
/// declared order, expanding patterns in sorted order.
fn expand(pkg: &Package, fset: &str, files: &[String]) -> Result<Vec<PathBuf>, CompositionError> {
    let root = pkg.get_root();
    let mut paths = Vec::new();
    for file in files {
        if is_pattern(file) == true {
            let pattern = format!(
                "{}/{}",
                Pattern::escape(&root.to_string_lossy()),
                file
            );
            let opts = MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: true,
            };
            let mut matches: Vec<PathBuf> = glob::glob_with(&pattern, opts)
                .map_err(|e| {
                    CompositionError::BadPattern(
                        file.clone(),
                        fset.to_string(),
                        LastError(e.to_string()),
                    )
                })?
                .filter_map(|p| p.ok())
                .filter(|p| p.is_file())
                .collect();
            if matches.is_empty() == true {
                return Err(CompositionError::NoMatch(
                    file.clone(),
                    fset.to_string(),
                    pkg.get_name().to_string(),
                ));
            }
            matches.sort();
            for m in matches {
                paths.push(fs::canonicalize(&m).unwrap_or(m));
            }
        } else {
            let path = root.join(file);
            match fs::canonicalize(&path) {
                Ok(p) if p.is_file() => paths.push(p),
                _ => {
                    return Err(CompositionError::MissingFile(
                        path,
                        fset.to_string(),
                        pkg.get_name().to_string(),
                    ))
                }
            }
        }
    }
    Ok(paths)
}

/// Collects the files of every fileset `target` names, in the order the
/// target lists them.
///
/// `target` belongs to the root package of `graph`. Filesets of dependencies
/// are only included when the target names them as `<dependency>::<fileset>`.
/// A file reached more than once keeps its first position.
pub fn compose(graph: &ResolvedGraph, target: &Target) -> Result<Vec<FileEntry>, CompositionError> {
    let root = graph.root().get_package();
    let mut entries: Vec<FileEntry> = Vec::new();

    for fref in target.get_filesets() {
        let unknown =
            || CompositionError::UnknownFileset(target.get_kind().to_string(), fref.to_string());
        let (pkg, name) = match fref {
            FilesetRef::Local(name) => (root, name),
            FilesetRef::Foreign { package, fileset } => {
                let dep = graph.get(package).ok_or_else(unknown)?;
                (dep.get_package(), fileset)
            }
        };
        let fset = pkg.get_fileset(name).ok_or_else(unknown)?;

        for path in expand(pkg, name, fset.get_files())? {
            if entries.iter().any(|e| e.path == path) == true {
                log::debug!("skipping duplicate file {:?}", path);
                continue;
            }
            let language = match Language::detect(&path) {
                Some(l) => l,
                None => return Err(CompositionError::UnsupportedFileType(path)),
            };
            entries.push(FileEntry {
                path: path,
                language: language,
                package: pkg.get_name().to_string(),
            });
        }
    }
    Ok(entries)
}
