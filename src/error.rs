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

use crate::core::fileset::CompositionError;
use crate::core::manifest::ManifestError;
use crate::core::plan::PlanError;
use crate::core::resolver::ResolutionError;
use crate::core::source::FetchError;
use colored::Colorize;
use std::{fmt::Display, path::PathBuf};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),
    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("manifest file name {0:?} must not contain a path separator{1}")]
    ManifestNameIsPath(String, Hint),
    #[error("root directory {0:?} is not accessible: {1}")]
    RootNotFound(PathBuf, LastError),
    #[error("no {0} found in directory {1:?}{2}")]
    ManifestNotFound(String, PathBuf, Hint),
    #[error("failed to write build plan to {0:?}: {1}")]
    PlanNotWritten(PathBuf, LastError),
    #[error("package name {0:?} must be a non-empty directory name")]
    InvalidPackageName(String),
    #[error("cannot create package: path {0:?} already exists")]
    PackageExists(PathBuf),
    #[error("failed to create package at {0:?}: {1}")]
    PackageNotCreated(PathBuf, LastError),
    #[error("failed to remove {0:?}: {1}")]
    BuildNotRemoved(PathBuf, LastError),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain punctuation if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s.to_string()
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    ToolFlag,
    RootFlag,
    ConfigIsFileName,
    TargetsTable,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::ToolFlag => "set `default_tool` for the target or pass the \"--tool\" option",
            Self::RootFlag => "use the \"--root\" option to select the directory holding the manifest",
            Self::ConfigIsFileName => {
                "the \"--config\" option names a file inside the root; use \"--root\" to change directories"
            }
            Self::TargetsTable => "declare the target as `[targets.<name>]` in the root manifest",
        };
        write!(
            f,
            "\n\n{}: {}",
            "hint".green(),
            Error::lowerize(message.to_string())
        )
    }
}
