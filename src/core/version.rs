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

//! A `version` contains numeric values at 3 levels for informing about
//! varying degrees of changes within a package's lifetime, optionally followed
//! by a pre-release label.
//!
//! A `requirement` restricts which versions of a dependency are acceptable.

use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

type VerNum = u32;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum VersionError {
    #[error("empty version")]
    EmptyVersion,
    #[error("missing minor number")]
    MissingMinor,
    #[error("missing patch number")]
    MissingPatch,
    #[error("too many version positions; found {0} expected 3")]
    ExtraLevels(usize),
    #[error("invalid digit in version {0:?}")]
    InvalidDigit(String),
    #[error("invalid pre-release identifier {0:?}")]
    InvalidPreRelease(String),
    #[error("pre-release {0:?} requires major, minor, and patch numbers")]
    PartialPreRelease(String),
    #[error("empty clause in requirement {0:?}")]
    EmptyClause(String),
}

/// An ordered series of dot-separated pre-release identifiers.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct PreRelease(Vec<String>);

impl PreRelease {
    fn is_numeric(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit())
    }
}

impl FromStr for PreRelease {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ids: Vec<String> = s.split('.').map(|f| f.to_string()).collect();
        for id in &ids {
            if id.is_empty() == true
                || id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
                    == false
            {
                return Err(VersionError::InvalidPreRelease(s.to_string()));
            }
        }
        Ok(Self(ids))
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let ord = match (Self::is_numeric(a), Self::is_numeric(b)) {
                // compare by value without parsing to avoid overflow on long digit runs
                (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => a.cmp(b),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for PreRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Splits `s` into its numeric levels and optional pre-release, discarding
/// any build metadata.
fn split_levels(s: &str) -> Result<(Vec<VerNum>, Option<PreRelease>), VersionError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(VersionError::EmptyVersion);
    }
    let s = match s.split_once('+') {
        Some((core, _build)) => core,
        None => s,
    };
    let (core, pre) = match s.split_once('-') {
        Some((core, pre)) => (core, Some(PreRelease::from_str(pre)?)),
        None => (s, None),
    };
    let levels = core
        .split('.')
        .map(|p| match p.parse::<VerNum>() {
            Ok(n) if p.starts_with('+') == false => Ok(n),
            _ => Err(VersionError::InvalidDigit(s.to_string())),
        })
        .collect::<Result<Vec<VerNum>, VersionError>>()?;
    if levels.len() > 3 {
        return Err(VersionError::ExtraLevels(levels.len()));
    }
    if pre.is_some() && levels.len() < 3 {
        return Err(VersionError::PartialPreRelease(s.to_string()));
    }
    Ok((levels, pre))
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Version {
    major: VerNum,
    minor: VerNum,
    patch: VerNum,
    pre: Option<PreRelease>,
}

impl Version {
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Interprets a version control tag such as `v1.2.0` or `1.2.0` as a version.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.strip_prefix('v').unwrap_or(tag);
        Version::from_str(tag).ok()
    }

    fn triple(&self) -> (VerNum, VerNum, VerNum) {
        (self.major, self.minor, self.patch)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple()
            .cmp(&other.triple())
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (levels, pre) = split_levels(s)?;
        match levels.len() {
            1 => Err(VersionError::MissingMinor),
            2 => Err(VersionError::MissingPatch),
            _ => Ok(Version {
                major: levels[0],
                minor: levels[1],
                patch: levels[2],
                pre: pre,
            }),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// A version where the minor and patch levels may be omitted.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PartialVersion {
    major: VerNum,
    minor: Option<VerNum>,
    patch: Option<VerNum>,
    pre: Option<PreRelease>,
}

impl PartialVersion {
    /// Fills in the missing levels with zeros.
    fn lower_bound(&self) -> Version {
        Version {
            major: self.major,
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
        }
    }

    /// Checks if `ver` agrees with every level that is specified.
    fn covers(&self, ver: &Version) -> bool {
        self.major == ver.major
            && self.minor.map_or(true, |m| m == ver.minor)
            && self.patch.map_or(true, |p| p == ver.patch)
    }

    /// Compares `ver` against `self` only up to the precision of `self`.
    fn compare(&self, ver: &Version) -> Ordering {
        match (self.minor, self.patch) {
            (None, _) => ver.major.cmp(&self.major),
            (Some(minor), None) => (ver.major, ver.minor).cmp(&(self.major, minor)),
            (Some(_), Some(_)) => ver.cmp(&self.lower_bound()),
        }
    }
}

impl FromStr for PartialVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (levels, pre) = split_levels(s)?;
        Ok(PartialVersion {
            major: levels[0],
            minor: levels.get(1).copied(),
            patch: levels.get(2).copied(),
            pre: pre,
        })
    }
}

impl Display for PartialVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(m) = self.minor {
            write!(f, ".{}", m)?;
            if let Some(p) = self.patch {
                write!(f, ".{}", p)?;
            }
        }
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Op {
    Exact,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Tilde,
    Caret,
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Exact => "= ",
                Self::Greater => "> ",
                Self::GreaterEq => ">= ",
                Self::Less => "< ",
                Self::LessEq => "<= ",
                Self::Tilde => "~",
                Self::Caret => "^",
            }
        )
    }
}

/// A single comparison within a requirement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Clause {
    op: Op,
    version: PartialVersion,
}

impl Clause {
    fn matches(&self, ver: &Version) -> bool {
        let pv = &self.version;
        match self.op {
            Op::Exact => match pv.patch {
                Some(_) => ver == &pv.lower_bound(),
                None => pv.covers(ver),
            },
            Op::Greater => pv.compare(ver) == Ordering::Greater,
            Op::GreaterEq => pv.compare(ver) != Ordering::Less,
            Op::Less => pv.compare(ver) == Ordering::Less,
            Op::LessEq => pv.compare(ver) != Ordering::Greater,
            Op::Tilde => match pv.minor {
                None => ver.major == pv.major,
                Some(minor) => {
                    ver.major == pv.major && ver.minor == minor && ver >= &pv.lower_bound()
                }
            },
            Op::Caret => {
                let lower = pv.lower_bound();
                match (pv.major, pv.minor, pv.patch) {
                    (0, None, _) => ver.major == 0,
                    (0, Some(minor), None) => ver.major == 0 && ver.minor == minor,
                    (0, Some(0), Some(patch)) => {
                        ver.major == 0 && ver.minor == 0 && ver.patch == patch && ver >= &lower
                    }
                    (0, Some(minor), Some(_)) => {
                        ver.major == 0 && ver.minor == minor && ver >= &lower
                    }
                    (major, _, _) => ver.major == major && ver >= &lower,
                }
            }
        }
    }

    /// Checks if the clause names a pre-release on the same release as `ver`.
    fn admits_prerelease_of(&self, ver: &Version) -> bool {
        self.version.pre.is_some()
            && (self.version.major, self.version.minor, self.version.patch)
                == (ver.major, Some(ver.minor), Some(ver.patch))
    }
}

impl FromStr for Clause {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (op, rest) = if let Some(r) = s.strip_prefix(">=") {
            (Op::GreaterEq, r)
        } else if let Some(r) = s.strip_prefix("<=") {
            (Op::LessEq, r)
        } else if let Some(r) = s.strip_prefix('>') {
            (Op::Greater, r)
        } else if let Some(r) = s.strip_prefix('<') {
            (Op::Less, r)
        } else if let Some(r) = s.strip_prefix('=') {
            (Op::Exact, r)
        } else if let Some(r) = s.strip_prefix('~') {
            (Op::Tilde, r)
        } else if let Some(r) = s.strip_prefix('^') {
            (Op::Caret, r)
        } else {
            (Op::Caret, s)
        };
        Ok(Self {
            op: op,
            version: PartialVersion::from_str(rest)?,
        })
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

/// A conjunction of clauses a version must satisfy.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Requirement {
    clauses: Vec<Clause>,
}

impl Requirement {
    /// Checks if `ver` satisfies every clause.
    ///
    /// A pre-release is only acceptable when some clause explicitly names a
    /// pre-release of the same major, minor, and patch numbers.
    pub fn matches(&self, ver: &Version) -> bool {
        if ver.is_prerelease() == true
            && self
                .clauses
                .iter()
                .any(|c| c.admits_prerelease_of(ver))
                == false
        {
            return false;
        }
        self.clauses.iter().all(|c| c.matches(ver))
    }
}

impl FromStr for Requirement {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clauses = s
            .split(',')
            .map(|c| match c.trim().is_empty() {
                true => Err(VersionError::EmptyClause(s.to_string())),
                false => Clause::from_str(c),
            })
            .collect::<Result<Vec<Clause>, VersionError>>()?;
        Ok(Self { clauses: clauses })
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", clauses.join(", "))
    }
}
