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

//! Turns a dependency descriptor into a local directory holding the
//! dependency's manifest, pinned to a concrete version or commit.

use super::extgit::ExtGit;
use super::manifest::{Dependency, Package, Pin, Source, DEFAULT_MANIFEST};
use super::resolver::ResolutionError;
use super::version::Version;
use crate::error::{Error, LastError};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("dependency {0:?} points to missing directory {1:?}")]
    MissingPath(String, PathBuf),
    #[error("dependency {0:?} has no {1} in {2:?}")]
    MissingManifest(String, &'static str, PathBuf),
    #[error("failed to fetch dependency {0:?} from {1}: {2}")]
    Remote(String, String, LastError),
    #[error("failed to check out dependency {0:?} at commit {1}: {2}")]
    Checkout(String, String, LastError),
}

/// A commit available from a dependency's repository.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Revision {
    commit: String,
    version: Option<Version>,
    names: Vec<String>,
}

impl Revision {
    pub fn new(commit: &str) -> Self {
        Self {
            commit: commit.to_ascii_lowercase(),
            version: None,
            names: Vec::new(),
        }
    }

    /// Attaches a tag name, taking on its version when the tag reads as one.
    pub fn tag(mut self, name: &str) -> Self {
        if let Some(v) = Version::from_tag(name) {
            if self.version.as_ref().map_or(true, |cur| &v > cur) {
                self.version = Some(v);
            }
        }
        self.names.push(name.to_string());
        self
    }

    /// Attaches a branch name.
    pub fn branch(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn get_commit(&self) -> &str {
        &self.commit
    }

    pub fn get_version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn get_names(&self) -> &Vec<String> {
        &self.names
    }
}

/// The concrete identity a dependency was pinned to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Resolved {
    /// A package found on the filesystem, identified by its declared version.
    Version(Version),
    /// A package checked out from version control.
    Commit { id: String, version: Option<Version> },
}

impl Display for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Version(v) => write!(f, "{}", v),
            Self::Commit { id, version } => {
                let short = short_id(id);
                match version {
                    Some(v) => write!(f, "{} ({})", v, short),
                    None => write!(f, "commit {}", short),
                }
            }
        }
    }
}

/// Abbreviates a commit id to at most 12 characters.
fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

/// Access to the version control system that hosts url dependencies.
pub trait Remote: Send + Sync {
    /// Lists the revisions available for the dependency `name` hosted at `url`.
    fn revisions(&self, name: &str, url: &str) -> Result<Vec<Revision>, FetchError>;

    /// Produces a directory holding the sources of `rev`.
    ///
    /// The directory must be complete once returned; a failed checkout leaves nothing behind.
    fn checkout(&self, name: &str, url: &str, rev: &Revision) -> Result<PathBuf, FetchError>;
}

/// A dependency's loaded package along with what it was pinned to.
#[derive(Debug, PartialEq, Clone)]
pub struct Located {
    package: Package,
    resolved: Resolved,
    accepts: Vec<String>,
}

impl Located {
    pub fn get_package(&self) -> &Package {
        &self.package
    }

    pub fn get_root(&self) -> &PathBuf {
        self.package.get_root()
    }

    pub fn get_resolved(&self) -> &Resolved {
        &self.resolved
    }

    /// Checks if an already pinned identity `other` also fulfills the request
    /// that produced `self`.
    pub fn accepts(&self, other: &Resolved) -> bool {
        if &self.resolved == other {
            return true;
        }
        match other {
            Resolved::Commit { id, .. } => self.accepts.contains(id),
            Resolved::Version(_) => false,
        }
    }

    pub fn into_package(self) -> (Package, Resolved) {
        (self.package, self.resolved)
    }
}

pub struct Locator {
    remote: Box<dyn Remote>,
}

impl Locator {
    pub fn new(remote: impl Remote + 'static) -> Self {
        Self {
            remote: Box::new(remote),
        }
    }

    /// Lists the revisions of a url dependency ahead of [Locator::locate].
    ///
    /// Nothing is chosen or checked out, so siblings may be prefetched in any order.
    pub fn prefetch(&self, dep: &Dependency) -> Result<(), Error> {
        match dep.get_source() {
            Source::Url(url) => {
                self.remote.revisions(dep.get_name(), url)?;
                Ok(())
            }
            Source::Path(_) => Ok(()),
        }
    }

    /// Finds the sources of `dep` as requested by the package `requester`.
    ///
    /// `pinned` is the identity already chosen for a package of the same name, which is
    /// preferred over any other candidate that satisfies the request.
    pub fn locate(
        &self,
        dep: &Dependency,
        requester: &Package,
        pinned: Option<&Resolved>,
    ) -> Result<Located, Error> {
        match dep.get_source() {
            Source::Path(p) => self.locate_path(dep, &requester.get_root().join(p), requester),
            Source::Url(url) => self.locate_url(dep, url, requester, pinned),
        }
    }

    fn load(name: &str, root: &Path) -> Result<Package, Error> {
        let manifest = root.join(DEFAULT_MANIFEST);
        if manifest.is_file() == false {
            return Err(FetchError::MissingManifest(
                name.to_string(),
                DEFAULT_MANIFEST,
                root.to_path_buf(),
            ))?;
        }
        Ok(Package::load(&manifest)?)
    }

    fn unsatisfied(dep: &Dependency, requester: &Package) -> Error {
        ResolutionError::Unsatisfied {
            name: dep.get_name().to_string(),
            pin: dep.get_pin().to_string(),
            requester: requester.get_name().to_string(),
        }
        .into()
    }

    fn locate_path(
        &self,
        dep: &Dependency,
        root: &Path,
        requester: &Package,
    ) -> Result<Located, Error> {
        if root.is_dir() == false {
            return Err(FetchError::MissingPath(dep.get_name().to_string(), root.to_path_buf()))?;
        }
        let package = Self::load(dep.get_name(), root)?;
        match dep.get_pin() {
            Pin::Version(req) => {
                if req.matches(package.get_version()) == false {
                    return Err(Self::unsatisfied(dep, requester));
                }
            }
            Pin::Commit(c) => log::warn!(
                "ignoring commit {:?} for path dependency {:?}",
                c,
                dep.get_name()
            ),
        }
        let resolved = Resolved::Version(package.get_version().clone());
        Ok(Located {
            package: package,
            resolved: resolved,
            accepts: Vec::new(),
        })
    }

    fn locate_url(
        &self,
        dep: &Dependency,
        url: &str,
        requester: &Package,
        pinned: Option<&Resolved>,
    ) -> Result<Located, Error> {
        let name = dep.get_name();
        let revisions = self.remote.revisions(name, url)?;

        let (chosen, accepts) = match dep.get_pin() {
            Pin::Version(req) => {
                let satisfying: Vec<&Revision> = revisions
                    .iter()
                    .filter(|r| r.get_version().map_or(false, |v| req.matches(v)))
                    .collect();
                let kept = match pinned {
                    Some(Resolved::Commit { id, .. }) => {
                        satisfying.iter().find(|r| r.get_commit() == id).copied()
                    }
                    _ => None,
                };
                let chosen = match kept {
                    Some(r) => r,
                    None => satisfying
                        .iter()
                        .copied()
                        .max_by(|a, b| a.get_version().cmp(&b.get_version()))
                        .ok_or_else(|| Self::unsatisfied(dep, requester))?,
                };
                let accepts = satisfying.iter().map(|r| r.commit.clone()).collect();
                (chosen, accepts)
            }
            Pin::Commit(c) => {
                let chosen = match revisions.iter().find(|r| r.get_names().contains(c)) {
                    Some(r) => r,
                    None => {
                        let prefix = c.to_ascii_lowercase();
                        let candidates: Vec<&Revision> = revisions
                            .iter()
                            .filter(|r| r.get_commit().starts_with(&prefix))
                            .collect();
                        match candidates.len() {
                            0 => return Err(Self::unsatisfied(dep, requester)),
                            1 => candidates[0],
                            _ => {
                                return Err(ResolutionError::AmbiguousCommit {
                                    name: name.to_string(),
                                    commit: c.clone(),
                                    candidates: candidates
                                        .iter()
                                        .map(|r| r.get_commit().to_string())
                                        .collect::<Vec<String>>()
                                        .join(", "),
                                })?
                            }
                        }
                    }
                };
                (chosen, vec![chosen.commit.clone()])
            }
        };

        let root = self.remote.checkout(name, url, chosen)?;
        let package = Self::load(name, &root)?;
        if let Some(v) = chosen.get_version() {
            if v != package.get_version() {
                log::warn!(
                    "dependency {:?} is tagged {} but its manifest declares version {}",
                    name,
                    v,
                    package.get_version()
                );
            }
        }
        Ok(Located {
            package: package,
            resolved: Resolved::Commit {
                id: chosen.commit.clone(),
                version: chosen.get_version().cloned(),
            },
            accepts: accepts,
        })
    }
}

/// Fetches url dependencies by running `git`.
///
/// Every repository url keeps a bare clone under the database directory, and each
/// checked out commit lives in its own directory under the checkouts directory.
pub struct GitRemote {
    git: ExtGit,
    database: PathBuf,
    checkouts: PathBuf,
    cache: Mutex<HashMap<String, Vec<Revision>>>,
}

impl GitRemote {
    pub fn new(database: PathBuf, checkouts: PathBuf) -> Self {
        Self {
            git: ExtGit::new(),
            database: database,
            checkouts: checkouts,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the git executable, defaulting to `git` on the path.
    pub fn git(mut self, command: Option<String>) -> Self {
        self.git = self.git.command(command);
        self
    }

    /// Builds the list of revisions from the output of `git for-each-ref` and
    /// `git rev-list --all`, keeping the newest commits first.
    fn parse_revisions(refs: &str, commits: &str) -> Vec<Revision> {
        let mut revisions: Vec<Revision> = commits
            .lines()
            .map(|l| l.trim())
            .filter(|l| l.is_empty() == false)
            .map(|l| Revision::new(l))
            .collect();
        for line in refs.lines() {
            let words: Vec<&str> = line.split_whitespace().collect();
            let (commit, refname) = match words.as_slice() {
                [_, peeled, refname] => (*peeled, *refname),
                [object, refname] => (*object, *refname),
                _ => continue,
            };
            let commit = commit.to_ascii_lowercase();
            let slot = match revisions.iter_mut().find(|r| r.commit == commit) {
                Some(r) => r,
                None => continue,
            };
            if let Some(tag) = refname.strip_prefix("refs/tags/") {
                *slot = slot.clone().tag(tag);
            } else if let Some(branch) = refname.strip_prefix("refs/heads/") {
                *slot = slot.clone().branch(branch);
            }
        }
        revisions
    }

    /// Encodes `url` into a directory name. Distinct urls never share a name.
    fn url_key(url: &str) -> String {
        url.bytes()
            .map(|b| match b.is_ascii_alphanumeric() || b == b'.' || b == b'-' {
                true => (b as char).to_string(),
                false => format!("_{:02x}", b),
            })
            .collect()
    }

    fn database_dir(&self, name: &str, url: &str) -> PathBuf {
        self.database.join(format!("{}-{}", name, Self::url_key(url)))
    }
}

impl Remote for GitRemote {
    fn revisions(&self, name: &str, url: &str) -> Result<Vec<Revision>, FetchError> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(revs) = cache.get(url) {
            return Ok(revs.clone());
        }
        drop(cache);

        let fail = |e: crate::util::anyerror::Fault| {
            FetchError::Remote(name.to_string(), url.to_string(), LastError(e.to_string()))
        };
        let db = self.database_dir(name, url);
        if db.exists() == true {
            log::info!("updating dependency {:?} from {}", name, url);
            self.git.clone().path(db.clone()).fetch().map_err(fail)?;
        } else {
            log::info!("fetching dependency {:?} from {}", name, url);
            fs::create_dir_all(&self.database).map_err(|e| fail(e.into()))?;
            self.git.clone_bare(url, &db).map_err(fail)?;
        }
        let git = self.git.clone().path(db);
        let refs = git.refs().map_err(fail)?;
        let commits = git.rev_list().map_err(fail)?;
        let revs = Self::parse_revisions(&refs, &commits);

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.to_string(), revs.clone());
        Ok(revs)
    }

    fn checkout(&self, name: &str, url: &str, rev: &Revision) -> Result<PathBuf, FetchError> {
        let commit = rev.get_commit();
        let dest = self.checkouts.join(format!("{}-{}", name, short_id(commit)));
        // checkouts are immutable once in place
        if dest.exists() == true {
            return Ok(dest);
        }
        let fail = |e: crate::util::anyerror::Fault| {
            FetchError::Checkout(name.to_string(), commit.to_string(), LastError(e.to_string()))
        };
        fs::create_dir_all(&self.checkouts).map_err(|e| fail(e.into()))?;
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.checkouts)
            .map_err(|e| fail(e.into()))?;
        let work = staging.path().join(name);
        self.git
            .checkout(&self.database_dir(name, url), &work, commit)
            .map_err(fail)?;
        if let Err(e) = fs::rename(&work, &dest) {
            // another invocation may have placed the same commit first
            if dest.exists() == false {
                return Err(fail(e.into()));
            }
        }
        Ok(dest)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// A remote whose repositories are directories prepared on the local filesystem.
    pub struct MemoryRemote {
        repos: HashMap<String, Vec<(Revision, PathBuf)>>,
    }

    impl MemoryRemote {
        pub fn new() -> Self {
            Self {
                repos: HashMap::new(),
            }
        }

        pub fn add(mut self, url: &str, rev: Revision, dir: PathBuf) -> Self {
            self.repos.entry(url.to_string()).or_default().push((rev, dir));
            self
        }
    }

    impl Remote for MemoryRemote {
        fn revisions(&self, name: &str, url: &str) -> Result<Vec<Revision>, FetchError> {
            match self.repos.get(url) {
                Some(revs) => Ok(revs.iter().map(|(r, _)| r.clone()).collect()),
                None => Err(FetchError::Remote(
                    name.to_string(),
                    url.to_string(),
                    LastError(String::from("repository not found")),
                )),
            }
        }

        fn checkout(&self, name: &str, url: &str, rev: &Revision) -> Result<PathBuf, FetchError> {
            self.repos
                .get(url)
                .and_then(|revs| revs.iter().find(|(r, _)| r == rev))
                .map(|(_, dir)| dir.clone())
                .ok_or_else(|| {
                    FetchError::Checkout(
                        name.to_string(),
                        rev.get_commit().to_string(),
                        LastError(String::from("unknown commit")),
                    )
                })
        }
    }
}

#[cfg(test)]
mod test {
    use super::mock::MemoryRemote;
    use super::*;
    use std::str::FromStr;

    const REQUESTER: &str = r#"
enzi_version = "0.3"
[package]
name = "top"
version = "1.0.0"
authors = []
[dependencies]
by_path = { path = "libs/by_path", version = ">=0.2.0" }
by_tag = { url = "https://host/by_tag.git", version = ">=0.1.0, <0.3.0" }
by_commit = { url = "https://host/by_tag.git", commit = "ab" }
by_branch = { url = "https://host/by_tag.git", commit = "main" }
"#;

    fn write_manifest(dir: &Path, name: &str, version: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(DEFAULT_MANIFEST),
            format!(
                "enzi_version = \"0.3\"\n[package]\nname = \"{}\"\nversion = \"{}\"\nauthors = []\n",
                name, version
            ),
        )
        .unwrap();
    }

    fn setup(dir: &Path) -> (Package, Locator) {
        write_manifest(&dir.join("libs/by_path"), "by_path", "0.2.1");
        write_manifest(&dir.join("co/v1"), "by_tag", "0.1.0");
        write_manifest(&dir.join("co/v2"), "by_tag", "0.2.0");
        write_manifest(&dir.join("co/v3"), "by_tag", "0.3.0");
        let remote = MemoryRemote::new()
            .add(
                "https://host/by_tag.git",
                Revision::new("ab12").tag("v0.1.0"),
                dir.join("co/v1"),
            )
            .add(
                "https://host/by_tag.git",
                Revision::new("cd34").tag("v0.2.0"),
                dir.join("co/v2"),
            )
            .add(
                "https://host/by_tag.git",
                Revision::new("ab56").tag("0.3.0").branch("main"),
                dir.join("co/v3"),
            );
        let top = Package::parse(REQUESTER, dir.to_path_buf()).unwrap();
        (top, Locator::new(remote))
    }

    fn dep<'a>(pkg: &'a Package, name: &str) -> &'a Dependency {
        pkg.get_dependencies().iter().find(|d| d.get_name() == name).unwrap()
    }

    #[test]
    fn locate_path() {
        let dir = tempfile::tempdir().unwrap();
        let (top, locator) = setup(dir.path());
        let found = locator.locate(dep(&top, "by_path"), &top, None).unwrap();
        assert_eq!(found.get_package().get_name(), "by_path");
        assert_eq!(
            found.get_resolved(),
            &Resolved::Version(Version::from_str("0.2.1").unwrap())
        );
    }

    #[test]
    fn locate_highest_tag() {
        let dir = tempfile::tempdir().unwrap();
        let (top, locator) = setup(dir.path());
        let found = locator.locate(dep(&top, "by_tag"), &top, None).unwrap();
        assert_eq!(
            found.get_resolved(),
            &Resolved::Commit {
                id: String::from("cd34"),
                version: Some(Version::from_str("0.2.0").unwrap())
            }
        );
        // an earlier pin that still satisfies the request is kept
        let pinned = Resolved::Commit {
            id: String::from("ab12"),
            version: Some(Version::from_str("0.1.0").unwrap()),
        };
        assert_eq!(found.accepts(&pinned), true);
        let found = locator.locate(dep(&top, "by_tag"), &top, Some(&pinned)).unwrap();
        assert_eq!(found.get_resolved(), &pinned);
    }

    #[test]
    fn locate_commit() {
        let dir = tempfile::tempdir().unwrap();
        let (top, locator) = setup(dir.path());
        // "ab" is a prefix of two commits
        match locator.locate(dep(&top, "by_commit"), &top, None) {
            Err(Error::Resolution(ResolutionError::AmbiguousCommit { candidates, .. })) => {
                assert_eq!(candidates, "ab12, ab56")
            }
            _ => panic!("expected an ambiguous commit"),
        }
        let found = locator.locate(dep(&top, "by_branch"), &top, None).unwrap();
        assert_eq!(found.get_package().get_version().to_string(), "0.3.0");
    }

    #[test]
    fn locate_failures() {
        let dir = tempfile::tempdir().unwrap();
        let (top, locator) = setup(dir.path());
        let text = REQUESTER.replace(">=0.2.0\"", ">=0.3.0\"");
        let strict = Package::parse(&text, dir.path().to_path_buf()).unwrap();
        assert_eq!(
            locator.locate(dep(&strict, "by_path"), &strict, None),
            Err(Error::Resolution(ResolutionError::Unsatisfied {
                name: String::from("by_path"),
                pin: String::from(">= 0.3.0"),
                requester: String::from("top"),
            }))
        );

        fs::remove_file(dir.path().join("libs/by_path").join(DEFAULT_MANIFEST)).unwrap();
        assert_eq!(
            locator.locate(dep(&top, "by_path"), &top, None),
            Err(Error::Fetch(FetchError::MissingManifest(
                String::from("by_path"),
                DEFAULT_MANIFEST,
                dir.path().join("libs/by_path")
            )))
        );
    }

    #[test]
    fn parse_git_output() {
        let commits = "aaa111\nbbb222\nccc333\n";
        let refs = "\
bbb222 refs/heads/main
ddd444 aaa111 refs/tags/v1.1.0
ccc333 refs/tags/v1.0.0
ccc333 refs/tags/nightly
eee555 refs/remotes/origin/HEAD
";
        let revs = GitRemote::parse_revisions(refs, commits);
        assert_eq!(revs.len(), 3);
        assert_eq!(revs[0].get_version(), Some(&Version::from_str("1.1.0").unwrap()));
        assert_eq!(revs[1].get_names(), &vec![String::from("main")]);
        assert_eq!(revs[1].get_version(), None);
        assert_eq!(
            revs[2].get_names(),
            &vec![String::from("v1.0.0"), String::from("nightly")]
        );
        assert_eq!(revs[2].get_version(), Some(&Version::from_str("1.0.0").unwrap()));
    }

    #[test]
    fn short_commit_display() {
        let r = Resolved::Commit {
            id: String::from("0123456789abcdef"),
            version: None,
        };
        assert_eq!(r.to_string(), "commit 0123456789ab");
        // ids are not assumed to be ascii
        let r = Resolved::Commit {
            id: String::from("ééééééééééééé"),
            version: Some(Version::from_str("1.0.0").unwrap()),
        };
        assert_eq!(r.to_string(), "1.0.0 (éééééééééééé)");
    }

    #[test]
    fn url_keys_are_distinct() {
        assert_eq!(
            GitRemote::url_key("https://host/x.git"),
            "https_3a_2f_2fhost_2fx.git"
        );
        assert_ne!(
            GitRemote::url_key("https://host/a_b.git"),
            GitRemote::url_key("https://host/a/b.git")
        );
    }

    /// Runs git in `dir` with a throwaway identity.
    fn git(dir: &Path, args: &[&str]) {
        let out = std::process::Command::new("git")
            .args(["-c", "user.name=enzi", "-c", "user.email=enzi@localhost"])
            .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert_eq!(
            out.status.success(),
            true,
            "{}",
            String::from_utf8_lossy(&out.stderr)
        );
    }

    fn commit_release(repo: &Path, version: &str) {
        write_manifest(repo, "x", version);
        git(repo, &["add", "."]);
        git(repo, &["commit", "--quiet", "-m", version]);
        git(repo, &["tag", &format!("v{}", version)]);
    }

    fn versions(revs: &Vec<Revision>) -> Vec<String> {
        revs.iter()
            .filter_map(|r| r.get_version())
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn git_remote_keeps_forks_apart() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        let upstream = d.join("upstream");
        fs::create_dir_all(&upstream).unwrap();
        git(&upstream, &["init", "--quiet"]);
        commit_release(&upstream, "1.0.0");
        git(d, &["clone", "--quiet", "upstream", "fork"]);
        let fork = d.join("fork");
        commit_release(&fork, "2.0.0");

        let upstream = upstream.to_string_lossy().to_string();
        let fork = fork.to_string_lossy().to_string();
        let remote = GitRemote::new(d.join("build/database"), d.join("build/deps"));
        assert_eq!(versions(&remote.revisions("x", &upstream).unwrap()), vec!["1.0.0"]);
        assert_eq!(
            versions(&remote.revisions("x", &fork).unwrap()),
            vec!["2.0.0", "1.0.0"]
        );
        assert_eq!(fs::read_dir(d.join("build/database")).unwrap().count(), 2);
    }

    #[test]
    fn git_remote_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        let repo = d.join("repo");
        fs::create_dir_all(&repo).unwrap();
        git(&repo, &["init", "--quiet"]);
        commit_release(&repo, "1.0.0");
        let url = repo.to_string_lossy().to_string();

        let deps = d.join("build/deps");
        let remote = GitRemote::new(d.join("build/database"), deps.clone());
        let revs = remote.revisions("x", &url).unwrap();
        assert_eq!(revs.len(), 1);
        let dest = remote.checkout("x", &url, &revs[0]).unwrap();
        assert_eq!(
            dest,
            deps.join(format!("x-{}", &revs[0].get_commit()[..12]))
        );
        let pkg = Package::load(&dest.join(DEFAULT_MANIFEST)).unwrap();
        assert_eq!(pkg.get_version().to_string(), "1.0.0");
        // an existing checkout is reused and no staging directory remains
        assert_eq!(remote.checkout("x", &url, &revs[0]).unwrap(), dest);
        assert_eq!(fs::read_dir(&deps).unwrap().count(), 1);

        // a new release is found by fetching into the existing database
        commit_release(&repo, "1.1.0");
        assert_eq!(versions(&remote.revisions("x", &url).unwrap()), vec!["1.0.0"]);
        let fresh = GitRemote::new(d.join("build/database"), deps.clone());
        assert_eq!(
            versions(&fresh.revisions("x", &url).unwrap()),
            vec!["1.1.0", "1.0.0"]
        );
    }
}
