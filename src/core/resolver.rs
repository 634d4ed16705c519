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

//! Builds the transitive dependency graph of a root package.

use super::manifest::Package;
use super::source::{Locator, Resolved};
use crate::error::Error;
use crate::util::graphmap::GraphMap;
use rayon::prelude::*;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("dependency cycle detected: {0}")]
    Cycle(String),
    #[error("package {name:?} is required at {first} by {first_by:?} but at {second} by {second_by:?}")]
    Conflict {
        name: String,
        first: String,
        first_by: String,
        second: String,
        second_by: String,
    },
    #[error("no revision of dependency {name:?} satisfies {pin} as required by {requester:?}")]
    Unsatisfied {
        name: String,
        pin: String,
        requester: String,
    },
    #[error("commit {commit:?} of dependency {name:?} is ambiguous between {candidates}")]
    AmbiguousCommit {
        name: String,
        commit: String,
        candidates: String,
    },
    #[error("dependency {0:?} of {1:?} is a package named {2:?}")]
    NameMismatch(String, String, String),
}

/// A package in the dependency graph, pinned to a single identity.
#[derive(Debug, PartialEq)]
pub struct ResolvedPackage {
    package: Package,
    resolved: Resolved,
    requested_by: String,
}

impl ResolvedPackage {
    pub fn get_name(&self) -> &str {
        self.package.get_name()
    }

    pub fn get_package(&self) -> &Package {
        &self.package
    }

    pub fn get_resolved(&self) -> &Resolved {
        &self.resolved
    }

    /// Names the package that first brought this one into the graph.
    ///
    /// The root package names itself.
    pub fn get_requested_by(&self) -> &str {
        &self.requested_by
    }
}

/// The set of packages reachable from a root package, with one identity per name.
///
/// Edges point from a dependent to its dependency.
#[derive(Debug)]
pub struct ResolvedGraph {
    graph: GraphMap<String, ResolvedPackage, ()>,
    order: Vec<String>,
}

impl ResolvedGraph {
    /// Accesses the package everything was resolved from.
    pub fn root(&self) -> &ResolvedPackage {
        // the root always finishes last
        match self.order.last().and_then(|n| self.get(n)) {
            Some(p) => p,
            None => unreachable!("a resolved graph always holds its root"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedPackage> {
        self.graph
            .get_node_by_key(&name.to_string())
            .map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Iterates over every package such that each one comes after all of its
    /// dependencies, ending with the root.
    ///
    /// Among packages that do not depend on each other, the order is the
    /// depth-first order of declaration in the manifests.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.order.iter().filter_map(move |n| self.get(n))
    }

    /// Lists the direct dependencies of `name` in declaration order.
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.graph
            .successors(&name.to_string())
            .into_iter()
            .map(|s| s.as_str())
            .collect()
    }

    /// Lists the packages that directly depend on `name`.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.graph
            .predecessors(&name.to_string())
            .into_iter()
            .map(|s| s.as_str())
            .collect()
    }

    pub fn get_graph(&self) -> &GraphMap<String, ResolvedPackage, ()> {
        &self.graph
    }
}

struct Walker<'a> {
    locator: &'a Locator,
    graph: GraphMap<String, ResolvedPackage, ()>,
    order: Vec<String>,
    stack: Vec<String>,
}

impl<'a> Walker<'a> {
    /// Resolves every dependency of the package `name`, which is already in the graph.
    fn visit(&mut self, name: &str) -> Result<(), Error> {
        self.stack.push(name.to_string());
        let requester = match self.graph.get_node_by_key(&name.to_string()) {
            Some(n) => n.as_ref().package.clone(),
            None => unreachable!("a package is inserted before it is visited"),
        };
        let deps = requester.get_dependencies();

        // siblings are independent, so list their revisions all at once
        let fetched: Vec<Result<(), Error>> = {
            let stack = &self.stack;
            let locator = self.locator;
            deps.par_iter()
                .map(|dep| match stack.iter().any(|s| s == dep.get_name()) {
                    true => Ok(()),
                    false => locator.prefetch(dep),
                })
                .collect()
        };

        // choose and check out in declaration order, so a pin set by an earlier
        // sibling's subtree is seen by the later siblings
        for (dep, fetched) in deps.iter().zip(fetched.into_iter()) {
            let dep_name = dep.get_name().to_string();
            if let Some(i) = self.stack.iter().position(|s| s == &dep_name) {
                let mut path: Vec<&str> = self.stack[i..].iter().map(|s| s.as_str()).collect();
                path.push(&dep_name);
                return Err(ResolutionError::Cycle(path.join(" -> ")))?;
            }
            fetched?;
            let pinned = self.graph.get_node_by_key(&dep_name).map(|n| &n.as_ref().resolved);
            let located = self.locator.locate(dep, &requester, pinned)?;
            if located.get_package().get_name() != dep_name {
                return Err(ResolutionError::NameMismatch(
                    dep_name,
                    name.to_string(),
                    located.get_package().get_name().to_string(),
                ))?;
            }

            match self.graph.get_node_by_key(&dep_name).map(|n| n.as_ref()) {
                Some(existing) => {
                    if located.accepts(&existing.resolved) == false {
                        return Err(ResolutionError::Conflict {
                            name: dep_name,
                            first: existing.resolved.to_string(),
                            first_by: existing.requested_by.clone(),
                            second: located.get_resolved().to_string(),
                            second_by: name.to_string(),
                        })?;
                    }
                    if located.get_root() != existing.package.get_root() {
                        log::warn!(
                            "package {:?} {} is found at both {:?} and {:?}; using {:?}",
                            dep_name,
                            existing.resolved,
                            existing.package.get_root(),
                            located.get_root(),
                            existing.package.get_root()
                        );
                    }
                    self.graph.add_edge_by_key(&name.to_string(), &dep_name, ());
                }
                None => {
                    log::debug!("resolved {:?} to {}", dep_name, located.get_resolved());
                    let (package, resolved) = located.into_package();
                    self.graph.add_node(
                        dep_name.clone(),
                        ResolvedPackage {
                            package: package,
                            resolved: resolved,
                            requested_by: name.to_string(),
                        },
                    );
                    self.graph.add_edge_by_key(&name.to_string(), &dep_name, ());
                    self.visit(&dep_name)?;
                }
            }
        }

        self.stack.pop();
        self.order.push(name.to_string());
        Ok(())
    }
}

/// Discovers every package reachable from `root`, pinning each to exactly one
/// identity.
pub fn resolve(root: Package, locator: &Locator) -> Result<ResolvedGraph, Error> {
    let name = root.get_name().to_string();
    let mut walker = Walker {
        locator: locator,
        graph: GraphMap::new(),
        order: Vec::new(),
        stack: Vec::new(),
    };
    let resolved = Resolved::Version(root.get_version().clone());
    walker.graph.add_node(
        name.clone(),
        ResolvedPackage {
            package: root,
            resolved: resolved,
            requested_by: name.clone(),
        },
    );
    walker.visit(&name)?;
    log::debug!("resolved {} package(s)", walker.order.len());
    Ok(ResolvedGraph {
        graph: walker.graph,
        order: walker.order,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::manifest::DEFAULT_MANIFEST;
    use crate::core::source::mock::MemoryRemote;
    use crate::core::source::{FetchError, Revision};
    use crate::error::LastError;
    use crate::core::version::Version;
    use std::fs;
    use std::path::Path;
    use std::str::FromStr;

    fn write_package(dir: &Path, name: &str, version: &str, deps: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(DEFAULT_MANIFEST),
            format!(
                "enzi_version = \"0.3\"\n[package]\nname = \"{}\"\nversion = \"{}\"\nauthors = []\n[dependencies]\n{}\n",
                name, version, deps
            ),
        )
        .unwrap();
    }

    fn load(dir: &Path) -> Package {
        Package::load(&dir.join(DEFAULT_MANIFEST)).unwrap()
    }

    fn names(graph: &ResolvedGraph) -> Vec<&str> {
        graph.iter().map(|p| p.get_name()).collect()
    }

    #[test]
    fn no_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), "top", "1.0.0", "");
        let graph = resolve(load(dir.path()), &Locator::new(MemoryRemote::new())).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.root().get_name(), "top");
        assert_eq!(names(&graph), vec!["top"]);
    }

    #[test]
    fn diamond() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "a = { path = \"../a\", version = \"1\" }\nb = { path = \"../b\", version = \"1\" }",
        );
        write_package(&d.join("a"), "a", "1.0.0", "c = { path = \"../c\", version = \">=0.1.0\" }");
        write_package(&d.join("b"), "b", "1.2.0", "c = { path = \"../c\", version = \"0.2\" }");
        write_package(&d.join("c"), "c", "0.2.3", "");

        let graph = resolve(load(&d.join("top")), &Locator::new(MemoryRemote::new())).unwrap();
        assert_eq!(names(&graph), vec!["c", "a", "b", "top"]);
        assert_eq!(graph.dependencies("top"), vec!["a", "b"]);
        assert_eq!(graph.dependents("c"), vec!["a", "b"]);
        assert_eq!(graph.get("c").unwrap().get_requested_by(), "a");
        assert_eq!(
            graph.get("c").unwrap().get_resolved(),
            &Resolved::Version(Version::from_str("0.2.3").unwrap())
        );
        assert_eq!(graph.get_graph().get_graph().topological_sort().is_some(), true);
    }

    #[test]
    fn cycle() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(&d.join("top"), "top", "1.0.0", "a = { path = \"../a\", version = \"1\" }");
        write_package(&d.join("a"), "a", "1.0.0", "top = { path = \"../top\", version = \"1\" }");

        let err = resolve(load(&d.join("top")), &Locator::new(MemoryRemote::new())).unwrap_err();
        assert_eq!(
            err,
            Error::Resolution(ResolutionError::Cycle(String::from("top -> a -> top")))
        );
        assert_eq!(
            err.to_string(),
            "resolution error: dependency cycle detected: top -> a -> top"
        );
    }

    #[test]
    fn conflict() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "a = { path = \"../a\", version = \"1\" }\nb = { path = \"../b\", version = \"1\" }",
        );
        write_package(&d.join("a"), "a", "1.0.0", "c = { path = \"../c1\", version = \"0.5.0\" }");
        write_package(&d.join("b"), "b", "1.0.0", "c = { path = \"../c2\", version = \"0.5.1\" }");
        write_package(&d.join("c1"), "c", "0.5.0", "");
        write_package(&d.join("c2"), "c", "0.5.1", "");

        let err = resolve(load(&d.join("top")), &Locator::new(MemoryRemote::new())).unwrap_err();
        assert_eq!(
            err,
            Error::Resolution(ResolutionError::Conflict {
                name: String::from("c"),
                first: String::from("0.5.0"),
                first_by: String::from("a"),
                second: String::from("0.5.1"),
                second_by: String::from("b"),
            })
        );
    }

    #[test]
    fn duplicate_path_same_version() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "a = { path = \"../a\", version = \"1\" }\nc = { path = \"../c2\", version = \"0.5\" }",
        );
        write_package(&d.join("a"), "a", "1.0.0", "c = { path = \"../c1\", version = \"0.5\" }");
        write_package(&d.join("c1"), "c", "0.5.0", "");
        write_package(&d.join("c2"), "c", "0.5.0", "");

        let graph = resolve(load(&d.join("top")), &Locator::new(MemoryRemote::new())).unwrap();
        assert_eq!(names(&graph), vec!["c", "a", "top"]);
        assert_eq!(
            graph.get("c").unwrap().get_package().get_root(),
            &fs::canonicalize(d.join("c1")).unwrap()
        );
    }

    #[test]
    fn url_keeps_earlier_pin() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "a = { path = \"../a\", version = \"1\" }\nx = { url = \"https://host/x.git\", version = \">=1.0.0\" }",
        );
        write_package(
            &d.join("a"),
            "a",
            "1.0.0",
            "x = { url = \"https://host/x.git\", version = \"=1.0.0\" }",
        );
        write_package(&d.join("x1"), "x", "1.0.0", "");
        write_package(&d.join("x2"), "x", "1.1.0", "");
        let remote = MemoryRemote::new()
            .add("https://host/x.git", Revision::new("c2c2").tag("v1.1.0"), d.join("x2"))
            .add("https://host/x.git", Revision::new("c1c1").tag("v1.0.0"), d.join("x1"));

        let graph = resolve(load(&d.join("top")), &Locator::new(remote)).unwrap();
        assert_eq!(
            graph.get("x").unwrap().get_resolved(),
            &Resolved::Commit {
                id: String::from("c1c1"),
                version: Some(Version::from_str("1.0.0").unwrap())
            }
        );
        assert_eq!(graph.dependents("x"), vec!["a", "top"]);
    }

    #[test]
    fn name_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "lib = { path = \"../lib\", version = \"1\" }",
        );
        write_package(&d.join("lib"), "other", "1.0.0", "");

        let err = resolve(load(&d.join("top")), &Locator::new(MemoryRemote::new())).unwrap_err();
        assert_eq!(
            err,
            Error::Resolution(ResolutionError::NameMismatch(
                String::from("lib"),
                String::from("top"),
                String::from("other")
            ))
        );
    }

    #[test]
    fn unsatisfied_names_requester() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "x = { url = \"https://host/x.git\", version = \"2\" }",
        );
        write_package(&d.join("x1"), "x", "1.0.0", "");
        let remote = MemoryRemote::new().add(
            "https://host/x.git",
            Revision::new("c1c1").tag("v1.0.0"),
            d.join("x1"),
        );
        let err = resolve(load(&d.join("top")), &Locator::new(remote)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "resolution error: no revision of dependency \"x\" satisfies ^2 as required by \"top\""
        );
    }

    #[test]
    fn later_sibling_reuses_subtree_pin() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "a = { path = \"../a\", version = \"1\" }\nx = { url = \"https://host/x.git\", version = \">=1.0.0\" }",
        );
        write_package(
            &d.join("a"),
            "a",
            "1.0.0",
            "x = { url = \"https://host/x.git\", version = \"=1.0.0\" }",
        );
        write_package(&d.join("x1"), "x", "1.0.0", "");
        // the newest release is broken and must never be checked out
        fs::create_dir_all(d.join("x2")).unwrap();
        let remote = MemoryRemote::new()
            .add("https://host/x.git", Revision::new("c1c1").tag("v1.0.0"), d.join("x1"))
            .add("https://host/x.git", Revision::new("c2c2").tag("v1.1.0"), d.join("x2"));

        let graph = resolve(load(&d.join("top")), &Locator::new(remote)).unwrap();
        assert_eq!(names(&graph), vec!["x", "a", "top"]);
        assert_eq!(
            graph.get("x").unwrap().get_resolved(),
            &Resolved::Commit {
                id: String::from("c1c1"),
                version: Some(Version::from_str("1.0.0").unwrap())
            }
        );
    }

    #[test]
    fn first_declared_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write_package(
            &d.join("top"),
            "top",
            "1.0.0",
            "y = { url = \"https://host/y.git\", version = \"1\" }\nx = { url = \"https://host/x.git\", version = \"1\" }",
        );
        let err = resolve(load(&d.join("top")), &Locator::new(MemoryRemote::new())).unwrap_err();
        assert_eq!(
            err,
            Error::Fetch(FetchError::Remote(
                String::from("y"),
                String::from("https://host/y.git"),
                LastError(String::from("repository not found"))
            ))
        );
    }
}
