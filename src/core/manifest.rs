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

use super::schema::Section;
use super::tool::ToolConfig;
use super::version::{Requirement, Version, VersionError};
use crate::error::LastError;
use serde_derive::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use toml::Table;

/// File name of a package's manifest.
pub const DEFAULT_MANIFEST: &str = "Enzi.toml";

pub const ENZI_VERSIONS: [&str; 3] = ["0.1", "0.2", "0.3"];

const TOP_KEYS: [&str; 6] = [
    "enzi_version",
    "package",
    "dependencies",
    "filesets",
    "targets",
    "tools",
];

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {0:?}: {1}")]
    Unreadable(PathBuf, LastError),
    #[error("{0:?}: {1}")]
    InFile(PathBuf, Box<ManifestError>),
    #[error("invalid toml syntax: {0}")]
    Syntax(LastError),
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("key `{0}` expects {1}")]
    WrongType(String, &'static str),
    #[error("key `{0}` has unsupported version {1:?}; expected one of {2}")]
    UnsupportedEnziVersion(String, String, String),
    #[error("key `{0}` is invalid: {1}")]
    InvalidVersion(String, VersionError),
    #[error("dependency `{0}` is missing keys (path/url) and (commit/version)")]
    EmptyDependency(String),
    #[error("dependency `{0}` has no path or url provided")]
    MissingSource(String),
    #[error("dependency `{0}` cannot specify path and url at the same time")]
    ConflictingSource(String),
    #[error("dependency `{0}` has no commit or version specified")]
    MissingPin(String),
    #[error("dependency `{0}` cannot specify commit and version at the same time")]
    ConflictingPin(String),
    #[error("dependency `{0}` refers to package {1:?} itself")]
    SelfDependency(String, String),
    #[error("fileset `{0}` has no files")]
    EmptyFileset(String),
    #[error("fileset `{0}` contains an empty file path")]
    EmptyFilePath(String),
    #[error("fileset `{0}` contains file {1:?} which is not relative to the package root")]
    AbsoluteFilePath(String, String),
    #[error("fileset `{0}` contains file {1:?} which leaves the package root")]
    EscapingFilePath(String, String),
    #[error("target `{0}` is not one of build, run, sim, program_device")]
    UnknownTarget(String),
    #[error("key `{0}` refers to undeclared fileset {1:?}")]
    UndeclaredFileset(String, String),
    #[error("key `{0}` refers to {1:?} which is not a direct dependency")]
    UndeclaredDependency(String, String),
    #[error("tool `{0}` is not known; expected one of {1}")]
    UnknownTool(String, String),
}

/// The fixed vocabulary of operations a target can describe.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Build,
    Run,
    Sim,
    ProgramDevice,
}

impl TargetKind {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "build" => Some(Self::Build),
            "run" => Some(Self::Run),
            "sim" => Some(Self::Sim),
            "program_device" => Some(Self::ProgramDevice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Run => "run",
            Self::Sim => "sim",
            Self::ProgramDevice => "program_device",
        }
    }
}

impl Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fileset named by a target, either in the same package or in a direct
/// dependency written as `<dependency>::<fileset>`.
#[derive(Debug, PartialEq, Clone)]
pub enum FilesetRef {
    Local(String),
    Foreign { package: String, fileset: String },
}

impl FilesetRef {
    pub fn parse(s: &str) -> Self {
        match s.split_once("::") {
            Some((pkg, fset)) => Self::Foreign {
                package: pkg.to_string(),
                fileset: fset.to_string(),
            },
            None => Self::Local(s.to_string()),
        }
    }
}

impl Display for FilesetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(n) => write!(f, "{}", n),
            Self::Foreign { package, fileset } => write!(f, "{}::{}", package, fileset),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Target {
    kind: TargetKind,
    default_tool: Option<String>,
    toplevel: String,
    filesets: Vec<FilesetRef>,
}

impl Target {
    pub fn get_kind(&self) -> TargetKind {
        self.kind
    }

    pub fn get_default_tool(&self) -> Option<&String> {
        self.default_tool.as_ref()
    }

    pub fn get_toplevel(&self) -> &str {
        &self.toplevel
    }

    pub fn get_filesets(&self) -> &Vec<FilesetRef> {
        &self.filesets
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Fileset {
    name: String,
    files: Vec<String>,
}

impl Fileset {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Lists the file paths in compile order, relative to the package root.
    pub fn get_files(&self) -> &Vec<String> {
        &self.files
    }
}

/// Where a dependency's sources come from.
#[derive(Debug, PartialEq, Clone)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Which revision of a dependency is acceptable.
#[derive(Debug, PartialEq, Clone)]
pub enum Pin {
    Version(Requirement),
    Commit(String),
}

impl Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Version(r) => write!(f, "{}", r),
            Self::Commit(c) => write!(f, "commit {}", c),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Dependency {
    name: String,
    source: Source,
    pin: Pin,
}

impl Dependency {
    fn from_section(name: &str, sec: &Section) -> Result<Self, ManifestError> {
        let path = sec.path().to_string();
        if sec.is_empty() == true {
            return Err(ManifestError::EmptyDependency(path));
        }
        sec.allow(&["path", "url", "version", "commit"])?;

        let source = match (sec.get_str("path")?, sec.get_str("url")?) {
            (Some(p), None) => Source::Path(PathBuf::from(p)),
            (None, Some(u)) => Source::Url(u.to_string()),
            (None, None) => return Err(ManifestError::MissingSource(path)),
            (Some(_), Some(_)) => return Err(ManifestError::ConflictingSource(path)),
        };
        let pin = match (sec.get_str("version")?, sec.get_str("commit")?) {
            (Some(v), None) => Pin::Version(
                Requirement::from_str(v)
                    .map_err(|e| ManifestError::InvalidVersion(sec.key_path("version"), e))?,
            ),
            (None, Some(c)) => Pin::Commit(c.trim().to_string()),
            (None, None) => return Err(ManifestError::MissingPin(path)),
            (Some(_), Some(_)) => return Err(ManifestError::ConflictingPin(path)),
        };
        Ok(Self {
            name: name.to_string(),
            source: source,
            pin: pin,
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_source(&self) -> &Source {
        &self.source
    }

    pub fn get_pin(&self) -> &Pin {
        &self.pin
    }
}

/// Rejects file paths that cannot be joined onto the package root.
fn check_file(section: &str, file: &str) -> Result<(), ManifestError> {
    if file.trim().is_empty() == true {
        return Err(ManifestError::EmptyFilePath(section.to_string()));
    }
    let path = Path::new(file);
    if path.has_root() == true || path.is_absolute() == true {
        return Err(ManifestError::AbsoluteFilePath(section.to_string(), file.to_string()));
    }
    let mut depth: usize = 0;
    for comp in path.components() {
        match comp {
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => {
                    return Err(ManifestError::EscapingFilePath(
                        section.to_string(),
                        file.to_string(),
                    ))
                }
            },
            Component::Normal(_) => depth += 1,
            _ => (),
        }
    }
    Ok(())
}

/// The validated contents of one manifest.
#[derive(Debug, PartialEq, Clone)]
pub struct Package {
    name: String,
    version: Version,
    authors: Vec<String>,
    enzi_version: String,
    root: PathBuf,
    dependencies: Vec<Dependency>,
    filesets: Vec<Fileset>,
    targets: Vec<Target>,
    tools: Vec<ToolConfig>,
}

impl Package {
    /// Reads and validates the manifest file at `path`.
    ///
    /// The package root is the directory holding the manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ManifestError::Unreadable(path.to_path_buf(), LastError(e.to_string())))?;
        let root = match path.parent() {
            Some(p) if p.as_os_str().is_empty() == false => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let root = fs::canonicalize(&root)
            .map_err(|e| ManifestError::Unreadable(root.clone(), LastError(e.to_string())))?;
        Self::parse(&text, root).map_err(|e| ManifestError::InFile(path.to_path_buf(), Box::new(e)))
    }

    /// Validates manifest `text` for a package living at `root`.
    pub fn parse(text: &str, root: PathBuf) -> Result<Self, ManifestError> {
        let table: Table =
            toml::from_str(text).map_err(|e| ManifestError::Syntax(LastError(e.to_string())))?;
        let doc = Section::root(&table);
        doc.allow(&TOP_KEYS)?;

        let enzi_version = doc.require_str("enzi_version")?;
        if ENZI_VERSIONS.contains(&enzi_version) == false {
            return Err(ManifestError::UnsupportedEnziVersion(
                doc.key_path("enzi_version"),
                enzi_version.to_string(),
                ENZI_VERSIONS.join(", "),
            ));
        }

        // package identity
        let pkg = doc.require_table("package")?;
        pkg.allow(&["name", "version", "authors"])?;
        let name = pkg.require_str("name")?.trim();
        if name.is_empty() == true {
            return Err(ManifestError::WrongType(pkg.key_path("name"), "a non-empty string"));
        }
        let version = Version::from_str(pkg.require_str("version")?)
            .map_err(|e| ManifestError::InvalidVersion(pkg.key_path("version"), e))?;
        let authors = pkg
            .get_strings("authors", true)?
            .ok_or_else(|| ManifestError::MissingKey(pkg.key_path("authors")))?;

        let mut dependencies = Vec::new();
        if let Some(sec) = doc.get_table("dependencies")? {
            for (key, value) in sec.entries() {
                let dep = sec.child(key, value)?;
                if key == name {
                    return Err(ManifestError::SelfDependency(dep.path().to_string(), key.clone()));
                }
                dependencies.push(Dependency::from_section(key, &dep)?);
            }
        }

        let mut filesets = Vec::new();
        if let Some(sec) = doc.get_table("filesets")? {
            for (key, value) in sec.entries() {
                let fset = sec.child(key, value)?;
                fset.allow(&["files"])?;
                let files = fset
                    .get_strings("files", false)?
                    .ok_or_else(|| ManifestError::MissingKey(fset.key_path("files")))?;
                if files.is_empty() == true {
                    return Err(ManifestError::EmptyFileset(fset.path().to_string()));
                }
                for file in &files {
                    check_file(fset.path(), file)?;
                }
                filesets.push(Fileset {
                    name: key.clone(),
                    files: files,
                });
            }
        }

        let mut targets = Vec::new();
        if let Some(sec) = doc.get_table("targets")? {
            for (key, value) in sec.entries() {
                let tgt = sec.child(key, value)?;
                let kind = TargetKind::from_name(key)
                    .ok_or_else(|| ManifestError::UnknownTarget(tgt.path().to_string()))?;
                tgt.allow(&["default_tool", "toplevel", "filesets"])?;
                let toplevel = tgt.require_str("toplevel")?.to_string();
                let default_tool = tgt.get_str("default_tool")?.map(|s| s.to_ascii_lowercase());
                let refs = tgt
                    .get_strings("filesets", false)?
                    .ok_or_else(|| ManifestError::MissingKey(tgt.key_path("filesets")))?;
                let refs: Vec<FilesetRef> = refs.iter().map(|r| FilesetRef::parse(r)).collect();
                for r in &refs {
                    match r {
                        FilesetRef::Local(n) => {
                            if filesets.iter().any(|f: &Fileset| &f.name == n) == false {
                                return Err(ManifestError::UndeclaredFileset(
                                    tgt.key_path("filesets"),
                                    n.clone(),
                                ));
                            }
                        }
                        FilesetRef::Foreign { package, .. } => {
                            let declared =
                                dependencies.iter().any(|d: &Dependency| &d.name == package);
                            if declared == false {
                                return Err(ManifestError::UndeclaredDependency(
                                    tgt.key_path("filesets"),
                                    package.clone(),
                                ));
                            }
                        }
                    }
                }
                targets.push(Target {
                    kind: kind,
                    default_tool: default_tool,
                    toplevel: toplevel,
                    filesets: refs,
                });
            }
        }

        let mut tools = Vec::new();
        if let Some(sec) = doc.get_table("tools")? {
            for (key, value) in sec.entries() {
                tools.push(ToolConfig::from_section(key, &sec.child(key, value)?)?);
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: version,
            authors: authors,
            enzi_version: enzi_version.to_string(),
            root: root,
            dependencies: dependencies,
            filesets: filesets,
            targets: targets,
            tools: tools,
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_version(&self) -> &Version {
        &self.version
    }

    pub fn get_authors(&self) -> &Vec<String> {
        &self.authors
    }

    pub fn get_enzi_version(&self) -> &str {
        &self.enzi_version
    }

    pub fn get_root(&self) -> &PathBuf {
        &self.root
    }

    /// Lists the dependencies in the order they are declared.
    pub fn get_dependencies(&self) -> &Vec<Dependency> {
        &self.dependencies
    }

    pub fn get_fileset(&self, name: &str) -> Option<&Fileset> {
        self.filesets.iter().find(|f| f.name == name)
    }

    pub fn get_filesets(&self) -> &Vec<Fileset> {
        &self.filesets
    }

    pub fn get_target(&self, kind: TargetKind) -> Option<&Target> {
        self.targets.iter().find(|t| t.kind == kind)
    }

    pub fn get_targets(&self) -> &Vec<Target> {
        &self.targets
    }

    /// Lists the tool option bags in the order they are declared.
    pub fn get_tools(&self) -> &Vec<ToolConfig> {
        &self.tools
    }

    /// Accesses the option bag for tool `id`, ignoring case.
    pub fn get_tool(&self, id: &str) -> Option<&ToolConfig> {
        let id = id.to_ascii_lowercase();
        self.tools.iter().find(|t| t.get_id() == id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::tool::{OptList, ToolValue};

    const EX1: &str = r#"
enzi_version = "0.3"

[package]
name = "demo"
version = "0.1.0"
authors = ["a", "b"]

[dependencies]
dep_b = { path = "../dep_b", version = ">=0.2.0, <0.3.0" }
dep_a = { url = "https://example.com/dep_a.git", commit = "1a2b3c" }

[filesets.include]
files = ["include/pkg.svh"]

[filesets.rtl]
files = ["rtl/a.sv", "rtl/b.v", "rtl/c.vhd"]

[targets.sim]
default_tool = "IES"
toplevel = "tb"
filesets = ["include", "rtl", "dep_b::rtl"]

[tools.ies]
sim_opts = "-message"
"#;

    fn parse(s: &str) -> Result<Package, ManifestError> {
        Package::parse(s, PathBuf::from("/work/demo"))
    }

    /// Replaces the section starting at `header` with `body` in the first example.
    fn with_section(header: &str, body: &str) -> String {
        let start = EX1.find(header).unwrap();
        let rest = &EX1[start + header.len()..];
        let end = rest.find("\n[").map(|i| start + header.len() + i).unwrap_or(EX1.len());
        format!("{}{}\n{}{}", &EX1[..start], header, body, &EX1[end..])
    }

    #[test]
    fn parse_full() {
        let pkg = parse(EX1).unwrap();
        assert_eq!(pkg.get_name(), "demo");
        assert_eq!(pkg.get_version(), &Version::from_str("0.1.0").unwrap());
        assert_eq!(pkg.get_authors(), &vec![String::from("a"), String::from("b")]);
        assert_eq!(pkg.get_enzi_version(), "0.3");
        assert_eq!(pkg.get_root(), &PathBuf::from("/work/demo"));

        // declaration order is kept
        let deps: Vec<&str> = pkg.get_dependencies().iter().map(|d| d.get_name()).collect();
        assert_eq!(deps, vec!["dep_b", "dep_a"]);
        assert_eq!(
            pkg.get_dependencies()[0].get_source(),
            &Source::Path(PathBuf::from("../dep_b"))
        );
        assert_eq!(
            pkg.get_dependencies()[1].get_pin(),
            &Pin::Commit(String::from("1a2b3c"))
        );

        let names: Vec<&str> = pkg.get_filesets().iter().map(|f| f.get_name()).collect();
        assert_eq!(names, vec!["include", "rtl"]);
        assert_eq!(pkg.get_fileset("rtl").unwrap().get_files().len(), 3);

        let sim = pkg.get_target(TargetKind::Sim).unwrap();
        assert_eq!(sim.get_default_tool(), Some(&String::from("ies")));
        assert_eq!(sim.get_toplevel(), "tb");
        assert_eq!(
            sim.get_filesets().last(),
            Some(&FilesetRef::Foreign {
                package: String::from("dep_b"),
                fileset: String::from("rtl")
            })
        );
        assert_eq!(pkg.get_target(TargetKind::Build), None);

        assert_eq!(
            pkg.get_tool("IES").unwrap().get("sim_opts"),
            Some(&ToolValue::Opts(OptList::Scalar(String::from("-message"))))
        );
    }

    #[test]
    fn minimal() {
        let pkg = parse(
            "enzi_version = \"0.1\"\n[package]\nname = \"x\"\nversion = \"1.0.0\"\nauthors = \"me\"\n",
        )
        .unwrap();
        assert_eq!(pkg.get_authors(), &vec![String::from("me")]);
        assert_eq!(pkg.get_dependencies().is_empty(), true);
        assert_eq!(pkg.get_targets().is_empty(), true);
    }

    #[test]
    fn closed_package() {
        let text = with_section(
            "[package]",
            "name = \"demo\"\nversion = \"0.1.0\"\nauthors = []\nlicense = \"MIT\"\n",
        );
        assert_eq!(
            parse(&text),
            Err(ManifestError::UnknownKey(String::from("package.license")))
        );

        let text = with_section("[package]", "name = \"demo\"\nauthors = []\n");
        assert_eq!(
            parse(&text),
            Err(ManifestError::MissingKey(String::from("package.version")))
        );

        let text = EX1.replace("enzi_version = \"0.3\"", "");
        assert_eq!(
            parse(&text),
            Err(ManifestError::MissingKey(String::from("enzi_version")))
        );

        let text = EX1.replace("enzi_version = \"0.3\"", "enzi_version = \"0.4\"");
        assert_eq!(parse(&text).is_err(), true);

        let text = format!("{}\n[extras]\nkey = 1\n", EX1);
        assert_eq!(parse(&text), Err(ManifestError::UnknownKey(String::from("extras"))));
    }

    #[test]
    fn dependency_shape() {
        let cases = [
            ("dep_b = {}", ManifestError::EmptyDependency(String::from("dependencies.dep_b"))),
            (
                "dep_b = { version = \"0.1.0\" }",
                ManifestError::MissingSource(String::from("dependencies.dep_b")),
            ),
            (
                "dep_b = { path = \"../b\", url = \"https://x\", version = \"0.1.0\" }",
                ManifestError::ConflictingSource(String::from("dependencies.dep_b")),
            ),
            (
                "dep_b = { path = \"../b\" }",
                ManifestError::MissingPin(String::from("dependencies.dep_b")),
            ),
            (
                "dep_b = { path = \"../b\", version = \"0.1.0\", commit = \"abc\" }",
                ManifestError::ConflictingPin(String::from("dependencies.dep_b")),
            ),
            (
                "dep_b = { path = \"../b\", version = \"0.1.0\", branch = \"main\" }",
                ManifestError::UnknownKey(String::from("dependencies.dep_b.branch")),
            ),
            (
                "dep_b = { path = \"../b\", version = \"> 0.1.0,\" }",
                ManifestError::InvalidVersion(
                    String::from("dependencies.dep_b.version"),
                    VersionError::EmptyClause(String::from("> 0.1.0,")),
                ),
            ),
            (
                "demo = { path = \"../b\", version = \"0.1.0\" }",
                ManifestError::SelfDependency(
                    String::from("dependencies.demo"),
                    String::from("demo"),
                ),
            ),
        ];
        for (body, err) in cases {
            let text = with_section("[dependencies]", body);
            assert_eq!(parse(&text), Err(err));
        }
    }

    #[test]
    fn fileset_shape() {
        let text = with_section("[filesets.rtl]", "files = []");
        assert_eq!(
            parse(&text),
            Err(ManifestError::EmptyFileset(String::from("filesets.rtl")))
        );

        let text = with_section("[filesets.rtl]", "files = [\"a.sv\", \"\"]");
        assert_eq!(
            parse(&text),
            Err(ManifestError::EmptyFilePath(String::from("filesets.rtl")))
        );

        let text = with_section("[filesets.rtl]", "files = [\"/abs/a.sv\"]");
        assert_eq!(
            parse(&text),
            Err(ManifestError::AbsoluteFilePath(
                String::from("filesets.rtl"),
                String::from("/abs/a.sv")
            ))
        );

        let text = with_section("[filesets.rtl]", "files = [\"rtl/../../a.sv\"]");
        assert_eq!(
            parse(&text),
            Err(ManifestError::EscapingFilePath(
                String::from("filesets.rtl"),
                String::from("rtl/../../a.sv")
            ))
        );

        let text = with_section("[filesets.rtl]", "files = [\"rtl/../a.sv\"]");
        assert_eq!(parse(&text).is_ok(), true);

        let text = with_section("[filesets.rtl]", "files = [\"a.sv\"]\nglob = true");
        assert_eq!(
            parse(&text),
            Err(ManifestError::UnknownKey(String::from("filesets.rtl.glob")))
        );
    }

    #[test]
    fn target_shape() {
        let text = EX1.replace("[targets.sim]", "[targets.lint]");
        assert_eq!(
            parse(&text),
            Err(ManifestError::UnknownTarget(String::from("targets.lint")))
        );

        let text = EX1.replace("\"include\", \"rtl\"", "\"include\", \"tb\"");
        assert_eq!(
            parse(&text),
            Err(ManifestError::UndeclaredFileset(
                String::from("targets.sim.filesets"),
                String::from("tb")
            ))
        );

        let text = EX1.replace("dep_b::rtl", "dep_c::rtl");
        assert_eq!(
            parse(&text),
            Err(ManifestError::UndeclaredDependency(
                String::from("targets.sim.filesets"),
                String::from("dep_c")
            ))
        );

        let text = EX1.replace("toplevel = \"tb\"", "");
        assert_eq!(
            parse(&text),
            Err(ManifestError::MissingKey(String::from("targets.sim.toplevel")))
        );
    }

    #[test]
    fn tool_shape() {
        let text = EX1.replace("[tools.ies]", "[tools.ncsim]");
        assert_eq!(
            parse(&text),
            Err(ManifestError::UnknownTool(
                String::from("tools.ncsim"),
                String::from("ies, questa, vsim, vivado")
            ))
        );

        let text = EX1.replace("sim_opts = \"-message\"", "sim_opt = \"-message\"");
        assert_eq!(
            parse(&text),
            Err(ManifestError::UnknownKey(String::from("tools.ies.sim_opt")))
        );
    }

    #[test]
    fn load_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        fs::write(&path, "enzi_version = \"0.3\"\n").unwrap();
        match Package::load(&path) {
            Err(ManifestError::InFile(p, e)) => {
                assert_eq!(p, path);
                assert_eq!(*e, ManifestError::MissingKey(String::from("package")));
            }
            _ => panic!("expected an error naming the manifest file"),
        }
        assert_eq!(
            matches!(
                Package::load(&dir.path().join("missing.toml")),
                Err(ManifestError::Unreadable(..))
            ),
            true
        );
    }
}
