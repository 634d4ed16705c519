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

//! Manifest text written on behalf of the user: the starting manifest of a
//! new package and the annotated reference of every manifest key.

use super::backend::{Backend, Fallback, FieldKind};
use super::manifest::ENZI_VERSIONS;
use toml::Value;

/// Version given to a newly created package.
pub const INITIAL_VERSION: &str = "0.1.0";

/// Creates the manifest of a new package named `name`.
pub fn manifest(name: &str, authors: &[String]) -> String {
    let authors: Vec<String> = authors
        .iter()
        .map(|a| Value::String(a.clone()).to_string())
        .collect();
    format!(
        r#"enzi_version = "{}"

[package]
name = {}
version = "{}"
authors = [{}]

[dependencies]

# [filesets.rtl]
# files = ["src/top.sv"]
#
# [targets.sim]
# default_tool = "ies"
# toplevel = "top"
# filesets = ["rtl"]
"#,
        ENZI_VERSIONS[ENZI_VERSIONS.len() - 1],
        Value::String(name.to_string()),
        INITIAL_VERSION,
        authors.join(", ")
    )
}

fn kind_hint(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Opts => r#""<option>" | ["<option>", ...]"#,
        FieldKind::Defines => r#"{ NAME = "<value>" } | "NAME=VALUE" | ["NAME=VALUE", ...]"#,
        FieldKind::Text => r#""<text>""#,
        FieldKind::Flag => "true | false",
    }
}

/// Lists every key a manifest accepts along with the shape of its value.
pub fn reference() -> String {
    let mut text = format!(
        r#"# Enzi.toml reference

# mandatory: the manifest format revision
enzi_version = "{}"

# mandatory: identity of the package
[package]
name = "<name>"
version = "<major>.<minor>.<patch>"
authors = "<author>" | ["<author>", ...]

# optional: packages this package needs, visited in the order listed
# each entry takes exactly one of path/url and exactly one of version/commit
[dependencies]
<name> = {{ path = "<dir>", version = "<requirement>" }}
<name> = {{ url = "<repository>", commit = "<commit, tag or branch>" }}

# optional: named groups of source files, relative to the package root
# entries may hold the glob patterns *, ? and [...]
[filesets.<name>]
files = ["<file>", ...]

# optional: one table per target, named build | run | sim | program_device
[targets.<target>]
default_tool = "<tool>"
toplevel = "<module>"
filesets = ["<fileset>" | "<dependency>::<fileset>", ...]
"#,
        ENZI_VERSIONS.join(" | ")
    );
    for backend in [Backend::Ies, Backend::Questa, Backend::Vivado] {
        text.push_str(&format!("\n# optional: options for the {} backend\n", backend));
        text.push_str(&format!("[tools.{}]\n", backend));
        for field in backend.fields() {
            let default = match field.get_fallback() {
                Fallback::None => String::new(),
                Fallback::Text(t) => format!(" # default: {:?}", t),
                Fallback::Flag(b) => format!(" # default: {}", b),
            };
            text.push_str(&format!(
                "{} = {}{}\n",
                field.get_name(),
                kind_hint(field.get_kind()),
                default
            ));
        }
    }
    text
}
