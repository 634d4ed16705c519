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

//! Merges a composed fileset with tool options into a backend-agnostic plan.

use super::backend::{Backend, Fallback, FieldKind};
use super::fileset::{self, FileEntry};
use super::manifest::{Target, TargetKind};
use super::resolver::ResolvedGraph;
use super::tool::{Define, ToolValue};
use crate::error::{Error, Hint};
use serde_derive::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("package {0:?} has no {1} target{2}")]
    TargetNotFound(String, String, Hint),
    #[error("no tool selected for target {0}{1}")]
    NoToolSelected(String, Hint),
    #[error("tool {0:?} is not known; expected one of {1}")]
    UnknownTool(String, String),
    #[error("tool {0:?} does not support target {1}")]
    UnsupportedTarget(String, String),
    #[error("tool {0:?} requires option `{1}` to carry out target {2}")]
    MissingOption(String, String, String),
}

/// Everything a renderer needs to emit the vendor tool invocations for one
/// target with one tool.
///
/// Files are in compile order. Fields are keyed by their option names and
/// stored sorted so that two plans for the same inputs serialize identically.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct BuildPlan {
    package: String,
    target: TargetKind,
    tool: String,
    backend: Backend,
    toplevel: String,
    use_uvm: bool,
    files: Vec<FileEntry>,
    options: BTreeMap<String, Vec<String>>,
    defines: BTreeMap<String, Vec<Define>>,
    flags: BTreeMap<String, bool>,
    settings: BTreeMap<String, String>,
    logs: BTreeMap<String, String>,
}

impl BuildPlan {
    pub fn get_package(&self) -> &str {
        &self.package
    }

    pub fn get_target(&self) -> TargetKind {
        self.target
    }

    pub fn get_tool(&self) -> &str {
        &self.tool
    }

    pub fn get_backend(&self) -> Backend {
        self.backend
    }

    pub fn get_toplevel(&self) -> &str {
        &self.toplevel
    }

    pub fn use_uvm(&self) -> bool {
        self.use_uvm
    }

    pub fn get_files(&self) -> &Vec<FileEntry> {
        &self.files
    }

    /// Accesses the normalized option list `name`, which is empty when never set.
    pub fn get_options(&self, name: &str) -> Option<&Vec<String>> {
        self.options.get(name)
    }

    pub fn get_defines(&self, name: &str) -> Option<&Vec<Define>> {
        self.defines.get(name)
    }

    pub fn get_flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub fn get_setting(&self, name: &str) -> Option<&String> {
        self.settings.get(name)
    }

    pub fn get_log(&self, name: &str) -> Option<&String> {
        self.logs.get(name)
    }
}

/// Replaces an existing define of the same name in place, or appends it.
fn merge_define(list: &mut Vec<Define>, def: Define) {
    match list.iter_mut().find(|d| d.get_name() == def.get_name()) {
        Some(slot) => *slot = def,
        None => list.push(def),
    }
}

/// Selects the tool for `target`, preferring the explicitly `requested` one.
fn select_tool(target: &Target, requested: Option<&str>) -> Result<String, PlanError> {
    match (requested, target.get_default_tool()) {
        (Some(req), default) => {
            let req = req.to_ascii_lowercase();
            if let Some(d) = default {
                if d != &req {
                    log::info!("using tool {:?} instead of default tool {:?}", req, d);
                }
            }
            Ok(req)
        }
        (None, Some(d)) => Ok(d.clone()),
        (None, None) => Err(PlanError::NoToolSelected(
            target.get_kind().to_string(),
            Hint::ToolFlag,
        )),
    }
}

/// Produces the plan for `target` of the root package in `graph` from its
/// composed `files`.
///
/// Tool options are gathered from every package in the graph, dependencies
/// before dependents, so the root's values win. Option and define lists
/// accumulate while text and flag fields take the last value seen. Fields no
/// package sets fall back to the backend's defaults.
pub fn build(
    files: Vec<FileEntry>,
    target: &Target,
    requested: Option<&str>,
    graph: &ResolvedGraph,
) -> Result<BuildPlan, PlanError> {
    let kind = target.get_kind();
    let tool = select_tool(target, requested)?;
    let backend = Backend::from_id(&tool)
        .ok_or_else(|| PlanError::UnknownTool(tool.clone(), Backend::list_ids()))?;
    if backend.supports(kind) == false {
        return Err(PlanError::UnsupportedTarget(tool, kind.to_string()));
    }

    let mut options: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut defines: BTreeMap<String, Vec<Define>> = BTreeMap::new();
    let mut texts: BTreeMap<String, String> = BTreeMap::new();
    let mut flags: BTreeMap<String, bool> = BTreeMap::new();

    for pkg in graph.iter() {
        for cfg in pkg
            .get_package()
            .get_tools()
            .iter()
            .filter(|c| c.get_backend() == backend)
        {
            for field in backend.fields() {
                let name = field.get_name().to_string();
                match cfg.get(field.get_name()) {
                    Some(ToolValue::Opts(list)) => {
                        options.entry(name).or_default().extend(list.normalize())
                    }
                    Some(ToolValue::Defines(list)) => {
                        let slot = defines.entry(name).or_default();
                        for def in list.normalize() {
                            merge_define(slot, def);
                        }
                    }
                    Some(ToolValue::Text(t)) => {
                        texts.insert(name, t.clone());
                    }
                    Some(ToolValue::Flag(b)) => {
                        flags.insert(name, *b);
                    }
                    None => (),
                }
            }
        }
    }

    // apply fallbacks and sort fields into their plan sections
    let mut settings = BTreeMap::new();
    let mut logs = BTreeMap::new();
    for field in backend.fields() {
        let name = field.get_name().to_string();
        match field.get_kind() {
            FieldKind::Opts => {
                options.entry(name).or_default();
            }
            FieldKind::Defines => {
                defines.entry(name).or_default();
            }
            FieldKind::Text => {
                let value = match (texts.remove(&name), field.get_fallback()) {
                    (Some(t), _) => Some(t),
                    (None, Fallback::Text(t)) => Some(t.to_string()),
                    (None, _) => None,
                };
                if let Some(v) = value {
                    match field.is_log() {
                        true => logs.insert(name, v),
                        false => settings.insert(name, v),
                    };
                }
            }
            FieldKind::Flag => {
                if flags.contains_key(&name) == false {
                    if let Fallback::Flag(b) = field.get_fallback() {
                        flags.insert(name, b);
                    }
                }
            }
        }
    }

    for req in backend.required(kind) {
        if settings.contains_key(*req) == false {
            return Err(PlanError::MissingOption(tool, req.to_string(), kind.to_string()));
        }
    }

    let root = graph.root().get_package();
    Ok(BuildPlan {
        package: root.get_name().to_string(),
        target: kind,
        tool: tool,
        backend: backend,
        toplevel: target.get_toplevel().to_string(),
        use_uvm: flags.get("use_uvm").copied().unwrap_or(false),
        files: files,
        options: options,
        defines: defines,
        flags: flags,
        settings: settings,
        logs: logs,
    })
}

/// Composes and builds the plan for the root package's target `kind`.
pub fn plan_target(
    graph: &ResolvedGraph,
    kind: TargetKind,
    requested: Option<&str>,
) -> Result<BuildPlan, Error> {
    let root = graph.root().get_package();
    let target = root.get_target(kind).ok_or_else(|| {
        PlanError::TargetNotFound(
            root.get_name().to_string(),
            kind.to_string(),
            Hint::TargetsTable,
        )
    })?;
    let files = fileset::compose(graph, target)?;
    log::debug!("composed {} file(s) for target {}", files.len(), kind);
    Ok(build(files, target, requested, graph)?)
}
