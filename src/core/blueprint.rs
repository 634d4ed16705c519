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

use super::plan::BuildPlan;
use crate::util::anyerror::Fault;
use std::fs;
use std::path::{Path, PathBuf};

/// Hands a build plan to the script generation of a vendor tool.
///
/// A renderer must keep the plan's file order and pass its options through verbatim.
pub trait Render {
    /// Writes whatever is needed for `plan` into `dir` and returns the main file written.
    fn render(&self, plan: &BuildPlan, dir: &Path) -> Result<PathBuf, Fault>;
}

/// Writes the plan as a JSON blueprint for an external script generator.
pub struct JsonBlueprint;

impl JsonBlueprint {
    pub fn file_name(plan: &BuildPlan) -> String {
        format!("{}.plan.json", plan.get_target())
    }
}

impl Render for JsonBlueprint {
    fn render(&self, plan: &BuildPlan, dir: &Path) -> Result<PathBuf, Fault> {
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(plan));
        let mut text = serde_json::to_string_pretty(plan)?;
        text.push('\n');
        fs::write(&path, text)?;
        Ok(path)
    }
}
