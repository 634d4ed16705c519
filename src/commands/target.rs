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

use super::helps::target;
use crate::core::blueprint::{JsonBlueprint, Render};
use crate::core::context::Context;
use crate::core::manifest::TargetKind;
use crate::core::plan;
use crate::core::resolver;
use crate::core::source::{GitRemote, Locator};
use crate::error::{Error, LastError};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help};

/// Plans one target of the root package.
#[derive(Debug, PartialEq)]
pub struct Execute {
    tool: Option<String>,
}

impl Execute {
    pub fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(target::HELP))?;
        Ok(Execute {
            tool: cli.get(Arg::option("tool").value("id"))?,
        })
    }

    pub fn run(self, kind: TargetKind, c: &Context) -> proc::Result {
        let root = c.load_root()?;
        log::info!("resolving dependencies of {:?}", root.get_name());

        let remote = GitRemote::new(c.get_database_dir(), c.get_checkouts_dir())
            .git(c.get_git().cloned());
        let graph = resolver::resolve(root, &Locator::new(remote))?;
        for pkg in graph.iter() {
            log::debug!(
                "using {} {} from {:?}",
                pkg.get_name(),
                pkg.get_resolved(),
                pkg.get_package().get_root()
            );
        }

        let plan = plan::plan_target(&graph, kind, self.tool.as_deref())?;
        let dir = c.get_build_dir();
        let path = JsonBlueprint
            .render(&plan, &dir)
            .map_err(|e| Error::PlanNotWritten(dir.clone(), LastError(e.to_string())))?;
        log::info!(
            "wrote {} plan for tool {:?} with {} file(s) to {:?}",
            kind,
            plan.get_tool(),
            plan.get_files().len(),
            path
        );
        Ok(())
    }
}
