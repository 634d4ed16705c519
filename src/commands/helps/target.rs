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

pub const HELP: &str = r#"Resolve the root package and write the plan for one of its targets.

Usage:
    enzi <build|run|sim|program_device> [options]

Options:
    --tool <id>           tool to plan for instead of the target's default_tool
    --help, -h            print help information

The plan is written to build/<target>.plan.json under the root directory.
Known tools: ies, questa (vsim), vivado."#;
