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

pub const HELP: &str = r#"Enzi resolves hdl package manifests into build plans.

Usage:
    enzi [options] <command>

Commands:
    build                 plan the build target
    run                   plan the run target
    sim                   plan the simulation target
    program_device        plan the device programming target
    init                  create a new package
    clean                 remove the build directory

Options:
    --root <dir>          directory holding the root manifest
    --config <file>       file name of the root manifest (default: Enzi.toml)
    --silence-mode        only report warnings and errors
    --log <level>         logging level: off, error, warn, info, debug, trace
    --enzi-config-help    print every manifest key and exit
    --version             print version information and exit
    --help, -h            print help information

Use 'enzi <command> --help' for more information about a command."#;
