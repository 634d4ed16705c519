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

use super::clean::Clean;
use super::helps::enzi;
use super::init::Init;
use super::target::Execute;
use crate::core::context::Context;
use crate::core::manifest::TargetKind;
use crate::core::template;
use crate::util::environment::ENZI_GIT;
use crate::util::logger;
use log::LevelFilter;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help, Subcommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, PartialEq)]
pub struct Enzi {
    version: bool,
    config_help: bool,
    silence: bool,
    root: Option<PathBuf>,
    config: Option<String>,
    log: Option<LevelFilter>,
    command: Option<EnziSubcommand>,
}

impl Command for Enzi {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(enzi::HELP))?;
        Ok(Enzi {
            // Flags
            version: cli.check(Arg::flag("version"))?,
            config_help: cli.check(Arg::flag("enzi-config-help"))?,
            silence: cli.check(Arg::flag("silence-mode"))?,
            // Options
            root: cli.get(Arg::option("root").value("dir"))?,
            config: cli.get(Arg::option("config").value("file"))?,
            log: cli.get(Arg::option("log").value("level"))?,
            // Subcommands
            command: cli.nest(Arg::subcommand("command"))?,
        })
    }

    fn execute(self) -> proc::Result {
        // prioritize version information
        if self.version == true {
            println!("enzi {}", VERSION);
            return Ok(());
        }
        if self.config_help == true {
            print!("{}", template::reference());
            return Ok(());
        }

        logger::init(self.log, self.silence);

        match self.command {
            Some(command) => {
                let context = Context::new()
                    .root(self.root)?
                    .manifest(self.config)?
                    .git(ENZI_GIT);
                command.execute(&context)
            }
            None => {
                println!("{}", enzi::HELP);
                Ok(())
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum EnziSubcommand {
    Build(Execute),
    Run(Execute),
    Sim(Execute),
    ProgramDevice(Execute),
    Init(Init),
    Clean(Clean),
}

impl Subcommand<Context> for EnziSubcommand {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        match cli
            .select(&["build", "run", "sim", "program_device", "init", "clean"])?
            .as_ref()
        {
            "build" => Ok(EnziSubcommand::Build(Execute::interpret(cli)?)),
            "run" => Ok(EnziSubcommand::Run(Execute::interpret(cli)?)),
            "sim" => Ok(EnziSubcommand::Sim(Execute::interpret(cli)?)),
            "program_device" => Ok(EnziSubcommand::ProgramDevice(Execute::interpret(cli)?)),
            "init" => Ok(EnziSubcommand::Init(Init::interpret(cli)?)),
            "clean" => Ok(EnziSubcommand::Clean(Clean::interpret(cli)?)),
            _ => panic!("an unimplemented command was passed through!"),
        }
    }

    fn execute(self, context: &Context) -> proc::Result {
        match self {
            EnziSubcommand::Build(c) => c.run(TargetKind::Build, context),
            EnziSubcommand::Run(c) => c.run(TargetKind::Run, context),
            EnziSubcommand::Sim(c) => c.run(TargetKind::Sim, context),
            EnziSubcommand::ProgramDevice(c) => c.run(TargetKind::ProgramDevice, context),
            EnziSubcommand::Init(c) => c.run(context),
            EnziSubcommand::Clean(c) => c.run(context),
        }
    }
}
