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

use crate::util::environment::ENZI_LOG;
use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::io::Write;

/// Configures the log backend that writes records to stderr prefixed by their
/// colored severity.
///
/// The level is `level` when given, else whatever `ENZI_LOG` holds, else info.
pub fn builder(level: Option<LevelFilter>) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .parse_env(ENZI_LOG)
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}: {}", label(record.level()), record.args()));
    if let Some(l) = level {
        builder.filter_level(l);
    }
    builder
}

/// Installs the log backend. When `silence` is set, nothing below warnings is reported.
pub fn init(level: Option<LevelFilter>, silence: bool) {
    let logger = builder(level).build();
    let max = cap(logger.filter(), silence);
    // a logger may already be installed when called more than once in a process
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max);
    }
}

fn cap(level: LevelFilter, silence: bool) -> LevelFilter {
    match silence == true && level > LevelFilter::Warn {
        true => LevelFilter::Warn,
        false => level,
    }
}

fn label(level: Level) -> String {
    match level {
        Level::Error => "error".red().to_string(),
        Level::Warn => "warning".yellow().to_string(),
        Level::Info => "info".green().to_string(),
        Level::Debug => "debug".blue().to_string(),
        Level::Trace => "trace".dimmed().to_string(),
    }
}
