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

use crate::commands::helps::vcg;
use crate::core::config::{Config, Configs};
use crate::core::macros::MacroSet;
use crate::core::processor::Processor;
use crate::error::Error;
use crate::util::logging;
use colored::Colorize;
use log::LevelFilter;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, PartialEq)]
pub struct Vcg {
    version: bool,
    quiet: bool,
    macros: Option<MacroSet>,
    config: Option<PathBuf>,
    log_level: Option<LevelFilter>,
    log_file: Option<PathBuf>,
    file: Option<PathBuf>,
}

impl Command for Vcg {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(vcg::HELP))?;
        Ok(Vcg {
            // flags
            version: cli.check(Arg::flag("version"))?,
            quiet: cli.check(Arg::flag("quiet"))?,
            // options
            macros: cli.get(Arg::option("macros").value("list"))?,
            config: cli.get(Arg::option("config").value("path"))?,
            log_level: cli.get(Arg::option("log-level").value("level"))?,
            log_file: cli.get(Arg::option("log-file").value("path"))?,
            // positionals
            file: cli.get(Arg::positional("file"))?,
        })
    }

    fn execute(self) -> proc::Result {
        // prioritize version information
        if self.version == true {
            println!("vcg {}", VERSION);
            return Ok(());
        }
        let file = match &self.file {
            Some(f) => f,
            None => return Err(Error::MissingArgument(String::from("file")))?,
        };
        logging::init(self.log_level, self.log_file.as_deref(), self.quiet)?;
        self.run(file)
    }
}

impl Vcg {
    fn run(&self, file: &PathBuf) -> proc::Result {
        // collapse the configuration layers
        let config = Config::from(Configs::discover(file, self.config.as_deref())?);
        let mut macros = self.macros.clone().unwrap_or_default();
        macros.fill_from(&config.get_macros());
        log::debug!("using {} macro(s)", macros.len());

        let root = std::env::current_dir()?;
        let report = Processor::new(&root)
            .macros(macros)
            .format(config.get_format())
            .process(file)?;

        for failure in report.get_failures() {
            eprintln!("{} {}", "error:".red().bold(), failure);
        }
        if report.is_success() == false {
            return Err(Error::BlocksFailed(file.clone(), report.get_failures().len()))?;
        }
        match report.is_changed() {
            true => println!("vcg: generated {}", file.display()),
            false => println!("vcg: {} is up to date", file.display()),
        }
        Ok(())
    }
}
