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

//! Installs the `env_logger` backend for the `log` facade.

use crate::error::{Error, LastError};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::path::Path;

/// Default level when neither a flag nor `RUST_LOG` selects one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initializes logging.
///
/// An explicit `level` takes precedence over `RUST_LOG`. When `file` is given,
/// records are written there instead of stderr. `quiet` limits the console to
/// errors.
pub fn init(level: Option<LevelFilter>, file: Option<&Path>, quiet: bool) -> Result<(), Error> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_LEVEL));
    if let Some(lvl) = level {
        builder.filter_level(lvl);
    }
    match file {
        Some(path) => {
            let log = std::fs::File::create(path)
                .map_err(|e| Error::FileIo(path.to_path_buf(), LastError(e.to_string())))?;
            builder.target(Target::Pipe(Box::new(log)));
            builder.write_style(env_logger::WriteStyle::Never);
        }
        None => {
            if quiet == true {
                builder.filter_level(LevelFilter::Error);
            }
        }
    }
    builder.format_timestamp(None);
    builder
        .try_init()
        .map_err(|e| Error::Logging(LastError(e.to_string())))?;
    Ok(())
}
