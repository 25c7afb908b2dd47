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

//! Layered TOML configuration: output formatting and default macros.

use crate::core::emit::Format;
use crate::core::macros::MacroSet;
use crate::error::{Error, LastError};
use serde_derive::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_DIR: &str = ".vcg";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOCAL_CONFIG_FILE: &str = "vcg.toml";

#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FormatTable {
    port_align: Option<usize>,
    comment_align: Option<usize>,
    wire_align: Option<usize>,
}

impl FormatTable {
    /// Merges any populated data from `rhs` into attributes that do not already
    /// have data defined in `self`.
    pub fn merge(&mut self, rhs: Option<Self>) {
        if let Some(rhs) = rhs {
            if self.port_align.is_some() == false {
                self.port_align = rhs.port_align;
            }
            if self.comment_align.is_some() == false {
                self.comment_align = rhs.comment_align;
            }
            if self.wire_align.is_some() == false {
                self.wire_align = rhs.wire_align;
            }
        }
    }

    pub fn into_format(self) -> Format {
        let def = Format::default();
        Format {
            port_align: self.port_align.unwrap_or(def.port_align),
            comment_align: self.comment_align.unwrap_or(def.comment_align),
            wire_align: self.wire_align.unwrap_or(def.wire_align),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    format: Option<FormatTable>,
    macros: Option<BTreeMap<String, String>>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            format: None,
            macros: None,
        }
    }

    /// Reads and parses the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if path.is_file() == false {
            return Err(Error::FileMissing(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(path.to_path_buf(), LastError(e.to_string())))?;
        Self::from_str(&contents)
            .map_err(|e| Error::Config(path.to_path_buf(), LastError(e.to_string())))
    }

    /// Adds the new information to the existing configuration to combine data.
    ///
    /// Existing data in `self` has precedence over any incoming data from `rhs`.
    pub fn append(&mut self, rhs: Self) {
        // combine '[format]' table
        match &mut self.format {
            Some(v) => v.merge(rhs.format),
            None => self.format = rhs.format,
        }
        // combine '[macros]' table
        match &mut self.macros {
            Some(v) => {
                for (key, val) in rhs.macros.unwrap_or_default() {
                    v.entry(key).or_insert(val);
                }
            }
            None => self.macros = rhs.macros,
        }
    }

    pub fn get_format(&self) -> Format {
        self.format.clone().unwrap_or_default().into_format()
    }

    /// Collects the `[macros]` table, where an empty string defines a macro
    /// without a value.
    pub fn get_macros(&self) -> MacroSet {
        let mut set = MacroSet::new();
        if let Some(table) = &self.macros {
            for (name, value) in table {
                match value.is_empty() {
                    true => set.define(name, None),
                    false => set.define(name, Some(value)),
                }
            }
        }
        set
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Locality {
    Global,
    Local,
    Other,
}

#[derive(Debug, PartialEq)]
pub struct Configs {
    inner: Vec<(PathBuf, Config, Locality)>,
}

impl Configs {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn load(self, file: PathBuf, lvl: Locality) -> Result<Self, Error> {
        let mut configs = self.inner;
        let cfg = Config::from_file(&file)?;
        log::debug!("loaded configuration {:?}", file);
        configs.push((file, cfg, lvl));
        Ok(Self { inner: configs })
    }

    /// Loads `file` only when it exists.
    pub fn load_if_exists(self, file: PathBuf, lvl: Locality) -> Result<Self, Error> {
        match file.is_file() {
            true => self.load(file, lvl),
            false => Ok(self),
        }
    }

    /// Gathers the standard layers for a host file: the user's home
    /// configuration, the `vcg.toml` beside `host`, and then `extra`.
    pub fn discover(host: &Path, extra: Option<&Path>) -> Result<Self, Error> {
        let mut configs = Self::new();
        if let Some(home) = home::home_dir() {
            configs = configs.load_if_exists(home.join(CONFIG_DIR).join(CONFIG_FILE), Locality::Global)?;
        }
        let dir = match host.parent() {
            Some(p) if p.as_os_str().is_empty() == false => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        configs = configs.load_if_exists(dir.join(LOCAL_CONFIG_FILE), Locality::Local)?;
        if let Some(extra) = extra {
            configs = configs.load(extra.to_path_buf(), Locality::Other)?;
        }
        Ok(configs)
    }
}

impl From<Configs> for Config {
    /// Transform the multi-layered configurations into a single level.
    ///
    /// This function processes configurations in the following order:
    /// 1. OTHER (explicitly requested)
    /// 2. LOCAL
    /// 3. GLOBAL
    ///
    /// Once a value is set, it is not overridden by a configuration later in the
    /// processing order.
    fn from(value: Configs) -> Self {
        let mut single = Config::new();
        for lvl in [Locality::Other, Locality::Local, Locality::Global] {
            value
                .inner
                .iter()
                .filter(|(_, _, l)| l == &lvl)
                .rev()
                .for_each(|(_, cfg, _)| single.append(cfg.clone()));
        }
        single
    }
}
