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

//! The set of macros used to resolve conditional compilation in referenced
//! module files.

use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MacroFormatError {
    #[error("macro list {0:?} mixes bare names with name=value pairs; use one format only")]
    MixedFormats(String),
    #[error("macro list {0:?} contains an entry without a name")]
    MissingName(String),
    #[error("invalid macro name {0:?}")]
    InvalidName(String),
}

/// Maps a macro name to its optional value.
///
/// A macro stored with `None` is defined without a value.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct MacroSet(BTreeMap<String, Option<String>>);

impl MacroSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn define(&mut self, name: &str, value: Option<&str>) {
        self.0
            .insert(name.to_string(), value.map(|v| v.to_string()));
    }

    pub fn undefine(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the text a macro reference expands to, if the macro is defined.
    ///
    /// Value-less macros expand to an empty string.
    pub fn expansion(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.as_ref().map(|s| s.as_str()).unwrap_or(""))
    }

    /// Adds every macro from `lower` that is not already defined in `self`.
    pub fn fill_from(&mut self, lower: &MacroSet) {
        for (name, value) in &lower.0 {
            self.0.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            }
            _ => false,
        }
    }
}

impl FromStr for MacroSet {
    type Err = MacroFormatError;

    /// Parses either a comma-separated list of bare names (`A,B`) or a
    /// comma-separated list of assignments (`A=1,B=2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = MacroSet::new();
        let mut bare = false;
        let mut valued = false;
        for item in s.split(',').map(|i| i.trim()).filter(|i| i.is_empty() == false) {
            let (name, value) = match item.split_once('=') {
                Some((n, v)) => {
                    valued = true;
                    (n.trim(), Some(v.trim()))
                }
                None => {
                    bare = true;
                    (item, None)
                }
            };
            if bare == true && valued == true {
                return Err(MacroFormatError::MixedFormats(s.to_string()));
            }
            if name.is_empty() == true {
                return Err(MacroFormatError::MissingName(s.to_string()));
            }
            if Self::is_valid_name(name) == false {
                return Err(MacroFormatError::InvalidName(name.to_string()));
            }
            set.define(name, value);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_names() {
        let set = MacroSet::from_str("SYNTHESIS, FPGA").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.expansion("SYNTHESIS"), Some(""));
        assert_eq!(set.expansion("ASIC"), None);
    }

    #[test]
    fn valued_names() {
        let set = MacroSet::from_str("WIDTH=32,DEPTH=16").unwrap();
        assert_eq!(set.expansion("WIDTH"), Some("32"));
        assert_eq!(set.expansion("DEPTH"), Some("16"));
    }

    #[test]
    fn empty_list_defines_nothing() {
        assert!(MacroSet::from_str("").unwrap().is_empty());
    }

    #[test]
    fn mixed_formats_are_rejected() {
        assert_eq!(
            MacroSet::from_str("A,B=1"),
            Err(MacroFormatError::MixedFormats("A,B=1".to_string()))
        );
        assert_eq!(
            MacroSet::from_str("B=1,A"),
            Err(MacroFormatError::MixedFormats("B=1,A".to_string()))
        );
    }

    #[test]
    fn bad_names_are_rejected() {
        assert_eq!(
            MacroSet::from_str("=4"),
            Err(MacroFormatError::MissingName("=4".to_string()))
        );
        assert_eq!(
            MacroSet::from_str("9LIVES"),
            Err(MacroFormatError::InvalidName("9LIVES".to_string()))
        );
    }

    #[test]
    fn higher_layer_wins_when_filling() {
        let mut top = MacroSet::from_str("WIDTH=8").unwrap();
        let lower = MacroSet::from_str("WIDTH=4,DEPTH=2").unwrap();
        top.fill_from(&lower);
        assert_eq!(top.expansion("WIDTH"), Some("8"));
        assert_eq!(top.expansion("DEPTH"), Some("2"));
    }
}
