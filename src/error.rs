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

use crate::core::lang::verilog::error::VerilogError;
use crate::core::macros::MacroFormatError;
use crate::core::rules::error::PatternError;
use std::{fmt::Display, path::PathBuf};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("file {0:?} does not exist")]
    FileMissing(PathBuf),
    #[error("failed to access file {0:?}: {1}")]
    FileIo(PathBuf, LastError),
    #[error("module {0:?} is not declared in file {1:?}")]
    ModuleNotFound(String, PathBuf),
    #[error("failed to parse file {0:?}: {1}")]
    Parse(PathBuf, VerilogError),
    #[error("{file:?}: directive block {block} failed: {message}")]
    Script {
        file: PathBuf,
        block: usize,
        message: String,
    },
    #[error("{0}")]
    Pattern(#[from] PatternError),
    #[error("{0}")]
    MacroFormat(#[from] MacroFormatError),
    #[error("{file:?}:{line}: {reason}")]
    MarkerMismatch {
        file: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("invalid port type {0:?}: expecting \"input\", \"output\", or \"inout\"")]
    InvalidPortType(String),
    #[error("invalid wire mode {0:?}: expecting \"greedy\" or \"lazy\"")]
    InvalidWireMode(String),
    #[error("invalid configuration file {0:?}: {1}")]
    Config(PathBuf, LastError),
    #[error("{1} directive block(s) failed in file {0:?}")]
    BlocksFailed(PathBuf, usize),
    #[error("missing required argument <{0}>")]
    MissingArgument(String),
    #[error("failed to initialize logging: {0}")]
    Logging(LastError),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain punctuation if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s.to_string()
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lowerize_first_word() {
        assert_eq!(
            Error::lowerize("No such file or directory".to_string()),
            "no such file or directory"
        );
        assert_eq!(Error::lowerize("IO failure".to_string()), "IO failure");
        assert_eq!(Error::lowerize(String::new()), "");
    }
}
