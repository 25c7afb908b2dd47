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

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PatternError {
    #[error("capture reference *{index} is out of range: pattern only has {captures} wildcard(s)")]
    OutOfRange { index: usize, captures: usize },
    #[error("unsupported function expression \"${{{0}}}\"")]
    UnsupportedFunction(String),
    #[error("malformed template {0:?}")]
    Malformed(String),
    #[error("function {function} expects {expected} argument(s) but got {got}")]
    BadArity {
        function: String,
        expected: String,
        got: usize,
    },
}
