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

use super::token::{keyword::Keyword, operator::Operator};
use crate::core::lang::lexer::Position;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum VerilogError {
    #[error("missing closing sequence for block comment (*/)")]
    UnclosedBlockComment,
    #[error("missing closing sequence for literal ({0})")]
    UnclosedLiteral(char),
    #[error("invalid character {0:?}")]
    InvalidChar(char),
    #[error("invalid base specifier {0:?}")]
    InvalidBaseSpecifier(char),
    #[error("missing base specifier")]
    MissingBaseSpecifier,
    #[error("missing digits after base specifier")]
    EmptyBaseConstNumber,
    #[error("expecting digits after decimal point")]
    MissingNumbersAfterDecimalPoint,
    #[error("invalid character {0:?} in exponent")]
    InvalidExponChar(char),
    #[error("missing digits in exponent")]
    EmptyExponNumber,
    #[error("missing identifier after compiler directive character (`)")]
    EmptyCompilerDirective,
    #[error("{0}: expecting operator {1}")]
    ExpectingOperator(Position, Operator),
    #[error("{0}: expecting keyword {1}")]
    ExpectingKeyword(Position, Keyword),
    #[error("{0}: expecting module identifier")]
    ExpectingIdentifier(Position),
    #[error("{0}: module declaration is incomplete")]
    ModDecIncomplete(Position),
    #[error("line {0}: `{1} has no matching `ifdef or `ifndef")]
    UnmatchedConditional(usize, String),
    #[error("line {0}: conditional block is never closed with `endif")]
    UnterminatedConditional(usize),
    #[error("line {0}: `{1} requires a macro name")]
    MissingMacroName(usize, String),
}
