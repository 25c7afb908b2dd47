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

use super::super::error::VerilogError;
use super::identifier::Identifier;
use super::keyword::Keyword;
use super::number::Number;
use super::operator::Operator;
use super::tokenizer::char_set;
use crate::core::lang::lexer::TrainCar;
use std::fmt::Display;

#[derive(Debug, PartialEq, Clone)]
pub enum VerilogToken {
    Comment(Comment),
    Operator(Operator),
    Number(Number),
    Identifier(Identifier),
    Keyword(Keyword),
    StringLiteral(String),
    Directive(String),
    EOF,
}

impl Display for VerilogToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comment(c) => write!(f, "{}", c),
            Self::Operator(o) => write!(f, "{}", o),
            Self::Number(n) => write!(f, "{}", n),
            Self::Identifier(i) => write!(f, "{}", i),
            Self::Keyword(k) => write!(f, "{}", k),
            Self::StringLiteral(s) => write!(f, "\"{}\"", s),
            Self::Directive(d) => write!(f, "`{}", d),
            Self::EOF => Ok(()),
        }
    }
}

impl VerilogToken {
    /// Checks if the element is a particular keyword `kw`.
    pub fn check_keyword(&self, kw: &Keyword) -> bool {
        match self {
            Self::Keyword(r) => r == kw,
            _ => false,
        }
    }

    /// Checks if the element is a particular delimiter `d`.
    pub fn check_delimiter(&self, d: &Operator) -> bool {
        match self {
            Self::Operator(r) => r == d,
            _ => false,
        }
    }

    pub fn is_eof(&self) -> bool {
        match self {
            Self::EOF => true,
            _ => false,
        }
    }

    pub fn is_comment(&self) -> bool {
        match self {
            Self::Comment(_) => true,
            _ => false,
        }
    }

    /// Checks if the token reads like a word, which requires whitespace to
    /// separate it from a neighboring word when written back out.
    pub fn is_wordlike(&self) -> bool {
        match self {
            Self::Identifier(_)
            | Self::Keyword(_)
            | Self::Number(_)
            | Self::Directive(_)
            | Self::StringLiteral(_) => true,
            _ => false,
        }
    }

    /// Accesses the underlying `Identifier`, if one exists.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Accesses the underlying `Number`, if one exists.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn as_delimiter(&self) -> Option<&Operator> {
        match self {
            Self::Operator(d) => Some(d),
            _ => None,
        }
    }
}

impl VerilogToken {
    /// Captures the generic pattern production rule by passing a fn as `eval` to compare.
    ///
    /// This function allows for an empty result to be returned.
    /// - A ::= A { A }
    pub fn consume_value_pattern(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: Option<char>,
        eval: fn(&char) -> bool,
    ) -> String {
        let mut car = match c0 {
            Some(c) => String::from(c),
            None => String::new(),
        };
        while let Some(c) = train.consume_if(eval) {
            car.push(c);
        }
        car
    }

    /// Walks through the stream to gather a `String` literal until finding the
    /// exiting character `br`.
    ///
    /// An escape is allowed by using \ before the `br`, i.e. "\"hello world\"".
    fn consume_literal(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        br: &char,
    ) -> Result<String, VerilogError> {
        let mut result = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::ESC {
                result.push(c);
                match train.consume() {
                    Some(d) => result.push(d),
                    None => return Err(VerilogError::UnclosedLiteral(*br)),
                }
            } else if &c == br {
                return Ok(result);
            } else {
                result.push(c);
            }
        }
        Err(VerilogError::UnclosedLiteral(*br))
    }

    /// Captures an exponent.
    ///
    /// Assumes the previous function has already consumed the character 'E' as `c0`.
    /// - exponent ::= E \[ + ] integer | E – integer
    fn consume_exponent(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<String, VerilogError> {
        let mut expon = String::from(c0);
        match train.consume() {
            Some(c) if c == char_set::PLUS || c == char_set::MINUS || char_set::is_digit(&c) => {
                expon.push(c)
            }
            Some(c) => return Err(VerilogError::InvalidExponChar(c)),
            None => return Err(VerilogError::EmptyExponNumber),
        }
        let value = Self::consume_value_pattern(train, None, char_set::is_digit_or_underscore);
        if value.is_empty() && expon.ends_with(|c: char| c.is_ascii_digit()) == false {
            return Err(VerilogError::EmptyExponNumber);
        }
        expon.push_str(&value);
        Ok(expon)
    }
}

impl VerilogToken {
    /// Captures keywords, basic identifiers, and system identifiers.
    ///
    /// Assumes the first char `c0` was the last char consumed before the function call.
    pub fn consume_word(train: &mut TrainCar<impl Iterator<Item = char>>, c0: char) -> Self {
        let word = Self::consume_value_pattern(train, Some(c0), char_set::is_identifier_character);
        if c0 == char_set::DOLLAR_SIGN {
            Self::Identifier(Identifier::System(word))
        } else {
            match Keyword::match_keyword(&word) {
                Some(kw) => Self::Keyword(kw),
                None => Self::Identifier(Identifier::Basic(word)),
            }
        }
    }

    /// Captures a compiler directive or macro usage.
    ///
    /// Assumes the last consumed character was the grave accent character (`).
    pub fn consume_compiler_directive(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        let word = Self::consume_value_pattern(train, None, char_set::is_identifier_character);
        match word.is_empty() {
            true => Err(VerilogError::EmptyCompilerDirective),
            false => Ok(Self::Directive(word)),
        }
    }

    /// Captures an escaped identifier introduced with a \ character. Collects
    /// characters until it encounters whitespace.
    pub fn consume_escaped_identifier(train: &mut TrainCar<impl Iterator<Item = char>>) -> Self {
        let word = Self::consume_value_pattern(train, None, char_set::is_not_whitespace);
        Self::Identifier(Identifier::Escaped(word))
    }

    /// Captures a string literal.
    ///
    /// Assumes the first double quote was the last char consumed.
    pub fn consume_str_literal(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        Ok(Self::StringLiteral(Self::consume_literal(
            train,
            &char_set::DOUBLE_QUOTE,
        )?))
    }

    /// Collects a single-line comment (all characters after a `//` up until end-of-line).
    ///
    /// Assumes the opening '/' was the last char consumed and the next char is '/'.
    pub fn consume_oneline_comment(train: &mut TrainCar<impl Iterator<Item = char>>) -> Self {
        // skip over second '/'
        train.consume();
        let note = Self::consume_value_pattern(train, None, |c| char_set::is_newline(c) == false);
        Self::Comment(Comment::OneLine(note.trim_end_matches('\r').to_string()))
    }

    /// Collects a block comment (all characters after a `/*` up until `*/`).
    ///
    /// Assumes the opening '/' was the last char consumed and the next char is '*'.
    pub fn consume_block_comment(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        // skip over opening '*'
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::STAR && train.consume_if(|d| d == &char_set::FWD_SLASH).is_some() {
                return Ok(Self::Comment(Comment::Block(note)));
            }
            note.push(c);
        }
        Err(VerilogError::UnclosedBlockComment)
    }

    /// Captures the longest operator that begins with `c0`.
    ///
    /// Every prefix of a multi-character operator is itself an operator, so the
    /// operator is extended one character at a time for as long as it remains valid.
    pub fn consume_operator(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<Self, VerilogError> {
        let mut op_buf = String::from(c0);
        let mut op = match Operator::transform(&op_buf) {
            Some(op) => op,
            None => return Err(VerilogError::InvalidChar(c0)),
        };
        while let Some(c) = train.peek() {
            op_buf.push(*c);
            match Operator::transform(&op_buf) {
                Some(longer) => {
                    train.consume();
                    op = longer;
                }
                None => break,
            }
        }
        Ok(Self::Operator(op))
    }

    /// Captures integer constants (decimal, based, unbased) and real constants.
    ///
    /// Assumes the incoming char `c0` was last char consumed.
    pub fn consume_number(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<Self, VerilogError> {
        let mut number = String::new();
        if c0 != char_set::SINGLE_QUOTE {
            number = Self::consume_value_pattern(train, Some(c0), char_set::is_digit_or_underscore);
            // real constant with a fraction
            if train.consume_if(|c| c == &char_set::DOT).is_some() {
                number.push(char_set::DOT);
                let fraction =
                    Self::consume_value_pattern(train, None, char_set::is_digit_or_underscore);
                if fraction.is_empty() == true {
                    return Err(VerilogError::MissingNumbersAfterDecimalPoint);
                }
                number.push_str(&fraction);
                if let Some(e) = train.consume_if(char_set::is_exponent) {
                    number.push_str(&Self::consume_exponent(train, e)?);
                }
                return Ok(Self::Number(Number::Real(number)));
            }
            // real constant without a fraction
            if let Some(e) = train.consume_if(char_set::is_exponent) {
                number.push_str(&Self::consume_exponent(train, e)?);
                return Ok(Self::Number(Number::Real(number)));
            }
            // a size may be separated from its base by whitespace
            while train.consume_if(char_set::is_whitespace).is_some() {}
            match train.consume_if(|c| c == &char_set::SINGLE_QUOTE) {
                Some(c) => number.push(c),
                None => return Ok(Self::Number(Number::Decimal(number))),
            }
        } else {
            // assignment patterns and casts use a lone single quote
            if train.peek().is_some_and(|c| c == &'{' || c == &'(') {
                return Ok(Self::Operator(Operator::SingleQuote));
            }
            number.push(c0);
        }
        // the base specifier (optionally signed) must come next
        if let Some(s) = train.consume_if(|c| c == &'s' || c == &'S') {
            number.push(s);
        }
        match train.consume() {
            Some(c) if char_set::is_base_specifier(&c) => number.push(c),
            Some(c) if number == "'" && char_set::is_unbased_digit(&c) => {
                number.push(c);
                return Ok(Self::Number(Number::Unbased(number)));
            }
            Some(c) => return Err(VerilogError::InvalidBaseSpecifier(c)),
            None => return Err(VerilogError::MissingBaseSpecifier),
        }
        while train.consume_if(char_set::is_whitespace).is_some() {}
        let value = Self::consume_value_pattern(
            train,
            None,
            char_set::is_digit_or_underscore_or_signal_char,
        );
        match value.is_empty() {
            true => Err(VerilogError::EmptyBaseConstNumber),
            false => {
                number.push_str(&value);
                Ok(Self::Number(Number::Based(number)))
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Comment {
    OneLine(String),
    Block(String),
}

impl Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneLine(c) => write!(f, "//{}", c),
            Self::Block(c) => write!(f, "/*{}*/", c),
        }
    }
}
