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

use std::fmt::Display;

#[derive(Debug, PartialEq, Clone)]
pub enum Operator {
    ParenL,
    ParenR,
    BrackL,
    BrackR,
    BraceL,
    BraceR,
    AttrL,
    AttrR,
    Comma,
    Terminator,
    Colon,
    Dot,
    Pound,
    At,
    Question,
    SingleQuote,
    BlockAssign,
    Plus,
    Minus,
    Star,
    Pow,
    FwdSlash,
    Modulus,
    Lt,
    Gt,
    Lte,
    Gte,
    Eq,
    Neq,
    CaseEq,
    CaseNeq,
    LogicAnd,
    LogicOr,
    LogicNot,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    BitXnor,
    BitXnorAlt,
    Nand,
    Nor,
    ShiftL,
    ShiftR,
    ArithShiftL,
    ArithShiftR,
    PlusColon,
    MinusColon,
    ScopeRes,
}

impl Operator {
    /// Attempts to match the given string of characters `s` to a Verilog operator.
    pub fn transform(s: &str) -> Option<Self> {
        Some(match s {
            "(" => Self::ParenL,
            ")" => Self::ParenR,
            "[" => Self::BrackL,
            "]" => Self::BrackR,
            "{" => Self::BraceL,
            "}" => Self::BraceR,
            "(*" => Self::AttrL,
            "*)" => Self::AttrR,
            "," => Self::Comma,
            ";" => Self::Terminator,
            ":" => Self::Colon,
            "." => Self::Dot,
            "#" => Self::Pound,
            "@" => Self::At,
            "?" => Self::Question,
            "'" => Self::SingleQuote,
            "=" => Self::BlockAssign,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Star,
            "**" => Self::Pow,
            "/" => Self::FwdSlash,
            "%" => Self::Modulus,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::Lte,
            ">=" => Self::Gte,
            "==" => Self::Eq,
            "!=" => Self::Neq,
            "===" => Self::CaseEq,
            "!==" => Self::CaseNeq,
            "&&" => Self::LogicAnd,
            "||" => Self::LogicOr,
            "!" => Self::LogicNot,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "~" => Self::BitNot,
            "~^" => Self::BitXnor,
            "^~" => Self::BitXnorAlt,
            "~&" => Self::Nand,
            "~|" => Self::Nor,
            "<<" => Self::ShiftL,
            ">>" => Self::ShiftR,
            "<<<" => Self::ArithShiftL,
            ">>>" => Self::ArithShiftR,
            "+:" => Self::PlusColon,
            "-:" => Self::MinusColon,
            "::" => Self::ScopeRes,
            _ => return None,
        })
    }

    fn as_str(&self) -> &str {
        match self {
            Self::ParenL => "(",
            Self::ParenR => ")",
            Self::BrackL => "[",
            Self::BrackR => "]",
            Self::BraceL => "{",
            Self::BraceR => "}",
            Self::AttrL => "(*",
            Self::AttrR => "*)",
            Self::Comma => ",",
            Self::Terminator => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Pound => "#",
            Self::At => "@",
            Self::Question => "?",
            Self::SingleQuote => "'",
            Self::BlockAssign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Pow => "**",
            Self::FwdSlash => "/",
            Self::Modulus => "%",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::CaseEq => "===",
            Self::CaseNeq => "!==",
            Self::LogicAnd => "&&",
            Self::LogicOr => "||",
            Self::LogicNot => "!",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitNot => "~",
            Self::BitXnor => "~^",
            Self::BitXnorAlt => "^~",
            Self::Nand => "~&",
            Self::Nor => "~|",
            Self::ShiftL => "<<",
            Self::ShiftR => ">>",
            Self::ArithShiftL => "<<<",
            Self::ArithShiftR => ">>>",
            Self::PlusColon => "+:",
            Self::MinusColon => "-:",
            Self::ScopeRes => "::",
        }
    }

    /// Checks if the operator opens a nested group that must be balanced.
    pub fn is_opening(&self) -> bool {
        match self {
            Self::ParenL | Self::BrackL | Self::BraceL => true,
            _ => false,
        }
    }

    /// Checks if the operator closes a nested group.
    pub fn is_closing(&self) -> bool {
        match self {
            Self::ParenR | Self::BrackR | Self::BraceR => true,
            _ => false,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
