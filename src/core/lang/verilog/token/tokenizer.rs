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
use super::token::VerilogToken;
use crate::core::lang::lexer::{Token, TokenError, Tokenize, TrainCar};

pub mod char_set {
    pub const DOUBLE_QUOTE: char = '\"';
    pub const SINGLE_QUOTE: char = '\'';
    pub const STAR: char = '*';
    pub const PLUS: char = '+';
    pub const MINUS: char = '-';
    pub const FWD_SLASH: char = '/';
    pub const UNDER_SCORE: char = '_';
    pub const DOLLAR_SIGN: char = '$';
    pub const GRAVE_ACCENT: char = '`';
    pub const ESC: char = '\\';
    pub const DOT: char = '.';

    /// Checks if `c` is an ASCII letter.
    pub fn is_letter(c: &char) -> bool {
        c.is_ascii_alphabetic()
    }

    pub fn is_digit(c: &char) -> bool {
        c.is_ascii_digit()
    }

    pub fn is_newline(c: &char) -> bool {
        c == &'\n'
    }

    pub fn is_digit_or_underscore(c: &char) -> bool {
        is_digit(c) || c == &UNDER_SCORE
    }

    /// The set of characters \[a-z]\[A-Z]\[0-9]\[_]\[$] are allowed in identifiers
    /// after the initial letter is captured.
    pub fn is_identifier_character(c: &char) -> bool {
        c.is_ascii_alphanumeric() || c == &UNDER_SCORE || c == &DOLLAR_SIGN
    }

    pub fn is_exponent(c: &char) -> bool {
        c == &'e' || c == &'E'
    }

    pub fn is_base_specifier(c: &char) -> bool {
        match c {
            'd' | 'D' | 'h' | 'H' | 'o' | 'O' | 'b' | 'B' => true,
            _ => false,
        }
    }

    /// Digits allowed in an unbased unsized literal (`'0`, `'1`, `'x`, `'z`).
    pub fn is_unbased_digit(c: &char) -> bool {
        match c {
            '0' | '1' | 'x' | 'X' | 'z' | 'Z' => true,
            _ => false,
        }
    }

    pub fn is_digit_or_underscore_or_signal_char(c: &char) -> bool {
        c.is_ascii_hexdigit()
            || c == &UNDER_SCORE
            || c == &'x'
            || c == &'X'
            || c == &'z'
            || c == &'Z'
            || c == &'?'
    }

    // White space shall contain the characters for spaces, tabs, newlines, and formfeeds.
    pub fn is_whitespace(c: &char) -> bool {
        c == &' ' || c == &'\t' || c == &'\n' || c == &'\r' || c == &'\u{000B}' || c == &'\u{000C}'
    }

    pub fn is_not_whitespace(c: &char) -> bool {
        is_whitespace(c) == false
    }
}

#[derive(Debug, PartialEq)]
pub struct VerilogTokenizer {
    tokens: Vec<Result<Token<VerilogToken>, TokenError<VerilogError>>>,
}

impl Tokenize for VerilogTokenizer {
    type TokenType = VerilogToken;
    type Err = VerilogError;

    fn tokenize(s: &str) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> {
        let mut train = TrainCar::new(s.chars());
        let mut tokens: Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> = Vec::new();
        while let Some(c) = train.consume() {
            if char_set::is_whitespace(&c) == true {
                continue;
            }
            let tk_loc = train.locate().clone();
            let next = train.peek().copied();
            let result = if char_set::is_letter(&c) == true
                || c == char_set::UNDER_SCORE
                || c == char_set::DOLLAR_SIGN
            {
                Ok(VerilogToken::consume_word(&mut train, c))
            } else if c == char_set::ESC {
                Ok(VerilogToken::consume_escaped_identifier(&mut train))
            } else if c == char_set::DOUBLE_QUOTE {
                VerilogToken::consume_str_literal(&mut train)
            } else if char_set::is_digit(&c) == true || c == char_set::SINGLE_QUOTE {
                VerilogToken::consume_number(&mut train, c)
            } else if c == char_set::FWD_SLASH && next == Some(char_set::FWD_SLASH) {
                Ok(VerilogToken::consume_oneline_comment(&mut train))
            } else if c == char_set::FWD_SLASH && next == Some(char_set::STAR) {
                VerilogToken::consume_block_comment(&mut train)
            } else if c == char_set::GRAVE_ACCENT {
                VerilogToken::consume_compiler_directive(&mut train)
            } else {
                VerilogToken::consume_operator(&mut train, c)
            };
            tokens.push(match result {
                Ok(tk) => Ok(Token::new(tk, tk_loc)),
                Err(e) => Err(TokenError::new(e, train.locate().clone())),
            });
        }
        // push final EOF token
        tokens.push(Ok(Token::new(VerilogToken::EOF, train.locate().clone())));
        tokens
    }
}

impl VerilogTokenizer {
    /// Generates a `VerilogTokenizer` struct from source code `s`.
    pub fn from_source_code(s: &str) -> Self {
        Self {
            tokens: Self::tokenize(s),
        }
    }

    /// Transforms the list of results into a list of tokens, skipping over
    /// errors and comments.
    ///
    /// Errors are reported through the log since the extractor only needs a
    /// module's declarations and can tolerate constructs it does not understand
    /// elsewhere in the file.
    pub fn into_tokens(self) -> Vec<Token<VerilogToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f {
                Ok(t) => match t.as_ref().is_comment() {
                    true => None,
                    false => Some(t),
                },
                Err(e) => {
                    log::debug!("skipping unrecognized source text at {}", e);
                    None
                }
            })
            .collect()
    }

    /// Collects every error found while tokenizing.
    pub fn errors(&self) -> Vec<&TokenError<VerilogError>> {
        self.tokens.iter().filter_map(|f| f.as_ref().err()).collect()
    }
}

#[cfg(test)]
mod test {
    use super::super::identifier::Identifier;
    use super::super::keyword::Keyword;
    use super::super::number::Number;
    use super::super::operator::Operator;
    use super::*;

    fn types(s: &str) -> Vec<VerilogToken> {
        VerilogTokenizer::tokenize(s)
            .into_iter()
            .map(|f| f.unwrap().take())
            .collect()
    }

    #[test]
    fn module_header() {
        let s = r#"module fifo #(parameter WIDTH = 8) (
    input wire [WIDTH-1:0] data_in, // incoming
    output reg valid
);"#;
        let tokens = types(s);
        assert_eq!(tokens[0], VerilogToken::Keyword(Keyword::Module));
        assert_eq!(
            tokens[1],
            VerilogToken::Identifier(Identifier::Basic("fifo".to_string()))
        );
        assert_eq!(tokens[2], VerilogToken::Operator(Operator::Pound));
        assert!(tokens.contains(&VerilogToken::Comment(
            super::super::token::Comment::OneLine(" incoming".to_string())
        )));
        assert_eq!(tokens.last(), Some(&VerilogToken::EOF));
        assert_eq!(tokens.len(), 28);
    }

    #[test]
    fn based_numbers() {
        let valid_cases = vec![
            ("8'hFF", "8'hFF"),
            ("'o7460", "'o7460"),
            ("16'hz", "16'hz"),
            ("4 'sd15", "4'sd15"),
            ("16'b0011_0101", "16'b0011_0101"),
        ];
        for (s, expected) in valid_cases {
            let tokens = types(s);
            assert_eq!(
                tokens[0],
                VerilogToken::Number(Number::Based(expected.to_string()))
            );
            assert_eq!(tokens.len(), 2);
        }
    }

    #[test]
    fn real_and_decimal_numbers() {
        assert_eq!(
            types("1_000")[0],
            VerilogToken::Number(Number::Decimal("1_000".to_string()))
        );
        for s in ["1.2", "2394.26331", "1.2E12", "1.30e-2", "23E10"] {
            assert_eq!(types(s)[0], VerilogToken::Number(Number::Real(s.to_string())));
        }
        assert_eq!(
            types("'1")[0],
            VerilogToken::Number(Number::Unbased("'1".to_string()))
        );
    }

    #[test]
    fn invalid_numbers() {
        for s in ["9.;", "8'q1;", "4'b;"] {
            let errors = VerilogTokenizer::from_source_code(s).errors().len();
            assert_eq!(errors, 1, "{}", s);
        }
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            types("a<<<=b")[1],
            VerilogToken::Operator(Operator::ArithShiftL)
        );
        assert_eq!(types("x[7-:4]")[3], VerilogToken::Operator(Operator::MinusColon));
        assert_eq!(types("(* keep *)")[0], VerilogToken::Operator(Operator::AttrL));
    }

    #[test]
    fn directives_and_system_identifiers() {
        let tokens = types("`WIDTH $clog2(DEPTH)");
        assert_eq!(tokens[0], VerilogToken::Directive("WIDTH".to_string()));
        assert_eq!(
            tokens[1],
            VerilogToken::Identifier(Identifier::System("$clog2".to_string()))
        );
        assert_eq!(tokens[0].to_string(), "`WIDTH");
    }

    #[test]
    fn skipped_errors_keep_remaining_tokens() {
        let tokens = VerilogTokenizer::from_source_code("a ` b").into_tokens();
        // `a`, `b`, EOF
        assert_eq!(tokens.len(), 3);
    }
}
