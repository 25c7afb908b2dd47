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

//! Target templates.
//!
//! A template is literal text containing capture references and function
//! expressions:
//! - `*` takes the next capture in order, `*N` takes capture `N`
//! - `${fn(args)}` applies a string function, where arguments are capture
//!   references, quoted strings, nested calls, or `+` concatenations of those
//! - `/* ... */` comments are copied through untouched

use super::error::PatternError;
use crate::core::lang::lexer::TrainCar;
use std::str::Chars;

/// Resolves `template` using the `captures` of a matched pattern.
pub fn substitute(template: &str, captures: &[String]) -> Result<String, PatternError> {
    let mut train = TrainCar::new(template.chars());
    let mut result = String::with_capacity(template.len());
    let mut next_bare = 0;

    while let Some(c) = train.consume() {
        match c {
            '/' if train.peek() == Some(&'*') => {
                result.push(c);
                copy_comment(&mut train, &mut result);
            }
            '$' if train.peek() == Some(&'{') => {
                train.consume();
                let body = take_function_body(&mut train)
                    .ok_or_else(|| PatternError::Malformed(template.to_string()))?;
                result.push_str(&FunctionExpr::new(&body, captures).evaluate()?);
            }
            '*' => {
                let index = match take_index(&mut train) {
                    Some(i) => i,
                    None => {
                        next_bare += 1;
                        next_bare - 1
                    }
                };
                result.push_str(capture(captures, index)?);
            }
            _ => result.push(c),
        }
    }
    Ok(result)
}

/// Separates a template's `/* ... */` comments from the rest of its text.
///
/// Returns the text with the comments removed and the comments concatenated
/// in order.
pub fn split_comments(text: &str) -> (String, String) {
    let mut train = TrainCar::new(text.chars());
    let mut body = String::new();
    let mut comments = String::new();
    while let Some(c) = train.consume() {
        match c {
            '/' if train.peek() == Some(&'*') => {
                comments.push(c);
                copy_comment(&mut train, &mut comments);
            }
            _ => body.push(c),
        }
    }
    (body, comments)
}

fn capture(captures: &[String], index: usize) -> Result<&str, PatternError> {
    captures
        .get(index)
        .map(|s| s.as_str())
        .ok_or(PatternError::OutOfRange {
            index: index,
            captures: captures.len(),
        })
}

/// Copies the remainder of a block comment whose opening `/` was already
/// taken.
fn copy_comment(train: &mut TrainCar<Chars>, dest: &mut String) {
    // take the opening '*'
    if let Some(c) = train.consume() {
        dest.push(c);
    }
    let mut prev = None;
    while let Some(c) = train.consume() {
        dest.push(c);
        if prev == Some('*') && c == '/' {
            break;
        }
        prev = Some(c);
    }
}

/// Takes the decimal index following a `*`, if one is written.
fn take_index(train: &mut TrainCar<Chars>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(c) = train.consume_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    match digits.is_empty() {
        true => None,
        false => Some(digits.parse::<usize>().unwrap_or(usize::MAX)),
    }
}

/// Takes the text up to the `}` closing a function expression. Returns `None`
/// if the expression is never closed.
fn take_function_body(train: &mut TrainCar<Chars>) -> Option<String> {
    let mut body = String::new();
    let mut quote: Option<char> = None;
    while let Some(c) = train.consume() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => (),
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '}' => return Some(body),
            None => (),
        }
        body.push(c);
    }
    None
}

/// The contents of a single `${...}` expression.
struct FunctionExpr<'a> {
    source: &'a str,
    train: TrainCar<Chars<'a>>,
    captures: &'a [String],
}

impl<'a> FunctionExpr<'a> {
    fn new(source: &'a str, captures: &'a [String]) -> Self {
        Self {
            source: source,
            train: TrainCar::new(source.chars()),
            captures: captures,
        }
    }

    fn unsupported(&self) -> PatternError {
        PatternError::UnsupportedFunction(self.source.to_string())
    }

    fn evaluate(mut self) -> Result<String, PatternError> {
        let value = self.parse_concat()?;
        self.skip_whitespace();
        match self.train.peek() {
            None => Ok(value),
            Some(_) => Err(self.unsupported()),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.train.consume_if(|c| c.is_whitespace()).is_some() {}
    }

    /// - concat ::= term { `+` term }
    fn parse_concat(&mut self) -> Result<String, PatternError> {
        let mut value = self.parse_term()?;
        loop {
            self.skip_whitespace();
            match self.train.consume_if(|c| c == &'+') {
                Some(_) => value.push_str(&self.parse_term()?),
                None => return Ok(value),
            }
        }
    }

    /// - term ::= capture | string | call
    fn parse_term(&mut self) -> Result<String, PatternError> {
        self.skip_whitespace();
        match self.train.consume() {
            Some('*') => {
                // a bare wildcard refers to the first capture
                let index = take_index(&mut self.train).unwrap_or(0);
                capture(self.captures, index).map(|s| s.to_string())
            }
            Some(q) if q == '\'' || q == '"' => self.parse_string(q),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                while let Some(c) = self
                    .train
                    .consume_if(|c| c.is_ascii_alphanumeric() || c == &'_')
                {
                    name.push(c);
                }
                let args = self.parse_args()?;
                self.apply(&name, args)
            }
            _ => Err(self.unsupported()),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, PatternError> {
        let mut value = String::new();
        while let Some(c) = self.train.consume() {
            if c == quote {
                return Ok(value);
            } else if c == '\\' {
                match self.train.consume() {
                    Some(e) => value.push(e),
                    None => break,
                }
            } else {
                value.push(c);
            }
        }
        Err(self.unsupported())
    }

    /// - args ::= `(` [ concat { `,` concat } ] `)`
    fn parse_args(&mut self) -> Result<Vec<String>, PatternError> {
        self.skip_whitespace();
        if self.train.consume_if(|c| c == &'(').is_none() {
            return Err(self.unsupported());
        }
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.train.consume_if(|c| c == &')').is_some() {
            return Ok(args);
        }
        loop {
            args.push(self.parse_concat()?);
            self.skip_whitespace();
            match self.train.consume() {
                Some(',') => continue,
                Some(')') => return Ok(args),
                _ => return Err(self.unsupported()),
            }
        }
    }

    fn apply(&self, function: &str, args: Vec<String>) -> Result<String, PatternError> {
        let arity = |expected: &str| PatternError::BadArity {
            function: function.to_string(),
            expected: expected.to_string(),
            got: args.len(),
        };
        match function {
            "upper" | "lower" | "title" | "capitalize" => {
                let s = match args.as_slice() {
                    [s] => s,
                    _ => return Err(arity("1")),
                };
                Ok(match function {
                    "upper" => s.to_uppercase(),
                    "lower" => s.to_lowercase(),
                    "title" => title(s),
                    _ => capitalize(s),
                })
            }
            "strip" | "lstrip" | "rstrip" => {
                let (s, set) = match args.as_slice() {
                    [s] => (s, None),
                    [s, set] => (s, Some(set)),
                    _ => return Err(arity("1 or 2")),
                };
                let is_stripped = |c: char| match set {
                    Some(set) => set.contains(c),
                    None => c.is_whitespace(),
                };
                Ok(match function {
                    "strip" => s.trim_matches(is_stripped),
                    "lstrip" => s.trim_start_matches(is_stripped),
                    _ => s.trim_end_matches(is_stripped),
                }
                .to_string())
            }
            "replace" => match args.as_slice() {
                [s, old, new] => Ok(s.replace(old.as_str(), new)),
                _ => Err(arity("3")),
            },
            _ => Err(self.unsupported()),
        }
    }
}

/// Uppercases the first letter of every word and lowercases the rest, where
/// any non-letter separates words.
fn title(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        match c.is_alphabetic() {
            true => match in_word {
                true => result.extend(c.to_lowercase()),
                false => result.extend(c.to_uppercase()),
            },
            false => result.push(c),
        }
        in_word = c.is_alphabetic();
    }
    result
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn caps(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn capture_references() {
        let c = caps(&["cpu", "mem"]);
        assert_eq!(substitute("*_*", &c).unwrap(), "cpu_mem");
        assert_eq!(substitute("*1_*0", &c).unwrap(), "mem_cpu");
        assert_eq!(substitute("w_*1", &c).unwrap(), "w_mem");
        assert_eq!(substitute("fixed", &c).unwrap(), "fixed");
    }

    #[test]
    fn function_expressions() {
        let c = caps(&["cpu", "mem"]);
        assert_eq!(
            substitute("${upper(*0)}_TO_${lower(*1)}", &c).unwrap(),
            "CPU_TO_mem"
        );
        assert_eq!(substitute("${upper(*)}", &c).unwrap(), "CPU");
        assert_eq!(substitute("${upper(lower(*1) + '_q')}", &c).unwrap(), "MEM_Q");
        assert_eq!(
            substitute("${replace(*0, \"c\", 'C')}_x", &c).unwrap(),
            "Cpu_x"
        );
    }

    #[test]
    fn python_like_string_functions() {
        let c = caps(&["data_in_bus", "__x__", "aBC"]);
        assert_eq!(substitute("${title(*0)}", &c).unwrap(), "Data_In_Bus");
        assert_eq!(substitute("${capitalize(*2)}", &c).unwrap(), "Abc");
        assert_eq!(substitute("${strip(*1, '_')}", &c).unwrap(), "x");
        assert_eq!(substitute("${lstrip(*1, '_')}", &c).unwrap(), "x__");
        assert_eq!(substitute("${rstrip(*1, '_')}", &c).unwrap(), "__x");
        assert_eq!(title("abc1def"), "Abc1Def");
    }

    #[test]
    fn comments_are_copied_verbatim() {
        let c = caps(&["a"]);
        assert_eq!(
            substitute("sig_* /* uses * and ${x} */", &c).unwrap(),
            "sig_a /* uses * and ${x} */"
        );
        assert_eq!(
            split_comments("1 /* tie off */"),
            ("1 ".to_string(), "/* tie off */".to_string())
        );
    }

    #[test]
    fn substitution_errors() {
        let c = caps(&["a"]);
        assert_eq!(
            substitute("*_*", &c),
            Err(PatternError::OutOfRange {
                index: 1,
                captures: 1
            })
        );
        assert_eq!(
            substitute("${eval(*0)}", &c),
            Err(PatternError::UnsupportedFunction("eval(*0)".to_string()))
        );
        assert_eq!(
            substitute("${*0.upper()}", &c),
            Err(PatternError::UnsupportedFunction("*0.upper()".to_string()))
        );
        assert_eq!(
            substitute("${upper(*0, *0)}", &c),
            Err(PatternError::BadArity {
                function: "upper".to_string(),
                expected: "1".to_string(),
                got: 2
            })
        );
        assert_eq!(
            substitute("${upper(*0)", &c),
            Err(PatternError::Malformed("${upper(*0)".to_string()))
        );
    }
}
