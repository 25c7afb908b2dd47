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

//! Resolves conditional compilation and macro references ahead of parsing.
//!
//! Directive lines and lines inside untaken branches are blanked rather than
//! removed so positions reported by the parser still match the source file.

use super::error::VerilogError;
use super::token::tokenizer::char_set;
use crate::core::macros::MacroSet;

/// Nested macro references are expanded at most this many times.
const MAX_EXPANSION_DEPTH: usize = 16;

/// Represents the state of a conditional compilation block (`ifdef ... `endif).
#[derive(Debug, PartialEq)]
enum BranchState {
    /// No branch has been taken yet; searching for an `elsif or `else that is.
    Searching,
    /// The current branch is taken.
    Active,
    /// A branch was already taken (or the enclosing block is not taken), so
    /// every remaining branch is skipped.
    Done,
}

struct Preprocessor {
    macros: MacroSet,
    if_stack: Vec<(BranchState, usize)>,
}

/// Returns `source` with conditional regions resolved against `macros` and
/// every reference to a defined macro replaced by its value.
pub fn preprocess(source: &str, macros: &MacroSet) -> Result<String, VerilogError> {
    let mut pp = Preprocessor {
        macros: macros.clone(),
        if_stack: Vec::new(),
    };
    pp.run(source)
}

impl Preprocessor {
    fn is_active(&self) -> bool {
        self.if_stack
            .last()
            .map_or(true, |(state, _)| state == &BranchState::Active)
    }

    fn run(&mut self, source: &str) -> Result<String, VerilogError> {
        let mut output = Vec::new();
        for (i, line) in source.split('\n').enumerate() {
            let line_no = i + 1;
            let keep = match Self::directive(line) {
                Some((name, rest)) => self.handle_directive(line_no, name, rest)?,
                None => true,
            };
            match keep && self.is_active() {
                true => output.push(self.expand(line)),
                false => output.push(match line.ends_with('\r') {
                    true => String::from("\r"),
                    false => String::new(),
                }),
            }
        }
        if let Some((_, opened)) = self.if_stack.last() {
            return Err(VerilogError::UnterminatedConditional(*opened));
        }
        Ok(output.join("\n"))
    }

    /// Splits a line beginning with a compiler directive into its name and the
    /// remaining text.
    fn directive(line: &str) -> Option<(&str, &str)> {
        let body = line.trim_start().strip_prefix(char_set::GRAVE_ACCENT)?;
        let end = body
            .find(|c: char| char_set::is_identifier_character(&c) == false)
            .unwrap_or(body.len());
        Some((&body[..end], &body[end..]))
    }

    /// Takes the first word (macro name) from the text following a directive.
    fn operand(rest: &str) -> Option<&str> {
        let rest = rest.trim_start();
        let end = rest
            .find(|c: char| char_set::is_identifier_character(&c) == false)
            .unwrap_or(rest.len());
        match end {
            0 => None,
            _ => Some(&rest[..end]),
        }
    }

    /// Updates the conditional state for a directive line.
    ///
    /// Returns `true` when the line is not a conditional-compilation or macro
    /// definition directive and should be treated as regular text.
    fn handle_directive(
        &mut self,
        line_no: usize,
        name: &str,
        rest: &str,
    ) -> Result<bool, VerilogError> {
        let require =
            || Self::operand(rest).ok_or(VerilogError::MissingMacroName(line_no, name.to_string()));
        match name {
            "ifdef" | "ifndef" => {
                let target = require()?;
                let state = if self.is_active() == false {
                    BranchState::Done
                } else if self.macros.is_defined(target) == (name == "ifdef") {
                    BranchState::Active
                } else {
                    BranchState::Searching
                };
                self.if_stack.push((state, line_no));
            }
            "elsif" => {
                let target = require()?;
                let taken = self.macros.is_defined(target);
                match self.if_stack.last_mut() {
                    Some((top, _)) => {
                        if *top == BranchState::Searching && taken == true {
                            *top = BranchState::Active;
                        } else if *top == BranchState::Active {
                            *top = BranchState::Done;
                        }
                    }
                    None => return Err(VerilogError::UnmatchedConditional(line_no, name.to_string())),
                }
            }
            "else" => match self.if_stack.last_mut() {
                Some((top, _)) => {
                    if *top == BranchState::Searching {
                        *top = BranchState::Active;
                    } else if *top == BranchState::Active {
                        *top = BranchState::Done;
                    }
                }
                None => return Err(VerilogError::UnmatchedConditional(line_no, name.to_string())),
            },
            "endif" => {
                if self.if_stack.pop().is_none() {
                    return Err(VerilogError::UnmatchedConditional(line_no, name.to_string()));
                }
            }
            "define" => {
                if self.is_active() == true {
                    let target = require()?;
                    let value = rest.trim_start()[target.len()..].trim();
                    let value = match value.find("//") {
                        Some(i) => value[..i].trim_end(),
                        None => value,
                    };
                    self.macros
                        .define(target, if value.is_empty() { None } else { Some(value) });
                }
            }
            "undef" => {
                if self.is_active() == true {
                    let target = require()?;
                    self.macros.undefine(target);
                }
            }
            _ => return Ok(true),
        }
        Ok(false)
    }

    /// Replaces every reference to a defined macro in `line` with its value.
    ///
    /// References to unknown macros are left in place.
    fn expand(&self, line: &str) -> String {
        let mut current = line.to_string();
        for _ in 0..MAX_EXPANSION_DEPTH {
            let mut result = String::with_capacity(current.len());
            let mut changed = false;
            let mut rest = current.as_str();
            while let Some(i) = rest.find(char_set::GRAVE_ACCENT) {
                result.push_str(&rest[..i]);
                let after = &rest[i + 1..];
                let end = after
                    .find(|c: char| char_set::is_identifier_character(&c) == false)
                    .unwrap_or(after.len());
                match self.macros.expansion(&after[..end]) {
                    Some(value) if end > 0 => {
                        result.push_str(value);
                        changed = true;
                    }
                    _ => {
                        result.push(char_set::GRAVE_ACCENT);
                        result.push_str(&after[..end]);
                    }
                }
                rest = &after[end..];
            }
            result.push_str(rest);
            current = result;
            if changed == false {
                break;
            }
        }
        current
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    const SRC: &str = "module m (
`ifdef USE_DEBUG
    output wire [7:0] dbg,
`elsif USE_TRACE
    output wire trace,
`else
    output wire none,
`endif
    input wire clk
);";

    #[test]
    fn takes_first_true_branch() {
        let out = preprocess(SRC, &MacroSet::from_str("USE_DEBUG,USE_TRACE").unwrap()).unwrap();
        assert!(out.contains("dbg"));
        assert!(out.contains("trace") == false);
        assert!(out.contains("none") == false);
    }

    #[test]
    fn falls_through_to_elsif_and_else() {
        let out = preprocess(SRC, &MacroSet::from_str("USE_TRACE").unwrap()).unwrap();
        assert!(out.contains("trace"));
        assert!(out.contains("dbg") == false);

        let out = preprocess(SRC, &MacroSet::new()).unwrap();
        assert!(out.contains("none"));
        assert!(out.contains("clk"));
    }

    #[test]
    fn line_count_is_preserved() {
        let out = preprocess(SRC, &MacroSet::new()).unwrap();
        assert_eq!(out.split('\n').count(), SRC.split('\n').count());
        assert_eq!(out.split('\n').nth(6), Some("    output wire none,"));
    }

    #[test]
    fn nested_blocks() {
        let src = "`ifdef A
`ifndef B
a_not_b
`else
a_and_b
`endif
`else
`ifdef B
b_only
`endif
`endif";
        let run = |m: &str| {
            preprocess(src, &MacroSet::from_str(m).unwrap())
                .unwrap()
                .split_whitespace()
                .collect::<Vec<&str>>()
                .join(" ")
        };
        assert_eq!(run("A"), "a_not_b");
        assert_eq!(run("A,B"), "a_and_b");
        assert_eq!(run("B"), "b_only");
        assert_eq!(run(""), "");
    }

    #[test]
    fn substitutes_known_macros_only() {
        let macros = MacroSet::from_str("WIDTH=32").unwrap();
        let out = preprocess("input [`WIDTH-1:0] a, [`DEPTH:0] b", &macros).unwrap();
        assert_eq!(out, "input [32-1:0] a, [`DEPTH:0] b");
    }

    #[test]
    fn value_less_macro_expands_to_nothing() {
        let macros = MacroSet::from_str("EMPTY").unwrap();
        assert_eq!(preprocess("a`EMPTY b", &macros).unwrap(), "a b");
    }

    #[test]
    fn in_file_defines_apply_to_later_lines() {
        let src = "`define BUS 16 // bus width
`ifdef BUS
wire [`BUS-1:0] x;
`endif
`undef BUS
`ifdef BUS
gone
`endif";
        let out = preprocess(src, &MacroSet::new()).unwrap();
        assert!(out.contains("wire [16-1:0] x;"));
        assert!(out.contains("gone") == false);
    }

    #[test]
    fn other_directives_pass_through() {
        let out = preprocess("`timescale 1ns/1ps", &MacroSet::new()).unwrap();
        assert_eq!(out, "`timescale 1ns/1ps");
    }

    #[test]
    fn unbalanced_conditionals() {
        assert_eq!(
            preprocess("a\n`endif", &MacroSet::new()),
            Err(VerilogError::UnmatchedConditional(2, "endif".to_string()))
        );
        assert_eq!(
            preprocess("`ifdef A\nb", &MacroSet::new()),
            Err(VerilogError::UnterminatedConditional(1))
        );
        assert_eq!(
            preprocess("`ifdef\n`endif", &MacroSet::new()),
            Err(VerilogError::MissingMacroName(1, "ifdef".to_string()))
        );
    }
}
