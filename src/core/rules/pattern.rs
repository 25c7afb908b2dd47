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

//! Wildcard patterns.
//!
//! A pattern is literal text where each `*` stands for any (possibly empty)
//! run of characters. Patterns always match against the entire name.

use regex::Regex;

use super::error::PatternError;

#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    wildcards: usize,
    matcher: Regex,
}

impl Pattern {
    /// Compiles the pattern text into an anchored matcher with one capture
    /// group per wildcard.
    pub fn compile(text: &str) -> Result<Self, PatternError> {
        let pieces: Vec<String> = text.split('*').map(regex::escape).collect();
        let expr = format!("^{}$", pieces.join("(.*)"));
        let matcher = Regex::new(&expr).map_err(|_| PatternError::Malformed(text.to_string()))?;
        Ok(Self {
            text: text.to_string(),
            wildcards: pieces.len() - 1,
            matcher: matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn wildcards(&self) -> usize {
        self.wildcards
    }

    /// Attempts to match the entire `candidate`, returning the substring
    /// consumed by each wildcard from left to right.
    pub fn captures(&self, candidate: &str) -> Option<Vec<String>> {
        let caps = self.matcher.captures(candidate)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn literal_pattern() {
        let p = Pattern::compile("clk").unwrap();
        assert_eq!(p.wildcards(), 0);
        assert_eq!(p.captures("clk"), Some(vec![]));
        assert_eq!(p.captures("clk_en"), None);
        assert_eq!(p.captures("sys_clk"), None);
    }

    #[test]
    fn wildcards_capture_in_order() {
        let p = Pattern::compile("*_to_*").unwrap();
        assert_eq!(p.wildcards(), 2);
        assert_eq!(
            p.captures("cpu_to_mem"),
            Some(vec!["cpu".to_string(), "mem".to_string()])
        );
        // the first wildcard is greedy but backtracks
        assert_eq!(
            p.captures("a_to_b_to_c"),
            Some(vec!["a_to_b".to_string(), "c".to_string()])
        );
        assert_eq!(p.captures("cpu_mem"), None);
    }

    #[test]
    fn wildcard_matches_empty_text() {
        let p = Pattern::compile("data*").unwrap();
        assert_eq!(p.captures("data"), Some(vec![String::new()]));
        let p = Pattern::compile("*").unwrap();
        assert!(p.is_match(""));
    }

    #[test]
    fn special_characters_are_literal() {
        let p = Pattern::compile("bus[*].d").unwrap();
        assert_eq!(p.captures("bus[3].d"), Some(vec!["3".to_string()]));
        assert_eq!(p.captures("bus[3]xd"), None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let p = Pattern::compile("CLK*").unwrap();
        assert!(p.is_match("CLK_A"));
        assert!(p.is_match("clk_a") == false);
    }
}
