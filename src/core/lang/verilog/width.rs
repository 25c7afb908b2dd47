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

//! Symbolic bit widths.
//!
//! Widths are derived from the text of a `[msb:lsb]` range. Constant ranges are
//! folded to a number while ranges referencing parameters are kept as
//! expressions, never evaluated.

use super::symbols::statement_to_string;
use super::token::operator::Operator;
use super::token::token::VerilogToken;
use crate::core::lang::lexer::Token;
use regex::Regex;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;

/// Constant widths above this many bits widen to a replication instead of
/// spelling out every digit.
const MAX_LITERAL_BITS: u64 = 1024;

const OPERATORS: &[char] = &['+', '-', '*', '/', '(', ')'];

#[derive(Debug, PartialEq, Clone)]
pub enum Width {
    /// No range was declared (1 bit).
    Scalar,
    Const(u64),
    Expr(String),
}

impl Width {
    /// Derives the width from the tokens found between a range's brackets.
    pub fn from_range(range: &[Token<VerilogToken>]) -> Self {
        match split_top_level(range, &Operator::Colon) {
            Some((msb, lsb)) => Self::from_bounds(msb, lsb),
            // a single size, such as `[8]`
            None => match fold(range) {
                Some(n) => Self::Const(n.unsigned_abs()),
                None => Self::Expr(statement_to_string(range)),
            },
        }
    }

    fn from_bounds(msb: &[Token<VerilogToken>], lsb: &[Token<VerilogToken>]) -> Self {
        let msb_text = statement_to_string(msb);
        let lsb_text = statement_to_string(lsb);
        match (fold(msb), fold(lsb)) {
            (Some(m), Some(l)) => Self::Const(m.abs_diff(l) + 1),
            _ if msb_text == lsb_text => Self::Const(1),
            (_, Some(0)) => Self::from_zero_based(&msb_text),
            // ascending ranges such as `[0:W-1]`
            (Some(0), _) => Self::from_zero_based(&lsb_text),
            _ => match contains_any(&lsb_text, OPERATORS) {
                true => Self::Expr(format!("({}-({})+1)", msb_text, lsb_text)),
                false => Self::Expr(format!("({}-{}+1)", msb_text, lsb_text)),
            },
        }
    }

    /// Derives the width of a range whose other bound is 0.
    fn from_zero_based(bound: &str) -> Self {
        match bound.strip_suffix("-1") {
            Some(base) => Self::Expr(strip_outer_parens(base).to_string()),
            None => Self::Expr(format!("{}+1", bound)),
        }
    }

    /// Writes the width as a declaration range (`[7:0]`), or an empty string
    /// for single-bit widths.
    pub fn to_range(&self) -> String {
        match self {
            Self::Scalar => String::new(),
            Self::Const(n) => match *n <= 1 {
                true => String::new(),
                false => format!("[{}:0]", n - 1),
            },
            Self::Expr(e) => {
                let e = e.trim();
                if let Ok(n) = e.parse::<u64>() {
                    return Self::Const(n).to_range();
                }
                match plus_one().captures(e).and_then(|c| c.get(1)) {
                    Some(base) => {
                        let base = base.as_str().trim();
                        if base.starts_with('$') && base.contains('(') {
                            format!("[{}:0]", base)
                        } else if contains_any(base, &['+', '-', '*', '/', ' ']) {
                            format!("[({}):0]", base)
                        } else {
                            format!("[{}:0]", base)
                        }
                    }
                    None => match contains_any(e, OPERATORS) {
                        true => format!("[({})-1:0]", e),
                        false => format!("[{}-1:0]", e),
                    },
                }
            }
        }
    }

    /// Expands a single binary digit `bit` into a literal of this width.
    pub fn widen(&self, bit: char) -> String {
        match self {
            Self::Scalar => format!("1'b{}", bit),
            Self::Const(n) => match *n {
                0 | 1 => format!("1'b{}", bit),
                n if n > MAX_LITERAL_BITS => format!("{{{}{{1'b{}}}}}", n, bit),
                n => format!("{}'b{}", n, bit.to_string().repeat(n as usize)),
            },
            Self::Expr(e) => match contains_any(e, OPERATORS) {
                true => format!("{{({}){{1'b{}}}}}", e, bit),
                false => format!("{{{}{{1'b{}}}}}", e, bit),
            },
        }
    }
}

impl FromStr for Width {
    type Err = std::convert::Infallible;

    /// Interprets user-supplied width text: a number or a width expression.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(n) => Self::Const(n),
            Err(_) if s.is_empty() => Self::Scalar,
            Err(_) => Self::Expr(s.to_string()),
        })
    }
}

impl Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => write!(f, "1"),
            Self::Const(n) => write!(f, "{}", n),
            Self::Expr(e) => write!(f, "{}", e),
        }
    }
}

fn plus_one() -> &'static Regex {
    static PLUS_ONE: OnceLock<Regex> = OnceLock::new();
    PLUS_ONE.get_or_init(|| Regex::new(r"^(.+?)\s*\+\s*1$").expect("valid regex"))
}

fn contains_any(s: &str, set: &[char]) -> bool {
    s.contains(|c: char| set.contains(&c))
}

/// Removes one pair of parentheses when they enclose the entire expression.
fn strip_outer_parens(s: &str) -> &str {
    let inner = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => inner,
        None => return s,
    };
    // verify the opening parenthesis is closed by the final one
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => (),
        }
        if depth < 0 {
            return s;
        }
    }
    inner
}

/// Splits `stmt` at the first occurrence of `op` that is not nested inside
/// parentheses, brackets, or braces.
pub fn split_top_level<'a>(
    stmt: &'a [Token<VerilogToken>],
    op: &Operator,
) -> Option<(&'a [Token<VerilogToken>], &'a [Token<VerilogToken>])> {
    let mut depth = 0;
    for (i, t) in stmt.iter().enumerate() {
        match t.as_ref().as_delimiter() {
            Some(d) if d.is_opening() => depth += 1,
            Some(d) if d.is_closing() => depth -= 1,
            Some(d) if d == op && depth == 0 => return Some((&stmt[..i], &stmt[i + 1..])),
            _ => (),
        }
    }
    None
}

/// Folds a constant integer expression, returning `None` when it references
/// anything other than numbers.
pub fn fold(stmt: &[Token<VerilogToken>]) -> Option<i64> {
    if stmt.is_empty() {
        return None;
    }
    let mut index = 0;
    let value = parse_additive(stmt, &mut index)?;
    match index == stmt.len() {
        true => Some(value),
        false => None,
    }
}

fn check(stmt: &[Token<VerilogToken>], index: usize, op: &Operator) -> bool {
    stmt.get(index)
        .is_some_and(|t| t.as_ref().check_delimiter(op))
}

fn parse_additive(stmt: &[Token<VerilogToken>], index: &mut usize) -> Option<i64> {
    let mut left = parse_multiplicative(stmt, index)?;
    loop {
        if check(stmt, *index, &Operator::Plus) {
            *index += 1;
            left = left.checked_add(parse_multiplicative(stmt, index)?)?;
        } else if check(stmt, *index, &Operator::Minus) {
            *index += 1;
            left = left.checked_sub(parse_multiplicative(stmt, index)?)?;
        } else {
            return Some(left);
        }
    }
}

fn parse_multiplicative(stmt: &[Token<VerilogToken>], index: &mut usize) -> Option<i64> {
    let mut left = parse_unary(stmt, index)?;
    loop {
        if check(stmt, *index, &Operator::Star) {
            *index += 1;
            left = left.checked_mul(parse_unary(stmt, index)?)?;
        } else if check(stmt, *index, &Operator::FwdSlash) {
            *index += 1;
            left = left.checked_div(parse_unary(stmt, index)?)?;
        } else if check(stmt, *index, &Operator::Modulus) {
            *index += 1;
            left = left.checked_rem(parse_unary(stmt, index)?)?;
        } else {
            return Some(left);
        }
    }
}

fn parse_unary(stmt: &[Token<VerilogToken>], index: &mut usize) -> Option<i64> {
    if check(stmt, *index, &Operator::Minus) {
        *index += 1;
        return parse_unary(stmt, index)?.checked_neg();
    } else if check(stmt, *index, &Operator::Plus) {
        *index += 1;
        return parse_unary(stmt, index);
    }
    let base = parse_primary(stmt, index)?;
    if check(stmt, *index, &Operator::Pow) {
        *index += 1;
        let exp = parse_unary(stmt, index)?;
        return base.checked_pow(u32::try_from(exp).ok()?);
    }
    Some(base)
}

fn parse_primary(stmt: &[Token<VerilogToken>], index: &mut usize) -> Option<i64> {
    let t = stmt.get(*index)?;
    *index += 1;
    if let Some(n) = t.as_ref().as_number() {
        n.as_integer()
    } else if t.as_ref().check_delimiter(&Operator::ParenL) {
        let value = parse_additive(stmt, index)?;
        match check(stmt, *index, &Operator::ParenR) {
            true => {
                *index += 1;
                Some(value)
            }
            false => None,
        }
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::verilog::token::tokenizer::VerilogTokenizer;

    /// Derives a width from the text inside a range's brackets.
    fn width(range: &str) -> Width {
        let mut tokens = VerilogTokenizer::from_source_code(range).into_tokens();
        // drop EOF
        tokens.pop();
        Width::from_range(&tokens)
    }

    #[test]
    fn constant_ranges_fold() {
        assert_eq!(width("7:0"), Width::Const(8));
        assert_eq!(width("0:7"), Width::Const(8));
        assert_eq!(width("2*4-1:0"), Width::Const(8));
        assert_eq!(width("(16/2)-1 : 1"), Width::Const(7));
        assert_eq!(width("2**4-1:0"), Width::Const(16));
        assert_eq!(width("8'hF:0"), Width::Const(16));
        assert_eq!(width("0:0"), Width::Const(1));
        assert_eq!(width("8"), Width::Const(8));
    }

    #[test]
    fn symbolic_ranges_stay_symbolic() {
        assert_eq!(width("WIDTH-1:0"), Width::Expr("WIDTH".to_string()));
        assert_eq!(width("WIDTH - 1 : 0"), Width::Expr("WIDTH".to_string()));
        assert_eq!(width("(A+B)-1:0"), Width::Expr("A+B".to_string()));
        assert_eq!(width("ADDR:0"), Width::Expr("ADDR+1".to_string()));
        assert_eq!(
            width("$clog2(DEPTH):0"),
            Width::Expr("$clog2(DEPTH)+1".to_string())
        );
        assert_eq!(width("HI:LO"), Width::Expr("(HI-LO+1)".to_string()));
        assert_eq!(width("IDX:IDX"), Width::Const(1));
    }

    #[test]
    fn ascending_and_offset_ranges() {
        assert_eq!(width("0:W-1"), Width::Expr("W".to_string()));
        assert_eq!(width("0:ADDR"), Width::Expr("ADDR+1".to_string()));
        assert_eq!(width("HI:LO+1"), Width::Expr("(HI-(LO+1)+1)".to_string()));
        assert_eq!(width("7:LO+1"), Width::Expr("(7-(LO+1)+1)".to_string()));
        assert_eq!(width("0:W-1").widen('1'), "{W{1'b1}}");
    }

    #[test]
    fn ranges_for_declarations() {
        assert_eq!(Width::Scalar.to_range(), "");
        assert_eq!(Width::Const(1).to_range(), "");
        assert_eq!(Width::Const(8).to_range(), "[7:0]");
        assert_eq!(Width::Expr("WIDTH".to_string()).to_range(), "[WIDTH-1:0]");
        assert_eq!(Width::Expr("A*B".to_string()).to_range(), "[(A*B)-1:0]");
        assert_eq!(Width::Expr("ADDR+1".to_string()).to_range(), "[ADDR:0]");
        assert_eq!(Width::Expr("A-B+1".to_string()).to_range(), "[(A-B):0]");
        assert_eq!(
            Width::Expr("$clog2(DEPTH)+1".to_string()).to_range(),
            "[$clog2(DEPTH):0]"
        );
        assert_eq!(Width::Expr("16".to_string()).to_range(), "[15:0]");
    }

    #[test]
    fn literal_widening() {
        assert_eq!(Width::Scalar.widen('1'), "1'b1");
        assert_eq!(Width::Const(1).widen('0'), "1'b0");
        assert_eq!(Width::Const(8).widen('1'), "8'b11111111");
        assert_eq!(Width::Const(4).widen('0'), "4'b0000");
        assert_eq!(Width::Const(1 << 40).widen('1'), "{1099511627776{1'b1}}");
        assert_eq!(Width::Expr("WIDTH".to_string()).widen('1'), "{WIDTH{1'b1}}");
        assert_eq!(
            Width::Expr("ADDR+1".to_string()).widen('0'),
            "{(ADDR+1){1'b0}}"
        );
    }

    #[test]
    fn width_from_user_text() {
        assert_eq!(Width::from_str("8"), Ok(Width::Const(8)));
        assert_eq!(Width::from_str(" W*2 "), Ok(Width::Expr("W*2".to_string())));
        assert_eq!(Width::from_str(""), Ok(Width::Scalar));
    }
}
