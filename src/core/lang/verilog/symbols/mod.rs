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

use std::iter::Peekable;

use super::error::VerilogError;
use super::interface::{Declaration, ParamList, PortList};
use super::token::identifier::Identifier;
use super::token::keyword::Keyword;
use super::token::operator::Operator;
use super::token::token::VerilogToken;
use super::token::tokenizer::VerilogTokenizer;
use crate::core::lang::lexer::{Position, Token};

pub mod module;

use module::Module;

pub type Statement = Vec<Token<VerilogToken>>;

/// Writes the tokens back out as compact source text.
///
/// Tokens are joined without whitespace unless two word-like tokens are
/// adjacent, so `WIDTH - 1` becomes `WIDTH-1`.
pub fn statement_to_string(stmt: &[Token<VerilogToken>]) -> String {
    let mut result = String::new();
    let mut prev_wordlike = false;
    for t in stmt {
        let wordlike = t.as_ref().is_wordlike();
        if prev_wordlike == true && wordlike == true {
            result.push(' ');
        }
        result.push_str(&t.as_ref().to_string());
        prev_wordlike = wordlike;
    }
    result
}

#[derive(Debug, PartialEq)]
pub enum VerilogSymbol {
    Module(Module),
}

impl VerilogSymbol {
    pub fn as_name(&self) -> &Identifier {
        match &self {
            Self::Module(m) => m.get_name(),
        }
    }

    pub fn into_module(self) -> Option<Module> {
        match self {
            Self::Module(m) => Some(m),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct VerilogParser {
    symbols: Vec<VerilogSymbol>,
}

/// The kind of names being collected by a declaration list.
#[derive(Debug, PartialEq, Clone, Copy)]
enum ListKind {
    Parameters,
    Ports,
}

impl VerilogParser {
    /// Reports the first error discovered while parsing the symbols.
    ///
    /// When `stop_at` names a module, parsing ends once that module is read so
    /// later declarations cannot fail it. Characters that cannot be tokenized
    /// are skipped; the declarations of interest rarely contain them.
    pub fn read(s: &str, stop_at: Option<&str>) -> Result<Self, VerilogError> {
        let symbols = Self::parse(VerilogTokenizer::from_source_code(s).into_tokens(), stop_at);
        let result: Result<Vec<VerilogSymbol>, VerilogError> = symbols.into_iter().collect();
        Ok(Self { symbols: result? })
    }

    pub fn into_symbols(self) -> Vec<VerilogSymbol> {
        self.symbols
    }

    fn parse(
        tokens: Vec<Token<VerilogToken>>,
        stop_at: Option<&str>,
    ) -> Vec<Result<VerilogSymbol, VerilogError>> {
        let mut symbols = Vec::new();
        let mut tokens = tokens.into_iter().peekable();

        while let Some(t) = tokens.next() {
            // skip over attributes
            if t.as_ref().check_delimiter(&Operator::AttrL) {
                if let Err(e) = VerilogSymbol::parse_attr(&mut tokens, t.into_position()) {
                    symbols.push(Err(e));
                }
            // create module symbol
            } else if t.as_ref().check_keyword(&Keyword::Module)
                || t.as_ref().check_keyword(&Keyword::Macromodule)
            {
                let module = Module::from_tokens(&mut tokens, t.into_position());
                let found = match (&module, stop_at) {
                    (Ok(m), Some(name)) => m.get_name().as_str() == name,
                    _ => false,
                };
                symbols.push(module.map(VerilogSymbol::Module));
                if found == true {
                    break;
                }
            }
            // anything else at the top level (directives, packages) is not of interest
        }
        symbols
    }
}

impl VerilogSymbol {
    /// Collects tokens until the next top-level `,`, `)`, or `;`, which is
    /// left in the stream.
    fn parse_assignment<I>(tokens: &mut Peekable<I>) -> Result<Statement, VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut stmt = Vec::new();
        while let Some(t) = tokens.peek() {
            if t.as_ref().check_delimiter(&Operator::Terminator)
                || t.as_ref().check_delimiter(&Operator::Comma)
                || t.as_ref().check_delimiter(&Operator::ParenR)
            {
                break;
            } else if t.as_ref().is_eof() == true {
                return Err(VerilogError::ExpectingOperator(
                    t.locate().clone(),
                    Operator::Terminator,
                ));
            }
            // the peek guarantees a token is available
            let t = match tokens.next() {
                Some(t) => t,
                None => break,
            };
            // take nested groupings whole
            match t.as_ref().as_delimiter().and_then(closing_of) {
                Some(end_op) => stmt.extend(Self::parse_until_operator(tokens, t, end_op)?),
                None => stmt.push(t),
            }
        }
        Ok(stmt)
    }

    /// Collects tokens from the opening token `beg_t` through its matching
    /// closing operator `end_op`, inclusive.
    fn parse_until_operator<I>(
        tokens: &mut Peekable<I>,
        beg_t: Token<VerilogToken>,
        end_op: Operator,
    ) -> Result<Statement, VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let beg_op = beg_t.as_ref().as_delimiter().cloned();
        let mut counter = 0;
        let mut stmt = vec![beg_t];
        while let Some(t) = tokens.next() {
            if t.as_ref().check_delimiter(&end_op) == true {
                stmt.push(t);
                if counter == 0 {
                    break;
                }
                counter -= 1;
            } else if beg_op.as_ref().is_some_and(|op| t.as_ref().check_delimiter(op)) {
                counter += 1;
                stmt.push(t);
            } else if t.as_ref().is_eof() == true {
                return Err(VerilogError::ExpectingOperator(t.into_position(), end_op));
            } else {
                stmt.push(t);
            }
        }
        Ok(stmt)
    }

    fn parse_attr<I>(tokens: &mut Peekable<I>, pos: Position) -> Result<Statement, VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut stmt = vec![Token::new(VerilogToken::Operator(Operator::AttrL), pos)];
        // `@(*)` reads as an attribute opening followed by `)`
        if tokens
            .peek()
            .is_some_and(|t| t.as_ref().check_delimiter(&Operator::ParenR))
        {
            if let Some(t) = tokens.next() {
                stmt.push(t);
            }
            return Ok(stmt);
        }
        // keep taking tokens until the closing attribute
        while let Some(t) = tokens.next() {
            if t.as_ref().check_delimiter(&Operator::AttrR) == true {
                stmt.push(t);
                break;
            } else if t.as_ref().is_eof() == true {
                return Err(VerilogError::ExpectingOperator(
                    t.into_position(),
                    Operator::AttrR,
                ));
            }
            stmt.push(t);
        }
        Ok(stmt)
    }

    /// Parses the module's header from after its name through the closing `;`.
    pub fn parse_module_declaration<I>(
        tokens: &mut Peekable<I>,
    ) -> Result<(ParamList, PortList), VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut param_list = ParamList::new();
        let mut port_list = PortList::new();

        while let Some(t) = tokens.next() {
            if t.as_ref().is_eof() == true {
                return Err(VerilogError::ModDecIncomplete(t.into_position()));
            // parse parameter list (optional)
            } else if t.as_ref().check_delimiter(&Operator::Pound) == true {
                match tokens.next() {
                    Some(t_next) if t_next.as_ref().check_delimiter(&Operator::ParenL) => {
                        param_list.extend(Self::parse_declaration_list(
                            tokens,
                            Declaration::new(),
                            ListKind::Parameters,
                        )?);
                    }
                    Some(t_next) => {
                        return Err(VerilogError::ExpectingOperator(
                            t_next.into_position(),
                            Operator::ParenL,
                        ))
                    }
                    None => return Err(VerilogError::ModDecIncomplete(t.into_position())),
                }
            // parse port list (optional)
            } else if t.as_ref().check_delimiter(&Operator::ParenL) == true {
                port_list.extend(Self::parse_declaration_list(
                    tokens,
                    Declaration::new(),
                    ListKind::Ports,
                )?);
            } else if t.as_ref().check_delimiter(&Operator::AttrL) == true {
                Self::parse_attr(tokens, t.into_position())?;
            // stop parsing the declaration
            } else if t.as_ref().check_delimiter(&Operator::Terminator) == true {
                break;
            }
        }
        Ok((param_list, port_list))
    }

    /// Parses the module's body through `endmodule`, collecting any port and
    /// parameter declarations made at the module's top level.
    pub fn parse_module_architecture<I>(
        tokens: &mut Peekable<I>,
    ) -> Result<(ParamList, PortList), VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut params = ParamList::new();
        let mut ports = PortList::new();

        let mut at_statement_start = true;
        while let Some(t) = tokens.next() {
            if t.as_ref().is_eof() == true {
                return Err(VerilogError::ExpectingKeyword(
                    t.into_position(),
                    Keyword::Endmodule,
                ));
            // exit from the module architecture
            } else if t.as_ref().check_keyword(&Keyword::Endmodule) == true {
                break;
            } else if t.as_ref().check_keyword(&Keyword::Function) == true {
                Self::skip_until_keyword(tokens, Keyword::Endfunction)?;
                at_statement_start = true;
            } else if t.as_ref().check_keyword(&Keyword::Task) == true {
                Self::skip_until_keyword(tokens, Keyword::Endtask)?;
                at_statement_start = true;
            } else if t.as_ref().check_delimiter(&Operator::AttrL) == true {
                Self::parse_attr(tokens, t.into_position())?;
            } else if at_statement_start == true
                && t.as_ref().as_keyword().is_some_and(|k| k.is_direction())
            {
                let mut config = Declaration::new();
                if let Some(kw) = t.as_ref().as_keyword() {
                    config.set_direction(kw.clone());
                }
                ports.extend(Self::parse_declaration_list(tokens, config, ListKind::Ports)?);
            } else if at_statement_start == true
                && (t.as_ref().check_keyword(&Keyword::Parameter)
                    || t.as_ref().check_keyword(&Keyword::Localparam))
            {
                let mut config = Declaration::new();
                if t.as_ref().check_keyword(&Keyword::Localparam) == true {
                    config.set_local();
                }
                params.extend(Self::parse_declaration_list(
                    tokens,
                    config,
                    ListKind::Parameters,
                )?);
            } else if Self::is_statement_separator(t.as_ref()) {
                at_statement_start = true;
            } else if let VerilogToken::Directive(_) = t.as_ref() {
                continue;
            } else {
                at_statement_start = false;
            }
        }
        Ok((params, ports))
    }

    fn skip_until_keyword<I>(tokens: &mut Peekable<I>, end_kw: Keyword) -> Result<(), VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        while let Some(t) = tokens.next() {
            if t.as_ref().check_keyword(&end_kw) == true {
                return Ok(());
            } else if t.as_ref().is_eof() == true {
                return Err(VerilogError::ExpectingKeyword(t.into_position(), end_kw));
            }
        }
        Ok(())
    }

    fn is_statement_separator(t: &VerilogToken) -> bool {
        match t {
            VerilogToken::Keyword(k) => k.is_statement_separator(),
            VerilogToken::Operator(o) => match o {
                Operator::Terminator => true,
                _ => false,
            },
            _ => false,
        }
    }

    /// Collects the names of a comma-separated declaration list until an
    /// unmatched `)` or a `;`, which is consumed.
    ///
    /// Attributes set by a declarator (direction, range) persist for all
    /// following names until the next declarator replaces them.
    fn parse_declaration_list<I>(
        tokens: &mut Peekable<I>,
        config: Declaration,
        kind: ListKind,
    ) -> Result<Vec<Declaration>, VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut list: Vec<Declaration> = Vec::new();
        let mut current_config = config;
        // an identifier directly following another identifier means the first was a type
        let mut last_was_name = false;

        while let Some(t) = tokens.next() {
            let name = Self::declared_name(&t, tokens.peek());
            if t.as_ref().is_eof() == true {
                return Err(VerilogError::ModDecIncomplete(t.into_position()));
            } else if t.as_ref().check_delimiter(&Operator::ParenR) == true
                || t.as_ref().check_delimiter(&Operator::Terminator) == true
            {
                break;
            } else if let Some(name) = &name {
                match (last_was_name, list.last_mut()) {
                    (true, Some(prev)) => prev.rename(name.clone()),
                    _ => {
                        let mut decl = Declaration::with(name.clone());
                        decl.inherit(&current_config);
                        list.push(decl);
                    }
                }
                last_was_name = true;
            } else if t.as_ref().check_delimiter(&Operator::Comma) == true {
                current_config.clear_default();
                last_was_name = false;
            } else if t.as_ref().check_delimiter(&Operator::AttrL) == true {
                Self::parse_attr(tokens, t.into_position())?;
            // a new declarator
            } else if t.as_ref().as_keyword().is_some_and(|k| {
                k.is_direction()
                    || k == &Keyword::Parameter
                    || k == &Keyword::Localparam
            }) {
                current_config = Declaration::new();
                if let Some(kw) = t.as_ref().as_keyword() {
                    match kw {
                        Keyword::Localparam => current_config.set_local(),
                        Keyword::Parameter => (),
                        _ => current_config.set_direction(kw.clone()),
                    }
                }
                last_was_name = false;
            // collect a range
            } else if t.as_ref().check_delimiter(&Operator::BrackL) == true {
                let stmt = Self::parse_until_operator(tokens, t, Operator::BrackR)?;
                // ranges following a name are unpacked dimensions
                if last_was_name == false {
                    if let Some(inner) = stmt.get(1..stmt.len() - 1) {
                        current_config.set_range(inner.to_vec());
                    }
                }
            // collect a default value
            } else if t.as_ref().check_delimiter(&Operator::BlockAssign) == true {
                let stmt = Self::parse_assignment(tokens)?;
                if kind == ListKind::Parameters {
                    if let Some(last) = list.last_mut() {
                        last.set_default(stmt);
                    }
                }
            // skip other groupings (port expressions, casts)
            } else if t.as_ref().check_delimiter(&Operator::ParenL) == true {
                Self::parse_until_operator(tokens, t, Operator::ParenR)?;
            }
        }
        Ok(list)
    }

    /// Returns the name declared by `t`, if any.
    ///
    /// Words reserved only by SystemVerilog (`logic`, `type`, ...) are names
    /// when a list separator or a default follows them.
    fn declared_name(
        t: &Token<VerilogToken>,
        next: Option<&Token<VerilogToken>>,
    ) -> Option<Identifier> {
        if let Some(id) = t.as_ref().as_identifier() {
            return Some(id.clone());
        }
        let kw = t.as_ref().as_keyword()?;
        let ends_name = next.is_some_and(|n| {
            [
                Operator::Comma,
                Operator::ParenR,
                Operator::Terminator,
                Operator::BlockAssign,
            ]
            .iter()
            .any(|op| n.as_ref().check_delimiter(op))
        });
        match kw.is_systemverilog_only() && ends_name {
            true => Some(Identifier::Basic(kw.to_string())),
            false => None,
        }
    }
}

/// Returns the operator that closes the grouping opened by `op`.
fn closing_of(op: &Operator) -> Option<Operator> {
    match op {
        Operator::ParenL => Some(Operator::ParenR),
        Operator::BrackL => Some(Operator::BrackR),
        Operator::BraceL => Some(Operator::BraceR),
        _ => None,
    }
}
