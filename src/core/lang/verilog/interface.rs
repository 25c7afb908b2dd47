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

use super::symbols::{statement_to_string, Statement};
use super::token::identifier::Identifier;
use super::token::keyword::Keyword;
use super::width::Width;
use std::fmt::Display;
use std::str::FromStr;

pub type PortList = Vec<Declaration>;
pub type ParamList = Vec<Declaration>;

/// Updates the list by either letting the existing declaration with the same
/// identifier inherit its defined attributes, or appending the new declaration.
pub fn update_port_list(port_list: &mut PortList, new_port: Declaration) {
    let port = port_list.iter_mut().find(|i| i.name == new_port.name);
    match port {
        Some(p) => p.inherit(&new_port),
        None => port_list.push(new_port),
    }
}

/// A single name collected while parsing a port or parameter list, along
/// with the attributes it picked up from its declarator.
#[derive(Debug, PartialEq, Clone)]
pub struct Declaration {
    direction: Option<Keyword>,
    range: Option<Statement>,
    name: Identifier,
    value: Option<Statement>,
    local: bool,
}

impl Declaration {
    pub fn with(name: Identifier) -> Self {
        Self {
            name: name,
            ..Self::new()
        }
    }

    pub fn new() -> Self {
        Self {
            direction: None,
            range: None,
            name: Identifier::Basic(String::new()),
            value: None,
            local: false,
        }
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn rename(&mut self, name: Identifier) {
        self.name = name;
    }

    pub fn inherit(&mut self, rhs: &Declaration) {
        if self.direction.is_none() {
            self.direction = rhs.direction.clone();
        }
        if self.range.is_none() {
            self.range = rhs.range.clone();
        }
        if self.value.is_none() {
            self.value = rhs.value.clone();
        }
        if self.local == false {
            self.local = rhs.local;
        }
    }

    pub fn set_default(&mut self, stmt: Statement) {
        self.value = Some(stmt);
    }

    pub fn clear_default(&mut self) {
        self.value = None;
    }

    pub fn set_direction(&mut self, kw: Keyword) {
        self.direction = Some(kw);
    }

    pub fn set_range(&mut self, stmt: Statement) {
        self.range = Some(stmt);
    }

    pub fn set_local(&mut self) {
        self.local = true;
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn into_parameter(self) -> Parameter {
        Parameter {
            name: self.name.to_string(),
            default: self.value.map(|v| statement_to_string(&v)),
        }
    }

    /// Transforms the declaration into a port, if its direction is known.
    pub fn into_port(self) -> Option<Port> {
        let direction = Direction::from_keyword(self.direction.as_ref()?)?;
        Some(Port {
            name: self.name.to_string(),
            direction: direction,
            width: match &self.range {
                Some(r) => Width::from_range(r),
                None => Width::Scalar,
            },
        })
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Input,
    Output,
    Inout,
}

impl Direction {
    pub fn from_keyword(kw: &Keyword) -> Option<Self> {
        match kw {
            Keyword::Input => Some(Self::Input),
            Keyword::Output => Some(Self::Output),
            Keyword::Inout => Some(Self::Inout),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            "inout" => Ok(Self::Inout),
            _ => Err(s.to_string()),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Input => "input",
                Self::Output => "output",
                Self::Inout => "inout",
            }
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    name: String,
    default: Option<String>,
}

impl Parameter {
    pub fn new(name: &str, default: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            default: default.map(|s| s.to_string()),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Returns the default value expression exactly as declared.
    pub fn get_default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Port {
    name: String,
    direction: Direction,
    width: Width,
}

impl Port {
    pub fn new(name: &str, direction: Direction, width: Width) -> Self {
        Self {
            name: name.to_string(),
            direction: direction,
            width: width,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_direction(&self) -> &Direction {
        &self.direction
    }

    pub fn get_width(&self) -> &Width {
        &self.width
    }
}

/// The externally visible parameters and ports of a module, in declaration
/// order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Interface {
    parameters: Vec<Parameter>,
    ports: Vec<Port>,
}

impl Interface {
    pub fn new(parameters: Vec<Parameter>, ports: Vec<Port>) -> Self {
        Self {
            parameters: parameters,
            ports: ports,
        }
    }

    pub fn get_parameters(&self) -> &Vec<Parameter> {
        &self.parameters
    }

    pub fn get_ports(&self) -> &Vec<Port> {
        &self.ports
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn direction_from_text() {
        assert_eq!(Direction::from_str("input"), Ok(Direction::Input));
        assert_eq!(Direction::from_str("OUTPUT"), Ok(Direction::Output));
        assert_eq!(Direction::from_str("InOut"), Ok(Direction::Inout));
        assert!(Direction::from_str("buffer").is_err());
        assert_eq!(Direction::Output.to_string(), "output");
    }

    #[test]
    fn body_declaration_completes_header_port() {
        let mut ports = vec![Declaration::with(Identifier::Basic("a".to_string()))];
        let mut body = Declaration::with(Identifier::Basic("a".to_string()));
        body.set_direction(Keyword::Output);
        update_port_list(&mut ports, body);
        assert_eq!(ports.len(), 1);
        assert_eq!(
            ports.remove(0).into_port(),
            Some(Port::new("a", Direction::Output, Width::Scalar))
        );
    }

    #[test]
    fn port_without_direction_is_dropped() {
        let decl = Declaration::with(Identifier::Basic("a".to_string()));
        assert_eq!(decl.into_port(), None);
    }
}
