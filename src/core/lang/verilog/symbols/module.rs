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

use crate::core::lang::{
    lexer::{Position, Token},
    verilog::{
        error::VerilogError,
        interface::{self, Interface, ParamList, PortList},
        token::{identifier::Identifier, token::VerilogToken},
    },
};

use super::VerilogSymbol;

#[derive(Debug, PartialEq)]
pub struct Module {
    name: Identifier,
    parameters: ParamList,
    ports: PortList,
    pos: Position,
}

impl Module {
    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }
}

impl Module {
    /// Parses a `Module` design element from the module's identifier to
    /// the `endmodule` keyword.
    pub fn from_tokens<I>(tokens: &mut Peekable<I>, pos: Position) -> Result<Self, VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        // take module name
        let mod_name = match tokens.next().map(|t| t.take()) {
            Some(VerilogToken::Identifier(id)) => id,
            _ => return Err(VerilogError::ExpectingIdentifier(pos)),
        };

        // parse the interface/declaration of the module
        let (mut params, mut ports) = VerilogSymbol::parse_module_declaration(tokens)?;

        // parse the body of the module
        let (body_params, body_ports) = VerilogSymbol::parse_module_architecture(tokens)?;

        // update declared ports from any architecture port definitions
        body_ports
            .into_iter()
            .for_each(|p| interface::update_port_list(&mut ports, p));

        // update declared params from any architecture param definitions
        body_params
            .into_iter()
            .for_each(|p| interface::update_port_list(&mut params, p));

        Ok(Module {
            name: mod_name,
            parameters: params,
            ports: ports,
            pos: pos,
        })
    }

    /// Keeps the declarations visible to an instantiating module.
    ///
    /// Local parameters are removed and ports whose direction was never
    /// declared are dropped.
    pub fn into_interface(self) -> Interface {
        let params = self
            .parameters
            .into_iter()
            .filter(|p| p.is_local() == false)
            .map(|p| p.into_parameter())
            .collect();

        let mut ports = Vec::with_capacity(self.ports.len());
        for decl in self.ports {
            let name = decl.get_name().to_string();
            match decl.into_port() {
                Some(p) => ports.push(p),
                None => log::warn!(
                    "port {} of module {} has no declared direction and is ignored",
                    name,
                    self.name
                ),
            }
        }
        Interface::new(params, ports)
    }
}
