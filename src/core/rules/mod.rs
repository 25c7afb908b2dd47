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

//! Connection, parameter, and wire rules.
//!
//! Rules are kept in two independent stacks: connection rules together with
//! parameter rules, and wire rules. Lookups scan a stack from the most
//! recently pushed rule to the oldest and stop at the first match.

pub mod error;
pub mod pattern;
pub mod subst;

use crate::core::lang::verilog::interface::{Direction, Parameter, Port};
use crate::core::lang::verilog::width::Width;
use crate::error::Error;
use error::PatternError;
use pattern::Pattern;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ConnectionRule {
    port: Pattern,
    target: String,
    direction: Option<Direction>,
}

#[derive(Debug, Clone)]
pub struct ParamRule {
    name: Pattern,
    value: String,
}

#[derive(Debug, Clone)]
pub struct WireRule {
    port: Pattern,
    wire: String,
    width: Option<Width>,
    expression: Option<String>,
}

/// Selects which ports produce a wire declaration.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum WireMode {
    /// Every port is declared, using its own name when no rule matches.
    #[default]
    Greedy,
    /// Only ports matched by a rule are declared.
    Lazy,
}

impl FromStr for WireMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Self::Greedy),
            "lazy" => Ok(Self::Lazy),
            _ => Err(Error::InvalidWireMode(s.to_string())),
        }
    }
}

/// A resolved wire declaration.
#[derive(Debug, PartialEq, Clone)]
pub struct Wire {
    name: String,
    width: Width,
    expression: Option<String>,
}

impl Wire {
    pub fn new(name: &str, width: Width, expression: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            width: width,
            expression: expression.map(|e| e.to_string()),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_width(&self) -> &Width {
        &self.width
    }

    pub fn get_expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct RuleStore {
    connections: Vec<ConnectionRule>,
    params: Vec<ParamRule>,
    wires: Vec<WireRule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_connection(
        &mut self,
        port_pattern: &str,
        target_pattern: &str,
        direction: Option<Direction>,
    ) -> Result<(), PatternError> {
        log::debug!(
            "rule {}: connect {:?} -> {:?} ({})",
            self.connections.len(),
            port_pattern,
            target_pattern,
            direction.map_or(String::from("any"), |d| d.to_string())
        );
        self.connections.push(ConnectionRule {
            port: Pattern::compile(port_pattern)?,
            target: target_pattern.to_string(),
            direction: direction,
        });
        Ok(())
    }

    pub fn push_param(&mut self, name_pattern: &str, value: &str) -> Result<(), PatternError> {
        log::debug!(
            "rule {}: parameter {:?} = {:?}",
            self.params.len(),
            name_pattern,
            value
        );
        self.params.push(ParamRule {
            name: Pattern::compile(name_pattern)?,
            value: value.to_string(),
        });
        Ok(())
    }

    pub fn push_wire(
        &mut self,
        port_pattern: &str,
        wire_pattern: &str,
        width: Option<Width>,
        expression: Option<&str>,
    ) -> Result<(), PatternError> {
        log::debug!(
            "rule {}: wire {:?} -> {:?}",
            self.wires.len(),
            port_pattern,
            wire_pattern
        );
        self.wires.push(WireRule {
            port: Pattern::compile(port_pattern)?,
            wire: wire_pattern.to_string(),
            width: width,
            expression: expression.map(|e| e.to_string()),
        });
        Ok(())
    }

    /// Removes all connection and parameter rules.
    pub fn clear_connections(&mut self) {
        self.connections.clear();
        self.params.clear();
    }

    /// Removes all wire rules.
    pub fn clear_wires(&mut self) {
        self.wires.clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len() + self.params.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Determines the signal text connected to `port`.
    ///
    /// Unmatched ports connect to a signal of the same name. A target that
    /// resolves to a bare `0` or `1` is widened to the port's width.
    pub fn resolve_connection(&self, port: &Port) -> Result<String, PatternError> {
        let found = self.connections.iter().rev().find_map(|rule| {
            match rule.direction.is_none() || rule.direction.as_ref() == Some(port.get_direction())
            {
                true => rule.port.captures(port.get_name()).map(|c| (rule, c)),
                false => None,
            }
        });
        let (rule, captures) = match found {
            Some(m) => m,
            None => return Ok(port.get_name().to_string()),
        };

        let signal = subst::substitute(&rule.target, &captures)?;
        let (body, comments) = subst::split_comments(&signal);
        let signal = match body.trim() {
            "0" | "1" => {
                let bit = if body.trim() == "1" { '1' } else { '0' };
                let literal = port.get_width().widen(bit);
                match comments.is_empty() {
                    true => literal,
                    false => format!("{} {}", literal, comments),
                }
            }
            _ => signal,
        };
        log::debug!(
            "port {} matched {:?} -> {}",
            port.get_name(),
            rule.port.as_str(),
            signal
        );
        Ok(signal)
    }

    /// Determines the override value for `param`, if any rule matches it.
    ///
    /// Values are written exactly as the rule gave them.
    pub fn resolve_param(&self, param: &Parameter) -> Option<&str> {
        let rule = self
            .params
            .iter()
            .rev()
            .find(|rule| rule.name.is_match(param.get_name()))?;
        log::debug!(
            "parameter {} matched {:?} -> {}",
            param.get_name(),
            rule.name.as_str(),
            rule.value
        );
        Some(rule.value.as_str())
    }

    /// Determines the wire declared for `port`, if one is declared at all.
    pub fn resolve_wire(&self, port: &Port, mode: WireMode) -> Result<Option<Wire>, PatternError> {
        let found = self
            .wires
            .iter()
            .rev()
            .find_map(|rule| rule.port.captures(port.get_name()).map(|c| (rule, c)));

        let (rule, captures) = match found {
            Some(m) => m,
            None => {
                return Ok(match mode {
                    WireMode::Greedy => Some(Wire::new(
                        port.get_name(),
                        port.get_width().clone(),
                        None,
                    )),
                    WireMode::Lazy => {
                        log::debug!("port {} has no wire rule and is skipped", port.get_name());
                        None
                    }
                })
            }
        };

        let name = subst::substitute(&rule.wire, &captures)?;
        if name.trim().is_empty() == true {
            log::debug!("port {} is skipped by rule {:?}", port.get_name(), rule.port.as_str());
            return Ok(None);
        }
        let expression = match &rule.expression {
            Some(e) => Some(subst::substitute(e, &captures)?),
            None => None,
        };
        let width = match &rule.width {
            Some(w) => w.clone(),
            None => port.get_width().clone(),
        };
        log::debug!(
            "port {} matched {:?} -> wire {}",
            port.get_name(),
            rule.port.as_str(),
            name
        );
        Ok(Some(Wire {
            name: name,
            width: width,
            expression: expression,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn port(name: &str, direction: Direction, width: Width) -> Port {
        Port::new(name, direction, width)
    }

    #[test]
    fn later_rules_take_priority() {
        let mut rules = RuleStore::new();
        rules.push_connection("*", "a_*", None).unwrap();
        rules.push_connection("data", "b_data", None).unwrap();

        let data = port("data", Direction::Input, Width::Scalar);
        let other = port("other", Direction::Input, Width::Scalar);
        assert_eq!(rules.resolve_connection(&data).unwrap(), "b_data");
        assert_eq!(rules.resolve_connection(&other).unwrap(), "a_other");
    }

    #[test]
    fn unmatched_ports_connect_by_name() {
        let rules = RuleStore::new();
        let p = port("clk", Direction::Input, Width::Scalar);
        assert_eq!(rules.resolve_connection(&p).unwrap(), "clk");
    }

    #[test]
    fn direction_filter() {
        let mut rules = RuleStore::new();
        rules
            .push_connection("*", "o_*", Some(Direction::Output))
            .unwrap();
        let i = port("x", Direction::Input, Width::Scalar);
        let o = port("y", Direction::Output, Width::Scalar);
        assert_eq!(rules.resolve_connection(&i).unwrap(), "x");
        assert_eq!(rules.resolve_connection(&o).unwrap(), "o_y");
    }

    #[test]
    fn literal_widening() {
        let mut rules = RuleStore::new();
        rules.push_connection("en", "1", None).unwrap();
        rules.push_connection("rst", "0 /* unused */", None).unwrap();

        let en = |w| port("en", Direction::Input, w);
        assert_eq!(rules.resolve_connection(&en(Width::Scalar)).unwrap(), "1'b1");
        assert_eq!(
            rules.resolve_connection(&en(Width::Const(8))).unwrap(),
            "8'b11111111"
        );
        assert_eq!(
            rules
                .resolve_connection(&en(Width::Expr("WIDTH".to_string())))
                .unwrap(),
            "{WIDTH{1'b1}}"
        );
        let rst = port("rst", Direction::Input, Width::Const(2));
        assert_eq!(
            rules.resolve_connection(&rst).unwrap(),
            "2'b00 /* unused */"
        );
    }

    #[test]
    fn function_substitution() {
        let mut rules = RuleStore::new();
        rules
            .push_connection("*_to_*", "${upper(*0)}_TO_${lower(*1)}", None)
            .unwrap();
        let p = port("cpu_to_mem", Direction::Output, Width::Scalar);
        assert_eq!(rules.resolve_connection(&p).unwrap(), "CPU_TO_mem");
    }

    #[test]
    fn parameters_resolve_raw_values() {
        let mut rules = RuleStore::new();
        rules.push_param("*_W", "16").unwrap();
        rules.push_param("DATA_W", "BUS_W*2").unwrap();
        assert_eq!(
            rules.resolve_param(&Parameter::new("DATA_W", Some("8"))),
            Some("BUS_W*2")
        );
        assert_eq!(
            rules.resolve_param(&Parameter::new("ADDR_W", None)),
            Some("16")
        );
        assert_eq!(rules.resolve_param(&Parameter::new("DEPTH", Some("4"))), None);
    }

    #[test]
    fn clearing_is_independent() {
        let mut rules = RuleStore::new();
        rules.push_connection("*", "x_*", None).unwrap();
        rules.push_param("*", "1").unwrap();
        rules.push_wire("*", "w_*", None, None).unwrap();
        rules.clear_connections();
        assert_eq!(rules.connection_count(), 0);
        assert_eq!(rules.wire_count(), 1);
        rules.push_connection("*", "x_*", None).unwrap();
        rules.clear_wires();
        assert_eq!(rules.connection_count(), 1);
        assert_eq!(rules.wire_count(), 0);
    }

    #[test]
    fn lazy_and_greedy_wires() {
        let mut rules = RuleStore::new();
        rules.push_wire("clk", "", None, None).unwrap();
        rules.push_wire("data_*", "w_*", None, None).unwrap();

        let clk = port("clk", Direction::Input, Width::Scalar);
        let data = port("data_in", Direction::Input, Width::Const(8));
        let unused = port("unused_x", Direction::Output, Width::Scalar);

        assert_eq!(rules.resolve_wire(&clk, WireMode::Lazy).unwrap(), None);
        assert_eq!(
            rules.resolve_wire(&data, WireMode::Lazy).unwrap(),
            Some(Wire::new("w_in", Width::Const(8), None))
        );
        assert_eq!(rules.resolve_wire(&unused, WireMode::Lazy).unwrap(), None);

        assert_eq!(rules.resolve_wire(&clk, WireMode::Greedy).unwrap(), None);
        assert_eq!(
            rules.resolve_wire(&unused, WireMode::Greedy).unwrap(),
            Some(Wire::new("unused_x", Width::Scalar, None))
        );
    }

    #[test]
    fn wire_width_and_expression() {
        let mut rules = RuleStore::new();
        rules
            .push_wire("*_valid", "*_ok", Some(Width::Const(2)), Some("{2{*}}"))
            .unwrap();
        let p = port("rd_valid", Direction::Output, Width::Scalar);
        assert_eq!(
            rules.resolve_wire(&p, WireMode::Lazy).unwrap(),
            Some(Wire::new("rd_ok", Width::Const(2), Some("{2{rd}}")))
        );
    }

    #[test]
    fn wire_modes_from_text() {
        assert_eq!(WireMode::from_str("lazy").unwrap(), WireMode::Lazy);
        assert_eq!(WireMode::from_str("greedy").unwrap(), WireMode::Greedy);
        assert_eq!(
            WireMode::from_str("eager").unwrap_err(),
            Error::InvalidWireMode("eager".to_string())
        );
    }
}
