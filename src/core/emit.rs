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

//! Formats instantiations and wire declarations.

use crate::core::lang::verilog::interface::{Direction, Interface};
use crate::core::rules::error::PatternError;
use crate::core::rules::{RuleStore, Wire, WireMode};
use serde_derive::Deserialize;

/// Column layout of the generated text.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Format {
    /// Width of the `.name` column in connection lines.
    #[serde(default = "Format::default_port_align")]
    pub port_align: usize,
    /// Column where a port's direction comment starts.
    #[serde(default = "Format::default_comment_align")]
    pub comment_align: usize,
    /// Column where a wire's name starts.
    #[serde(default = "Format::default_wire_align")]
    pub wire_align: usize,
}

impl Format {
    fn default_port_align() -> usize {
        18
    }

    fn default_comment_align() -> usize {
        36
    }

    fn default_wire_align() -> usize {
        15
    }
}

impl Default for Format {
    fn default() -> Self {
        Self {
            port_align: Self::default_port_align(),
            comment_align: Self::default_comment_align(),
            wire_align: Self::default_wire_align(),
        }
    }
}

/// Pads `text` with spaces to `col` characters, leaving at least one space.
fn pad(text: &str, col: usize) -> String {
    match text.chars().count() >= col {
        true => format!("{} ", text),
        false => format!("{:<col$}", text, col = col),
    }
}

/// Writes the instantiation of `module` named `instance` with its parameters
/// and ports connected by the current `rules`.
///
/// Only parameters matched by a rule are overridden.
pub fn render_instance(
    module: &str,
    instance: &str,
    intf: &Interface,
    rules: &RuleStore,
    fmt: &Format,
) -> Result<String, PatternError> {
    let params: Vec<(&str, &str)> = intf
        .get_parameters()
        .iter()
        .filter_map(|p| match rules.resolve_param(p) {
            Some(v) => Some((p.get_name(), v)),
            None => {
                log::debug!(
                    "parameter {} keeps its default {}",
                    p.get_name(),
                    p.get_default().unwrap_or("(none)")
                );
                None
            }
        })
        .collect();

    let mut lines = Vec::new();
    match params.is_empty() {
        true => lines.push(format!("{} {} (", module, instance)),
        false => {
            lines.push(format!("{} #(", module));
            for (i, (name, value)) in params.iter().enumerate() {
                let sep = if i + 1 < params.len() { "," } else { "" };
                lines.push(format!(
                    "    .{:<w$}({}){}",
                    name,
                    value,
                    sep,
                    w = fmt.port_align
                ));
            }
            lines.push(format!(") {} (", instance));
        }
    }

    let ports = intf.get_ports();
    for (i, port) in ports.iter().enumerate() {
        let signal = rules.resolve_connection(port)?;
        let sep = if i + 1 < ports.len() { "," } else { "" };
        let connection = format!(
            ".{:<w$}({}){}",
            port.get_name(),
            signal,
            sep,
            w = fmt.port_align
        );
        let range = port.get_width().to_range();
        let comment = match range.is_empty() {
            true => format!("// {}", port.get_direction()),
            false => format!("// {} {}", port.get_direction(), range),
        };
        lines.push(format!("    {}{}", pad(&connection, fmt.comment_align), comment));
    }
    lines.push(String::from(");"));
    Ok(lines.join("\n"))
}

/// Writes one wire declaration per port selected by `direction` and `mode`.
pub fn render_wires(
    intf: &Interface,
    direction: Option<Direction>,
    mode: WireMode,
    rules: &RuleStore,
    fmt: &Format,
) -> Result<String, PatternError> {
    let mut lines = Vec::new();
    for port in intf
        .get_ports()
        .iter()
        .filter(|p| direction.is_none() || direction.as_ref() == Some(p.get_direction()))
    {
        if let Some(wire) = rules.resolve_wire(port, mode)? {
            lines.push(render_wire(&wire, fmt));
        }
    }
    Ok(lines.join("\n"))
}

fn render_wire(wire: &Wire, fmt: &Format) -> String {
    let range = wire.get_width().to_range();
    let prefix = match range.is_empty() {
        true => String::from("wire"),
        false => format!("wire {}", range),
    };
    match wire.get_expression() {
        Some(e) => format!("{}{} = {};", pad(&prefix, fmt.wire_align), wire.get_name(), e),
        None => format!("{}{};", pad(&prefix, fmt.wire_align), wire.get_name()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::verilog::interface::{Parameter, Port};
    use crate::core::lang::verilog::width::Width;
    use pretty_assertions::assert_eq;

    fn fifo() -> Interface {
        Interface::new(
            vec![
                Parameter::new("WIDTH", Some("8")),
                Parameter::new("DEPTH", Some("16")),
            ],
            vec![
                Port::new("clk", Direction::Input, Width::Scalar),
                Port::new("wr_en", Direction::Input, Width::Scalar),
                Port::new("wr_data", Direction::Input, Width::Expr("WIDTH".to_string())),
                Port::new("rd_data", Direction::Output, Width::Expr("WIDTH".to_string())),
                Port::new("count", Direction::Output, Width::Const(5)),
            ],
        )
    }

    #[test]
    fn instance_with_parameters() {
        let mut rules = RuleStore::new();
        rules.push_param("WIDTH", "32").unwrap();
        rules.push_connection("wr_en", "1", None).unwrap();
        rules.push_connection("*_data", "fifo_*_data", None).unwrap();
        let text = render_instance("fifo", "u_fifo", &fifo(), &rules, &Format::default()).unwrap();
        assert_eq!(
            text,
            "\
fifo #(
    .WIDTH             (32)
) u_fifo (
    .clk               (clk),           // input
    .wr_en             (1'b1),          // input
    .wr_data           (fifo_wr_data),  // input [WIDTH-1:0]
    .rd_data           (fifo_rd_data),  // output [WIDTH-1:0]
    .count             (count)          // output [4:0]
);"
        );
    }

    #[test]
    fn instance_without_parameters() {
        let intf = Interface::new(
            vec![Parameter::new("N", Some("2"))],
            vec![Port::new("a", Direction::Inout, Width::Const(2))],
        );
        let fmt = Format {
            port_align: 4,
            comment_align: 16,
            wire_align: 15,
        };
        let text = render_instance("pad", "u0", &intf, &RuleStore::new(), &fmt).unwrap();
        assert_eq!(text, "pad u0 (\n    .a   (a)        // inout [1:0]\n);");
    }

    #[test]
    fn wires_greedy_and_lazy() {
        let intf = Interface::new(
            vec![],
            vec![
                Port::new("clk", Direction::Input, Width::Scalar),
                Port::new("data_in", Direction::Input, Width::Const(8)),
                Port::new("unused_x", Direction::Output, Width::Expr("N+1".to_string())),
            ],
        );
        let mut rules = RuleStore::new();
        rules.push_wire("clk", "", None, None).unwrap();
        rules.push_wire("data_*", "w_*", None, None).unwrap();
        let fmt = Format::default();

        let lazy = render_wires(&intf, None, WireMode::Lazy, &rules, &fmt).unwrap();
        assert_eq!(lazy, "wire [7:0]     w_in;");

        let greedy = render_wires(&intf, None, WireMode::Greedy, &rules, &fmt).unwrap();
        assert_eq!(greedy, "wire [7:0]     w_in;\nwire [N:0]     unused_x;");

        let outputs =
            render_wires(&intf, Some(Direction::Output), WireMode::Greedy, &rules, &fmt).unwrap();
        assert_eq!(outputs, "wire [N:0]     unused_x;");
    }

    #[test]
    fn wire_expressions_and_long_ranges() {
        let intf = Interface::new(
            vec![],
            vec![Port::new("q", Direction::Output, Width::Expr("DATA_WIDTH".to_string()))],
        );
        let mut rules = RuleStore::new();
        rules.push_wire("*", "*_r", None, Some("'0")).unwrap();
        let text = render_wires(&intf, None, WireMode::Lazy, &rules, &Format::default()).unwrap();
        assert_eq!(text, "wire [DATA_WIDTH-1:0] q_r = '0;");

        rules.push_wire("*", "*_s", Some(Width::Scalar), None).unwrap();
        let text = render_wires(&intf, None, WireMode::Lazy, &rules, &Format::default()).unwrap();
        assert_eq!(text, "wire           q_s;");
    }
}
