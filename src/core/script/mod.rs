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

//! Runs the script of a directive block.
//!
//! Scripts are Starlark programs. Each block runs in a fresh module with its
//! own rule store and output buffer, so blocks never observe each other.

mod builtins;

use crate::core::emit::{self, Format};
use crate::core::lang::verilog::{self, interface::Direction};
use crate::core::macros::MacroSet;
use crate::core::patch::Block;
use crate::core::rules::{RuleStore, WireMode};
use crate::core::lang::verilog::width::Width;
use crate::error::Error;
use starlark::any::ProvidesStaticType;
use starlark::environment::{Globals, GlobalsBuilder, LibraryExtension, Module as ScriptModule};
use starlark::eval::Evaluator;
use starlark::syntax::{AstModule, Dialect};
use starlark::PrintHandler;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Shared state for the builtins while one block executes.
#[derive(Debug, ProvidesStaticType)]
pub struct BlockContext {
    root: PathBuf,
    macros: MacroSet,
    format: Format,
    rules: RefCell<RuleStore>,
    output: RefCell<Vec<String>>,
}

impl BlockContext {
    pub fn new(root: &Path, macros: &MacroSet, format: &Format) -> Self {
        Self {
            root: root.to_path_buf(),
            macros: macros.clone(),
            format: format.clone(),
            rules: RefCell::new(RuleStore::new()),
            output: RefCell::new(Vec::new()),
        }
    }

    fn parse_port_type(port_type: Option<&str>) -> Result<Option<Direction>, Error> {
        match port_type {
            Some(p) => Direction::from_str(p)
                .map(Some)
                .map_err(Error::InvalidPortType),
            None => Ok(None),
        }
    }

    /// Appends a line of text to the output.
    pub fn emit(&self, text: &str) {
        self.output.borrow_mut().push(text.trim_end().to_string());
    }

    pub fn connect(
        &self,
        port_pattern: &str,
        target_pattern: &str,
        port_type: Option<&str>,
    ) -> Result<(), Error> {
        let direction = Self::parse_port_type(port_type)?;
        Ok(self
            .rules
            .borrow_mut()
            .push_connection(port_pattern, target_pattern, direction)?)
    }

    pub fn connect_param(&self, name_pattern: &str, value: &str) -> Result<(), Error> {
        Ok(self.rules.borrow_mut().push_param(name_pattern, value)?)
    }

    pub fn wires_rule(
        &self,
        port_pattern: &str,
        wire_pattern: &str,
        width: Option<Width>,
        expression: Option<&str>,
    ) -> Result<(), Error> {
        Ok(self
            .rules
            .borrow_mut()
            .push_wire(port_pattern, wire_pattern, width, expression)?)
    }

    /// Emits the instantiation of `module_name` and clears the connection and
    /// parameter rules.
    pub fn instance(
        &self,
        file_path: &str,
        module_name: &str,
        instance_name: &str,
    ) -> Result<(), Error> {
        let path = self.root.join(file_path);
        log::info!("instantiating {} as {} from {:?}", module_name, instance_name, path);
        let intf = verilog::extract_interface(&path, module_name, &self.macros)?;
        let text = {
            let rules = self.rules.borrow();
            emit::render_instance(module_name, instance_name, &intf, &rules, &self.format)?
        };
        self.rules.borrow_mut().clear_connections();
        self.emit_nonblank(&text);
        Ok(())
    }

    /// Emits the wire declarations for the ports of `module_name` and clears
    /// the wire rules.
    pub fn wires_def(
        &self,
        file_path: &str,
        module_name: &str,
        port_type: Option<&str>,
        mode: &str,
    ) -> Result<(), Error> {
        let direction = Self::parse_port_type(port_type)?;
        let mode = WireMode::from_str(mode)?;
        let path = self.root.join(file_path);
        log::info!("declaring wires for {} from {:?}", module_name, path);
        let intf = verilog::extract_interface(&path, module_name, &self.macros)?;
        let text = {
            let rules = self.rules.borrow();
            emit::render_wires(&intf, direction, mode, &rules, &self.format)?
        };
        self.rules.borrow_mut().clear_wires();
        self.emit_nonblank(&text);
        Ok(())
    }

    fn emit_nonblank(&self, text: &str) {
        if text.trim().is_empty() == false {
            self.emit(text);
        }
    }

    pub fn into_output(self) -> String {
        self.output.into_inner().join("\n")
    }
}

impl PrintHandler for BlockContext {
    fn println(&self, text: &str) -> anyhow::Result<()> {
        self.emit(text);
        Ok(())
    }
}

/// Executes directive block scripts for one host file.
pub struct Interpreter {
    root: PathBuf,
    macros: MacroSet,
    format: Format,
    globals: Globals,
}

impl Interpreter {
    /// Creates an interpreter resolving relative module paths against `root`.
    pub fn new(root: &Path, macros: &MacroSet, format: &Format) -> Self {
        let globals = GlobalsBuilder::extended_by(&[
            LibraryExtension::Print,
            LibraryExtension::StructType,
            LibraryExtension::Map,
            LibraryExtension::Filter,
            LibraryExtension::Json,
        ])
        .with(builtins::vcg_builtins)
        .build();
        Self {
            root: root.to_path_buf(),
            macros: macros.clone(),
            format: format.clone(),
            globals: globals,
        }
    }

    fn dialect() -> Dialect {
        let mut dialect = Dialect::Extended;
        dialect.enable_top_level_stmt = true;
        dialect
    }

    /// Runs the `block` found in the host `file` and returns its output text.
    pub fn execute(&self, file: &Path, block: &Block) -> Result<String, Error> {
        let script_error = |message: String| Error::Script {
            file: file.to_path_buf(),
            block: block.get_id(),
            message: message,
        };
        // pad the script so reported line numbers match the host file
        let source = format!("{}{}", "\n".repeat(block.get_line()), block.get_script());

        let ast = AstModule::parse(&file.display().to_string(), source, &Self::dialect())
            .map_err(|e| script_error(e.to_string()))?;

        let ctx = BlockContext::new(&self.root, &self.macros, &self.format);
        let module = ScriptModule::new();
        {
            let mut eval = Evaluator::new(&module);
            eval.extra = Some(&ctx);
            eval.set_print_handler(&ctx);
            eval.eval_module(ast, &self.globals)
                .map_err(|e| script_error(e.to_string()))?;
        }
        Ok(ctx.into_output())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::patch::HostFile;
    use pretty_assertions::assert_eq;

    const ADDER: &str = "\
module adder #(parameter W = 4) (
    input  [W-1:0] a, b,
    input          cin,
    output [W:0]   sum
);
endmodule
";

    /// Runs the first block of `host` against a directory holding `adder.v`.
    fn run(script: &str) -> Result<String, Error> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("adder.v"), ADDER).unwrap();
        let host = format!("//VCG_BEGIN\n{}//VCG_END\n", script);
        let host = HostFile::scan(Path::new("top.v"), &host).unwrap();
        let interp = Interpreter::new(dir.path(), &MacroSet::new(), &Format::default());
        interp.execute(Path::new("top.v"), &host.get_blocks()[0])
    }

    #[test]
    fn print_and_builtin_output_keep_order() {
        let out = run("\
// print('// first')
// Connect('cin', '0')
// Instance('adder.v', 'adder', 'u0')
// for i in range(2):
//     print('// loop %d   ' % i)
")
        .unwrap();
        assert_eq!(
            out,
            "\
// first
adder u0 (
    .a                 (a),             // input [W-1:0]
    .b                 (b),             // input [W-1:0]
    .cin               (1'b0),          // input
    .sum               (sum)            // output [W:0]
);
// loop 0
// loop 1"
        );
    }

    #[test]
    fn instance_clears_connections_but_not_wires() {
        let out = run("\
// WiresRule('sum', 's_out')
// Connect('*', 'x_*')
// ConnectParam('W', '8')
// Instance('adder.v', 'adder', 'u0')
// Instance('adder.v', 'adder', 'u1')
// WiresDef('adder.v', 'adder', port_type='output', mode='lazy')
// WiresDef('adder.v', 'adder', 'output', 'lazy')
")
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "adder #(");
        assert_eq!(lines[1], "    .W                 (8)");
        assert_eq!(lines[2], ") u0 (");
        assert!(lines[3].starts_with("    .a                 (x_a),"));
        assert_eq!(lines[8], "adder u1 (");
        assert!(lines[9].starts_with("    .a                 (a),"));
        assert_eq!(lines[14], "wire [W:0]     s_out;");
        // the second lazy definition has no rules left and emits nothing
        assert_eq!(lines.len(), 15);
    }

    #[test]
    fn wires_rule_width_and_expression() {
        let out = run("\
// WiresRule('*', 'w_*', width=2, expression='{2{1\\'b0}}')
// WiresRule('cin', 'c', width='W')
// WiresDef('adder.v', 'adder', 'input', 'lazy')
")
        .unwrap();
        assert_eq!(
            out,
            "\
wire [1:0]     w_a = {2{1'b0}};
wire [1:0]     w_b = {2{1'b0}};
wire [W-1:0]   c;"
        );
    }

    #[test]
    fn script_errors_name_the_block() {
        match run("// Instance('missing.v', 'adder', 'u0')\n") {
            Err(Error::Script { block, message, .. }) => {
                assert_eq!(block, 0);
                assert!(message.contains("missing.v"));
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(run("// def (\n"), Err(Error::Script { .. })));
        assert!(matches!(
            run("// Connect('*', 'x', port_type='sideways')\n"),
            Err(Error::Script { .. })
        ));
        assert!(matches!(
            run("// WiresDef('adder.v', 'adder', mode='eager')\n"),
            Err(Error::Script { .. })
        ));
    }
}
