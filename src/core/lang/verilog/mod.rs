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

pub mod error;
pub mod interface;
pub mod preprocess;
pub mod symbols;
pub mod token;
pub mod width;

use crate::core::macros::MacroSet;
use crate::error::Error;
use crate::util::filesystem;
use interface::Interface;
use std::path::Path;
use symbols::VerilogParser;

/// Reads the module `name` declared in the file at `path` and returns its
/// parameters and ports.
///
/// The file is read from disk on every call and conditional compilation is
/// resolved using `macros` before any parsing takes place.
pub fn extract_interface(path: &Path, name: &str, macros: &MacroSet) -> Result<Interface, Error> {
    let contents = filesystem::read_to_string(path)?;
    let contents = preprocess::preprocess(&contents, macros)
        .map_err(|e| Error::Parse(path.to_path_buf(), e))?;

    let symbols = VerilogParser::read(&contents, Some(name))
        .map_err(|e| Error::Parse(path.to_path_buf(), e))?
        .into_symbols();
    log::debug!("found {} module(s) in {:?}", symbols.len(), path);

    let module = symbols
        .into_iter()
        .filter_map(|s| s.into_module())
        .find(|m| m.get_name().as_str() == name)
        .ok_or_else(|| Error::ModuleNotFound(name.to_string(), path.to_path_buf()))?;

    let pos = module.get_position().clone();
    let intf = module.into_interface();
    log::debug!(
        "module {} at {} has {} parameter(s) and {} port(s)",
        name,
        pos,
        intf.get_parameters().len(),
        intf.get_ports().len()
    );
    Ok(intf)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::verilog::interface::{Direction, Port};
    use crate::core::lang::verilog::width::Width;
    use std::str::FromStr;

    const ALU: &str = r#"
module alu #(
    parameter WIDTH = 8
) (
    input clk,
`ifdef HAS_CARRY
    input carry_in,
`endif
`ifndef NO_FLAGS
    output [3:0] flags,
`else
    output flag,
`endif
    input [WIDTH-1:0] a
);
endmodule
"#;

    fn names(intf: &Interface) -> Vec<&str> {
        intf.get_ports().iter().map(|p| p.get_name()).collect()
    }

    #[test]
    fn macro_conditional_ports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alu.v");
        std::fs::write(&path, ALU).unwrap();

        let intf = extract_interface(&path, "alu", &MacroSet::new()).unwrap();
        assert_eq!(names(&intf), vec!["clk", "flags", "a"]);

        let macros = MacroSet::from_str("HAS_CARRY,NO_FLAGS").unwrap();
        let intf = extract_interface(&path, "alu", &macros).unwrap();
        assert_eq!(names(&intf), vec!["clk", "carry_in", "flag", "a"]);
        assert_eq!(
            intf.get_ports().last(),
            Some(&Port::new("a", Direction::Input, Width::Expr("WIDTH".to_string())))
        );
    }

    #[test]
    fn missing_file_and_module() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alu.v");
        assert_eq!(
            extract_interface(&path, "alu", &MacroSet::new()),
            Err(Error::FileMissing(path.clone()))
        );
        std::fs::write(&path, ALU).unwrap();
        assert_eq!(
            extract_interface(&path, "adder", &MacroSet::new()),
            Err(Error::ModuleNotFound("adder".to_string(), path.clone()))
        );
    }
}
