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

use std::fmt::Display;

/// Reserved words the interface extractor needs to recognize.
///
/// Any other reserved word of the language is treated like an identifier, which
/// is harmless because the extractor only inspects declarations.
#[derive(Debug, PartialEq, Clone)]
pub enum Keyword {
    Module,
    Macromodule,
    Endmodule,
    Parameter,
    Localparam,
    Defparam,
    Input,
    Output,
    Inout,
    Wire,
    Reg,
    Logic,
    Bit,
    Byte,
    Int,
    Shortint,
    Longint,
    Integer,
    Real,
    Realtime,
    Time,
    Signed,
    Unsigned,
    Var,
    Tri,
    Tri0,
    Tri1,
    Triand,
    Trior,
    Trireg,
    Wand,
    Wor,
    Uwire,
    Supply0,
    Supply1,
    Function,
    Endfunction,
    Task,
    Endtask,
    Begin,
    End,
    Generate,
    Endgenerate,
    Case,
    Endcase,
    Type,
}

impl Keyword {
    /// Attempts to match the given string of characters `s` to a keyword.
    pub fn match_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "module" => Self::Module,
            "macromodule" => Self::Macromodule,
            "endmodule" => Self::Endmodule,
            "parameter" => Self::Parameter,
            "localparam" => Self::Localparam,
            "defparam" => Self::Defparam,
            "input" => Self::Input,
            "output" => Self::Output,
            "inout" => Self::Inout,
            "wire" => Self::Wire,
            "reg" => Self::Reg,
            "logic" => Self::Logic,
            "bit" => Self::Bit,
            "byte" => Self::Byte,
            "int" => Self::Int,
            "shortint" => Self::Shortint,
            "longint" => Self::Longint,
            "integer" => Self::Integer,
            "real" => Self::Real,
            "realtime" => Self::Realtime,
            "time" => Self::Time,
            "signed" => Self::Signed,
            "unsigned" => Self::Unsigned,
            "var" => Self::Var,
            "tri" => Self::Tri,
            "tri0" => Self::Tri0,
            "tri1" => Self::Tri1,
            "triand" => Self::Triand,
            "trior" => Self::Trior,
            "trireg" => Self::Trireg,
            "wand" => Self::Wand,
            "wor" => Self::Wor,
            "uwire" => Self::Uwire,
            "supply0" => Self::Supply0,
            "supply1" => Self::Supply1,
            "function" => Self::Function,
            "endfunction" => Self::Endfunction,
            "task" => Self::Task,
            "endtask" => Self::Endtask,
            "begin" => Self::Begin,
            "end" => Self::End,
            "generate" => Self::Generate,
            "endgenerate" => Self::Endgenerate,
            "case" => Self::Case,
            "endcase" => Self::Endcase,
            "type" => Self::Type,
            _ => return None,
        })
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Module => "module",
            Self::Macromodule => "macromodule",
            Self::Endmodule => "endmodule",
            Self::Parameter => "parameter",
            Self::Localparam => "localparam",
            Self::Defparam => "defparam",
            Self::Input => "input",
            Self::Output => "output",
            Self::Inout => "inout",
            Self::Wire => "wire",
            Self::Reg => "reg",
            Self::Logic => "logic",
            Self::Bit => "bit",
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Shortint => "shortint",
            Self::Longint => "longint",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Realtime => "realtime",
            Self::Time => "time",
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Var => "var",
            Self::Tri => "tri",
            Self::Tri0 => "tri0",
            Self::Tri1 => "tri1",
            Self::Triand => "triand",
            Self::Trior => "trior",
            Self::Trireg => "trireg",
            Self::Wand => "wand",
            Self::Wor => "wor",
            Self::Uwire => "uwire",
            Self::Supply0 => "supply0",
            Self::Supply1 => "supply1",
            Self::Function => "function",
            Self::Endfunction => "endfunction",
            Self::Task => "task",
            Self::Endtask => "endtask",
            Self::Begin => "begin",
            Self::End => "end",
            Self::Generate => "generate",
            Self::Endgenerate => "endgenerate",
            Self::Case => "case",
            Self::Endcase => "endcase",
            Self::Type => "type",
        }
    }

    /// Checks if the keyword declares a port direction.
    pub fn is_direction(&self) -> bool {
        match self {
            Self::Input | Self::Output | Self::Inout => true,
            _ => false,
        }
    }

    /// Checks if the keyword is only reserved by SystemVerilog, so Verilog
    /// sources may use it as a name.
    pub fn is_systemverilog_only(&self) -> bool {
        match self {
            Self::Logic
            | Self::Bit
            | Self::Byte
            | Self::Int
            | Self::Shortint
            | Self::Longint
            | Self::Var
            | Self::Type => true,
            _ => false,
        }
    }

    /// Checks if the keyword ends a statement even without a terminator (`;`).
    pub fn is_statement_separator(&self) -> bool {
        match self {
            Self::Begin
            | Self::End
            | Self::Generate
            | Self::Endgenerate
            | Self::Endcase
            | Self::Endfunction
            | Self::Endtask => true,
            _ => false,
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
