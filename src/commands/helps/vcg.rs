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

pub const HELP: &str = r#"Generate Verilog instantiations and wires from directive blocks.

Usage:
    vcg [options] <file>

Args:
    <file>                host Verilog file holding //VCG_BEGIN blocks

Options:
    --macros <list>       macro set: NAME,NAME or NAME=VALUE,NAME=VALUE
    --config <path>       additional configuration file
    --log-level <level>   off, error, warn, info, debug, trace
    --log-file <path>     write log records to a file
    --quiet               only report errors on the console
    --version             print version information and exit
    --help, -h            print help information

Configuration is read from ~/.vcg/config.toml, then vcg.toml beside <file>,
then --config. Later files take precedence."#;
