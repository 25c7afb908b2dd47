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

#![allow(non_snake_case)]

use super::BlockContext;
use crate::core::lang::verilog::width::Width;
use starlark::environment::GlobalsBuilder;
use starlark::eval::Evaluator;
use starlark::starlark_module;
use starlark::values::none::{NoneOr, NoneType};
use starlark::values::Value;
use std::str::FromStr;

/// Accesses the state of the block being executed.
macro_rules! block_context {
    ($eval:expr) => {
        $eval
            .extra
            .and_then(|e| e.downcast_ref::<BlockContext>())
            .ok_or_else(|| anyhow::anyhow!("builtin called outside of a directive block"))?
    };
}

/// Interprets a wire width given as either an integer or a width expression.
fn unpack_width(width: NoneOr<Value>) -> anyhow::Result<Option<Width>> {
    let value = match width.into_option() {
        Some(v) => v,
        None => return Ok(None),
    };
    if let Some(n) = value.unpack_i32() {
        return match u64::try_from(n) {
            Ok(n) => Ok(Some(Width::Const(n))),
            Err(_) => Err(anyhow::anyhow!("wire width {} must not be negative", n)),
        };
    }
    match value.unpack_str() {
        Some(s) => Ok(Width::from_str(s).ok()),
        None => Err(anyhow::anyhow!(
            "wire width must be an integer or a string, not {}",
            value.get_type()
        )),
    }
}

#[starlark_module]
pub fn vcg_builtins(builder: &mut GlobalsBuilder) {
    /// Connects ports matching `port_pattern` to the signal `target_pattern`.
    fn Connect(
        port_pattern: &str,
        target_pattern: &str,
        #[starlark(default = NoneOr::None)] port_type: NoneOr<&str>,
        eval: &mut Evaluator,
    ) -> anyhow::Result<NoneType> {
        let ctx = block_context!(eval);
        ctx.connect(port_pattern, target_pattern, port_type.into_option())?;
        Ok(NoneType)
    }

    /// Overrides parameters matching `name_pattern` with `value`.
    fn ConnectParam(
        name_pattern: &str,
        value: &str,
        eval: &mut Evaluator,
    ) -> anyhow::Result<NoneType> {
        let ctx = block_context!(eval);
        ctx.connect_param(name_pattern, value)?;
        Ok(NoneType)
    }

    /// Declares wires named `wire_pattern` for ports matching `port_pattern`.
    fn WiresRule(
        port_pattern: &str,
        wire_pattern: &str,
        #[starlark(default = NoneOr::None)] width: NoneOr<Value>,
        #[starlark(default = NoneOr::None)] expression: NoneOr<&str>,
        eval: &mut Evaluator,
    ) -> anyhow::Result<NoneType> {
        let ctx = block_context!(eval);
        ctx.wires_rule(
            port_pattern,
            wire_pattern,
            unpack_width(width)?,
            expression.into_option(),
        )?;
        Ok(NoneType)
    }

    /// Instantiates the module `module_name` declared in `file_path`.
    fn Instance(
        file_path: &str,
        module_name: &str,
        instance_name: &str,
        eval: &mut Evaluator,
    ) -> anyhow::Result<NoneType> {
        let ctx = block_context!(eval);
        ctx.instance(file_path, module_name, instance_name)?;
        Ok(NoneType)
    }

    /// Declares wires for the ports of the module `module_name` declared in
    /// `file_path`.
    fn WiresDef(
        file_path: &str,
        module_name: &str,
        #[starlark(default = NoneOr::None)] port_type: NoneOr<&str>,
        #[starlark(default = "greedy")] mode: &str,
        eval: &mut Evaluator,
    ) -> anyhow::Result<NoneType> {
        let ctx = block_context!(eval);
        ctx.wires_def(file_path, module_name, port_type.into_option(), mode)?;
        Ok(NoneType)
    }
}
