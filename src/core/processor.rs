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

//! Runs every directive block of a host file and patches its generated
//! regions.

use crate::core::emit::Format;
use crate::core::macros::MacroSet;
use crate::core::patch::HostFile;
use crate::core::script::Interpreter;
use crate::error::Error;
use crate::util::filesystem;
use std::path::{Path, PathBuf};

/// The outcome of processing one host file.
#[derive(Debug, PartialEq)]
pub struct Report {
    blocks: usize,
    failures: Vec<Error>,
    changed: bool,
}

impl Report {
    pub fn get_block_count(&self) -> usize {
        self.blocks
    }

    pub fn get_failures(&self) -> &Vec<Error> {
        &self.failures
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct Processor {
    root: PathBuf,
    macros: MacroSet,
    format: Format,
}

impl Processor {
    /// Creates a processor that resolves module file paths against `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            macros: MacroSet::new(),
            format: Format::default(),
        }
    }

    pub fn macros(mut self, macros: MacroSet) -> Self {
        self.macros = macros;
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Regenerates the regions of the host file at `path`.
    ///
    /// Failing blocks are collected in the report and keep their previous
    /// regions. The file is only written when its text changes.
    pub fn process(&self, path: &Path) -> Result<Report, Error> {
        let text = filesystem::read_to_string(path)?;
        let host = HostFile::scan(path, &text)?;
        log::info!("found {} directive block(s) in {:?}", host.get_blocks().len(), path);

        let interp = Interpreter::new(&self.root, &self.macros, &self.format);
        let mut failures = Vec::new();
        let outputs: Vec<Option<String>> = host
            .get_blocks()
            .iter()
            .map(|block| match interp.execute(path, block) {
                Ok(out) => {
                    log::debug!("block {} produced {} line(s)", block.get_id(), out.lines().count());
                    Some(out)
                }
                Err(e) => {
                    log::error!(
                        "{:?}: block {} at line {}: {}",
                        path,
                        block.get_id(),
                        block.get_line(),
                        e
                    );
                    failures.push(e);
                    None
                }
            })
            .collect();

        let patched = host.apply(&outputs);
        let changed = patched != text;
        if changed == true {
            filesystem::write_atomic(path, &patched)?;
            log::info!("updated {:?}", path);
        }
        Ok(Report {
            blocks: outputs.len(),
            failures: failures,
            changed: changed,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const NOT_GATE: &str = "\
module inv (
    input  a,
    output y
);
endmodule
";

    const HOST: &str = "\
module top;
//VCG_BEGIN
// Instance('inv.v', 'inv', 'u0')
//VCG_END
//VCG_BEGIN
// print('wire x;')
//VCG_END
endmodule
";

    fn setup(host: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inv.v"), NOT_GATE).unwrap();
        let path = dir.path().join("top.v");
        std::fs::write(&path, host).unwrap();
        (dir, path)
    }

    #[test]
    fn generates_then_stays_up_to_date() {
        let (dir, path) = setup(HOST);
        let proc = Processor::new(dir.path());

        let report = proc.process(&path).unwrap();
        assert_eq!(report.get_block_count(), 2);
        assert!(report.is_success());
        assert!(report.is_changed());
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            first,
            "\
module top;
//VCG_BEGIN
// Instance('inv.v', 'inv', 'u0')
//VCG_END
//VCG_GEN_BEGIN_0
inv u0 (
    .a                 (a),             // input
    .y                 (y)              // output
);
//VCG_GEN_END_0
//VCG_BEGIN
// print('wire x;')
//VCG_END
//VCG_GEN_BEGIN_1
wire x;
//VCG_GEN_END_1
endmodule
"
        );

        let report = proc.process(&path).unwrap();
        assert!(report.is_changed() == false);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn editing_one_block_changes_only_its_region() {
        let (dir, path) = setup(HOST);
        let proc = Processor::new(dir.path());
        proc.process(&path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let edited = before.replace(
            "// Instance('inv.v', 'inv', 'u0')",
            "// Connect('y', 'n_y')\n// Instance('inv.v', 'inv', 'u0')",
        );
        std::fs::write(&path, &edited).unwrap();
        assert!(proc.process(&path).unwrap().is_changed());

        let after = std::fs::read_to_string(&path).unwrap();
        assert_eq!(after, edited.replace("(y)              // output", "(n_y)            // output"));
    }

    #[test]
    fn failing_block_keeps_previous_region() {
        let (dir, path) = setup(HOST);
        let proc = Processor::new(dir.path());
        proc.process(&path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let broken = before.replace("'inv', 'u0'", "'missing', 'u0'");
        std::fs::write(&path, &broken).unwrap();
        let report = proc.process(&path).unwrap();
        assert_eq!(report.get_failures().len(), 1);
        assert!(report.is_changed() == false);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn missing_host_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.v");
        assert_eq!(
            Processor::new(dir.path()).process(&path),
            Err(Error::FileMissing(path))
        );
    }
}
