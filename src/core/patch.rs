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

//! Locates directive blocks and generated regions in a host file and
//! rewrites the regions in place.
//!
//! A directive block is a run of comment lines between `//VCG_BEGIN` and
//! `//VCG_END`. The text it generates is kept between
//! `//VCG_GEN_BEGIN_<id>` and `//VCG_GEN_END_<id>`, where `<id>` is the
//! block's position in the file counting from 0.

use crate::error::Error;
use std::collections::HashMap;
use std::path::Path;

const BLOCK_BEGIN: &str = "//VCG_BEGIN";
const BLOCK_END: &str = "//VCG_END";
const GEN_BEGIN: &str = "//VCG_GEN_BEGIN_";
const GEN_END: &str = "//VCG_GEN_END_";
const GEN_ANY: &str = "//VCG_GEN_";

/// A directive block and its script text.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    id: usize,
    /// Index of the `//VCG_BEGIN` line.
    begin: usize,
    /// Index of the `//VCG_END` line.
    end: usize,
    script: String,
}

impl Block {
    pub fn get_id(&self) -> usize {
        self.id
    }

    /// Returns the 1-based line number of the block's opening marker.
    pub fn get_line(&self) -> usize {
        self.begin + 1
    }

    /// Returns the script with its comment prefixes and common indentation
    /// removed. The script's first line is the line after the opening marker.
    pub fn get_script(&self) -> &str {
        &self.script
    }
}

/// The marker lines of an existing generated region.
#[derive(Debug, PartialEq, Clone)]
struct Region {
    begin: usize,
    end: usize,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum State {
    Scanning,
    InDirective(usize),
    InGenerated(usize, usize),
}

#[derive(Debug, PartialEq)]
pub struct HostFile {
    lines: Vec<String>,
    eol: &'static str,
    blocks: Vec<Block>,
    regions: HashMap<usize, Region>,
}

impl HostFile {
    /// Splits the host file's `text` into its directive blocks and generated
    /// regions, verifying the markers are well-formed.
    pub fn scan(path: &Path, text: &str) -> Result<Self, Error> {
        let lines: Vec<String> = text.split_inclusive('\n').map(|l| l.to_string()).collect();
        let eol = match lines.first().is_some_and(|l| l.ends_with("\r\n")) {
            true => "\r\n",
            false => "\n",
        };
        let mismatch = |line: usize, reason: String| Error::MarkerMismatch {
            file: path.to_path_buf(),
            line: line + 1,
            reason: reason,
        };

        let mut blocks = Vec::new();
        let mut regions: HashMap<usize, Region> = HashMap::new();
        let mut script = Vec::new();
        let mut state = State::Scanning;

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            state = match state {
                State::Scanning => {
                    if let Some(rest) = trimmed.strip_prefix(GEN_BEGIN) {
                        let id = parse_id(rest)
                            .ok_or_else(|| mismatch(i, format!("invalid region id {:?}", rest)))?;
                        if id >= blocks.len() {
                            return Err(mismatch(
                                i,
                                format!("generated region {} has no preceding directive block", id),
                            ));
                        } else if regions.contains_key(&id) == true {
                            return Err(mismatch(i, format!("duplicate generated region {}", id)));
                        }
                        State::InGenerated(id, i)
                    } else if trimmed.starts_with(GEN_END) {
                        return Err(mismatch(i, String::from("generated region end without a beginning")));
                    } else if trimmed.starts_with(BLOCK_BEGIN) {
                        script.clear();
                        State::InDirective(i)
                    } else if trimmed.starts_with(BLOCK_END) {
                        return Err(mismatch(i, String::from("directive block end without a beginning")));
                    } else {
                        State::Scanning
                    }
                }
                State::InDirective(begin) => {
                    if trimmed.starts_with(BLOCK_END) {
                        blocks.push(Block {
                            id: blocks.len(),
                            begin: begin,
                            end: i,
                            script: dedent(&script),
                        });
                        State::Scanning
                    } else if trimmed.starts_with(BLOCK_BEGIN) {
                        return Err(mismatch(i, String::from("nested directive block")));
                    } else if trimmed.starts_with(GEN_ANY) {
                        return Err(mismatch(i, String::from("generation marker inside a directive block")));
                    } else {
                        script.push(uncomment(line));
                        State::InDirective(begin)
                    }
                }
                State::InGenerated(id, begin) => {
                    if let Some(rest) = trimmed.strip_prefix(GEN_END) {
                        match parse_id(rest) {
                            Some(end_id) if end_id == id => {
                                regions.insert(id, Region { begin: begin, end: i });
                                State::Scanning
                            }
                            _ => {
                                return Err(mismatch(
                                    i,
                                    format!("generated region {} is closed by mismatched marker {:?}", id, trimmed),
                                ))
                            }
                        }
                    } else if trimmed.starts_with(GEN_BEGIN) {
                        return Err(mismatch(i, String::from("nested generated region")));
                    } else if trimmed.starts_with(BLOCK_BEGIN) || trimmed.starts_with(BLOCK_END) {
                        return Err(mismatch(i, String::from("directive marker inside a generated region")));
                    } else {
                        State::InGenerated(id, begin)
                    }
                }
            };
        }

        match state {
            State::Scanning => (),
            State::InDirective(begin) => {
                return Err(mismatch(begin, String::from("directive block is never closed")))
            }
            State::InGenerated(id, begin) => {
                return Err(mismatch(begin, format!("generated region {} is never closed", id)))
            }
        }

        Ok(Self {
            lines: lines,
            eol: eol,
            blocks: blocks,
            regions: regions,
        })
    }

    pub fn get_blocks(&self) -> &Vec<Block> {
        &self.blocks
    }

    /// Writes the file with each block's region holding its new output.
    ///
    /// `outputs` is indexed by block id. A block with no output keeps its
    /// region unchanged, and no region is created for it.
    pub fn apply(&self, outputs: &[Option<String>]) -> String {
        let output_of = |id: usize| outputs.get(id).and_then(|o| o.as_ref());
        let block_ends: HashMap<usize, usize> = self.blocks.iter().map(|b| (b.end, b.id)).collect();
        let region_begins: HashMap<usize, (usize, &Region)> =
            self.regions.iter().map(|(id, r)| (r.begin, (*id, r))).collect();

        let mut result = String::with_capacity(self.lines.iter().map(|l| l.len()).sum());
        let mut i = 0;
        while i < self.lines.len() {
            let line = &self.lines[i];
            result.push_str(line);

            if let Some(&id) = block_ends.get(&i) {
                if let (Some(text), false) = (output_of(id), self.regions.contains_key(&id)) {
                    self.terminate(&mut result);
                    result.push_str(&format!("{}{}{}", GEN_BEGIN, id, self.eol));
                    self.push_content(&mut result, text);
                    result.push_str(&format!("{}{}{}", GEN_END, id, self.eol));
                }
            } else if let Some(&(id, region)) = region_begins.get(&i) {
                if let Some(text) = output_of(id) {
                    self.terminate(&mut result);
                    self.push_content(&mut result, text);
                    // resume at the closing marker
                    i = region.end;
                    continue;
                }
            }
            i += 1;
        }
        result
    }

    /// Ends the last line written if it was the file's final, unterminated line.
    fn terminate(&self, result: &mut String) {
        if result.is_empty() == false && result.ends_with('\n') == false {
            result.push_str(self.eol);
        }
    }

    fn push_content(&self, result: &mut String, text: &str) {
        for line in text.trim_end().lines() {
            result.push_str(line);
            result.push_str(self.eol);
        }
    }
}

fn parse_id(s: &str) -> Option<usize> {
    s.split_whitespace().next()?.parse::<usize>().ok()
}

/// Removes the leading `//` comment prefix from a script line.
fn uncomment(line: &str) -> String {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    match line.trim_start().strip_prefix("//") {
        Some(rest) => rest.to_string(),
        None => line.to_string(),
    }
}

/// Joins the lines after removing their smallest common indentation.
fn dedent(lines: &[String]) -> String {
    let indent = lines
        .iter()
        .filter(|l| l.trim().is_empty() == false)
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| match l.trim().is_empty() {
            true => "",
            false => l.get(indent..).unwrap_or(l.trim_start()),
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const HOST: &str = "\
module top;
  //VCG_BEGIN
  //  for i in range(2):
  //      print('wire w%d;' % i)
  //VCG_END
  assign x = 1;
endmodule
";

    fn scan(text: &str) -> Result<HostFile, Error> {
        HostFile::scan(Path::new("top.v"), text)
    }

    fn reason(e: Error) -> (usize, String) {
        match e {
            Error::MarkerMismatch { line, reason, .. } => (line, reason),
            _ => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn script_is_uncommented_and_dedented() {
        let host = scan(HOST).unwrap();
        assert_eq!(host.get_blocks().len(), 1);
        let block = &host.get_blocks()[0];
        assert_eq!(block.get_id(), 0);
        assert_eq!(block.get_line(), 2);
        assert_eq!(
            block.get_script(),
            "for i in range(2):\n    print('wire w%d;' % i)"
        );
    }

    #[test]
    fn region_is_inserted_after_block() {
        let host = scan(HOST).unwrap();
        let text = host.apply(&[Some("wire w0;\nwire w1;\n\n".to_string())]);
        assert_eq!(
            text,
            "\
module top;
  //VCG_BEGIN
  //  for i in range(2):
  //      print('wire w%d;' % i)
  //VCG_END
//VCG_GEN_BEGIN_0
wire w0;
wire w1;
//VCG_GEN_END_0
  assign x = 1;
endmodule
"
        );
    }

    #[test]
    fn region_is_replaced_and_rewrite_is_idempotent() {
        let host = scan(HOST).unwrap();
        let first = host.apply(&[Some("wire w0;".to_string())]);
        let host = scan(&first).unwrap();
        assert_eq!(host.apply(&[Some("wire w0;".to_string())]), first);

        let second = host.apply(&[Some("wire a;\nwire b;".to_string())]);
        assert_eq!(second, first.replace("wire w0;\n", "wire a;\nwire b;\n"));
        // a failed block keeps its region untouched
        assert_eq!(scan(&second).unwrap().apply(&[None]), second);
    }

    #[test]
    fn empty_output_keeps_markers() {
        let host = scan(HOST).unwrap();
        let text = host.apply(&[Some(String::new())]);
        assert!(text.contains("//VCG_END\n//VCG_GEN_BEGIN_0\n//VCG_GEN_END_0\n"));
        assert_eq!(scan(&text).unwrap().apply(&[Some(String::new())]), text);
    }

    #[test]
    fn failed_block_gets_no_region() {
        let host = scan(HOST).unwrap();
        assert_eq!(host.apply(&[None]), HOST);
    }

    #[test]
    fn crlf_and_unterminated_last_line() {
        let text = "//VCG_BEGIN\r\n//print('x')\r\n//VCG_END";
        let host = scan(text).unwrap();
        assert_eq!(host.get_blocks()[0].get_script(), "print('x')");
        assert_eq!(
            host.apply(&[Some("x".to_string())]),
            "//VCG_BEGIN\r\n//print('x')\r\n//VCG_END\r\n//VCG_GEN_BEGIN_0\r\nx\r\n//VCG_GEN_END_0\r\n"
        );
    }

    #[test]
    fn region_may_appear_later() {
        let text = "//VCG_BEGIN\n//VCG_END\nfoo\n//VCG_GEN_BEGIN_0\nold\n//VCG_GEN_END_0\nbar\n";
        let host = scan(text).unwrap();
        assert_eq!(
            host.apply(&[Some("new".to_string())]),
            "//VCG_BEGIN\n//VCG_END\nfoo\n//VCG_GEN_BEGIN_0\nnew\n//VCG_GEN_END_0\nbar\n"
        );
    }

    #[test]
    fn marker_errors() {
        assert_eq!(
            reason(scan("//VCG_BEGIN\n//VCG_BEGIN\n//VCG_END\n").unwrap_err()),
            (2, String::from("nested directive block"))
        );
        assert_eq!(
            reason(scan("x\n//VCG_BEGIN\n").unwrap_err()),
            (2, String::from("directive block is never closed"))
        );
        assert_eq!(
            reason(scan("//VCG_END\n").unwrap_err()),
            (1, String::from("directive block end without a beginning"))
        );
        assert_eq!(
            reason(scan("//VCG_GEN_BEGIN_0\n//VCG_GEN_END_0\n").unwrap_err()),
            (1, String::from("generated region 0 has no preceding directive block"))
        );
        assert_eq!(
            reason(scan("//VCG_BEGIN\n//VCG_END\n//VCG_GEN_BEGIN_0\n//VCG_GEN_END_1\n").unwrap_err()).0,
            4
        );
        assert_eq!(
            reason(
                scan("//VCG_BEGIN\n//VCG_END\n//VCG_GEN_BEGIN_0\n//VCG_GEN_END_0\n//VCG_GEN_BEGIN_0\n//VCG_GEN_END_0\n")
                    .unwrap_err()
            ),
            (5, String::from("duplicate generated region 0"))
        );
        assert_eq!(
            reason(scan("//VCG_BEGIN\n//VCG_GEN_BEGIN_0\n").unwrap_err()),
            (2, String::from("generation marker inside a directive block"))
        );
        assert_eq!(
            reason(scan("//VCG_BEGIN\n//VCG_END\n//VCG_GEN_BEGIN_0\n").unwrap_err()),
            (3, String::from("generated region 0 is never closed"))
        );
    }
}
