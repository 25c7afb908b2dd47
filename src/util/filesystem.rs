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

use crate::error::{Error, LastError};
use std::io::Write;
use std::path::Path;

/// Reads the entire file at `path` into a string.
pub fn read_to_string(path: &Path) -> Result<String, Error> {
    if path.exists() == false {
        return Err(Error::FileMissing(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| Error::FileIo(path.to_path_buf(), LastError(e.to_string())))
}

/// Replaces the file at `path` with `contents` by renaming a temporary file
/// written in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), Error> {
    let io_err = |e: std::io::Error| Error::FileIo(path.to_path_buf(), LastError(e.to_string()));
    let dir = match path.parent() {
        Some(p) if p.as_os_str().is_empty() == false => p.to_path_buf(),
        _ => std::env::current_dir().map_err(io_err)?,
    };
    let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
    temp.write_all(contents.as_bytes()).map_err(io_err)?;
    temp.flush().map_err(io_err)?;
    // keep the original file's permissions
    if let Ok(meta) = std::fs::metadata(path) {
        temp.as_file().set_permissions(meta.permissions()).map_err(io_err)?;
    }
    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn atomic_write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.v");
        std::fs::write(&path, "old").unwrap();
        write_atomic(&path, "new\n").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "new\n");
        // no temporary files are left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.v");
        assert_eq!(read_to_string(&path), Err(Error::FileMissing(path.clone())));
    }
}
