/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::fs::{self,File};
use std::io::{self,Read,Write};
use std::path::{Path,PathBuf};

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn ensure_dir (path: impl AsRef<Path>)->io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// make sure the parent directory of the given file path exists
pub fn ensure_parent_dir (path: impl AsRef<Path>)->io::Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir( parent),
        _ => Ok(())
    }
}

/// contents of file as bytes. Note that unlike other readers this does accept empty files
pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// write data to a temporary sibling file and then rename it to `path`, i.e. readers either see the old
/// or the new contents but never a partially written file
pub fn write_file_atomic <P: AsRef<Path>> (path: &P, data: &[u8])->Result<()> {
    let path = path.as_ref();
    ensure_parent_dir( path)?;

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from( tmp_name);

    {
        let mut file = File::create( &tmp_path)?;
        file.write_all( data)?;
        file.sync_all()?;
    }
    fs::rename( &tmp_path, path)
}

/// recursively collect all regular files below `dir`, skipping directories for which `skip_dir` returns true
pub fn files_below<F> (dir: &Path, skip_dir: &F)->Result<Vec<PathBuf>> where F: Fn(&Path)->bool {
    let mut files = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if !skip_dir( &path) {
                    files.extend( files_below( &path, skip_dir)?);
                }
            } else if path.is_file() {
                files.push( path);
            }
        }
    }
    Ok(files)
}
