use serde::de::DeserializeOwned;
use std::{
    fs::{self, File, ReadDir},
    io::BufReader,
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Cannot find '{0}' in '{1}' or its ancestors")]
        NotFoundInAncestors(String, PathBuf),

        #[error("Cannot deserialize from JSON (src='{0}'): {1}")]
        DeserializeFromJson(PathBuf, #[source] serde_json::Error),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn read_json_with_deserialize<P, T>(filepath: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let filepath = filepath.as_ref();
    let f = File::open(filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.to_owned(), e))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| Error::DeserializeFromJson(filepath.to_owned(), e))
}

#[must_use]
pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Lists regular files (symlinks are followed) directly under `dir`.
/// The order is unspecified; callers sort as they need.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut res = Vec::new();
    for entry in self::read_dir(dir)? {
        let entry =
            entry.map_err(|e| Error::SingleIO("Cannot access dir entry", dir.to_owned(), e))?;
        let path = entry.path();
        let Ok(meta) = fs::metadata(&path) else {
            log::debug!("Skipping unreadable entry {:?}", path);
            continue
        };
        if meta.is_file() {
            res.push(path);
        }
    }
    Ok(res)
}

/// Find `filename` in `cur_dir` and its ancestors, nearest first.
pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>, filename: &str) -> Result<PathBuf> {
    let cur_dir = cur_dir.as_ref();
    cur_dir
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::NotFoundInAncestors(filename.to_owned(), cur_dir.to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn list_files_should_skip_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        write_with_mkdir(tmp.path().join("a.in"), "1\n").unwrap();
        write_with_mkdir(tmp.path().join("b.in"), "2\n").unwrap();
        mkdir_all(tmp.path().join("nested.in")).unwrap();

        let mut files = list_files(tmp.path()).unwrap();
        files.sort();
        assert_eq!(files, vec![tmp.path().join("a.in"), tmp.path().join("b.in")]);
    }

    #[test]
    fn find_file_in_ancestors_should_find_nearest() {
        let tmp = tempfile::tempdir().unwrap();
        let deep = tmp.path().join("x/y/z");
        mkdir_all(&deep).unwrap();
        write(tmp.path().join("marker.json"), "{}").unwrap();
        write(tmp.path().join("x/marker.json"), "{}").unwrap();

        let found = find_file_in_ancestors(&deep, "marker.json").unwrap();
        assert_eq!(found, tmp.path().join("x/marker.json"));

        let res = find_file_in_ancestors(&deep, "nothing.json");
        assert!(matches!(res, Err(Error::NotFoundInAncestors(..))));
    }

    #[test]
    fn read_json_should_report_path_on_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        write(&path, "{ not json").unwrap();

        let res: Result<serde_json::Value> = read_json_with_deserialize(&path);
        match res {
            Err(Error::DeserializeFromJson(p, _)) => assert_eq!(p, path),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
