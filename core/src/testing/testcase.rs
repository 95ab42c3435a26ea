use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

use super::error::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsTestcase {
    name: String,
    input_path: PathBuf,
    expected_path: PathBuf,
}

/// Where the input and expected-output files of a problem live.
///
/// Testcase `N` is `{input_dir}/N{input_suffix}` paired with `{output_dir}/N{output_suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestcaseLayout {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub input_suffix: String,
    pub output_suffix: String,
}

impl FsTestcase {
    pub fn new(
        name: impl Into<String>,
        input: impl Into<PathBuf>,
        expected: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            input_path: input.into(),
            expected_path: expected.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn expected_path(&self) -> &Path {
        &self.expected_path
    }

    pub async fn read_input(&self) -> Result<String> {
        read_text(&self.input_path).await
    }

    pub async fn read_expected(&self) -> Result<String> {
        read_text(&self.expected_path).await
    }
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub(crate) async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| JudgeError::ReadTestcase {
            path: path.to_owned(),
            source,
        })
}

impl TestcaseLayout {
    pub const DEFAULT_INPUT_DIR: &str = "in";
    pub const DEFAULT_OUTPUT_DIR: &str = "out";
    pub const DEFAULT_INPUT_SUFFIX: &str = ".in";
    pub const DEFAULT_OUTPUT_SUFFIX: &str = ".out";

    /// `in/*.in` and `out/*.out` under `problem_dir`.
    pub fn conventional(problem_dir: impl AsRef<Path>) -> Self {
        let dir = problem_dir.as_ref();
        Self {
            input_dir: dir.join(Self::DEFAULT_INPUT_DIR),
            output_dir: dir.join(Self::DEFAULT_OUTPUT_DIR),
            input_suffix: Self::DEFAULT_INPUT_SUFFIX.to_owned(),
            output_suffix: Self::DEFAULT_OUTPUT_SUFFIX.to_owned(),
        }
    }

    fn testcase_name<'a>(&self, input_filename: &'a str) -> Option<&'a str> {
        input_filename
            .strip_suffix(&self.input_suffix)
            .filter(|name| !name.is_empty())
    }

    pub fn expected_path_for(&self, name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", name, self.output_suffix))
    }

    /// Enumerate testcases in `input_dir`, ordered by [`cmp_testcase_names`].
    ///
    /// The counterpart output file is not checked here; its absence surfaces
    /// when the testcase is judged.
    pub fn enumerate(&self) -> Result<Vec<FsTestcase>> {
        let mut res = Vec::new();
        for path in fsutil::list_files(&self.input_dir)? {
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                log::warn!("Ignoring non UTF-8 filename {:?}", path);
                continue
            };
            let Some(name) = self.testcase_name(filename) else {
                log::debug!("Ignoring {:?} (suffix is not '{}')", path, self.input_suffix);
                continue
            };
            let expected = self.expected_path_for(name);
            res.push(FsTestcase::new(name, path.clone(), expected));
        }
        res.sort_by(|a, b| cmp_testcase_names(&a.name, &b.name));
        Ok(res)
    }
}

/// Lexicographic order in which runs of ASCII digits compare by numeric value,
/// so that `sample-2` comes before `sample-10`.
pub fn cmp_testcase_names(a: &str, b: &str) -> Ordering {
    let (mut xs, mut ys) = (a.as_bytes(), b.as_bytes());
    loop {
        match (xs.first(), ys.first()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (nx, rest_x) = split_digits(xs);
                let (ny, rest_y) = split_digits(ys);
                let ord = cmp_numeric(nx, ny);
                if ord != Ordering::Equal {
                    return ord;
                }
                xs = rest_x;
                ys = rest_y;
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(y);
                if ord != Ordering::Equal {
                    return ord;
                }
                xs = &xs[1..];
                ys = &ys[1..];
            }
        }
    }
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let n = s.iter().take_while(|c| c.is_ascii_digit()).count();
    s.split_at(n)
}

fn cmp_numeric(x: &[u8], y: &[u8]) -> Ordering {
    fn trim(s: &[u8]) -> &[u8] {
        let zeros = s.iter().take_while(|&&c| c == b'0').count();
        &s[zeros..]
    }
    let (tx, ty) = (trim(x), trim(y));
    tx.len().cmp(&ty.len()).then_with(|| tx.cmp(ty))
}

#[cfg(test)]
mod test {
    use super::*;

    fn sorted(names: &[&'static str]) -> Vec<&'static str> {
        let mut v = names.to_vec();
        v.sort_by(|a, b| cmp_testcase_names(a, b));
        v
    }

    #[test]
    fn numeric_runs_compare_by_value() {
        assert_eq!(sorted(&["1", "10", "2"]), vec!["1", "2", "10"]);
        assert_eq!(
            sorted(&["sample-10", "sample-2", "sample-1"]),
            vec!["sample-1", "sample-2", "sample-10"]
        );
    }

    #[test]
    fn non_numeric_parts_are_lexicographic() {
        assert_eq!(sorted(&["b", "a1", "a"]), vec!["a", "a1", "b"]);
        assert_eq!(sorted(&["x-2", "handmade", "x-1"]), vec!["handmade", "x-1", "x-2"]);
    }

    #[test]
    fn leading_zeros_break_ties_deterministically() {
        assert_eq!(sorted(&["1", "01", "001"]), vec!["001", "01", "1"]);
        assert_eq!(cmp_testcase_names("02", "1"), Ordering::Greater);
    }

    #[test]
    fn enumerate_should_pair_by_stem() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = TestcaseLayout::conventional(tmp.path());
        for name in ["10", "2", "1"] {
            fsutil::write_with_mkdir(layout.input_dir.join(format!("{}.in", name)), name).unwrap();
        }
        fsutil::write_with_mkdir(layout.input_dir.join("memo.txt"), "").unwrap();
        fsutil::write_with_mkdir(layout.input_dir.join(".in"), "").unwrap();

        let ts = layout.enumerate().unwrap();
        let names: Vec<_> = ts.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["1", "2", "10"]);
        assert_eq!(ts[2].input_path(), tmp.path().join("in/10.in"));
        assert_eq!(ts[2].expected_path(), tmp.path().join("out/10.out"));
    }

    #[test]
    fn enumerate_missing_input_dir_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = TestcaseLayout::conventional(tmp.path().join("nowhere"));
        assert!(matches!(layout.enumerate(), Err(JudgeError::Fs(_))));
    }
}
