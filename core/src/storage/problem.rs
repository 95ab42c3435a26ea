use std::path::{Path, PathBuf};

use crate::config::TestConfig;
use crate::testing::TestcaseLayout;

use super::error::*;

/// Directory of one problem, holding its input and expected-output dirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemDir {
    dir: PathBuf,
}

impl ProblemDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns `Some` if `dir` already has both testcase dirs.
    pub fn detect(dir: impl AsRef<Path>, cfg: &TestConfig) -> Option<Self> {
        let p = Self::new(dir.as_ref());
        p.has_testcases(cfg).then_some(p)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn has_testcases(&self, cfg: &TestConfig) -> bool {
        let layout = self.testcase_layout(cfg);
        layout.input_dir.is_dir() && layout.output_dir.is_dir()
    }

    pub fn ensure_testcases(&self, cfg: &TestConfig) -> Result<TestcaseLayout> {
        if !self.has_testcases(cfg) {
            return Err(Error::TestcaseDirMissing {
                dir: self.dir.clone(),
                input_dir: cfg.input_dir.clone(),
                output_dir: cfg.output_dir.clone(),
            });
        }
        Ok(self.testcase_layout(cfg))
    }

    pub fn testcase_layout(&self, cfg: &TestConfig) -> TestcaseLayout {
        TestcaseLayout {
            input_dir: self.dir.join(&cfg.input_dir),
            output_dir: self.dir.join(&cfg.output_dir),
            input_suffix: cfg.input_suffix.clone(),
            output_suffix: cfg.output_suffix.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detect_requires_both_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TestConfig::default();
        assert_eq!(ProblemDir::detect(tmp.path(), &cfg), None);

        fsutil::mkdir_all(tmp.path().join("in")).unwrap();
        assert_eq!(ProblemDir::detect(tmp.path(), &cfg), None);
        assert!(matches!(
            ProblemDir::new(tmp.path()).ensure_testcases(&cfg),
            Err(Error::TestcaseDirMissing { .. })
        ));

        fsutil::mkdir_all(tmp.path().join("out")).unwrap();
        let p = ProblemDir::detect(tmp.path(), &cfg).unwrap();
        let layout = p.ensure_testcases(&cfg).unwrap();
        assert_eq!(layout, TestcaseLayout::conventional(tmp.path()));
    }
}
