use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{error::*, ProblemDir};

/// Contents of `info.json` in a contest dir, written when the contest is downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestInfoFile {
    pub url: String,
    #[serde(default)]
    pub api_url: Option<String>,
    pub data: ContestData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestData {
    pub info: ContestMeta,
    pub problems: Vec<ContestProblem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestMeta {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestProblem {
    pub id: String,
    #[serde(default)]
    pub point: Option<u64>,
    pub order: u32,
}

/// `.accprob/current.json`: points at the most recently downloaded contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentContest {
    pub url: String,
    pub title: String,
}

impl ContestProblem {
    /// `01-abc001_a`
    pub fn dirname(&self) -> String {
        format!("{:02}-{}", self.order, self.id)
    }
}

#[derive(Debug, Clone)]
pub struct Contest {
    dir: PathBuf,
    info: ContestInfoFile,
}

impl Contest {
    pub const INFO_FILENAME: &str = "info.json";
    pub const CACHE_DIR_NAME: &str = ".accprob";
    pub const CURRENT_FILENAME: &str = "current.json";

    /// Locate the contest from `base_dir`.
    ///
    /// Looked up in order: `base_dir/info.json`, then
    /// `base_dir/.accprob/current.json` (names the contest dir under
    /// `base_dir`), then `info.json` in the ancestors of `base_dir`.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();

        if base_dir.join(Self::INFO_FILENAME).is_file() {
            return Self::load(base_dir);
        }

        let current_file = base_dir
            .join(Self::CACHE_DIR_NAME)
            .join(Self::CURRENT_FILENAME);
        if current_file.is_file() {
            log::debug!("Contest pointer: {}", current_file.to_string_lossy());
            let current: CurrentContest = fsutil::read_json_with_deserialize(&current_file)?;
            let dir = base_dir.join(&current.title);
            if !dir.is_dir() {
                return Err(Error::ContestDirMissing(dir));
            }
            return Self::load(dir);
        }

        if let Ok(info_file) = fsutil::find_file_in_ancestors(base_dir, Self::INFO_FILENAME) {
            log::debug!("Contest info: {}", info_file.to_string_lossy());
            let dir = info_file.parent().unwrap_or(base_dir).to_owned();
            return Self::load(dir);
        }

        Err(Error::ContestNotFound(base_dir.to_owned()))
    }

    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let info = fsutil::read_json_with_deserialize(dir.join(Self::INFO_FILENAME))?;
        Ok(Self { dir, info })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn title(&self) -> &str {
        &self.info.data.info.title
    }

    pub fn url(&self) -> &str {
        &self.info.url
    }

    pub fn problems(&self) -> &[ContestProblem] {
        &self.info.data.problems
    }

    /// Resolve a problem by its order number (`"1"`, `"01"`) or by (part of) its id.
    pub fn resolve(&self, key: &str) -> Result<(&ContestProblem, ProblemDir)> {
        let problem = self.find_problem(key)?;
        let dir = ProblemDir::new(self.dir.join(problem.dirname()));
        Ok((problem, dir))
    }

    fn find_problem(&self, key: &str) -> Result<&ContestProblem> {
        let problems = self.problems();
        let not_found = || Error::ProblemNotFound(key.to_owned());

        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            let ord: u32 = key.parse().map_err(|_| not_found())?;
            return problems.iter().find(|p| p.order == ord).ok_or_else(not_found);
        }

        if let Some(p) = problems.iter().find(|p| p.id == key) {
            return Ok(p);
        }
        let matched: Vec<_> = problems.iter().filter(|p| p.id.contains(key)).collect();
        match matched.as_slice() {
            [] => Err(not_found()),
            [p] => Ok(*p),
            _ => Err(Error::AmbiguousProblem {
                key: key.to_owned(),
                candidates: matched.iter().map(|p| p.dirname()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const INFO_JSON: &str = r#"{
        "url": "https://kenkoooo.com/atcoder/#/contest/show/xxxx",
        "api_url": "https://kenkoooo.com/atcoder/internal-api/contest/get/xxxx",
        "data": {
            "info": {
                "id": "xxxx",
                "title": "Virtual ABC",
                "memo": "",
                "owner_user_id": 1,
                "start_epoch_second": 0,
                "duration_second": 6000,
                "mode": null,
                "is_public": true,
                "penalty_second": 300
            },
            "problems": [
                { "id": "abc254_d", "point": null, "order": 1 },
                { "id": "abc254_e", "point": 500, "order": 2 },
                { "id": "arc140_d", "point": null, "order": 3 }
            ]
        }
    }"#;

    fn setup() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let contest_dir = tmp.path().join("Virtual ABC");
        fsutil::write_with_mkdir(contest_dir.join(Contest::INFO_FILENAME), INFO_JSON).unwrap();
        tmp
    }

    #[test]
    fn open_via_current_json() {
        let tmp = setup();
        let current = r#"{"url": "https://example.com", "title": "Virtual ABC"}"#;
        fsutil::write_with_mkdir(tmp.path().join(".accprob/current.json"), current).unwrap();

        let contest = Contest::open(tmp.path()).unwrap();
        assert_eq!(contest.title(), "Virtual ABC");
        assert_eq!(contest.dir(), tmp.path().join("Virtual ABC"));
        assert_eq!(contest.problems().len(), 3);
    }

    #[test]
    fn current_json_wins_over_info_json_in_ancestors() {
        let outer = tempfile::tempdir().unwrap();
        fsutil::write(outer.path().join(Contest::INFO_FILENAME), "not a contest").unwrap();
        let base = outer.path().join("work");
        fsutil::write_with_mkdir(base.join("Virtual ABC").join(Contest::INFO_FILENAME), INFO_JSON)
            .unwrap();
        let current = r#"{"url": "https://example.com", "title": "Virtual ABC"}"#;
        fsutil::write_with_mkdir(base.join(".accprob/current.json"), current).unwrap();

        let contest = Contest::open(&base).unwrap();
        assert_eq!(contest.dir(), base.join("Virtual ABC"));
        assert_eq!(contest.title(), "Virtual ABC");
    }

    #[test]
    fn open_from_inside_problem_dir() {
        let tmp = setup();
        let problem_dir = tmp.path().join("Virtual ABC/01-abc254_d");
        fsutil::mkdir_all(&problem_dir).unwrap();

        let contest = Contest::open(&problem_dir).unwrap();
        assert_eq!(contest.dir(), tmp.path().join("Virtual ABC"));
    }

    #[test]
    fn open_without_contest_data_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Contest::open(tmp.path()),
            Err(Error::ContestNotFound(_))
        ));

        let current = r#"{"url": "https://example.com", "title": "Gone"}"#;
        fsutil::write_with_mkdir(tmp.path().join(".accprob/current.json"), current).unwrap();
        assert!(matches!(
            Contest::open(tmp.path()),
            Err(Error::ContestDirMissing(_))
        ));
    }

    #[test]
    fn resolve_by_order_and_id() {
        let tmp = setup();
        let contest = Contest::load(tmp.path().join("Virtual ABC")).unwrap();

        let (p, dir) = contest.resolve("02").unwrap();
        assert_eq!(p.id, "abc254_e");
        assert_eq!(dir.dir(), tmp.path().join("Virtual ABC/02-abc254_e"));

        assert_eq!(contest.resolve("3").unwrap().0.id, "arc140_d");
        assert_eq!(contest.resolve("arc").unwrap().0.id, "arc140_d");
        assert_eq!(contest.resolve("abc254_d").unwrap().0.id, "abc254_d");
    }

    #[test]
    fn resolve_rejects_unknown_and_ambiguous_keys() {
        let tmp = setup();
        let contest = Contest::load(tmp.path().join("Virtual ABC")).unwrap();

        assert!(matches!(
            contest.resolve("9"),
            Err(Error::ProblemNotFound(_))
        ));
        assert!(matches!(
            contest.resolve("xyz"),
            Err(Error::ProblemNotFound(_))
        ));
        match contest.resolve("abc254") {
            Err(Error::AmbiguousProblem { candidates, .. }) => {
                assert_eq!(candidates, vec!["01-abc254_d", "02-abc254_e"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
