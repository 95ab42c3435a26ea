use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, self::Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Cannot find contest data under '{}': neither '{}' nor '.accprob/current.json' exists",
        .0.to_string_lossy(),
        super::Contest::INFO_FILENAME
    )]
    ContestNotFound(PathBuf),

    #[error("Contest dir '{}' does not exist. Download the contest first.", .0.to_string_lossy())]
    ContestDirMissing(PathBuf),

    #[error("Problem not found: '{0}'")]
    ProblemNotFound(String),

    #[error("Ambiguous problem key '{key}'. Candidates:\n{}", .candidates.join("\n"))]
    AmbiguousProblem { key: String, candidates: Vec<String> },

    #[error("Testcases not found: '{}' must contain '{}' and '{}'", .dir.to_string_lossy(), .input_dir, .output_dir)]
    TestcaseDirMissing {
        dir: PathBuf,
        input_dir: String,
        output_dir: String,
    },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}
