use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::testing::{JudgeLimits, SolutionCommand, TestcaseLayout};

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    #[serde(default)]
    pub test: TestConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub command: Vec<String>,
    pub time_limit_secs: f64,
    pub hard_timeout_secs: f64,
    pub input_dir: String,
    pub output_dir: String,
    pub input_suffix: String,
    pub output_suffix: String,
    pub jobs: NonZeroUsize,
    pub fail_fast: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            command: vec!["python".to_owned(), "main.py".to_owned()],
            time_limit_secs: JudgeLimits::DEFAULT_TIME_LIMIT.as_secs_f64(),
            hard_timeout_secs: JudgeLimits::DEFAULT_HARD_TIMEOUT.as_secs_f64(),
            input_dir: TestcaseLayout::DEFAULT_INPUT_DIR.to_owned(),
            output_dir: TestcaseLayout::DEFAULT_OUTPUT_DIR.to_owned(),
            input_suffix: TestcaseLayout::DEFAULT_INPUT_SUFFIX.to_owned(),
            output_suffix: TestcaseLayout::DEFAULT_OUTPUT_SUFFIX.to_owned(),
            jobs: NonZeroUsize::MIN,
            fail_fast: false,
        }
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "accprob.toml";

    pub fn example_toml() -> String {
        let file = Asset::get(Self::FILENAME).expect("example config is embedded");
        String::from_utf8_lossy(file.data.as_ref()).into_owned()
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> fsutil::Result<PathBuf> {
        fsutil::find_file_in_ancestors(cur_dir, Self::FILENAME)
    }

    /// Falls back to the default config when no config file exists.
    pub fn from_file_finding_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        match Self::find_file_in_ancestors(cur_dir) {
            Ok(filepath) => {
                log::debug!("Config: {}", filepath.to_string_lossy());
                Self::from_toml_file(filepath)
            }
            Err(_) => {
                log::debug!("No {} found; using default config", Self::FILENAME);
                Ok(Self::default())
            }
        }
    }
}

impl TestConfig {
    pub fn solution_command(&self) -> anyhow::Result<SolutionCommand> {
        SolutionCommand::new(self.command.iter().cloned()).context("Invalid `test.command`")
    }

    pub fn limits(&self) -> anyhow::Result<JudgeLimits> {
        let time_limit = secs_to_duration(self.time_limit_secs)
            .context("Invalid `test.time_limit_secs`")?;
        let hard_timeout = secs_to_duration(self.hard_timeout_secs)
            .context("Invalid `test.hard_timeout_secs`")?;
        Ok(JudgeLimits {
            time_limit,
            hard_timeout,
        })
    }
}

pub fn secs_to_duration(secs: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("Not a non-negative number of seconds: {}", secs))
}
