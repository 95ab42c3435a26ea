pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::io;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use error::*;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::Mutex;

use crate::config::{Config, TestConfig};
use crate::interactive::{self, SpinnerExt};
use crate::report::TestReport;
use crate::storage::{Contest, ProblemDir};
use crate::style;
use crate::testing::{BatchJudge, JudgeLimits, JudgeRunner, SolutionCommand};

#[derive(Debug, Clone)]
pub struct TestOptions {
    pub skip_confirm: bool,
    pub show_detail: bool,
    pub fail_fast: bool,
    pub json: bool,
    pub jobs: NonZeroUsize,
}

pub fn init_config(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if let Ok(config_filepath) = Config::find_file_in_ancestors(dir) {
        bail!(
            "Config file already exists: {:?}\nIf it's intentional, remove it and then try again.",
            config_filepath
        );
    }
    let config_filepath = dir.join(Config::FILENAME);
    fsutil::write_with_mkdir(config_filepath, Config::example_toml())
        .context("Failed to write config file")?;
    Ok(())
}

/// Without `problem_key`, `base_dir` itself must be a problem dir.
pub fn resolve_problem_dir(
    base_dir: impl AsRef<Path>,
    problem_key: Option<&str>,
    cfg: &TestConfig,
) -> Result<ProblemDir> {
    let base_dir = base_dir.as_ref();
    let Some(key) = problem_key else {
        return ProblemDir::detect(base_dir, cfg).with_context(|| {
            format!(
                "'{}' is not a problem dir (no '{}/' and '{}/' in it). Specify a problem.",
                base_dir.to_string_lossy(),
                cfg.input_dir,
                cfg.output_dir
            )
        });
    };

    let contest = Contest::open(base_dir).context("Failed to load contest data")?;
    log::debug!("Contest: {} ({})", contest.dir().to_string_lossy(), contest.url());
    let (problem, dir) = contest.resolve(key)?;
    log::info!(
        "{} : {:02} : {}",
        contest.title(),
        problem.order,
        problem.id
    );
    Ok(dir)
}

pub fn find_contest(base_dir: impl AsRef<Path>) -> Result<Contest> {
    Ok(Contest::open(base_dir)?)
}

pub async fn do_test(
    problem_dir: &ProblemDir,
    command: SolutionCommand,
    cfg: &TestConfig,
    limits: JudgeLimits,
    opts: &TestOptions,
) -> Result<Vec<TestReport>> {
    let layout = problem_dir.ensure_testcases(cfg)?;

    let dir_str = problem_dir.dir().to_string_lossy();
    if !opts.skip_confirm && !interactive::confirm(&format!("Test {}?", dir_str))? {
        log::info!("Canceled");
        return Ok(Vec::new());
    }

    let runner = JudgeRunner::new(command, Some(problem_dir.dir().to_owned()))?;
    let batch = BatchJudge::new(&runner, &layout, limits).context("Failed to find testcases")?;
    if batch.remaining().is_empty() {
        bail!(
            "No testcases found in {}",
            layout.input_dir.to_string_lossy()
        );
    }

    log::info!("Running: {}", runner.command());
    log::info!(
        "Time limit: {}s (killed after {}s)",
        limits.time_limit.as_secs_f64(),
        limits.hard_timeout.as_secs_f64()
    );

    let draw_target = if opts.json {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr()
    };

    let reports = if opts.jobs.get() == 1 {
        judge_sequentially(batch, opts.fail_fast, draw_target).await?
    } else {
        if opts.fail_fast {
            log::warn!("--fail-fast is ignored when judging concurrently");
        }
        judge_concurrently(batch, opts.jobs, draw_target).await?
    };

    if opts.json {
        serde_json::to_writer_pretty(io::stdout(), &reports)?;
        println!();
        return Ok(reports);
    }

    println!();
    reports
        .iter()
        .filter(|r| opts.show_detail || !r.verdict.is_accepted())
        .for_each(|r| style::print_test_result_detail(r, opts.show_detail));

    style::print_test_result_summary(&reports);
    Ok(reports)
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

async fn judge_sequentially(
    mut batch: BatchJudge<'_>,
    fail_fast: bool,
    draw_target: ProgressDrawTarget,
) -> Result<Vec<TestReport>> {
    let container = MultiProgress::with_draw_target(draw_target);
    let style = spinner_style();

    let mut bars = Vec::with_capacity(batch.remaining().len());
    for t in batch.remaining() {
        let bar = container
            .add(ProgressBar::new_spinner())
            .with_style(style.clone())
            .with_message(format!("Testcase {} ...", t.name()));
        bars.push(bar.with_ticking());
    }

    let mut reports = Vec::with_capacity(bars.len());
    let mut bars = bars.into_iter();

    while let Some(judged) = batch.next().await {
        let report = match TestReport::from_judged(judged).await {
            Ok(report) => report,
            Err(e) => {
                clear_spinners(bars).await;
                return Err(e).context("Failed to run the solution");
            }
        };
        if let Some(bar) = bars.next() {
            bar.lock()
                .await
                .finish_with_message(style::test_result_line(&report).cyan().to_string());
        }
        let failed = !report.verdict.is_accepted();
        reports.push(report);
        if fail_fast && failed {
            log::info!("Stopped at the first failure");
            break;
        }
    }

    clear_spinners(bars).await;
    Ok(reports)
}

async fn clear_spinners(bars: impl IntoIterator<Item = Arc<Mutex<ProgressBar>>>) {
    for bar in bars {
        bar.lock().await.finish_and_clear();
    }
}

async fn judge_concurrently(
    batch: BatchJudge<'_>,
    jobs: NonZeroUsize,
    draw_target: ProgressDrawTarget,
) -> Result<Vec<TestReport>> {
    let num_testcases = batch.remaining().len();
    let bar = ProgressBar::with_draw_target(None, draw_target)
        .with_style(spinner_style())
        .with_message(format!(
            "Judging {} testcases ({} jobs) ...",
            num_testcases, jobs
        ))
        .with_ticking();

    let judged = batch.judge_all(jobs).await;
    bar.lock().await.finish_and_clear();
    let judged = judged.context("Failed to run the solution")?;

    let mut reports = Vec::with_capacity(judged.len());
    for j in judged {
        let report = TestReport::from_judged(j).await?;
        println!("{}", style::test_result_line(&report).cyan());
        reports.push(report);
    }
    Ok(reports)
}
