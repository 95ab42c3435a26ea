use std::num::NonZeroUsize;

use accprob_core::{
    action::{self, TestOptions},
    config::{secs_to_duration, Config},
    testing::SolutionCommand,
};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Problem order (e.g. `01`) or (part of) problem ID (e.g. `abc254_d`).
    /// Omit it inside a problem dir.
    #[arg()] // positional argument
    pub problem: Option<String>,

    #[arg(short = 'y', long = "yes", visible_alias = "skip-confirm")]
    pub skip_confirm: bool,

    /// Show input, expected and actual output of every testcase
    #[arg(long)]
    pub show_detail: bool,

    /// Solution command, e.g. "python main.py" (overrides `test.command`)
    #[arg(short = 'c', long, value_name = "COMMAND")]
    pub bind_commands: Option<String>,

    #[arg(short = 't', long, value_name = "SECS")]
    pub time_limit: Option<f64>,

    #[arg(long, value_name = "SECS")]
    pub hard_timeout: Option<f64>,

    #[arg(short = 'j', long)]
    pub jobs: Option<NonZeroUsize>,

    #[arg(long)]
    pub fail_fast: bool,

    #[arg(long)]
    pub json: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let base_dir = global_args.base_dir();
    let cfg = Config::from_file_finding_in_ancestors(&base_dir)?;
    let test_cfg = &cfg.test;

    let problem_dir =
        action::resolve_problem_dir(&base_dir, args.problem.as_deref(), test_cfg)?;
    log::debug!("Problem dir: {}", problem_dir.dir().to_string_lossy());

    let command = match &args.bind_commands {
        Some(s) => SolutionCommand::parse(s)?,
        None => test_cfg.solution_command()?,
    };

    let mut limits = test_cfg.limits()?;
    if let Some(secs) = args.time_limit {
        limits.time_limit = secs_to_duration(secs)?;
    }
    if let Some(secs) = args.hard_timeout {
        limits.hard_timeout = secs_to_duration(secs)?;
    }

    let opts = TestOptions {
        skip_confirm: args.skip_confirm,
        show_detail: args.show_detail,
        fail_fast: args.fail_fast || test_cfg.fail_fast,
        json: args.json,
        jobs: args.jobs.unwrap_or(test_cfg.jobs),
    };

    let _ = action::do_test(&problem_dir, command, test_cfg, limits, &opts).await?;
    Ok(())
}
