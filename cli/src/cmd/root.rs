use accprob_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let contest = action::find_contest(global_args.base_dir())?;
    println!("{}", contest.dir().canonicalize()?.to_string_lossy());
    Ok(())
}
