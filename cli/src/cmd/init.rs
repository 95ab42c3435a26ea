use accprob_core::{action, print_success};
use std::path::PathBuf;

use super::{GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    dir: PathBuf,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let dir = global_args.base_dir().join(&args.dir);
    action::init_config(&dir)?;
    print_success!(
        "Successfully created config file. (path: {})",
        util::replace_homedir_to_tilde(dir.join(accprob_core::Config::FILENAME)).to_string_lossy()
    );
    Ok(())
}
