pub mod init;
pub mod root;
pub mod test;

use std::path::PathBuf;

use crate::util;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Init(init::Args),
    Root(root::Args),

    #[command(alias("t"))]
    Test(test::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Init(args) => init::exec(args, self),
            Root(args) => root::exec(args, self),
            Test(args) => test::exec(args, self).await,
        }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(util::current_dir)
    }
}
