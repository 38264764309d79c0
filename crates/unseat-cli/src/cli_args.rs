use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "unseat")]
#[command(about = "List and disconnect the active device on a Setapp account")]
pub(crate) struct Cli {
    #[arg(long, env = "UNSEAT_ADDR")]
    pub addr: Option<String>,
    #[arg(long, env = "UNSEAT_CONFIG", help = "Path to config.json")]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[arg(long, help = "Allow http:// addresses")]
    pub insecure: bool,
}
