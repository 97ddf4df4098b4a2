use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tvshell", version, about = "Console shell for the player's dialogs and menus")]
pub struct Args {
    /// Read configuration from this file instead of the user config directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
