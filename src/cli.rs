use clap::Parser;
use std::path::PathBuf;

use crate::generator::{COMPILE_COMMANDS_FILE, DEFAULT_CACHE_DIR};

/// 命令行参数结构
#[derive(Parser, Debug)]
#[command(
    name = "uvprojx2clangd",
    version,
    about = "Generate compile_commands.json from a Keil µVision project",
    arg_required_else_help = true
)]
pub struct CliArgs {
    /// Keil project file (.uvprojx / .uvproj)
    pub project_path: PathBuf,

    /// Create a cache directory for clangd and keep it out of version control
    #[arg(
        short = 'd',
        long = "cache-dir",
        value_name = "CACHE_DIR",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CACHE_DIR
    )]
    pub cache_dir: Option<PathBuf>,

    /// Where to write the compilation database
    #[arg(short, long, default_value = COMPILE_COMMANDS_FILE)]
    pub output: PathBuf,

    /// Build target to convert (by TargetName); defaults to the first one
    #[arg(short, long)]
    pub target: Option<String>,

    /// Print debug output
    #[arg(long)]
    pub debug: bool,
}

/// 解析命令行参数
///
/// Help and version requests exit 0; any other argument problem prints the
/// usage and exits 1.
pub fn parse_args() -> CliArgs {
    parse_args_from(std::env::args_os())
}

pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match CliArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}
