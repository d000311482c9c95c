// 公共API暴露
mod cli;
mod config;
mod error;
mod generator;
mod models;
mod parser;
mod utils;

pub use cli::{CliArgs, parse_args, parse_args_from};
pub use config::{
    FsSettingsLookup, PLACEHOLDER_COMPILER, SettingsLookup, SettingsScope, Toolchain, locate_toolchain,
    query_driver_from_settings,
};
pub use error::{EmitError, ParseError};
pub use generator::{
    COMPILE_COMMANDS_FILE, DEFAULT_CACHE_DIR, common_arguments, generate_compile_commands, init_cache_dir,
    read_compile_commands, render_compile_commands, write_compile_commands,
};
pub use models::{BuildConfiguration, CompileCommand, ProjectInfo};
pub use parser::{include_flags, load_project, macro_flags, parse_project};
pub use utils::{compute_absolute_path, path_to_slash, rebase_path, relative_to};
