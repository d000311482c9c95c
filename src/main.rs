use std::env;
use std::path::Path;
use std::process::ExitCode;

use log::{debug, error, info};
use uvprojx2clangd::{
    FsSettingsLookup, compute_absolute_path, generate_compile_commands, init_cache_dir, load_project,
    locate_toolchain, parse_args, write_compile_commands,
};

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(args.debug);

    if !args.project_path.is_file() {
        eprintln!(
            "The specified Keil project file does not exist: {}",
            args.project_path.display()
        );
        return ExitCode::from(1);
    }

    let invocation_dir = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Cannot determine the current directory: {}", e);
            return ExitCode::from(1);
        }
    };
    debug!("Invocation directory: {}", invocation_dir.display());

    // 项目根目录（.uvprojx 所在目录）
    let project_dir = match compute_absolute_path(&args.project_path) {
        Ok(abs) => abs.parent().unwrap_or(Path::new("/")).to_path_buf(),
        Err(e) => {
            eprintln!("Cannot resolve {}: {}", args.project_path.display(), e);
            return ExitCode::from(1);
        }
    };
    debug!("Project directory: {}", project_dir.display());

    // 1. 解析项目文件
    let project_info = load_project(&args.project_path, args.target.as_deref());
    if project_info.is_empty() {
        info!("No C or assembly sources found; the compilation database will be empty");
    }

    // 2. 查找工具链
    let toolchain = locate_toolchain(&FsSettingsLookup::new(&invocation_dir));

    // 3. 生成 compile_commands.json
    let compile_commands = generate_compile_commands(&project_info, &toolchain, &project_dir, &invocation_dir);
    match write_compile_commands(&compile_commands, &args.output) {
        Ok(()) => println!(
            "Generated {} ({} entries)",
            args.output.display(),
            compile_commands.len()
        ),
        Err(e) => error!("{}", e),
    }

    // 4. 缓存目录
    if let Some(cache_dir) = &args.cache_dir {
        match init_cache_dir(cache_dir) {
            Ok(()) => println!("Prepared cache directory {}", cache_dir.display()),
            Err(e) => error!("{}", e),
        }
    }

    ExitCode::SUCCESS
}
