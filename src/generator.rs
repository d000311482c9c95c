use crate::config::Toolchain;
use crate::error::EmitError;
use crate::models::{CompileCommand, ProjectInfo};
use crate::parser::{include_flags, macro_flags};
use crate::utils::{path_to_slash, rebase_path};
use log::debug;
use serde::Serialize;
use std::path::Path;

/// Default output file name, written to the invocation directory.
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// Default cache directory created by `-d` without a value.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

const CACHE_MARKER_FILE: &str = ".gitignore";
const CACHE_MARKER_CONTENT: &str = "*\n";

/// Shared argument prefix: toolchain, toolchain include root, `-I` flags, `-D` flags.
pub fn common_arguments(
    project_info: &ProjectInfo,
    toolchain: &Toolchain,
    project_dir: &Path,
    invocation_dir: &Path,
) -> Vec<String> {
    let mut arguments = vec![toolchain.compiler_path.clone()];
    arguments.extend(toolchain.include_flag());
    arguments.extend(include_flags(&project_info.build, project_dir, invocation_dir));
    arguments.extend(macro_flags(&project_info.build));
    arguments
}

/// 生成 compile_commands.json 的条目，每个源文件一条，保持原始顺序
pub fn generate_compile_commands(
    project_info: &ProjectInfo,
    toolchain: &Toolchain,
    project_dir: &Path,
    invocation_dir: &Path,
) -> Vec<CompileCommand> {
    let arguments = common_arguments(project_info, toolchain, project_dir, invocation_dir);
    debug!("Compile arguments: {:?}", arguments);

    let directory = path_to_slash(invocation_dir);

    project_info
        .source_files
        .iter()
        .map(|src| CompileCommand {
            directory: directory.clone(),
            arguments: arguments.clone(),
            file: rebase_path(src, project_dir, invocation_dir),
        })
        .collect()
}

/// Serialize the entries as pretty JSON (4-space indent, raw UTF-8).
pub fn render_compile_commands(commands: &[CompileCommand]) -> Result<String, EmitError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    commands.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_compile_commands(commands: &[CompileCommand], path: &Path) -> Result<(), EmitError> {
    let content = render_compile_commands(commands)?;
    std::fs::write(path, content).map_err(|source| EmitError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_compile_commands(path: &Path) -> Result<Vec<CompileCommand>, EmitError> {
    let content = std::fs::read_to_string(path).map_err(|source| EmitError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// 创建缓存目录并写入 `.gitignore`，重复调用不会出错
pub fn init_cache_dir(dir: &Path) -> Result<(), EmitError> {
    std::fs::create_dir_all(dir).map_err(|source| EmitError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let marker = dir.join(CACHE_MARKER_FILE);
    std::fs::write(&marker, CACHE_MARKER_CONTENT).map_err(|source| EmitError::Write {
        path: marker.clone(),
        source,
    })?;
    debug!("Wrote cache marker {}", marker.display());
    Ok(())
}
