use crate::utils::to_slash;
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// argv[0] used when no toolchain could be discovered.
pub const PLACEHOLDER_COMPILER: &str = "<toolchain-not-configured>";

const QUERY_DRIVER_PREFIX: &str = "--query-driver=";

/// Where a settings file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsScope {
    /// `.vscode/settings.json` next to where the tool is run.
    Workspace,
    /// The per-user VS Code settings.
    User,
}

/// Source of raw editor settings text, injected so tests never touch the
/// real environment.
pub trait SettingsLookup {
    fn read(&self, scope: SettingsScope) -> Option<String>;
}

/// Reads VS Code settings from disk.
#[derive(Debug, Clone)]
pub struct FsSettingsLookup {
    workspace_root: PathBuf,
    user_config_dir: Option<PathBuf>,
}

impl FsSettingsLookup {
    /// Workspace settings under `workspace_root`, user settings under the
    /// platform config dir (`%APPDATA%`, `~/.config`, ...).
    pub fn new(workspace_root: &Path) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            user_config_dir: dirs::config_dir(),
        }
    }

    pub fn with_user_config_dir(workspace_root: &Path, user_config_dir: Option<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            user_config_dir,
        }
    }

    pub fn settings_path(&self, scope: SettingsScope) -> Option<PathBuf> {
        match scope {
            SettingsScope::Workspace => Some(self.workspace_root.join(".vscode").join("settings.json")),
            SettingsScope::User => self
                .user_config_dir
                .as_ref()
                .map(|dir| dir.join("Code").join("User").join("settings.json")),
        }
    }
}

impl SettingsLookup for FsSettingsLookup {
    fn read(&self, scope: SettingsScope) -> Option<String> {
        let path = self.settings_path(scope)?;
        debug!("Looking for editor settings at {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct EditorSettings {
    #[serde(rename = "clangd.arguments", default)]
    clangd_arguments: Vec<String>,
}

/// The compiler reported as argv[0] of every compile entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler_path: String,
    /// Installation root, i.e. the parent of the compiler's `bin` directory.
    pub root: Option<String>,
}

impl Toolchain {
    pub fn placeholder() -> Self {
        Self {
            compiler_path: PLACEHOLDER_COMPILER.to_string(),
            root: None,
        }
    }

    pub fn from_compiler_path(path: &str) -> Self {
        let compiler_path = to_slash(path.trim());
        let root = if compiler_path.contains('/') {
            compiler_path
                .rsplit_once('/')
                .and_then(|(bin_dir, _)| bin_dir.rsplit_once('/'))
                .map(|(root, _)| root.to_string())
                .filter(|root| !root.is_empty())
        } else {
            None
        };
        Self { compiler_path, root }
    }

    pub fn is_placeholder(&self) -> bool {
        self.compiler_path == PLACEHOLDER_COMPILER
    }

    /// `-I<root>/include`, when the compiler was given as a path.
    pub fn include_flag(&self) -> Option<String> {
        self.root.as_ref().map(|root| format!("-I{}/include", root))
    }
}

/// VS Code settings are JSON with comments and trailing commas.
fn parse_settings(content: &str) -> serde_json_lenient::Result<EditorSettings> {
    let mut deserializer = serde_json_lenient::Deserializer::from_str(content);
    deserializer.set_allow_comments(true);
    deserializer.set_ignore_trailing_commas(true);
    let settings = EditorSettings::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(settings)
}

/// First `--query-driver=` entry of `clangd.arguments` in a JSONC settings file.
pub fn query_driver_from_settings(content: &str) -> Option<String> {
    let settings = match parse_settings(content) {
        Ok(s) => s,
        Err(e) => {
            warn!("Ignoring unparsable editor settings: {}", e);
            return None;
        }
    };

    settings
        .clangd_arguments
        .iter()
        .find_map(|arg| arg.strip_prefix(QUERY_DRIVER_PREFIX))
        .and_then(|drivers| {
            drivers
                .split(',')
                .map(str::trim)
                .find(|d| !d.is_empty())
                .map(str::to_string)
        })
}

/// 查找工具链：先工作区设置，再用户全局设置，最后退回占位符
pub fn locate_toolchain(lookup: &dyn SettingsLookup) -> Toolchain {
    for scope in [SettingsScope::Workspace, SettingsScope::User] {
        if let Some(driver) = lookup
            .read(scope)
            .as_deref()
            .and_then(query_driver_from_settings)
        {
            debug!("Toolchain from {:?} settings: {}", scope, driver);
            return Toolchain::from_compiler_path(&driver);
        }
    }

    print_toolchain_guidance();
    Toolchain::placeholder()
}

fn print_toolchain_guidance() {
    eprintln!("Warning: no toolchain configured, using '{}' as compiler.", PLACEHOLDER_COMPILER);
    eprintln!("Add the compiler to .vscode/settings.json (or your user settings), e.g.:");
    eprintln!("    \"clangd.arguments\": [");
    eprintln!("        \"--query-driver=C:/Keil_v5/ARM/ARMCLANG/bin/armclang.exe\"");
    eprintln!("    ]");
    eprintln!("then run the conversion again, or edit compile_commands.json by hand.");
}
