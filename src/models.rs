use serde::{Deserialize, Serialize};

/// 编译命令结构，用于生成compile_commands.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub arguments: Vec<String>,
    pub file: String,
}

/// Raw compiler settings of the selected target, as written in the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Comma-separated macro definitions (`Cads/VariousControls/Define`).
    pub defines: Option<String>,
    /// Semicolon-separated include paths (`Cads/VariousControls/IncludePath`).
    pub include_paths: Option<String>,
}

/// Everything extracted from one project descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    pub target_name: Option<String>,
    pub schema_version: Option<String>,
    pub build: BuildConfiguration,
    /// Descriptor-relative source paths in document order.
    pub source_files: Vec<String>,
}

impl ProjectInfo {
    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty()
    }
}
