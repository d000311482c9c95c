use crate::error::ParseError;
use crate::models::{BuildConfiguration, ProjectInfo};
use crate::utils::rebase_path;
use log::{debug, error, warn};
use roxmltree::{Document, Node};
use std::path::Path;

/// FileType codes Keil uses for C sources and assembly sources.
const C_SOURCE: i64 = 1;
const ASM_SOURCE: i64 = 2;

// === Optional lookups over the loosely-schematized tree ===

fn is_named(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// First direct child element called `name`.
fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_named(n, name))
}

/// First element called `name` anywhere below `node`.
fn descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants().skip(1).find(|n| is_named(n, name))
}

/// Follow a chain of direct children, e.g. `["VariousControls", "Define"]`.
fn child_path<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, name| child(current, name))
}

/// Text of an element; a present element without text yields `Some("")`.
fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or("")
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).map(text)
}

/// 读取并解析 Keil 项目文件；任何失败都只记录诊断并返回空结果
pub fn load_project(path: &Path, target: Option<&str>) -> ProjectInfo {
    let xml_content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            let err = ParseError::Read {
                path: path.to_path_buf(),
                source,
            };
            error!("{}", err);
            return ProjectInfo::default();
        }
    };

    match parse_project(&xml_content, target) {
        Ok(info) => info,
        Err(err) => {
            error!("{}", err);
            ProjectInfo::default()
        }
    }
}

/// 解析 Keil µVision 项目文件 (.uvprojx / .uvproj)
pub fn parse_project(xml_content: &str, target: Option<&str>) -> Result<ProjectInfo, ParseError> {
    let doc = Document::parse(xml_content)?;
    let root = doc.root_element();

    let schema_version = child_text(root, "SchemaVersion").map(str::to_string);
    match &schema_version {
        Some(version) => debug!("SchemaVersion: {}", version),
        None => debug!("No <SchemaVersion> found"),
    }

    let target_node = select_target(root, target)?;
    let target_name = child_text(target_node, "TargetName").map(|s| s.trim().to_string());
    debug!("Using target: {}", target_name.as_deref().unwrap_or("<unnamed>"));

    let target_option =
        descendant(target_node, "TargetOption").ok_or(ParseError::MissingElement("TargetOption"))?;

    let build = read_build_configuration(target_option);
    let source_files = collect_source_files(target_node);
    debug!("Found {} source files", source_files.len());

    Ok(ProjectInfo {
        target_name,
        schema_version,
        build,
        source_files,
    })
}

fn select_target<'a, 'input>(
    root: Node<'a, 'input>,
    wanted: Option<&str>,
) -> Result<Node<'a, 'input>, ParseError> {
    let mut targets = root.descendants().filter(|n| is_named(n, "Target"));

    let Some(wanted) = wanted else {
        return targets.next().ok_or(ParseError::MissingElement("Target"));
    };

    let targets: Vec<_> = targets.collect();
    if targets.is_empty() {
        return Err(ParseError::MissingElement("Target"));
    }

    targets
        .iter()
        .copied()
        .find(|t| child_text(*t, "TargetName").map(str::trim) == Some(wanted))
        .ok_or_else(|| ParseError::UnknownTarget {
            name: wanted.to_string(),
            available: targets
                .iter()
                .filter_map(|t| child_text(*t, "TargetName"))
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn read_build_configuration(target_option: Node) -> BuildConfiguration {
    let Some(cads) = descendant(target_option, "Cads") else {
        warn!("No <Cads> compiler options found; no macros or include paths will be emitted");
        return BuildConfiguration::default();
    };

    let read = |field: &str| match child_path(cads, &["VariousControls", field]) {
        None => {
            debug!("No <{}> element under Cads/VariousControls", field);
            None
        }
        Some(node) => {
            let value = text(node);
            if value.trim().is_empty() {
                debug!("<{}> is empty", field);
            }
            Some(value.to_string())
        }
    };

    BuildConfiguration {
        defines: read("Define"),
        include_paths: read("IncludePath"),
    }
}

/// 遍历目标下所有 Group 中的 File（支持嵌套分组），每个 File 只访问一次
fn collect_source_files(target: Node) -> Vec<String> {
    let mut files = Vec::new();

    let file_nodes = target.descendants().filter(|n| {
        is_named(n, "File")
            && n.ancestors()
                .skip(1)
                .take_while(|a| *a != target)
                .any(|a| is_named(&a, "Group"))
    });

    for file in file_nodes {
        let name = child_text(file, "FileName").unwrap_or("<unnamed>");

        let Some(raw_type) = child_text(file, "FileType") else {
            warn!("File '{}' has no <FileType>; skipped", name);
            continue;
        };
        let file_type = match raw_type.trim().parse::<i64>() {
            Ok(t) => t,
            Err(_) => {
                warn!("File '{}' has invalid FileType '{}'; skipped", name, raw_type);
                continue;
            }
        };
        if file_type != C_SOURCE && file_type != ASM_SOURCE {
            continue;
        }

        let Some(file_path) = child_text(file, "FilePath").map(str::trim) else {
            warn!("File '{}' has no <FilePath>; skipped", name);
            continue;
        };
        if file_path.ends_with(".c") || file_path.ends_with(".s") {
            files.push(file_path.to_string());
        } else {
            debug!("Skipping {} (not a .c/.s file)", file_path);
        }
    }

    files
}

/// `-D` flags from the comma-separated macro string; empty tokens are dropped.
pub fn macro_flags(build: &BuildConfiguration) -> Vec<String> {
    build
        .defines
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| format!("-D{}", m))
        .collect()
}

/// `-I` flags from the semicolon-separated include string, rebased from the
/// descriptor directory onto the invocation directory.
pub fn include_flags(
    build: &BuildConfiguration,
    project_dir: &Path,
    invocation_dir: &Path,
) -> Vec<String> {
    build
        .include_paths
        .as_deref()
        .unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|inc| !inc.is_empty())
        .map(|inc| format!("-I{}", rebase_path(inc, project_dir, invocation_dir)))
        .collect()
}
