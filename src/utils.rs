use std::path::{Component, Path, PathBuf};

/// 将反斜杠统一替换为正斜杠
pub fn to_slash(s: &str) -> String {
    s.replace('\\', "/")
}

/// Path to a forward-slash string, dropping the verbatim `\\?\` prefix that
/// `canonicalize` produces on Windows.
pub fn path_to_slash(path: &Path) -> String {
    let path_str = path.to_string_lossy();

    if let Some(unc) = path_str.strip_prefix("\\\\?\\UNC\\") {
        return format!("//{}", to_slash(unc));
    }
    let clean = path_str.strip_prefix("\\\\?\\").unwrap_or(&path_str);
    to_slash(clean)
}

/// `C:/...` or `C:\...` style path.
pub fn is_drive_absolute(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/' || bytes[2] == b'\\')
}

/// 逻辑上拼接路径并消除 "." 与 ".."（不访问文件系统）
///
/// An absolute `rel` replaces `base` entirely.
pub fn clean_join(base: &Path, rel: &Path) -> PathBuf {
    let mut result = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(c) => result.push(c),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result = PathBuf::from(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }
    result
}

/// 逻辑上计算绝对路径（不解析符号链接或映射驱动器，保留盘符）
pub fn compute_absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean_join(Path::new(""), path));
    }
    Ok(clean_join(&std::env::current_dir()?, path))
}

/// Express `path` relative to `base`. Both must be absolute and clean.
///
/// Paths on different roots (another drive letter) are returned unchanged.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_comps: Vec<Component> = path.components().collect();
    let base_comps: Vec<Component> = base.components().collect();

    let common = path_comps
        .iter()
        .zip(&base_comps)
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 && path.has_root() {
        return path.to_path_buf();
    }

    let mut rel = PathBuf::new();
    for _ in common..base_comps.len() {
        rel.push("..");
    }
    for c in &path_comps[common..] {
        rel.push(c.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel
    }
}

/// Resolve a descriptor-relative path (Keil writes `..\inc`) against the
/// descriptor directory and re-express it relative to the invocation
/// directory with `/` separators.
pub fn rebase_path(raw: &str, project_dir: &Path, invocation_dir: &Path) -> String {
    let raw = to_slash(raw.trim());

    // A Windows drive path cannot be related to a non-Windows working directory.
    if !cfg!(windows) && is_drive_absolute(&raw) {
        return raw;
    }

    let absolute = clean_join(project_dir, Path::new(&raw));
    path_to_slash(&relative_to(&absolute, invocation_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash("..\\drivers\\inc"), "../drivers/inc");
        assert_eq!(to_slash("already/fine"), "already/fine");
    }

    #[test]
    fn test_path_to_slash_strips_verbatim_prefix() {
        assert_eq!(path_to_slash(Path::new("\\\\?\\C:\\work\\app")), "C:/work/app");
        assert_eq!(
            path_to_slash(Path::new("\\\\?\\UNC\\server\\share\\app")),
            "//server/share/app"
        );
    }

    #[test]
    fn test_is_drive_absolute() {
        assert!(is_drive_absolute("C:/Keil_v5/ARM"));
        assert!(is_drive_absolute("d:\\tools"));
        assert!(is_drive_absolute("C:"));
        assert!(!is_drive_absolute("../inc"));
        assert!(!is_drive_absolute("CC:/x"));
    }

    #[test]
    fn test_compute_absolute_path() {
        let p = Path::new("test/../src/main.rs");
        let abs = compute_absolute_path(p).unwrap();
        assert!(abs.is_absolute());
        let s = abs.to_string_lossy();
        assert!(!s.contains(".."));
        assert!(s.ends_with("main.rs"));
    }

    #[test]
    #[cfg(unix)]
    fn test_clean_join() {
        assert_eq!(
            clean_join(Path::new("/proj/mdk"), Path::new("../inc/./sub")),
            PathBuf::from("/proj/inc/sub")
        );
        assert_eq!(
            clean_join(Path::new("/proj"), Path::new("/opt/inc")),
            PathBuf::from("/opt/inc")
        );
        // 不能越过根目录
        assert_eq!(
            clean_join(Path::new("/proj"), Path::new("../../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/proj/src/main.c"), Path::new("/proj")),
            PathBuf::from("src/main.c")
        );
        assert_eq!(
            relative_to(Path::new("/inc"), Path::new("/proj/build")),
            PathBuf::from("../../inc")
        );
        assert_eq!(
            relative_to(Path::new("/proj"), Path::new("/proj")),
            PathBuf::from(".")
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_rebase_path() {
        let project_dir = Path::new("/proj/mdk");
        assert_eq!(rebase_path("..\\inc", project_dir, Path::new("/proj")), "inc");
        assert_eq!(
            rebase_path(".\\startup.s", project_dir, Path::new("/proj")),
            "mdk/startup.s"
        );
        assert_eq!(
            rebase_path("C:\\Keil_v5\\ARM\\INC", project_dir, Path::new("/proj")),
            "C:/Keil_v5/ARM/INC"
        );
    }
}
