use std::collections::HashMap;
use uvprojx2clangd::{
    FsSettingsLookup, PLACEHOLDER_COMPILER, SettingsLookup, SettingsScope, Toolchain, locate_toolchain,
    query_driver_from_settings,
};

/// In-memory settings, one document per scope.
#[derive(Default)]
struct FakeSettings(HashMap<&'static str, String>);

impl FakeSettings {
    fn with(mut self, scope: SettingsScope, content: &str) -> Self {
        self.0.insert(key(scope), content.to_string());
        self
    }
}

fn key(scope: SettingsScope) -> &'static str {
    match scope {
        SettingsScope::Workspace => "workspace",
        SettingsScope::User => "user",
    }
}

impl SettingsLookup for FakeSettings {
    fn read(&self, scope: SettingsScope) -> Option<String> {
        self.0.get(key(scope)).cloned()
    }
}

const WORKSPACE_SETTINGS: &str = r#"{
    // clangd setup for the Keil project
    "editor.formatOnSave": true,
    "clangd.arguments": [
        "--background-index",
        "--query-driver=C:/Keil_v5/ARM/ARMCLANG/bin/armclang.exe,C:/Keil_v5/ARM/ARMCC/bin/armcc.exe",
    ],
}"#;

#[test]
fn test_query_driver_from_jsonc() {
    assert_eq!(
        query_driver_from_settings(WORKSPACE_SETTINGS).as_deref(),
        Some("C:/Keil_v5/ARM/ARMCLANG/bin/armclang.exe")
    );
}

#[test]
fn test_query_driver_absent() {
    assert_eq!(query_driver_from_settings(r#"{ "clangd.arguments": ["--log=verbose"] }"#), None);
    assert_eq!(query_driver_from_settings(r#"{ "files.autoSave": "off" }"#), None);
    assert_eq!(query_driver_from_settings(r#"{ "clangd.arguments": ["--query-driver="] }"#), None);
    assert_eq!(query_driver_from_settings("not json at all"), None);
}

#[test]
fn test_workspace_settings_win() {
    let lookup = FakeSettings::default()
        .with(SettingsScope::Workspace, WORKSPACE_SETTINGS)
        .with(
            SettingsScope::User,
            r#"{ "clangd.arguments": ["--query-driver=/usr/bin/arm-none-eabi-gcc"] }"#,
        );
    let toolchain = locate_toolchain(&lookup);
    assert_eq!(toolchain.compiler_path, "C:/Keil_v5/ARM/ARMCLANG/bin/armclang.exe");
    assert_eq!(toolchain.include_flag().as_deref(), Some("-IC:/Keil_v5/ARM/ARMCLANG/include"));
}

#[test]
fn test_falls_back_to_user_settings() {
    let lookup = FakeSettings::default()
        .with(SettingsScope::Workspace, r#"{ "editor.tabSize": 4 }"#)
        .with(
            SettingsScope::User,
            r#"{ "clangd.arguments": ["--query-driver=/usr/bin/arm-none-eabi-gcc"] }"#,
        );
    let toolchain = locate_toolchain(&lookup);
    assert_eq!(
        toolchain,
        Toolchain {
            compiler_path: "/usr/bin/arm-none-eabi-gcc".to_string(),
            root: Some("/usr".to_string()),
        }
    );
}

#[test]
fn test_no_settings_gives_placeholder() {
    let toolchain = locate_toolchain(&FakeSettings::default());
    assert!(toolchain.is_placeholder());
    assert_eq!(toolchain.compiler_path, PLACEHOLDER_COMPILER);
}

#[test]
fn test_fs_lookup_reads_vscode_dirs() {
    let workspace = tempfile::tempdir().unwrap();
    let user = tempfile::tempdir().unwrap();

    let user_settings = user.path().join("Code").join("User");
    std::fs::create_dir_all(&user_settings).unwrap();
    std::fs::write(
        user_settings.join("settings.json"),
        r#"{ "clangd.arguments": ["--query-driver=/opt/gcc-arm/bin/arm-none-eabi-gcc"] }"#,
    )
    .unwrap();

    let lookup = FsSettingsLookup::with_user_config_dir(workspace.path(), Some(user.path().to_path_buf()));
    assert_eq!(lookup.read(SettingsScope::Workspace), None);
    assert_eq!(locate_toolchain(&lookup).compiler_path, "/opt/gcc-arm/bin/arm-none-eabi-gcc");

    let vscode = workspace.path().join(".vscode");
    std::fs::create_dir_all(&vscode).unwrap();
    std::fs::write(vscode.join("settings.json"), WORKSPACE_SETTINGS).unwrap();
    assert_eq!(
        locate_toolchain(&lookup).compiler_path,
        "C:/Keil_v5/ARM/ARMCLANG/bin/armclang.exe"
    );
}

#[test]
fn test_fs_lookup_without_user_dir() {
    let workspace = tempfile::tempdir().unwrap();
    let lookup = FsSettingsLookup::with_user_config_dir(workspace.path(), None);
    assert_eq!(lookup.settings_path(SettingsScope::User), None);
    assert!(locate_toolchain(&lookup).is_placeholder());
}
