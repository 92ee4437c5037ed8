//! End-to-end move tests against the real disk.

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use bootstrapper_common::config::MoveConfig;
use bootstrapper_fs::DiskFs;

const VERSION: &str = "1.301.0.20240101-120000";

const MANIFEST: &str = r#"{
    "version": "1.301.0",
    "technologies": {
        "java": {
            "x86": [
                {"path": "agent/lib64/liboneagentjava.so", "version": "1.301.0", "md5": "aa"},
                {"path": "agent/installer.version", "version": "1.301.0", "md5": "bb"},
                {"path": "agent/bin/1.301.0.20240101-120000/oneagentloader", "version": "1.301.0", "md5": "dd"}
            ]
        },
        "php": {
            "x86": [
                {"path": "agent/lib64/liboneagentphp.so", "version": "1.301.0", "md5": "cc"}
            ]
        }
    }
}"#;

fn write(path: &Path, content: &str, mode: u32) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
}

fn agent_source(root: &Path) {
    write(&root.join("manifest.json"), MANIFEST, 0o644);
    write(&root.join("agent/installer.version"), VERSION, 0o644);
    write(&root.join("agent/lib64/liboneagentjava.so"), "java", 0o755);
    write(&root.join("agent/lib64/liboneagentphp.so"), "php", 0o755);
    write(&root.join("agent/bin").join(VERSION).join("oneagentloader"), "loader", 0o755);
}

#[test]
fn atomic_filtered_move_copies_only_listed_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("source");
    let target = dir.path().join("target");
    let work = dir.path().join("work");
    agent_source(&source);

    let config = MoveConfig {
        work: Some(work.clone()),
        technology: Some("java".into()),
    };
    bootstrapper_move::execute(&DiskFs::new(), &source, &target, &config).expect("move");

    assert!(!work.exists());
    assert_eq!(
        fs::read_to_string(target.join("agent/lib64/liboneagentjava.so")).expect("java"),
        "java"
    );
    assert!(!target.join("agent/lib64/liboneagentphp.so").exists());
    assert!(!target.join("manifest.json").exists());
    assert!(target.join("agent/bin/current").is_dir());

    let mode = fs::metadata(target.join("agent/lib64/liboneagentjava.so"))
        .expect("stat")
        .permissions()
        .mode();
    assert_eq!(mode & 0o7777, 0o755);
}

#[test]
fn atomic_move_gives_target_root_the_source_root_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("source");
    let target = dir.path().join("target");
    agent_source(&source);
    fs::set_permissions(&source, fs::Permissions::from_mode(0o750)).expect("chmod");

    for technology in [None, Some("java".to_string())] {
        let _ = fs::remove_dir_all(&target);
        let config = MoveConfig {
            work: Some(dir.path().join("work")),
            technology,
        };
        bootstrapper_move::execute(&DiskFs::new(), &source, &target, &config).expect("move");

        let mode = fs::metadata(&target).expect("stat").permissions().mode();
        assert_eq!(mode & 0o7777, 0o750, "technology: {:?}", config.technology);
    }
}

#[test]
fn plain_move_creates_current_symlink() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("source");
    let target = dir.path().join("target");
    agent_source(&source);

    bootstrapper_move::execute(&DiskFs::new(), &source, &target, &MoveConfig::default())
        .expect("move");

    let current = target.join("agent/bin/current");
    assert_eq!(fs::read_link(&current).expect("read_link"), Path::new(VERSION));
    assert!(current.is_dir());
    assert!(target.join("manifest.json").exists());
}

#[test]
fn failed_atomic_move_leaves_no_target_and_no_work() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("missing-source");
    let target = dir.path().join("target");
    let work = dir.path().join("work");

    let config = MoveConfig {
        work: Some(work.clone()),
        technology: None,
    };
    let err = bootstrapper_move::execute(&DiskFs::new(), &source, &target, &config)
        .expect_err("source missing");

    assert!(err.is_not_found());
    assert!(!work.exists());
    assert!(!target.exists());
}
