use oldfiles_scan::{DirScanner, ScanConfig, WarningKind};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_scan_multiple_roots_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(first.path().join("a-2024-01-01.bak"), "1").unwrap();
    fs::write(second.path().join("b-2024-01-01.bak"), "2").unwrap();
    fs::write(second.path().join("b-2024-01-02.bak"), "3").unwrap();

    let config = ScanConfig::builder()
        .roots(vec![first.path().to_path_buf(), second.path().to_path_buf()])
        .build()
        .unwrap();

    let report = DirScanner::new().scan(&config).unwrap();

    assert_eq!(report.listings.len(), 2);
    assert_eq!(report.listings[0].files.len(), 1);
    assert_eq!(report.listings[1].files.len(), 2);
    assert_eq!(report.files_listed, 3);
}

#[test]
fn test_hidden_files_are_listed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".state-2024-01-01"), "x").unwrap();

    let report = DirScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

    assert_eq!(report.files_listed, 1);
}

#[test]
fn test_listing_paths_are_absolute() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("x-2024-01-01"), "x").unwrap();

    let report = DirScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

    let file: &PathBuf = &report.listings[0].files[0];
    assert!(file.is_absolute());
    assert_eq!(file.parent().unwrap(), report.listings[0].dir.as_path());
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_a_warning() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("x-2024-01-01"), "x").unwrap();
    fs::create_dir(temp.path().join("open")).unwrap();
    fs::write(temp.path().join("open/y-2024-01-01"), "y").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the directory anyway.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let config = ScanConfig::builder()
        .roots(vec![temp.path().to_path_buf()])
        .recursive(true)
        .build()
        .unwrap();
    let report = DirScanner::new().scan(&config);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = report.unwrap();

    assert!(report
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::PermissionDenied));
    // The sibling directory is still listed.
    assert_eq!(report.files_listed, 1);
}
