//! Selective installation of a payload into the destination tree.
//!
//! Only entries on the fixed allow-list are copied, each with remove-then-copy
//! replacement. Entries the payload doesn't ship are skipped, and a failure on
//! one entry never blocks the rest; upstream occasionally drops auxiliary
//! files from an archive and a partial payload must still produce a usable
//! install. Destination entries the payload doesn't ship are left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::version::Version;

/// Top-level payload entries eligible for installation.
pub const INSTALL_SET: &[&str] = &[
    "ibapi",
    "setup.py",
    "MANIFEST.in",
    "pylintrc",
    "README.md",
    "tests",
    "tox.ini",
];

/// Directory holding the client package itself.
pub const PACKAGE_DIR: &str = "ibapi";

const METADATA_FILE: &str = "__init__.py";

/// Path of the client metadata file under a payload or destination root.
pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(PACKAGE_DIR).join(METADATA_FILE)
}

/// Read the version embedded in the client metadata under `root`.
pub fn installed_version(root: &Path) -> Option<Version> {
    let content = fs::read_to_string(metadata_path(root)).ok()?;
    Version::from_metadata(&content)
}

/// Copy the allow-listed payload entries into the destination tree.
///
/// Returns the authoritative installed version: the destination's metadata
/// after copying, falling back to the payload's metadata read beforehand
/// (covers a missing or malformed copied metadata file). `None` when neither
/// is readable.
pub fn install(payload_dir: &Path, dest_root: &Path) -> Option<Version> {
    // Read before copying so a failed ibapi copy still leaves a version.
    let payload_version = installed_version(payload_dir);

    tracing::info!(
        "Copying files from {} to {}",
        payload_dir.display(),
        dest_root.display()
    );

    let mut copied = 0;
    for item in INSTALL_SET {
        let source = payload_dir.join(item);
        let dest = dest_root.join(item);

        if !source.exists() {
            tracing::info!("Skipped (not in payload): {}", item);
            continue;
        }

        match copy_entry(&source, &dest) {
            Ok(()) => {
                tracing::info!("Copied {}", item);
                copied += 1;
            }
            Err(e) => tracing::warn!("Could not copy {}: {}", item, e),
        }
    }
    tracing::info!("Copy complete: {} items", copied);

    installed_version(dest_root).or(payload_version)
}

/// Replace `dest` with `source`: remove any existing entry of the same name,
/// then copy the file or the entire subtree.
fn copy_entry(source: &Path, dest: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        if dest.exists() {
            fs::remove_dir_all(dest)?;
        }
        copy_dir(source, dest)
    } else {
        if dest.exists() {
            fs::remove_file(dest)?;
        }
        copy_file(source, dest)
    }
}

fn copy_dir(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            copy_file(&entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy one file, carrying over its permissions and modification time.
fn copy_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::copy(source, dest)?;
    let modified = fs::metadata(source)?.modified()?;
    fs::OpenOptions::new()
        .write(true)
        .open(dest)?
        .set_modified(modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const METADATA: &str = r#"VERSION = {"major": 10, "minor": 37, "micro": 1}"#;

    fn make_payload(dir: &Path) {
        let package = dir.join("ibapi");
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join("__init__.py"), METADATA).unwrap();
        fs::write(package.join("client.py"), "class EClient: pass").unwrap();
        fs::write(dir.join("setup.py"), "from setuptools import setup").unwrap();
        fs::write(dir.join("README.md"), "# TWS API").unwrap();
    }

    #[test]
    fn installs_allow_listed_entries() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        let version = install(payload.path(), dest.path());

        assert_eq!(version, Version::parse("10.37.1"));
        assert!(dest.path().join("ibapi/client.py").is_file());
        assert!(dest.path().join("setup.py").is_file());
        assert!(dest.path().join("README.md").is_file());
    }

    #[test]
    fn missing_payload_entries_are_skipped() {
        // No tests/, tox.ini, pylintrc or MANIFEST.in in the payload.
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        let version = install(payload.path(), dest.path());

        assert!(version.is_some());
        assert!(!dest.path().join("tests").exists());
        assert!(!dest.path().join("tox.ini").exists());
    }

    #[test]
    fn replaces_existing_directory_wholesale() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        // Stale module that the new payload no longer ships.
        let old_package = dest.path().join("ibapi");
        fs::create_dir_all(&old_package).unwrap();
        fs::write(old_package.join("obsolete.py"), "gone").unwrap();

        install(payload.path(), dest.path());

        assert!(!dest.path().join("ibapi/obsolete.py").exists());
        assert!(dest.path().join("ibapi/client.py").is_file());
    }

    #[test]
    fn preserves_destination_entries_absent_from_payload() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        // Pre-existing tests/ must survive a payload that lacks tests/.
        let old_tests = dest.path().join("tests");
        fs::create_dir_all(&old_tests).unwrap();
        fs::write(old_tests.join("test_client.py"), "def test(): pass").unwrap();

        install(payload.path(), dest.path());

        assert!(dest.path().join("tests/test_client.py").is_file());
    }

    #[test]
    fn preserves_unlisted_destination_entries() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());
        fs::write(dest.path().join("my_strategy.py"), "custom").unwrap();

        install(payload.path(), dest.path());

        assert!(dest.path().join("my_strategy.py").is_file());
    }

    #[test]
    fn copies_nested_directories() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());
        let nested = payload.path().join("ibapi").join("protobuf");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("order_pb2.py"), "pb").unwrap();

        install(payload.path(), dest.path());

        assert!(dest.path().join("ibapi/protobuf/order_pb2.py").is_file());
    }

    #[test]
    fn destination_metadata_wins_over_payload() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        let version = install(payload.path(), dest.path());

        // After a clean copy both agree; the destination read is the one
        // that must have produced the value.
        assert_eq!(version, installed_version(dest.path()));
    }

    #[test]
    fn falls_back_to_payload_version_when_metadata_missing() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        // Payload without an ibapi package at all: no version either way.
        fs::write(payload.path().join("setup.py"), "setup").unwrap();

        let version = install(payload.path(), dest.path());

        assert!(version.is_none());
        assert!(dest.path().join("setup.py").is_file());
    }

    #[test]
    fn bad_entry_does_not_block_the_others() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        // A plain file where the package directory should land makes the
        // ibapi copy fail; everything else must still be installed.
        fs::write(dest.path().join("ibapi"), "in the way").unwrap();

        let version = install(payload.path(), dest.path());

        assert!(dest.path().join("setup.py").is_file());
        assert!(dest.path().join("README.md").is_file());
        // Destination metadata is unreadable, so the payload's wins.
        assert_eq!(version, Version::parse("10.37.1"));
    }

    #[test]
    fn installed_version_reads_metadata() {
        let dest = TempDir::new().unwrap();
        assert!(installed_version(dest.path()).is_none());

        let package = dest.path().join("ibapi");
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join("__init__.py"), METADATA).unwrap();
        assert_eq!(installed_version(dest.path()), Version::parse("10.37.1"));
    }

    #[test]
    fn file_copies_preserve_modification_time() {
        use std::time::{Duration, SystemTime};

        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        // Backdate the source so a fresh copy timestamp would show up.
        let yesterday = SystemTime::now() - Duration::from_secs(86_400);
        fs::OpenOptions::new()
            .write(true)
            .open(payload.path().join("setup.py"))
            .unwrap()
            .set_modified(yesterday)
            .unwrap();

        install(payload.path(), dest.path());

        let source_mtime = fs::metadata(payload.path().join("setup.py"))
            .unwrap()
            .modified()
            .unwrap();
        let dest_mtime = fs::metadata(dest.path().join("setup.py"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(dest_mtime, source_mtime);
    }

    #[test]
    fn directory_file_copies_preserve_modification_time() {
        use std::time::{Duration, SystemTime};

        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());

        let yesterday = SystemTime::now() - Duration::from_secs(86_400);
        let source_file = payload.path().join("ibapi").join("client.py");
        fs::OpenOptions::new()
            .write(true)
            .open(&source_file)
            .unwrap()
            .set_modified(yesterday)
            .unwrap();

        install(payload.path(), dest.path());

        let source_mtime = fs::metadata(&source_file).unwrap().modified().unwrap();
        let dest_mtime = fs::metadata(dest.path().join("ibapi/client.py"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(dest_mtime, source_mtime);
    }

    #[test]
    fn replaces_existing_file() {
        let payload = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_payload(payload.path());
        fs::write(dest.path().join("setup.py"), "old contents").unwrap();

        install(payload.path(), dest.path());

        assert_eq!(
            fs::read_to_string(dest.path().join("setup.py")).unwrap(),
            "from setuptools import setup"
        );
    }
}
