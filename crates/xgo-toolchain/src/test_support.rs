//! Helpers for tests that need a stand-in toolchain on disk.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake `go` that answers `env --json` with a few defaults and echoes
/// the target it was queried with.
pub fn fake_go(dir: &Path) -> PathBuf {
    script(
        dir,
        "go",
        r#"if [ "$1" = "env" ] && [ "$2" = "--json" ]; then
  printf '{"GOROOT":"%s","GOFLAGS":"","QUERIED":"%s/%s cgo=%s"}\n' "'/fake/goroot'" "$GOOS" "$GOARCH" "$CGO_ENABLED"
  exit 0
fi
echo "unexpected go invocation: $*" >&2
exit 2"#,
    )
}

