//! Running the Go toolchain.
//!
//! [`Compiler`] holds the per-process choices (dry-run, garble, zig) and runs
//! `go` with a [`BuildEnvironment`]. In dry-run mode it renders a transcript of
//! the command instead of spawning anything.

use std::process::Command;

use tracing::debug;

use crate::environment::{BuildEnvironment, CC, CGO_ENABLED, CXX, GOARCH, GOOS};
use crate::error::{InvocationError, Result};
use crate::platform::Platform;
use crate::quote::quote;
use crate::resolve::{self, Strategy};
use crate::table::{CompilerPair, ToolchainTable};

/// Flags garble always gets.
const GARBLE_FLAGS: [&str; 3] = ["--literals", "--seed=random", "--tiny"];

/// Variables shown in a dry-run transcript.
const TRANSCRIPT_VARS: [&str; 5] = [CC, CGO_ENABLED, CXX, GOARCH, GOOS];

/// Executables the compiler drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programs {
    /// The Go toolchain front-end.
    pub go: String,
    /// Obfuscating replacement for `go build`.
    pub garble: String,
    /// Zig, used as a cross C/C++ compiler.
    pub zig: String,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            go: "go".into(),
            garble: "garble".into(),
            zig: "zig".into(),
        }
    }
}

/// Syntax for environment assignments in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellStyle {
    /// `KEY="value" \` continuation lines.
    Posix,
    /// `$env:KEY="value";` statements.
    PowerShell,
}

impl ShellStyle {
    /// The shell a user on `host` would paste into.
    pub fn for_host(host: &Platform) -> Self {
        if host.os == "windows" {
            Self::PowerShell
        } else {
            Self::Posix
        }
    }
}

/// Cross-compiling front-end for the Go toolchain.
#[derive(Debug, Clone)]
pub struct Compiler<'t> {
    /// Render transcripts instead of running builds.
    pub debug: bool,
    /// Build through garble.
    pub garble: bool,
    /// Resolve cross compilers through zig instead of the table.
    pub zig: bool,
    /// Platform the build runs on.
    pub host: Platform,
    /// Executable names.
    pub programs: Programs,
    /// Transcript syntax.
    pub shell: ShellStyle,
    table: &'t ToolchainTable,
}

impl<'t> Compiler<'t> {
    /// A compiler for the current host using `table` for lookups.
    pub fn new(table: &'t ToolchainTable) -> Self {
        let host = Platform::host();
        Self {
            debug: false,
            garble: false,
            zig: false,
            shell: ShellStyle::for_host(&host),
            host,
            programs: Programs::default(),
            table,
        }
    }

    /// Pin the host platform; the transcript style follows it.
    pub fn with_host(mut self, host: Platform) -> Self {
        self.shell = ShellStyle::for_host(&host);
        self.host = host;
        self
    }

    /// The table cross compilers are looked up in.
    pub fn table(&self) -> &'t ToolchainTable {
        self.table
    }

    /// How cross compilers are resolved, following the `zig` switch.
    pub fn strategy(&self) -> Strategy {
        if self.zig {
            Strategy::Zig
        } else {
            Strategy::Table
        }
    }

    /// Cross compiler pair for `target`, empty if none applies.
    pub fn resolve(&self, target: &Platform) -> CompilerPair {
        resolve::resolve(
            self.strategy(),
            self.table,
            &self.programs.zig,
            &self.host,
            target,
        )
    }

    /// Run the toolchain with `env`, returning its standard output.
    ///
    /// In dry-run mode this returns the transcript and never fails.
    pub fn run(&self, env: &BuildEnvironment, args: &[String]) -> Result<String> {
        let (program, args) = self.command_line(args);
        let entries = flatten(env);

        if self.debug {
            return Ok(self.transcript(program, &entries, &args));
        }

        self.execute(program, env, args.as_slice())
    }

    /// Pick the executable and adjust arguments for garble.
    fn command_line<'a>(&'a self, args: &[String]) -> (&'a str, Vec<String>) {
        if !self.garble || args.first().map(String::as_str) != Some("build") {
            return (self.programs.go.as_str(), args.to_vec());
        }

        // garble trims paths itself and rejects -trimpath
        let args = GARBLE_FLAGS
            .iter()
            .map(|flag| flag.to_string())
            .chain(args.iter().cloned())
            .filter(|arg| !arg.ends_with("-trimpath"))
            .collect();

        (self.programs.garble.as_str(), args)
    }

    /// Spawn `program` for real, regardless of `debug`.
    pub(crate) fn execute<S: AsRef<str>>(
        &self,
        program: &str,
        env: &BuildEnvironment,
        args: &[S],
    ) -> Result<String> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        debug!(program, ?args, "running toolchain");

        let output = Command::new(program)
            .args(&args)
            .env_clear()
            .envs(env.opaque().iter().map(|(k, v)| (k, v)))
            .envs(env.iter())
            .output()
            .map_err(|source| InvocationError::Launch {
                program: program.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();

        if !output.status.success() {
            if stderr.is_empty() {
                return Err(InvocationError::Status {
                    program: program.to_string(),
                    status: output.status,
                });
            }
            return Err(InvocationError::Diagnostic {
                program: program.to_string(),
                status: output.status,
                stderr: stderr.to_string(),
            });
        }

        if !stderr.is_empty() {
            debug!(program, stderr, "toolchain wrote to stderr");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.strip_suffix('\n').unwrap_or(&stdout).to_string())
    }

    /// Render the command as shell text.
    fn transcript(&self, program: &str, entries: &[String], args: &[String]) -> String {
        let assignments: Vec<String> = entries
            .iter()
            .filter(|entry| {
                let key = entry.split_once('=').map_or(entry.as_str(), |(k, _)| k);
                TRANSCRIPT_VARS.contains(&key)
            })
            .map(|entry| match self.shell {
                ShellStyle::PowerShell => format!("$env:{};", quote(entry)),
                ShellStyle::Posix => format!("{} \\", quote(entry)),
            })
            .collect();
        let args: Vec<String> = args.iter().map(|arg| quote(arg)).collect();

        format!("{}\n{} {}", assignments.join("\n"), program, args.join(" "))
    }
}

/// `KEY=VALUE` entries sorted by the whole entry.
pub fn flatten(env: &BuildEnvironment) -> Vec<String> {
    let mut entries: Vec<String> = env.iter().map(|(k, v)| format!("{k}={v}")).collect();
    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn env(pairs: &[(&str, &str)]) -> BuildEnvironment {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dry_run(host: Platform) -> Compiler<'static> {
        let mut compiler = Compiler::new(ToolchainTable::builtin()).with_host(host);
        compiler.debug = true;
        compiler
    }

    #[test]
    fn flatten_sorts_whole_entries() {
        let entries = flatten(&env(&[("A", "1"), ("A1", "2"), ("B", "3")]));
        // '1' sorts before '='
        assert_eq!(entries, strings(&["A1=2", "A=1", "B=3"]));
    }

    #[test]
    fn posix_transcript() {
        let compiler = dry_run(Platform::new("linux", "amd64"));
        let env = env(&[
            ("CC", "x86_64-w64-mingw32-gcc"),
            ("CGO_ENABLED", "1"),
            ("CXX", "x86_64-w64-mingw32-g++"),
            ("GOARCH", "amd64"),
            ("GOOS", "windows"),
            ("HOME", "/root"),
        ]);
        let out = compiler
            .run(&env, &strings(&["build", "-o", "app.exe", "."]))
            .unwrap();
        assert_eq!(
            out,
            "CC=\"x86_64-w64-mingw32-gcc\" \\\n\
             CGO_ENABLED=\"1\" \\\n\
             CXX=\"x86_64-w64-mingw32-g++\" \\\n\
             GOARCH=\"amd64\" \\\n\
             GOOS=\"windows\" \\\n\
             go \"build\" \"-o\" \"app.exe\" \".\""
        );
    }

    #[test]
    fn powershell_transcript() {
        let compiler = dry_run(Platform::new("windows", "amd64"));
        let env = env(&[("GOARCH", "arm64"), ("GOOS", "darwin"), ("PATH", "C:\\go")]);
        let out = compiler.run(&env, &strings(&["version"])).unwrap();
        assert_eq!(
            out,
            "$env:GOARCH=\"arm64\";\n$env:GOOS=\"darwin\";\ngo \"version\""
        );
    }

    #[test]
    fn dry_run_never_spawns() {
        let mut compiler = dry_run(Platform::new("linux", "amd64"));
        compiler.programs.go = "/nonexistent/bin/go".into();
        let env = env(&[("GOOS", "plan9"), ("GOARCH", "386")]);
        let out = compiler.run(&env, &strings(&["build", "."])).unwrap();
        assert!(out.contains("plan9"));
        assert!(out.contains("386"));
        assert!(out.contains("/nonexistent/bin/go"));
    }

    #[test]
    fn dry_run_transcript_keeps_booleans_bare() {
        let compiler = dry_run(Platform::new("linux", "amd64"));
        let out = compiler
            .run(&BuildEnvironment::new(), &strings(&["build", "--buildvcs=false"]))
            .unwrap();
        assert_eq!(out, "\ngo \"build\" --buildvcs=false");
    }

    #[test]
    fn garble_replaces_go_for_build() {
        let mut compiler = dry_run(Platform::new("linux", "amd64"));
        compiler.garble = true;
        let out = compiler
            .run(
                &BuildEnvironment::new(),
                &strings(&["build", "--trimpath", "-o", "app"]),
            )
            .unwrap();
        assert_eq!(
            out,
            "\ngarble \"--literals\" --seed=\"random\" \"--tiny\" \"build\" \"-o\" \"app\""
        );
    }

    #[test]
    fn garble_leaves_other_commands_alone() {
        let mut compiler = dry_run(Platform::new("linux", "amd64"));
        compiler.garble = true;
        let out = compiler
            .run(&BuildEnvironment::new(), &strings(&["vet", "--trimpath"]))
            .unwrap();
        assert_eq!(out, "\ngo \"vet\" \"--trimpath\"");
    }

    #[test]
    fn strategy_follows_zig_flag() {
        let mut compiler = Compiler::new(ToolchainTable::builtin());
        assert_eq!(compiler.strategy(), Strategy::Table);
        compiler.zig = true;
        assert_eq!(compiler.strategy(), Strategy::Zig);
    }

    #[test]
    fn launch_failure_names_program() {
        let mut compiler = Compiler::new(ToolchainTable::builtin());
        compiler.programs.go = "/nonexistent/bin/go".into();
        let err = compiler
            .run(&BuildEnvironment::new(), &strings(&["version"]))
            .unwrap_err();
        assert!(matches!(err, InvocationError::Launch { .. }));
        assert_eq!(err.program(), "/nonexistent/bin/go");
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::test_support::script;

        fn compiler_for(go: std::path::PathBuf) -> Compiler<'static> {
            let mut compiler =
                Compiler::new(ToolchainTable::builtin()).with_host(Platform::new("linux", "amd64"));
            compiler.programs.go = go.to_string_lossy().into_owned();
            compiler
        }

        #[test]
        fn stdout_loses_one_trailing_newline() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(dir.path(), "go", r"printf 'hello\n\n'");
            let out = compiler_for(go)
                .run(&BuildEnvironment::new(), &strings(&["version"]))
                .unwrap();
            assert_eq!(out, "hello\n");
        }

        #[test]
        fn child_sees_only_given_environment() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(dir.path(), "go", r#"printf '%s|%s|%s' "$ONLY" "$HOME" "$1""#);
            let out = compiler_for(go)
                .run(&env(&[("ONLY", "yes")]), &strings(&["arg one"]))
                .unwrap();
            assert_eq!(out, "yes||arg one");
        }

        #[test]
        fn stderr_becomes_error_message() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(dir.path(), "go", "echo '  cannot build  ' >&2\nexit 1");
            let err = compiler_for(go)
                .run(&BuildEnvironment::new(), &strings(&["build"]))
                .unwrap_err();
            assert!(matches!(err, InvocationError::Diagnostic { .. }));
            assert_eq!(err.to_string(), "cannot build");
        }

        #[test]
        fn silent_failure_reports_status() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(dir.path(), "go", "exit 3");
            let err = compiler_for(go)
                .run(&BuildEnvironment::new(), &strings(&["build"]))
                .unwrap_err();
            match err {
                InvocationError::Status { status, .. } => assert_eq!(status.code(), Some(3)),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn stderr_on_success_is_not_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(dir.path(), "go", "echo warning >&2\necho built");
            let out = compiler_for(go)
                .run(&BuildEnvironment::new(), &strings(&["build"]))
                .unwrap();
            assert_eq!(out, "built");
        }

        #[test]
        fn garble_runs_garble_executable() {
            let dir = tempfile::tempdir().unwrap();
            let garble = script(dir.path(), "garble", r#"printf '%s ' "$@""#);
            let mut compiler = compiler_for(dir.path().join("go"));
            compiler.garble = true;
            compiler.programs.garble = garble.to_string_lossy().into_owned();
            let out = compiler
                .run(&BuildEnvironment::new(), &strings(&["build", "-trimpath", "."]))
                .unwrap();
            assert_eq!(out, "--literals --seed=random --tiny build . ");
        }
    }
}
