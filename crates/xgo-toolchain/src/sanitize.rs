//! Default build flags.
//!
//! Adds flags for reproducible, stripped binaries to build-like subcommands
//! without touching anything the user already passed.

/// Defaults as (flag, value). An empty value means a bare flag.
const DEFAULTS: [(&str, &str); 3] = [
    ("--buildvcs", "false"),
    ("--ldflags", "-s -w"),
    ("--trimpath", ""),
];

/// Subcommands that compile and therefore get the defaults.
const BUILD_COMMANDS: [&str; 3] = ["build", "get", "install"];

/// Insert missing default flags right after the subcommand.
///
/// Returns `None` for empty input and the arguments unchanged for anything
/// that is not `build`, `get`, or `install`. A default is skipped when any
/// argument already starts with its flag name, so the result is stable under
/// repeated application.
pub fn sanitize(args: &[String]) -> Option<Vec<String>> {
    let (command, rest) = args.split_first()?;

    if !BUILD_COMMANDS.contains(&command.as_str()) {
        return Some(args.to_vec());
    }

    let mut out = vec![command.clone()];
    for (flag, value) in DEFAULTS {
        if args.iter().any(|arg| arg.starts_with(flag)) {
            continue;
        }
        if value.is_empty() {
            out.push(flag.to_string());
        } else {
            out.push(format!("{flag}={value}"));
        }
    }
    out.extend(rest.iter().cloned());

    Some(out)
}
