//! Shell quoting for dry-run transcripts.

/// Quote a `KEY=VALUE` token or a plain argument for display in a shell.
///
/// - A key containing a space means the token is not really an assignment, so
///   the whole token is wrapped and its double quotes escaped.
/// - `true` and `false` are left bare.
/// - Anything else has its value (or the whole plain token) double-quoted.
pub fn quote(token: &str) -> String {
    match token.split_once('=') {
        Some((key, _)) if key.contains(' ') => {
            format!("\"{}\"", token.replace('"', "\\\""))
        }
        Some((key, value)) => format!("{key}={}", quote_value(value)),
        None => quote_value(token),
    }
}

fn quote_value(value: &str) -> String {
    match value {
        "true" | "false" => value.to_string(),
        _ => format!("\"{value}\""),
    }
}
