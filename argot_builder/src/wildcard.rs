use globset::GlobBuilder;
use std::fs;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[cfg(windows)]
const SEPARATORS: &[char] = &['/', '\\'];
#[cfg(not(windows))]
const SEPARATORS: &[char] = &['/'];

pub(crate) fn has_wildcards(text: &str) -> bool {
    text.contains(['*', '?'])
}

/// Expand the `*` and `?` wildcards in the final path component of `text`.
///
/// Matches are sorted and keep the directory prefix as written.
/// An unreadable directory, or a pattern which matches nothing, expands to nothing.
pub(crate) fn expand(text: &str) -> Vec<String> {
    let (prefix, pattern) = match text.rfind(SEPARATORS) {
        Some(index) => text.split_at(index + 1),
        None => ("", text),
    };
    let directory = if prefix.is_empty() { "." } else { prefix };

    let matcher = match GlobBuilder::new(&escape_non_wildcards(pattern))
        .literal_separator(true)
        .backslash_escape(false)
        .build()
    {
        Ok(glob) => glob.compile_matcher(),
        Err(_error) => {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Cannot expand '{text}': {_error}.");
            }
            return Vec::default();
        }
    };

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(_error) => {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Cannot read '{directory}' to expand '{text}': {_error}.");
            }
            return Vec::default();
        }
    };

    let mut out: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        // Like a shell, hidden entries only match a pattern that starts with '.'.
        .filter(|name| !name.starts_with('.') || pattern.starts_with('.'))
        .filter(|name| matcher.is_match(name))
        .map(|name| format!("{prefix}{name}"))
        .collect();
    out.sort();

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Expanded '{text}' into {} paths.", out.len());
    }

    out
}

// Only '*' and '?' are wildcards; every other glob meta character is literal.
fn escape_non_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());

    for c in pattern.chars() {
        match c {
            '[' | ']' | '{' | '}' => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }

    out
}
