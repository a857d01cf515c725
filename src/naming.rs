use serde::{Deserialize, Serialize};

/// Characters rejected by at least one common filesystem
const UNSAFE_CHARS: [char; 12] = [':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|', '\\'];

/// Longest stem kept by [`FilenameStyle::Escaped`], leaving room for the extension
const MAX_ESCAPED_LEN: usize = 200;

/// How a URL is turned into an output file name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilenameStyle {
    /// Strip the scheme and turn `/` into `_`; nothing else is touched
    #[default]
    Verbatim,
    /// Like `Verbatim`, and also replace filesystem-unsafe characters with `_`
    Escaped,
}

/// Derive the file stem for a URL
pub fn derive_stem(url: &str, style: FilenameStyle) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    match style {
        FilenameStyle::Verbatim => stripped.replace('/', "_"),
        FilenameStyle::Escaped => {
            let mut name = stripped.replace('/', "_").replace(UNSAFE_CHARS, "_");
            truncate_on_char_boundary(&mut name, MAX_ESCAPED_LEN);
            name
        }
    }
}

/// Derive the full file name (`<stem>.txt`) for a URL
pub fn derive_filename(url: &str, style: FilenameStyle) -> String {
    format!("{}.txt", derive_stem(url, style))
}

fn truncate_on_char_boundary(name: &mut String, max_len: usize) {
    if name.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name.truncate(end);
}
