//! Token normalization for loosely formatted allow-lists.
//!
//! Operators pass tool filters either as one free-form string
//! (`"im, contact preset.light"`) or as an already split list. Both shapes
//! collapse to an ordered `Vec<String>` of trimmed tokens.
//!
//! The two shapes treat empties differently. A string is split on every run of
//! commas and/or whitespace, so interior runs merge into one boundary while a
//! delimiter touching either end still yields an empty edge token. A list is only
//! trimmed element-wise; nothing is dropped.

/// Input accepted by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListInput<'a> {
    /// No value supplied.
    Absent,
    /// One delimited string.
    Text(&'a str),
    /// An already split sequence.
    Items(Vec<&'a str>),
}

impl<'a> From<Option<&'a str>> for ListInput<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(ListInput::Absent, ListInput::Text)
    }
}

impl<'a> From<&'a str> for ListInput<'a> {
    fn from(value: &'a str) -> Self {
        ListInput::Text(value)
    }
}

impl<'a> From<&'a String> for ListInput<'a> {
    fn from(value: &'a String) -> Self {
        ListInput::Text(value)
    }
}

impl<'a> From<&'a [String]> for ListInput<'a> {
    fn from(value: &'a [String]) -> Self {
        ListInput::Items(value.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for ListInput<'a> {
    fn from(value: &'a Vec<String>) -> Self {
        ListInput::from(value.as_slice())
    }
}

impl<'a> From<&'a [&'a str]> for ListInput<'a> {
    fn from(value: &'a [&'a str]) -> Self {
        ListInput::Items(value.to_vec())
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for ListInput<'a> {
    fn from(value: &'a [&'a str; N]) -> Self {
        ListInput::Items(value.to_vec())
    }
}

/// Whitespace for splitting and trimming: Unicode `White_Space` minus NEL
/// (U+0085), plus the byte-order mark (U+FEFF).
fn is_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

fn is_delimiter(c: char) -> bool {
    c == ',' || is_space(c)
}

/// Normalize an allow-list into trimmed tokens. Total: never fails.
///
/// ```
/// use openapi_mcp_core::normalize::normalize;
///
/// assert_eq!(normalize("a, b c,d"), vec!["a", "b", "c", "d"]);
/// assert_eq!(normalize(" a "), vec!["", "a", ""]);
/// assert_eq!(normalize(&[" a ", ""]), vec!["a", ""]);
/// assert!(normalize(None::<&str>).is_empty());
/// ```
pub fn normalize<'a>(input: impl Into<ListInput<'a>>) -> Vec<String> {
    match input.into() {
        ListInput::Absent => Vec::new(),
        ListInput::Text("") => Vec::new(),
        ListInput::Text(text) => split_runs(text),
        ListInput::Items(items) => items
            .iter()
            .map(|s| s.trim_matches(is_space).to_string())
            .collect(),
    }
}

/// Split on delimiter runs. Splitting on single delimiters yields an empty piece
/// for every extra delimiter in a run; only the first and last piece may be empty.
fn split_runs(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = text.split(is_delimiter).collect();
    let last = pieces.len() - 1;
    pieces
        .iter()
        .enumerate()
        .filter(|(i, piece)| !piece.is_empty() || *i == 0 || *i == last)
        .map(|(_, piece)| piece.trim_matches(is_space).to_string())
        .collect()
}
