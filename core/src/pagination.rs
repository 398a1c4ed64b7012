//! Relation links parsed from a `Link` response header.
//!
//! Entries look like `<https://api.github.com/search/users?page=2>; rel="next"`
//! and are separated by commas. Parsing is total: entries that are malformed,
//! carry an unparsable URL, or name an unknown relation are skipped.

use url::Url;

/// Links to neighbouring pages of a collection. An absent relation means
/// there is no such page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub next: Option<Url>,
    pub prev: Option<Url>,
    pub first: Option<Url>,
    pub last: Option<Url>,
}

impl Pagination {
    /// Parse a raw `Link` header value.
    pub fn from_link_header(link: &str) -> Self {
        let mut pagination = Pagination::default();
        for entry in split_entries(link) {
            let Some((url, params)) = parse_entry(entry) else {
                continue;
            };
            for rel in params.iter().filter_map(|param| rel_value(param)) {
                for name in rel.split_ascii_whitespace() {
                    pagination.assign(name, &url);
                }
            }
        }
        pagination
    }

    /// Parse the header if present, otherwise every relation is absent.
    pub fn from_optional_header(link: Option<&str>) -> Self {
        link.map(Self::from_link_header).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Pagination::default()
    }

    fn assign(&mut self, name: &str, url: &Url) {
        let slot = match name.to_ascii_lowercase().as_str() {
            "next" => &mut self.next,
            "prev" | "previous" => &mut self.prev,
            "first" => &mut self.first,
            "last" => &mut self.last,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(url.clone());
        }
    }
}

/// Split on commas that sit outside `<...>` and quoted strings. An unclosed
/// `<` or `"` is abandoned at the next `,` followed by `<`, so a broken entry
/// never swallows the one after it.
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_angle = false;
    let mut in_quote = false;
    for (i, c) in header.char_indices() {
        match c {
            '<' if !in_quote => in_angle = true,
            '>' if !in_quote => in_angle = false,
            '"' if !in_angle => in_quote = !in_quote,
            ',' if !in_angle && !in_quote => {
                entries.push(&header[start..i]);
                start = i + 1;
            }
            ',' if header[i + 1..].trim_start().starts_with('<') => {
                entries.push(&header[start..i]);
                start = i + 1;
                in_angle = false;
                in_quote = false;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);
    entries
}

fn parse_entry(entry: &str) -> Option<(Url, Vec<&str>)> {
    let entry = entry.trim();
    let rest = entry.strip_prefix('<')?;
    let close = rest.find('>')?;
    let target = rest[..close].trim();
    if target.contains(|c: char| c.is_whitespace() || c == '<' || c == '"') {
        return None;
    }
    let url = Url::parse(target).ok()?;
    let params: Vec<&str> = rest[close + 1..]
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if params.iter().any(|p| p.matches('"').count() % 2 != 0) {
        return None;
    }
    Some((url, params))
}

fn rel_value(param: &str) -> Option<&str> {
    let (key, value) = param.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("rel") {
        return None;
    }
    let value = value.trim();
    Some(
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Option<Url> {
        Some(Url::parse(s).unwrap())
    }

    #[test]
    fn parses_next_and_prev() {
        let p = Pagination::from_link_header(
            r#"<https://api.example.com/x?page=2>; rel="next", <https://api.example.com/x?page=1>; rel="prev""#,
        );
        assert_eq!(p.next, url("https://api.example.com/x?page=2"));
        assert_eq!(p.prev, url("https://api.example.com/x?page=1"));
        assert!(p.first.is_none());
        assert!(p.last.is_none());
    }

    #[test]
    fn parses_all_four_github_relations() {
        let header = concat!(
            r#"<https://api.github.com/search/users?q=tom&page=3>; rel="next", "#,
            r#"<https://api.github.com/search/users?q=tom&page=34>; rel="last", "#,
            r#"<https://api.github.com/search/users?q=tom&page=1>; rel="first", "#,
            r#"<https://api.github.com/search/users?q=tom&page=1>; rel="prev""#,
        );
        let p = Pagination::from_link_header(header);
        assert_eq!(p.next, url("https://api.github.com/search/users?q=tom&page=3"));
        assert_eq!(p.last, url("https://api.github.com/search/users?q=tom&page=34"));
        assert_eq!(p.first, url("https://api.github.com/search/users?q=tom&page=1"));
        assert_eq!(p.prev, url("https://api.github.com/search/users?q=tom&page=1"));
    }

    #[test]
    fn empty_and_absent_headers_yield_nothing() {
        assert!(Pagination::from_link_header("").is_empty());
        assert!(Pagination::from_link_header("   ").is_empty());
        assert!(Pagination::from_optional_header(None).is_empty());
    }

    #[test]
    fn skips_malformed_entries_and_unknown_relations() {
        let header = concat!(
            r#"https://no-brackets.example/x; rel="next", "#,
            r#"<not a url>; rel="prev", "#,
            r#"<https://api.example.com/x?page=9>; rel="alternate", "#,
            r#"<https://api.example.com/x?page=5>; rel="last""#,
        );
        let p = Pagination::from_link_header(header);
        assert!(p.next.is_none());
        assert!(p.prev.is_none());
        assert!(p.first.is_none());
        assert_eq!(p.last, url("https://api.example.com/x?page=5"));
    }

    #[test]
    fn commas_inside_urls_do_not_split_entries() {
        let p = Pagination::from_link_header(
            r#"<https://api.example.com/x?ids=1,2,3&page=2>; rel="next""#,
        );
        assert_eq!(p.next, url("https://api.example.com/x?ids=1,2,3&page=2"));
    }

    #[test]
    fn accepts_unquoted_and_multi_valued_rel() {
        let p = Pagination::from_link_header(
            r#"<https://api.example.com/x?page=2>; rel=next, <https://api.example.com/x?page=9>; title="end"; rel="last first""#,
        );
        assert_eq!(p.next, url("https://api.example.com/x?page=2"));
        assert_eq!(p.last, url("https://api.example.com/x?page=9"));
        assert_eq!(p.first, url("https://api.example.com/x?page=9"));
    }

    #[test]
    fn unclosed_quote_does_not_swallow_next_entry() {
        let p = Pagination::from_link_header(
            r#"<https://api.example.com/x?page=1>; title="oops, <https://api.example.com/x?page=2>; rel="next""#,
        );
        assert_eq!(p.next, url("https://api.example.com/x?page=2"));
        assert!(p.prev.is_none());
        assert!(p.first.is_none());
        assert!(p.last.is_none());
    }

    #[test]
    fn unclosed_angle_bracket_is_skipped() {
        let p = Pagination::from_link_header(
            r#"<https://api.example.com/x?page=1; rel="prev", <https://api.example.com/x?page=2>; rel="next""#,
        );
        assert_eq!(p.next, url("https://api.example.com/x?page=2"));
        assert!(p.prev.is_none());
    }

    #[test]
    fn target_with_whitespace_or_quote_is_rejected() {
        let p = Pagination::from_link_header(
            r#"<https://api.example.com/x?page=1 rel="prev">; rel="prev", <https://api.example.com/x?page=3>; rel="last""#,
        );
        assert!(p.prev.is_none());
        assert_eq!(p.last, url("https://api.example.com/x?page=3"));
    }

    #[test]
    fn entry_without_rel_is_ignored() {
        let p = Pagination::from_link_header("<https://api.example.com/x?page=2>");
        assert!(p.is_empty());
    }
}
