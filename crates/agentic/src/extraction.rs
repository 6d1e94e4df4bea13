use regex::{Regex, RegexBuilder};

/// Every span found between a pair of tags, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagContentResult {
    pub content: Vec<String>,
    pub found: bool,
}

fn tag_pattern(tag: &str) -> Option<Regex> {
    let tag = regex::escape(tag);
    RegexBuilder::new(&format!("<{tag}>(.*?)</{tag}>"))
        .dot_matches_new_line(true)
        .build()
        .ok()
}

/// Extract the trimmed content of every `<tag>...</tag>` pair in `text`.
///
/// Content may span lines. Unterminated tags are not matched.
pub fn extract_tag_content(text: &str, tag: &str) -> TagContentResult {
    let Some(re) = tag_pattern(tag) else {
        return TagContentResult::default();
    };

    let content: Vec<String> = re
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();

    TagContentResult {
        found: !content.is_empty(),
        content,
    }
}
