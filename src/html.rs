use scraper::ElementRef;

/// Text nodes under `el`, trimmed, with blank ones dropped.
pub fn stripped_strings(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stripped text nodes joined with `sep`.
pub fn joined_text(el: ElementRef<'_>, sep: &str) -> String {
    stripped_strings(el).join(sep)
}

/// Concatenated text exactly as it appears, whitespace included.
pub fn raw_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
