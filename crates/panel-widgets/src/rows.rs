//! Suggestion rows with the fuzzy-matched characters of the query emphasised.

use std::mem;

use frizbee::{Config, match_indices};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row};

use crate::theme::Theme;

/// Character positions in `text` matched by `needle`, if any.
pub fn highlight_indices(needle: &str, text: &str) -> Option<Vec<usize>> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    match_indices(needle, text, &Config::default()).map(|m| m.indices)
}

/// Split `text` into plain and emphasised spans.
pub fn highlight_line<'a>(text: &str, indices: Option<Vec<usize>>, theme: &Theme) -> Line<'a> {
    let Some(mut sorted_indices) = indices.filter(|indices| !indices.is_empty()) else {
        return Line::from(text.to_string());
    };
    sorted_indices.sort_unstable();
    let mut next = sorted_indices.into_iter().peekable();
    let mut buffer = String::new();
    let mut highlighted = false;
    let mut spans = Vec::new();
    let style_for = |highlighted: bool| {
        if highlighted {
            theme.match_style()
        } else {
            Style::default()
        }
    };

    for (idx, ch) in text.chars().enumerate() {
        while next.peek().is_some_and(|&i| i < idx) {
            next.next();
        }
        let matched = next.peek().copied() == Some(idx);
        if matched != highlighted {
            if !buffer.is_empty() {
                spans.push(Span::styled(mem::take(&mut buffer), style_for(highlighted)));
            }
            highlighted = matched;
        }
        buffer.push(ch);
    }
    if !buffer.is_empty() {
        spans.push(Span::styled(buffer, style_for(highlighted)));
    }
    Line::from(spans)
}

pub fn highlight_cell<'a>(text: &str, indices: Option<Vec<usize>>, theme: &Theme) -> Cell<'a> {
    Cell::from(highlight_line(text, indices, theme))
}

/// One single-cell row per label, highlighted against `query`.
pub fn highlighted_rows<'a, I, S>(labels: I, query: &str, theme: &Theme) -> Vec<Row<'a>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| {
            let label = label.as_ref();
            Row::new([highlight_cell(label, highlight_indices(query, label), theme)])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(line: &Line<'_>) -> Vec<String> {
        line.spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn contiguous_matches_form_one_span() {
        let theme = Theme::default();
        let line = highlight_line("Google", Some(vec![0, 1, 2]), &theme);
        assert_eq!(contents(&line), vec!["Goo", "gle"]);
        assert_eq!(line.spans[0].style, theme.match_style());
        assert_eq!(line.spans[1].style, Style::default());
    }

    #[test]
    fn unsorted_indices_are_accepted() {
        let line = highlight_line("Meta", Some(vec![3, 0]), &Theme::default());
        assert_eq!(contents(&line), vec!["M", "et", "a"]);
    }

    #[test]
    fn no_indices_is_plain_text() {
        let line = highlight_line("PhD", None, &Theme::default());
        assert_eq!(contents(&line), vec!["PhD"]);
        let line = highlight_line("PhD", Some(Vec::new()), &Theme::default());
        assert_eq!(contents(&line), vec!["PhD"]);
    }

    #[test]
    fn blank_needle_highlights_nothing() {
        assert_eq!(highlight_indices("  ", "Google"), None);
    }

    #[test]
    fn fuzzy_match_finds_indices() {
        let indices = highlight_indices("goog", "Google").unwrap();
        assert!(!indices.is_empty());
    }

    #[test]
    fn one_row_per_label() {
        let rows = highlighted_rows(["Google", "Meta"], "g", &Theme::default());
        assert_eq!(rows.len(), 2);
    }
}
