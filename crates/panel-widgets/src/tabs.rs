use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::Tabs;

use crate::theme::Theme;

/// Render one tab per title. The selected tab uses the header background,
/// the rest the row highlight background.
pub fn render_tabs(
    titles: &[&str],
    selected: Option<usize>,
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
) {
    let tabs = Tabs::new(tab_lines(titles, selected, theme))
        .select(selected)
        .divider("")
        .highlight_style(Style::default().bg(theme.header_bg));
    frame.render_widget(tabs, area);
}

fn tab_lines<'a>(titles: &[&str], selected: Option<usize>, theme: &Theme) -> Vec<Line<'a>> {
    titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            let bg = if selected == Some(idx) {
                theme.header_bg
            } else {
                theme.row_highlight_bg
            };
            Line::from(format!(" {title} ")).fg(theme.header_fg).bg(bg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_selected_tab_uses_the_header_background() {
        let theme = Theme::default();
        let lines = tab_lines(&["Job Title", "Company"], Some(1), &theme);
        assert_eq!(lines[0].style.bg, Some(theme.row_highlight_bg));
        assert_eq!(lines[1].style.bg, Some(theme.header_bg));
        assert_eq!(lines[1].spans[0].content, " Company ");
    }

    #[test]
    fn nothing_selected() {
        let theme = Theme::default();
        let lines = tab_lines(&["Job Title"], None, &theme);
        assert_eq!(lines[0].style.bg, Some(theme.row_highlight_bg));
    }
}
