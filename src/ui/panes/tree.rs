//! Syntax tree pane rendering
//!
//! Shows the [`printer`](crate::printer) dump of the parsed program, with the
//! indent guides dimmed and node keywords coloured.

use crate::printer::FILLER;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn label_style(label: &str) -> Style {
    let first = label.chars().next();
    match label {
        "IF" | "THEN" | "ELSE" | "FOR" | "WHILE" | "RANGE" | "BREAK" | "CONTINUE" | "RETURN"
        | "PRINT" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "MATRIX" | "VECTOR" | "REF" | "TRANSPOSE" => Style::default().fg(DEFAULT_THEME.type_name),
        "zeros" | "ones" | "eye" => Style::default().fg(DEFAULT_THEME.builtin),
        _ if first == Some('"') => Style::default().fg(DEFAULT_THEME.string),
        _ if first.is_some_and(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ if first.is_some_and(|c| c.is_alphabetic() || c == '_') => {
            Style::default().fg(DEFAULT_THEME.fg)
        }
        _ => Style::default().fg(DEFAULT_THEME.secondary), // Operators
    }
}

/// Split one dump line into its indent guides and its label
fn highlight_tree_line(line: &str) -> Line<'static> {
    let mut rest = line;
    let mut depth = 0;
    while let Some(stripped) = rest.strip_prefix(FILLER) {
        rest = stripped;
        depth += 1;
    }

    Line::from(vec![
        Span::styled(
            FILLER.repeat(depth),
            Style::default().fg(DEFAULT_THEME.border_normal),
        ),
        Span::styled(rest.to_string(), label_style(rest)),
    ])
}

/// Render the syntax tree pane
///
/// `tree` is `None` when parsing failed; `placeholder` is shown instead.
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    tree: Option<&str>,
    placeholder: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(tree) = tree.filter(|t| !t.is_empty()) else {
        let paragraph = Paragraph::new(placeholder.to_string())
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let all_lines: Vec<&str> = tree.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if all_lines.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(all_lines.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible: Vec<Line> = all_lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| highlight_tree_line(line))
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_line_depth() {
        let line = highlight_tree_line("|  |  TRANSPOSE");

        assert_eq!(line.spans[0].content, "|  |  ");
        assert_eq!(line.spans[1].content, "TRANSPOSE");
        assert_eq!(line.spans[1].style.fg, Some(DEFAULT_THEME.type_name));
    }

    #[test]
    fn test_label_styles() {
        assert_eq!(label_style("WHILE").fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(label_style("2.5").fg, Some(DEFAULT_THEME.number));
        assert_eq!(label_style("\"s\"").fg, Some(DEFAULT_THEME.string));
        assert_eq!(label_style(".*").fg, Some(DEFAULT_THEME.secondary));
        assert_eq!(label_style("total").fg, Some(DEFAULT_THEME.fg));
    }
}
