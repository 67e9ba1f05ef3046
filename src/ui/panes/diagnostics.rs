//! Diagnostics pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Which stage produced a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Lex,
    Syntax,
    Semantic,
}

impl ProblemKind {
    fn tag(self) -> &'static str {
        match self {
            ProblemKind::Lex => "lex",
            ProblemKind::Syntax => "syntax",
            ProblemKind::Semantic => "type",
        }
    }
}

/// One entry of the diagnostics list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub line: usize,
    pub text: String,
}

/// Render the diagnostics pane
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    problems: &[Problem],
    selected: Option<usize>,
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
        .title(format!(" Diagnostics ({}) ", problems.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if problems.is_empty() {
        let paragraph = Paragraph::new("No problems found")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Keep the selected entry on screen
    if let Some(sel) = selected {
        if sel < *scroll_offset {
            *scroll_offset = sel;
        } else if sel >= *scroll_offset + visible_height {
            *scroll_offset = sel + 1 - visible_height;
        }
    }

    if problems.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(problems.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = problems
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, problem)| {
            let tag_style = Style::default()
                .fg(match problem.kind {
                    ProblemKind::Semantic => DEFAULT_THEME.error,
                    _ => DEFAULT_THEME.secondary,
                })
                .add_modifier(Modifier::BOLD);
            let line = Line::from(vec![
                Span::styled(format!("{:>6} ", problem.kind.tag()), tag_style),
                Span::styled(problem.text.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]);

            let item = ListItem::new(line);
            if selected == Some(idx) {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg).fg(Color::White))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
