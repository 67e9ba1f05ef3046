//! Symbol table pane rendering
//!
//! Lists every top-level variable with the type inferred for it at the end of
//! the program, in binding order. Unresolved variables show `?`.

use crate::checker::SymbolTable;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_symbols_pane(
    frame: &mut Frame,
    area: Rect,
    symbols: Option<&SymbolTable>,
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
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(symbols) = symbols.filter(|s| !s.is_empty()) else {
        let paragraph = Paragraph::new("(no variables)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let width = symbols.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if symbols.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(symbols.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let lines: Vec<Line> = symbols
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|entry| {
            let ty = match entry.ty {
                Some(ty) => Span::styled(ty.to_string(), Style::default().fg(DEFAULT_THEME.type_name)),
                None => Span::styled("?", Style::default().fg(DEFAULT_THEME.error)),
            };
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$} : ", entry.name, width = width),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                ty,
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
