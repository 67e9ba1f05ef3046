//! Main TUI application state and logic

use super::panes::{self, Problem, ProblemKind, SourceScrollState, Verdict};
use crate::printer;
use crate::Analysis;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Diagnostics,
    Tree,
    Symbols,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> diagnostics -> tree -> symbols)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Symbols,
            FocusedPane::Symbols => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Symbols,
            FocusedPane::Diagnostics => FocusedPane::Source,
            FocusedPane::Tree => FocusedPane::Diagnostics,
            FocusedPane::Symbols => FocusedPane::Tree,
        }
    }
}

/// The main application state
pub struct App {
    /// The source code that was analyzed
    pub source_code: String,

    pub analysis: Analysis,

    /// Printed syntax tree, `None` after a syntax error
    pub tree: Option<String>,

    /// Every lexer, syntax and type problem, ordered by line
    pub problems: Vec<Problem>,

    /// Index into `problems` of the highlighted entry
    pub selected: Option<usize>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub diagnostics_scroll: usize,
    pub tree_scroll: usize,
    pub symbols_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app showing `analysis` of `source_code`
    pub fn new(source_code: String, analysis: Analysis) -> Self {
        let problems = collect_problems(&analysis);
        let tree = analysis
            .outcome
            .as_ref()
            .ok()
            .map(|checked| printer::render(&checked.program));

        let status_message = match problems.len() {
            0 => String::from("No problems found"),
            n => format!("{} problem(s), press n to step through them", n),
        };

        App {
            source_code,
            analysis,
            tree,
            problems,
            selected: None,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            diagnostics_scroll: 0,
            tree_scroll: 0,
            symbols_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    fn verdict(&self) -> Verdict {
        if self.analysis.outcome.is_err() {
            Verdict::SyntaxError
        } else if self.problems.is_empty() {
            Verdict::Clean
        } else {
            Verdict::Problems(self.problems.len())
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tree (top) | Symbols (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let problem_lines: Vec<usize> = self.problems.iter().map(|p| p.line).collect();
        let selected_line = self.selected.and_then(|i| self.problems.get(i)).map(|p| p.line);

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            selected_line,
            &problem_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.problems,
            self.selected,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        panes::render_tree_pane(
            frame,
            right_rows[0],
            self.tree.as_deref(),
            "(no syntax tree: parsing failed)",
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        let symbols = self.analysis.outcome.as_ref().ok().map(|c| &c.symbols);
        panes::render_symbols_pane(
            frame,
            right_rows[1],
            symbols,
            self.focused_pane == FocusedPane::Symbols,
            &mut self.symbols_scroll,
        );

        panes::render_status_bar(frame, main_chunks[1], &self.status_message, self.verdict());
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Char('n') => self.select_problem(true),
            KeyCode::Char('p') => self.select_problem(false),
            KeyCode::Up => {
                let offset = self.focused_scroll();
                *offset = offset.saturating_sub(1);
            }
            KeyCode::Down => {
                let offset = self.focused_scroll();
                *offset = offset.saturating_add(1);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll.offset,
            FocusedPane::Diagnostics => &mut self.diagnostics_scroll,
            FocusedPane::Tree => &mut self.tree_scroll,
            FocusedPane::Symbols => &mut self.symbols_scroll,
        }
    }

    /// Move the selection to the next (or previous) problem, wrapping around
    fn select_problem(&mut self, forward: bool) {
        let count = self.problems.len();
        if count == 0 {
            self.status_message = String::from("No problems to show");
            return;
        }

        let next = match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.selected = Some(next);

        let problem = &self.problems[next];
        self.status_message = format!("{}/{}: line {}", next + 1, count, problem.line);
    }
}

/// Flatten every stage's problems into one list, ordered by line
fn collect_problems(analysis: &Analysis) -> Vec<Problem> {
    let mut problems: Vec<Problem> = analysis
        .lex_errors
        .iter()
        .map(|err| Problem {
            kind: ProblemKind::Lex,
            line: err.location.line,
            text: err.to_string(),
        })
        .collect();

    match &analysis.outcome {
        Ok(checked) => problems.extend(checked.diagnostics.iter().map(|diag| Problem {
            kind: ProblemKind::Semantic,
            line: diag.line,
            text: diag.to_string(),
        })),
        Err(err) => problems.push(Problem {
            kind: ProblemKind::Syntax,
            line: err.location().line,
            text: err.to_string(),
        }),
    }

    problems.sort_by_key(|p| p.line);
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(source: &str) -> App {
        App::new(source.to_string(), crate::analyze(source))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for (i, cell) in buffer.content.iter().enumerate() {
            text.push_str(cell.symbol());
            if (i + 1) % width == 0 {
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn test_focus_cycle() {
        let mut pane = FocusedPane::Source;
        for _ in 0..4 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Source);
        assert_eq!(FocusedPane::Source.prev().next(), FocusedPane::Source);
    }

    #[test]
    fn test_problems_are_ordered_by_line() {
        let app = app("x = 1;\nbreak;\ny = $ 2;\nz += 1;");

        let lines: Vec<_> = app.problems.iter().map(|p| (p.kind, p.line)).collect();
        assert_eq!(
            lines,
            vec![
                (ProblemKind::Semantic, 2),
                (ProblemKind::Lex, 3),
                (ProblemKind::Semantic, 4),
            ]
        );
    }

    #[test]
    fn test_problem_navigation_wraps() {
        let mut app = app("break;\ncontinue;");

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.selected, Some(0));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.selected, Some(0));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.selected, Some(1));
        assert_eq!(app.status_message, "2/2: line 2");
    }

    #[test]
    fn test_scroll_follows_focus() {
        let mut app = app("a = 1;");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.tree_scroll, 1);
        assert_eq!(app.source_scroll.offset, 0);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_clean_program() {
        let mut app = app("a = [1, 2; 3, 4];\nb = a';");
        let text = screen(&mut app);

        assert!(text.contains("Source Code"));
        assert!(text.contains("TRANSPOSE"));
        assert!(text.contains("matrix(2x2)"));
        assert!(text.contains("No problems found"));
        assert!(text.contains(" OK "));
    }

    #[test]
    fn test_render_syntax_error() {
        let mut app = app("if (x > 0 { y = 1; }");
        let text = screen(&mut app);

        assert!(text.contains("SYNTAX ERROR"));
        assert!(text.contains("parsing failed"));
        assert!(text.contains("LBRACE"));
    }
}
