// matcheck: static checker for a small matrix scripting language

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::level_filters::LevelFilter;
use tracing::info;

use matcheck::parser::lexer::Lexer;
use matcheck::ui::App;
use matcheck::{analyze, printer, Analysis};

/// Lex, parse and type check a matrix-language program
#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Print the token stream before checking
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree of a program that parses
    #[arg(long)]
    tree: bool,

    /// Browse the results in an interactive terminal viewer
    #[arg(long)]
    tui: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        // Logging would draw over the viewer
        if self.tui {
            return LevelFilter::OFF;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// 0 clean, 1 lexer errors or diagnostics, 2 syntax error
fn exit_code(analysis: &Analysis) -> ExitCode {
    if analysis.outcome.is_err() {
        ExitCode::from(2)
    } else if analysis.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(cli.log_level())
        .init();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read `{}`", cli.file.display()))?;
    info!(file = %cli.file.display(), bytes = source.len(), "checking");

    if cli.tokens {
        for token in Lexer::new(&source) {
            println!("{}\t{}", token.location, token);
        }
    }

    let analysis = analyze(&source);

    if cli.tui {
        let code = exit_code(&analysis);
        run_viewer(source, analysis)?;
        return Ok(code);
    }

    for err in &analysis.lex_errors {
        println!("{}", err);
    }

    match &analysis.outcome {
        Err(err) => println!("{}", err),
        Ok(checked) => {
            if cli.tree {
                print!("{}", printer::render(&checked.program));
            }
            for diagnostic in &checked.diagnostics {
                println!("{}", diagnostic);
            }
        }
    }

    Ok(exit_code(&analysis))
}

fn run_viewer(source: String, analysis: Analysis) -> anyhow::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, analysis);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal viewer failed")
}
