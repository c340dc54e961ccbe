pub mod db;
pub mod error;
pub mod pman;
pub mod structs;
pub mod utils;
pub mod version;
pub mod widgets;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Widget},
};
use std::{error::Error, path::Path, path::PathBuf, sync::Mutex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    error::AppError,
    pman::{load_packages, pacman_exists, run_command},
    structs::{
        appstate::AppState,
        attribute::Attribute,
        event::{EventCommand, EventResult},
        tab::Tab,
    },
    widgets::{
        Commands, CurrentPackage,
        info::{InfoWidget, format_attrs, format_info},
    },
};

/// Browse pacman packages in the terminal
#[derive(Parser, Debug)]
#[command(name = "pkgc", version, about)]
struct Args {
    /// Print every attribute of a package and exit
    #[arg(long, value_name = "NAME")]
    info: Option<String>,

    /// With --info, only print these attributes, by label or number
    #[arg(long, value_name = "ATTR", requires = "info")]
    attr: Vec<String>,

    /// Tab to start on: all, installed or updates
    #[arg(long, default_value = "all")]
    tab: Tab,

    /// Write logs to this file, filtered by RUST_LOG
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    if !pacman_exists() {
        println!("pacman is not installed");
        std::process::exit(1);
    }

    if let Some(name) = &args.info {
        if let Err(e) = print_info(name, &args.attr) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("Collecting packages...");
    let mut state = AppState::new(args.tab);

    let res = refresh_packages(&mut state);
    if let Err(e) = res {
        eprintln!("Error getting package list: {e}");
        std::process::exit(1);
    }

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let appresult = run(&mut terminal, state);
    ratatui::restore();

    if let Err(e) = appresult {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
    Ok(())
}

//logs go to a file so they never draw over the ui
fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_info(name: &str, attrs: &[String]) -> Result<(), AppError> {
    let attrs = attrs
        .iter()
        .map(|a| a.parse::<Attribute>())
        .collect::<Result<Vec<_>, _>>()?;
    let packages = load_packages()?;
    let found = packages
        .iter()
        .filter(|p| p.name() == name)
        .map(|p| {
            if attrs.is_empty() {
                format_info(p)
            } else {
                format_attrs(p, attrs.iter().copied())
            }
        })
        .collect::<Vec<_>>();
    if found.is_empty() {
        return Err(AppError::Other(format!("package '{name}' was not found")));
    }
    println!("{}", found.join("\n\n"));
    Ok(())
}

fn refresh_packages(state: &mut AppState) -> Result<(), AppError> {
    let packages = load_packages()?;
    info!("Loaded {} packages", packages.len());
    state.packages_widget.set_data(packages);
    Ok(())
}

fn run(terminal: &mut DefaultTerminal, mut state: AppState) -> Result<(), AppError> {
    loop {
        terminal.draw(|f| {
            let info = if state.show_info {
                Constraint::Percentage(40)
            } else {
                Constraint::Length(0)
            };

            use Constraint::{Length, Min};
            let vertical = Layout::vertical([Length(3), Min(0), info, Length(1)]);
            let [header_area, inner_area, info_area, footer_area] = vertical.areas(f.area());

            draw_tabs(&state, f, header_area);
            state
                .packages_widget
                .clone()
                .render(inner_area, f.buffer_mut());
            draw_info(&state, f, info_area);
            draw_status(&state, f, footer_area);
            draw_help(&state, f);
        })?;

        let ev = handle_event(&mut state)?;

        match ev {
            EventResult::None => {}
            EventResult::Quit => return Ok(()),
            EventResult::Command(c) => {
                debug!("Running {c:?}");
                if let Err(e) = goto_screen(false, terminal) {
                    warn!("Could not leave the alternate screen: {e}");
                }
                let res = run_command(c);
                if let Err(e) = goto_screen(true, terminal) {
                    warn!("Could not return to the alternate screen: {e}");
                }
                match res {
                    Err(e) => {
                        error!("Command failed: {e}");
                        state.set_message(&e.to_string());
                    }
                    Ok(()) => state.set_message("Command completed."),
                }
                if let Err(e) = refresh_packages(&mut state) {
                    state.set_message(&e.to_string());
                }
            }
        }
    }
}

fn draw_tabs(state: &AppState, f: &mut Frame<'_>, header_area: Rect) {
    Tabs::new(Tab::values())
        .highlight_style((Color::Black, Color::Yellow))
        .select(&state.packages_widget.tab())
        .block(Block::bordered())
        .render(header_area, f.buffer_mut());
}

fn handle_event(state: &mut AppState) -> Result<EventResult, AppError> {
    let Event::Key(key) = event::read()? else {
        return Ok(EventResult::None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(EventResult::None);
    }

    //priority is ctrl+c
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(EventResult::Quit);
    }

    //if showing help
    if state.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            state.show_help = false;
        }
        //no other actions allowed
        return Ok(EventResult::None);
    }

    if let Some(res) = state.packages_widget.handle_key_event(&key) {
        return Ok(res);
    }

    //final global key handling
    match key.code {
        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Char('q') => return Ok(EventResult::Quit),
        KeyCode::Tab | KeyCode::BackTab => {
            let mut tab = state.packages_widget.tab();
            if key.code == KeyCode::Tab {
                tab.cycle_next();
            } else {
                tab.cycle_prev();
            }
            state.packages_widget.set_tab(tab);
        }
        KeyCode::Char('s') => {
            return Ok(EventResult::Command(EventCommand::SyncDatabase));
        }
        KeyCode::Char('i') => state.show_info = !state.show_info,
        _ => {}
    }
    Ok(EventResult::None)
}

fn goto_screen(alternate: bool, terminal: &mut DefaultTerminal) -> Result<(), Box<dyn Error>> {
    use crossterm::ExecutableCommand;
    use crossterm::terminal::EnterAlternateScreen;
    use crossterm::terminal::LeaveAlternateScreen;
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
    use std::io::stdout;

    if alternate {
        stdout().execute(EnterAlternateScreen)?;
        enable_raw_mode()?;
        terminal.clear()?;
    } else {
        stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
    }
    Ok(())
}

fn draw_info(state: &AppState, f: &mut Frame, rect: Rect) {
    if !state.show_info {
        return;
    }
    InfoWidget {
        package: state.packages_widget.current_package(),
    }
    .render(rect, f.buffer_mut());
}

fn draw_help(state: &AppState, f: &mut Frame) {
    if !state.show_help {
        return;
    }

    let mut commands = vec![
        "?: Toggle Help".to_string(),
        "q: Quit".to_string(),
        "Tab/Shift+Tab: Change view".to_string(),
        "s: Sync Database".to_string(),
        "/: Search".to_string(),
        "i: Toggle Info Panel".to_string(),
        "Space: Select package".to_string(),
        "Ctrl+a: Toggle select all".to_string(),
        "Esc: Clear Filter".to_string(),
        "1-6: Sort column".to_string(),
        "".to_string(),
    ];

    let formatted = state
        .packages_widget
        .command_descriptions()
        .into_iter()
        .map(|(k, v, _)| format!("{}: {}", k, v))
        .collect::<Vec<_>>();
    commands.extend(formatted);

    let size = f.area();

    // Calculate the block size (1/3 of the screen size)
    let block_width = (size.width / 3).max(50).min(size.width);
    let block_height = (commands.len() as u16 + 2).min(size.height);

    // Calculate the block position (centered)
    let block_x = size.width.saturating_sub(block_width) / 2;
    let block_y = size.height.saturating_sub(block_height) / 2;

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Blue).fg(Color::Black));

    let paragraph = Paragraph::new(commands.into_iter().map(Line::from).collect::<Vec<_>>())
        .block(block)
        .alignment(Alignment::Left);
    let rect = Rect::new(block_x, block_y, block_width, block_height);
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

fn draw_status(state: &AppState, f: &mut Frame, rect: Rect) {
    let mut text = vec![" ?:Help", "Tab:Change view", "/:Search", "s:Sync"];

    let extra = state.packages_widget.command_descriptions();
    let formatted = extra
        .into_iter()
        .filter(|(_, _, v)| !v.is_empty())
        .map(|(k, _, v)| format!("{}:{}", k, v))
        .collect::<Vec<_>>();

    text.extend(formatted.iter().map(|s| s.as_str()));

    let layout =
        Layout::horizontal([Constraint::Percentage(80), Constraint::Percentage(20)]).split(rect);

    let info = Paragraph::new(text.join("  ")).style(Style::default().fg(Color::Yellow));
    f.render_widget(&info, layout[0]);
    Text::raw(state.message.as_ref())
        .style(Style::default().fg(Color::Red))
        .render(layout[1], f.buffer_mut());
}
