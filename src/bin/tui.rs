use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use todo_api::client::api::TodoApi;
use todo_api::client::session::TodoClient;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5678/api";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let client = TodoClient::new(TodoApi::new(base_url.clone()));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, client, base_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    View,
    Create,
}

struct App {
    client: TodoClient,
    base_url: String,
    selected: usize,
    list_state: ListState,
    mode: Mode,
    last_tick: Instant,
}

impl App {
    fn clamp_selection(&mut self) {
        let len = self.client.model().len();
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            if self.selected >= len {
                self.selected = len - 1;
            }
            self.list_state.select(Some(self.selected));
        }
    }

    fn selected_id(&self) -> Option<todo_api::domain::task::TaskId> {
        self.client.model().get(self.selected).map(|task| task.id)
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    client: TodoClient,
    base_url: String,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App {
        client,
        base_url,
        selected: 0,
        list_state: ListState::default(),
        mode: Mode::View,
        last_tick: Instant::now(),
    };
    app.client.refresh().await;
    app.clamp_selection();

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new(
                "Todos (Enter: toggle, n: new, d: delete, r: refresh, q: quit)  |  New: type text, Enter to save, Esc to cancel",
            )
            .block(Block::default().borders(Borders::ALL).title("todo-tui"));
            f.render_widget(header, chunks[0]);

            let list_items: Vec<ListItem> = app
                .client
                .model()
                .tasks()
                .map(|task| {
                    let mark = if task.completed { "[x]" } else { "[ ]" };
                    let style = if task.completed {
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default()
                    };
                    ListItem::new(format!("{} {}", mark, task.text)).style(style)
                })
                .collect();
            if app.client.model().is_empty() {
                app.list_state.select(None);
            } else {
                app.list_state.select(Some(app.selected));
            }
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title("items"))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, chunks[1], &mut app.list_state);

            let footer_text = match app.mode {
                Mode::View => format!("API={}", app.base_url),
                Mode::Create => format!(
                    "New todo: {}_  |  (Enter to save, Esc to cancel)",
                    app.client.model().draft()
                ),
            };
            let footer = Paragraph::new(footer_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(match app.mode { Mode::View => "info", Mode::Create => "create" }),
            );
            f.render_widget(footer, chunks[2]);
        })?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Up => {
                            if app.selected > 0 {
                                app.selected -= 1;
                            }
                        }
                        KeyCode::Down => {
                            if app.selected + 1 < app.client.model().len() {
                                app.selected += 1;
                            }
                        }
                        KeyCode::Enter | KeyCode::Char(' ') => {
                            if let Some(id) = app.selected_id() {
                                app.client.toggle(id).await;
                            }
                        }
                        KeyCode::Char('d') => {
                            if let Some(id) = app.selected_id() {
                                app.client.remove(id).await;
                                app.clamp_selection();
                            }
                        }
                        KeyCode::Char('n') => {
                            app.mode = Mode::Create;
                            app.client.model_mut().draft_clear();
                        }
                        KeyCode::Char('r') => {
                            app.client.refresh().await;
                            app.clamp_selection();
                        }
                        _ => {}
                    },
                    Mode::Create => match key.code {
                        KeyCode::Esc => {
                            app.mode = Mode::View;
                            app.client.model_mut().draft_clear();
                        }
                        KeyCode::Enter => {
                            app.client.submit().await;
                            app.mode = Mode::View;
                            app.clamp_selection();
                        }
                        KeyCode::Backspace => app.client.model_mut().draft_pop(),
                        KeyCode::Char(c) => app.client.model_mut().draft_push(c),
                        _ => {}
                    },
                }
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}
