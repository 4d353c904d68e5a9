use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokedex_favorites::{Action, App, Card, CatalogClient, SortDirection, ViewModel};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use tokio::runtime::Runtime;

/// Which list has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Collection,
    Favorites,
}

impl Pane {
    pub fn other(&self) -> Self {
        match self {
            Pane::Collection => Pane::Favorites,
            Pane::Favorites => Pane::Collection,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Pane::Collection => "Collection",
            Pane::Favorites => "Favorites",
        }
    }
}

/// Terminal-side state: the session plus focus and selection
pub struct Screen {
    pub app: App,
    pub view: ViewModel,
    pub focus: Pane,
    pub collection_state: TableState,
    pub favorites_state: TableState,
}

impl Screen {
    pub fn new(app: App) -> Self {
        let view = app.view();
        let mut screen = Self {
            app,
            view,
            focus: Pane::Collection,
            collection_state: TableState::default(),
            favorites_state: TableState::default(),
        };
        screen.clamp_selection();
        screen
    }

    fn cards(&self, pane: Pane) -> &[Card] {
        match pane {
            Pane::Collection => &self.view.collection,
            Pane::Favorites => &self.view.favorites,
        }
    }

    fn state_mut(&mut self, pane: Pane) -> &mut TableState {
        match pane {
            Pane::Collection => &mut self.collection_state,
            Pane::Favorites => &mut self.favorites_state,
        }
    }

    pub fn selected_card(&self) -> Option<&Card> {
        let state = match self.focus {
            Pane::Collection => &self.collection_state,
            Pane::Favorites => &self.favorites_state,
        };
        state.selected().and_then(|i| self.cards(self.focus).get(i))
    }

    pub fn dispatch(&mut self, action: Action) {
        self.view = self.app.dispatch(action);
        self.clamp_selection();
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_card().map(|c| c.id) {
            self.dispatch(Action::ToggleFavorite(id));
        }
    }

    /// Re-run the catalog fetch (only meaningful after a failure)
    ///
    /// Blocks the UI loop until the fetch finishes.
    pub fn retry(&mut self, runtime: &Runtime, client: &CatalogClient) {
        let result = runtime.block_on(client.fetch_catalog());
        self.app.apply_fetch(result);
        self.view = self.app.view();
        self.clamp_selection();
    }

    pub fn switch_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub fn next(&mut self) {
        let len = self.cards(self.focus).len();
        if len == 0 {
            return;
        }
        let state = self.state_mut(self.focus);
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.cards(self.focus).len();
        if len == 0 {
            return;
        }
        let state = self.state_mut(self.focus);
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.cards(self.focus).is_empty() {
            self.state_mut(self.focus).select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let len = self.cards(self.focus).len();
        if len > 0 {
            self.state_mut(self.focus).select(Some(len - 1));
        }
    }

    /// Keep both selections inside their lists after a re-render
    fn clamp_selection(&mut self) {
        for pane in [Pane::Collection, Pane::Favorites] {
            let len = self.cards(pane).len();
            let state = self.state_mut(pane);
            let selected = match (len, state.selected()) {
                (0, _) => None,
                (_, None) => Some(0),
                (len, Some(i)) => Some(i.min(len - 1)),
            };
            state.select(selected);
        }
    }
}

pub fn run_ui(screen: &mut Screen, runtime: &Runtime, client: &CatalogClient) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, screen, runtime, client);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    screen: &mut Screen,
    runtime: &Runtime,
    client: &CatalogClient,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, screen))?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Tab | KeyCode::BackTab => screen.switch_focus(),
            KeyCode::Left | KeyCode::Char('h') => screen.focus = Pane::Collection,
            KeyCode::Right | KeyCode::Char('l') => screen.focus = Pane::Favorites,
            KeyCode::Down | KeyCode::Char('j') => screen.next(),
            KeyCode::Up | KeyCode::Char('k') => screen.previous(),
            KeyCode::Home => screen.first(),
            KeyCode::End => screen.last(),
            KeyCode::Enter | KeyCode::Char('f') => screen.toggle_selected(),
            KeyCode::Char('s') => screen.dispatch(Action::ToggleSort),
            KeyCode::Char('r') => screen.dispatch(Action::Reset),
            KeyCode::Char('R') => {
                terminal.draw(|f| {
                    let area = f.size();
                    render_loading(f, area)
                })?;
                screen.retry(runtime, client);
            }
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, screen: &mut Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with summaries
            Constraint::Min(0),    // Both lists
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], screen);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_list(f, lists[0], screen, Pane::Collection);
    render_list(f, lists[1], screen, Pane::Favorites);

    render_status_bar(f, chunks[2], screen);
}

fn render_header(f: &mut Frame, area: Rect, screen: &Screen) {
    let view = &screen.view;

    let spans = vec![
        Span::styled(
            "Pokédex Favorites",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(view.summary.clone(), Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::styled(view.scoreboard.clone(), Style::default().fg(Color::Magenta)),
        Span::raw("  |  "),
        Span::styled(
            format!("Name {}", sort_arrow(view.sort_direction)),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[s] {}", view.sort_label),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_list(f: &mut Frame, area: Rect, screen: &mut Screen, pane: Pane) {
    let focused = screen.focus == pane;

    let header_cells = ["#", "Name", "Base Exp", "Action"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let action_color = match pane {
        Pane::Collection => Color::Green,
        Pane::Favorites => Color::Red,
    };

    let rows: Vec<Row> = screen
        .cards(pane)
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(format!("{}", card.id)),
                Cell::from(truncate(&card.name, 24)),
                Cell::from(format!("{}", card.base_experience)),
                Cell::from(card.action_label).style(Style::default().fg(action_color)),
            ])
            .height(1)
        })
        .collect();

    let border_color = if focused { Color::Yellow } else { Color::White };
    let title = format!(" {} ({}) ", pane.title(), rows.len());

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol(if focused { "→ " } else { "  " });

    let state = screen.state_mut(pane);
    f.render_stateful_widget(table, area, state);
}

fn render_status_bar(f: &mut Frame, area: Rect, screen: &Screen) {
    let mut status_spans = Vec::new();

    if let Some(err) = screen.app.last_error() {
        status_spans.push(Span::styled(
            format!(" {} ", err),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw("| "));
        if screen.app.fetch_error().is_some() {
            status_spans.push(Span::styled("R", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Retry | "));
        }
    } else if screen.app.partition().is_empty() {
        status_spans.push(Span::styled(" Catalog is empty ", Style::default().fg(Color::DarkGray)));
        status_spans.push(Span::raw("| "));
    }

    for (key, label) in [
        ("Enter", " Fav/Remove | "),
        ("Tab", " Switch list | "),
        ("↑/↓", " Nav | "),
        ("s", " Sort | "),
        ("r", " Reset | "),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Fetching catalog...").block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(loading, area);
}

fn sort_arrow(direction: SortDirection) -> &'static str {
    if direction.is_ascending() {
        "▲"
    } else {
        "▼"
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
