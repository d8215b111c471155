use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use log::warn;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use ct_terminal::assets::{flag_url, team_code};
use ct_terminal::config::{DatasetConfig, parse_data_path_arg};
use ct_terminal::dataset::TableCache;
use ct_terminal::export::export_view;
use ct_terminal::logging::{self, Sink};
use ct_terminal::persist;
use ct_terminal::record::{MarginUnit, TossDecision};
use ct_terminal::state::{AppState, Screen, screen_label};
use ct_terminal::stats;

const DEFAULT_EXPORT_PATH: &str = "ct_export.xlsx";

fn drain_console(state: &mut AppState) {
    for line in logging::drain() {
        state.push_log(line);
    }
}

struct App {
    state: AppState,
    should_quit: bool,
    export_path: PathBuf,
}

impl App {
    fn new(state: AppState) -> Self {
        let export_path = std::env::var("CT_EXPORT_PATH")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH));
        Self {
            state,
            should_quit: false,
            export_path,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Matches,
            KeyCode::Char('2') => self.state.screen = Screen::Teams,
            KeyCode::Char('3') => self.state.screen = Screen::Toss,
            KeyCode::Char('4') => self.state.screen = Screen::Predict,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('y') => self.state.cycle_year(true),
            KeyCode::Char('Y') => self.state.cycle_year(false),
            KeyCode::Char('t') => self.state.cycle_team(true),
            KeyCode::Char('T') => self.state.cycle_team(false),
            KeyCode::Char('c') => self.state.clear_filters(),
            KeyCode::Char('a') => self.state.cycle_predict_a(),
            KeyCode::Char('b') => self.state.cycle_predict_b(),
            KeyCode::Char('x') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn export(&self) {
        if let Err(err) = export_view(&self.export_path, self.state.view()) {
            warn!("export to {} failed: {err:#}", self.export_path.display());
        }
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    logging::init(Sink::Buffer);

    let mut config = DatasetConfig::from_env();
    if let Some(path) = parse_data_path_arg() {
        config = config.with_primary(path);
    }

    // The dashboard has nothing to show without the table, so fail before
    // taking over the terminal.
    let cache = TableCache::new(config);
    let table = match cache.get() {
        Ok(table) => table,
        Err(err) => {
            eprintln!("error: {err}");
            let tried = cache
                .config()
                .candidates()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            eprintln!("looked in: {tried}");
            eprintln!("hint: set CT_DATA_PATH or pass --data <path> to a match results file");
            return ExitCode::FAILURE;
        }
    };

    let mut state = AppState::new(table);
    state.apply_prefs(&persist::load_prefs());
    drain_console(&mut state);

    let mut app = App::new(state);
    match run_terminal(&mut app) {
        Ok(()) => {
            persist::save_prefs(&app.state.prefs());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_terminal(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        drain_console(&mut app.state);
        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Matches => render_matches(frame, chunks[1], state),
        Screen::Teams => render_teams(frame, chunks[1], state),
        Screen::Toss => render_toss(frame, chunks[1], state),
        Screen::Predict => render_predict(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state, chunks[2].height.saturating_sub(2)))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    format!(
        " CHAMPIONS TROPHY | {} | {} | {} of {} matches",
        screen_label(state.screen),
        state.filter_label(),
        state.view().len(),
        state.table().len()
    )
}

fn footer_text() -> &'static str {
    "1-4 Screens | j/k Move | y/Y Year | t/T Team | c Clear | a/b Predict teams | x Export | ? Help | q Quit"
}

fn render_matches(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(36)])
        .split(area);

    let view = state.view();
    let list_area = columns[0];
    let block = Block::default().title("Matches").borders(Borders::ALL);
    if view.is_empty() {
        let empty = Paragraph::new("No matches for this year/team")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, list_area);
    } else {
        let visible = list_area.height.saturating_sub(2) as usize;
        let (start, end) = visible_range(state.selected, view.len(), visible);
        let lines: Vec<Line> = view.rows()[start..end]
            .iter()
            .enumerate()
            .map(|(offset, m)| {
                let idx = start + offset;
                let text = format!(
                    "{} {:<14} v {:<14} {:<14} {}",
                    m.date.format("%Y-%m-%d"),
                    m.team_a,
                    m.team_b,
                    m.winner.label(),
                    m.margin.text
                );
                if idx == state.selected {
                    Line::styled(text, Style::default().fg(Color::White).bg(Color::DarkGray))
                } else {
                    Line::raw(text)
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), list_area);
    }

    let detail = Paragraph::new(match_detail_text(state))
        .block(Block::default().title("Detail").borders(Borders::ALL));
    frame.render_widget(detail, columns[1]);
}

fn match_detail_text(state: &AppState) -> String {
    let Some(m) = state.selected_match() else {
        return "No match selected".to_string();
    };
    let mut lines = vec![
        format!("Date:   {}", m.date_text),
        format!("Ground: {}", m.ground),
        format!("{} v {}", m.team_a, m.team_b),
        format!("Winner: {}", m.winner.label()),
        format!("Margin: {}", if m.margin.text.is_empty() { "-" } else { m.margin.text.as_str() }),
        format!("Toss:   {} ({})", m.toss_winner, m.toss_decision.label()),
        String::new(),
    ];
    for team in [&m.team_a, &m.team_b] {
        lines.push(format!("{}: {}", team_code(team), flag_url(team)));
    }
    lines.join("\n")
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(3)])
        .split(area);

    let wins = stats::wins_by_team(state.view());
    let max = wins.iter().map(|(_, n)| *n as u64).max().unwrap_or(1);
    let bars: Vec<Bar> = wins
        .iter()
        .map(|(team, n)| {
            Bar::default()
                .value(*n as u64)
                .label(Line::from(team_code(team)))
                .text_value(n.to_string())
                .style(Style::default().fg(Color::Green))
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().title("Wins").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .max(max);
    frame.render_widget(chart, rows[0]);

    let per_year = stats::matches_per_year(state.view())
        .into_iter()
        .map(|(year, n)| format!("{year}: {n}"))
        .collect::<Vec<_>>()
        .join("  ");
    let mut lines = vec![
        format!("Matches per year  {per_year}"),
        String::new(),
        format!(
            "{:<16} {:>6} {:>4} {:>5} {:>4} {:>6}",
            "Team", "Played", "Won", "Lost", "NR", "Win%"
        ),
    ];
    for s in stats::team_summaries(state.view()) {
        lines.push(format!(
            "{:<16} {:>6} {:>4} {:>5} {:>4} {:>6.1}",
            s.team,
            s.played,
            s.won,
            s.lost,
            s.no_result,
            s.win_pct()
        ));
    }
    let table = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Records").borders(Borders::ALL));
    frame.render_widget(table, rows[1]);
}

fn render_toss(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    let breakdown = stats::toss_decisions(state.view());
    let bars = [
        decision_bar(TossDecision::Bat, breakdown.bat, Color::Yellow),
        decision_bar(TossDecision::Field, breakdown.field, Color::Cyan),
        decision_bar(TossDecision::Unknown, breakdown.unknown, Color::DarkGray),
    ];
    let chart = BarChart::default()
        .block(Block::default().title("Toss decisions").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2);
    frame.render_widget(chart, columns[0]);

    let impact = stats::toss_impact(state.view());
    let mut lines = vec![
        format!(
            "Toss winner won {} of {} decided matches ({:.1}%)",
            impact.toss_winner_won,
            impact.decided,
            impact.win_pct()
        ),
        String::new(),
    ];
    for (label, unit) in [("runs", MarginUnit::Runs), ("wickets", MarginUnit::Wickets)] {
        if let Some(m) = stats::largest_win(state.view(), unit) {
            lines.push(format!(
                "Largest win by {label}: {} by {} ({} v {}, {})",
                m.winner.label(),
                m.margin.text,
                m.team_a,
                m.team_b,
                m.year
            ));
        }
    }
    lines.push(String::new());
    lines.push("Busiest grounds:".to_string());
    for (ground, n) in stats::grounds(state.view()).into_iter().take(5) {
        lines.push(format!("  {ground}: {n}"));
    }
    let text = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Impact").borders(Borders::ALL));
    frame.render_widget(text, columns[1]);
}

fn decision_bar(decision: TossDecision, count: usize, color: Color) -> Bar<'static> {
    Bar::default()
        .value(count as u64)
        .label(Line::from(decision.label()))
        .text_value(count.to_string())
        .style(Style::default().fg(color))
}

fn render_predict(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Prediction").borders(Borders::ALL);
    let Some(pred) = state.prediction() else {
        let empty = Paragraph::new("Need at least two teams to predict")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(area);

    let lines = vec![
        format!("{}  v  {}   (a / b to change)", pred.team_a, pred.team_b),
        String::new(),
        format!("{:<16} {:>5.1}%", pred.team_a, pred.p_team_a),
        format!("{:<16} {:>5.1}%", pred.team_b, pred.p_team_b),
        format!("Confidence: {}%", pred.confidence),
        match pred.features {
            Some((code_a, code_b)) => format!("Team codes: {code_a} v {code_b}"),
            None => "Team codes: not in roster".to_string(),
        },
        format!(
            "Head to head: {} played, {}-{} ({} no result)",
            pred.h2h.played, pred.h2h.a_wins, pred.h2h.b_wins, pred.h2h.no_result
        ),
    ];
    frame.render_widget(Paragraph::new(lines.join("\n")).block(block), rows[0]);

    let bars = [
        Bar::default()
            .value(pred.p_team_a.round() as u64)
            .label(Line::from(team_code(&pred.team_a)))
            .style(Style::default().fg(Color::Green)),
        Bar::default()
            .value(pred.p_team_b.round() as u64)
            .label(Line::from(team_code(&pred.team_b)))
            .style(Style::default().fg(Color::Red)),
    ];
    let chart = BarChart::default()
        .block(Block::default().title("Win %").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(100);
    frame.render_widget(chart, rows[1]);
}

fn console_text(state: &AppState, height: u16) -> String {
    let take = height.max(1) as usize;
    let skip = state.logs.len().saturating_sub(take);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    let text = [
        "1 Matches  2 Teams  3 Toss  4 Predict",
        "",
        "j/k or arrows   move selection",
        "y / Y           next / previous year",
        "t / T           next / previous team",
        "c               clear filters",
        "a / b           change predicted teams",
        "x               export current view (xlsx)",
        "? / Esc         close help",
        "q               quit",
    ]
    .join("\n");
    frame.render_widget(Clear, popup);
    let help = Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
