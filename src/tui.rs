use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::jobs::{self, JobFilter, JobMarkers};
use crate::models::{Job, JobType};
use crate::store::RecordStore;

struct AppState {
    jobs: Vec<Job>,
    markers: JobMarkers,
    filter: Option<JobType>,
    selected: usize,
    scroll_offset: u16,
    notice: Option<String>,
}

impl AppState {
    fn load(store: &impl RecordStore, filter: Option<JobType>) -> Result<Self> {
        let jobs = jobs::list_jobs(
            store,
            JobFilter {
                job_type: filter,
                ..Default::default()
            },
        )?;
        let markers = jobs::markers(store)?;
        Ok(Self {
            jobs,
            markers,
            filter,
            selected: 0,
            scroll_offset: 0,
            notice: None,
        })
    }

    fn current_job(&self) -> Option<&Job> {
        self.jobs.get(self.selected)
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn save_current(&mut self, store: &impl RecordStore) {
        let Some(job) = self.current_job() else { return };
        let id = job.id.clone();
        self.notice = Some(match jobs::save_job(store, &id) {
            Ok(job) => {
                self.markers.saved.insert(job.id);
                "Job saved.".to_string()
            }
            Err(e) => e.to_string(),
        });
    }

    fn unsave_current(&mut self, store: &impl RecordStore) {
        let Some(job) = self.current_job() else { return };
        let id = job.id.clone();
        self.notice = Some(match jobs::remove_saved_job(store, &id) {
            Ok(true) => {
                self.markers.saved.remove(&id);
                "Job removed from your saved list.".to_string()
            }
            Ok(false) => "That job is not in your saved list.".to_string(),
            Err(e) => e.to_string(),
        });
    }
}

fn next_filter(filter: Option<JobType>) -> Option<JobType> {
    match filter {
        None => Some(JobType::Job),
        Some(JobType::Job) => Some(JobType::Internship),
        Some(JobType::Internship) => None,
    }
}

pub fn run_browse(store: &impl RecordStore, filter: Option<JobType>) -> Result<()> {
    let mut state = AppState::load(store, filter)?;
    if state.jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    store: &impl RecordStore,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('s') => state.save_current(store),
                KeyCode::Char('u') => state.unsave_current(store),
                KeyCode::Char('t') => {
                    *state = AppState::load(store, next_filter(state.filter))?;
                }
                _ => {}
            }
            list_state.select(Some(state.selected));
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    // Left panel: job list
    let items: Vec<ListItem> = state
        .jobs
        .iter()
        .map(|job| {
            let saved = if state.markers.saved.contains(&job.id) { "*" } else { " " };
            let applied = if state.markers.applied.contains(&job.id) { "+" } else { " " };
            let title = if job.title.chars().count() > 30 {
                format!("{}...", job.title.chars().take(27).collect::<String>())
            } else {
                job.title.clone()
            };
            ListItem::new(format!("{}{} {} | {}", saved, applied, title, job.company))
        })
        .collect();

    let heading = match state.filter {
        Some(JobType::Job) => "Jobs",
        Some(JobType::Internship) => "Internships",
        None => "All Openings",
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ({}) ", heading, state.jobs.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = Paragraph::new(build_detail(state))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);

    // Footer: last notice, else help
    let footer = match &state.notice {
        Some(notice) => Paragraph::new(format!(" {}", notice)).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(
            " j/k:navigate  J/K:scroll  s:save u:unsave  t:job type  q:quit   (* saved, + applied)",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, rows[1]);
}

fn build_detail(state: &AppState) -> Text<'_> {
    let Some(job) = state.current_job() else {
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        &job.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));

    let type_style = match job.job_type {
        JobType::Job => Style::default().fg(Color::Cyan),
        JobType::Internship => Style::default().fg(Color::Green),
    };
    lines.push(Line::from(vec![
        Span::styled(job.job_type.to_string(), type_style),
        Span::raw(format!("  {}  {}  posted {}", job.work_mode, job.salary, job.posted_ago)),
    ]));

    if state.markers.applied.contains(&job.id) {
        lines.push(Line::from(Span::styled(
            "You have applied to this job.",
            Style::default().fg(Color::Cyan),
        )));
    }

    lines.push(Line::from(""));
    for line in textwrap::fill(&job.full_description, 70).lines() {
        lines.push(Line::from(line.to_string()));
    }

    Text::from(lines)
}
