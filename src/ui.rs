// ============================================
// src/ui.rs
// Terminal front end: input mapping, frame driver and drawing
// ============================================

use std::io::Result;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Gauge, Paragraph, Tabs, Wrap,
        canvas::{Canvas, Points},
    },
};

use crate::effects::Outcome;
use crate::game::{GameSession, MenuView, RoundView, Screen};
use crate::platform::{HostPlatform, SoundCue};

/// ~60 frames per second
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Canvas half-extent around the picture centre, in particle units
const IMAGE_EXTENT: f64 = 75.0;

const INSTRUCTIONS: &[&str] = &[
    "1. Pick a category with ← and →",
    "2. Press Enter to begin",
    "3. Look at the picture and choose the matching word with 1-4",
    "4. Every correct answer is a point",
    "5. A game is a fixed number of questions",
    "6. Press a to turn sounds on or off",
    "7. Press v to show word definitions",
    "8. Press d to change the difficulty:",
    "   - Easy: no timer, shorter words",
    "   - Normal: no timer, all words",
    "   - Hard: a timer on every question",
    "9. Have fun learning English!",
];

pub struct App {
    pub session: GameSession,
    pub platform: HostPlatform,
    /// Catalog problems found at startup
    pub warnings: Vec<String>,
    pub show_instructions: bool,
}

impl App {
    pub fn new(session: GameSession, platform: HostPlatform, warnings: Vec<String>) -> Self {
        Self {
            session,
            platform,
            warnings,
            show_instructions: false,
        }
    }

    /// Maps one key press to a game command. Returns false to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.show_instructions {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i' | 'q')) {
                self.show_instructions = false;
            }
            return true;
        }

        let session = &mut self.session;
        let platform = &mut self.platform;

        match code {
            KeyCode::Left => session.cycle_category(-1, platform),
            KeyCode::Right => session.cycle_category(1, platform),
            KeyCode::Char('d') => session.cycle_difficulty(platform),
            KeyCode::Char('a') => session.toggle_audio(platform),
            KeyCode::Char('v') => session.toggle_definitions(platform),
            KeyCode::Char('q') => {
                session.abandon(platform);
                return false;
            }
            KeyCode::Char(c @ '1'..='4') if session.is_running() => {
                let index = c as usize - '1' as usize;
                let word = session
                    .round()
                    .and_then(|r| r.options().get(index))
                    .cloned();
                if let Some(word) = word {
                    session.submit_answer(&word, platform);
                }
            }
            KeyCode::Esc if session.is_running() => session.abandon(platform),
            KeyCode::Esc => return false,
            KeyCode::Enter | KeyCode::Char(' ') if !session.is_running() => {
                session.start_session(platform)
            }
            KeyCode::Char('i') if !session.is_running() => self.show_instructions = true,
            _ => {}
        }
        true
    }
}

// --------------------------------------------------
// Frame driver
// --------------------------------------------------

pub fn run_app(terminal: &mut Terminal<impl Backend>, app: &mut App) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        app.session.on_tick(dt, &mut app.platform);

        terminal.draw(|f| ui(f, app))?;

        if event::poll(FRAME_TIME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    break;
                }
            }
        }
    }

    Ok(())
}

// --------------------------------------------------
// Drawing
// --------------------------------------------------

fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Fun English Learning");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    if app.show_instructions {
        draw_instructions(f, inner_area);
        return;
    }

    match app.session.view() {
        Screen::Menu(view) => draw_menu(
            f,
            inner_area,
            &view,
            &app.warnings,
            app.platform.save().games_played,
        ),
        Screen::Round(view) => draw_round(f, inner_area, &view, app.platform.last_cue()),
    }
}

fn tint_color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

fn draw_instructions(f: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from("How to Play").bold().centered(),
        Line::from(""),
    ];
    lines.extend(
        INSTRUCTIONS
            .iter()
            .map(|text| Line::from(*text).style(Style::default().fg(Color::LightBlue))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from("Esc: back").style(Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_menu(
    f: &mut Frame,
    area: Rect,
    view: &MenuView,
    warnings: &[String],
    games_played: u32,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // [0] title
            Constraint::Length(3), // [1] categories
            Constraint::Length(4), // [2] category / high score / last result
            Constraint::Length(1), // [3] settings
            Constraint::Min(1),    // [4] warnings
            Constraint::Length(1), // [5] keys
        ])
        .split(area);

    f.render_widget(
        Paragraph::new("Fun English Learning")
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[0],
    );

    let names: Vec<&str> = view.categories.iter().map(|c| c.name()).collect();
    let tabs = Tabs::new(names)
        .block(Block::default().borders(Borders::ALL).title("Category"))
        .select(view.selected)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    f.render_widget(tabs, chunks[1]);

    let current = view
        .categories
        .get(view.selected)
        .map(|c| c.name())
        .unwrap_or_default();
    let mut info = vec![
        Line::from(format!("Category: {current}")).centered(),
        Line::from(format!(
            "High Score: {}   Games: {games_played}",
            view.high_score
        ))
        .centered(),
    ];
    if let Some(summary) = view.summary {
        info.push(
            Line::from(summary.message())
                .style(Style::default().fg(Color::Yellow))
                .centered(),
        );
        info.push(
            Line::from(format!("Best streak: {}", summary.best_streak))
                .style(Style::default().fg(Color::Gray))
                .centered(),
        );
    }
    f.render_widget(Paragraph::new(info), chunks[2]);

    let settings = view.settings;
    f.render_widget(
        Paragraph::new(format!(
            "Diff: {}   Audio: {}   Define: {}",
            settings.difficulty,
            on_off(settings.audio_enabled),
            on_off(settings.show_definitions)
        ))
        .centered(),
        chunks[3],
    );

    let warning_lines: Vec<Line> = warnings
        .iter()
        .map(|w| Line::from(format!("skipped: {w}")).style(Style::default().fg(Color::Red)))
        .collect();
    f.render_widget(Paragraph::new(warning_lines).wrap(Wrap { trim: true }), chunks[4]);

    f.render_widget(
        Paragraph::new("←/→ category  Enter start  d difficulty  a audio  v define  i help  q quit")
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[5],
    );
}

fn draw_round(f: &mut Frame, area: Rect, view: &RoundView, last_cue: Option<&SoundCue>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] status
            Constraint::Length(1), // [1] timer
            Constraint::Min(6),    // [2] picture
            Constraint::Length(2), // [3] definition
            Constraint::Length(6), // [4] options
            Constraint::Length(1), // [5] feedback
            Constraint::Length(1), // [6] progress
            Constraint::Length(1), // [7] keys
        ])
        .split(area);

    // 0. status line
    let mut status = vec![
        Span::raw(format!("{}  ", view.category.name())),
        Span::raw(format!("Diff: {}  ", view.difficulty)),
        Span::styled(
            format!("Score: {}/{}", view.score, view.attempts),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if view.streak > 1 {
        status.push(Span::styled(
            format!("  Streak: {}!", view.streak),
            Style::default().fg(Color::LightRed).bold(),
        ));
    }
    if let Some(SoundCue::Word(word)) = last_cue {
        if view.settings.audio_enabled {
            status.push(Span::styled(
                format!("  ♪ {word}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    f.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

    // 1. timer (Hard only)
    if let (Some(fraction), Some(left)) = (view.timer_fraction, view.time_left) {
        // green → red as time runs out
        let red = (255.0 * (1.0 - fraction)) as u8;
        let green = (255.0 * fraction) as u8;
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Rgb(red, green, 0)).bg(Color::Black))
            .ratio(fraction)
            .label(format!("Time: {}s", left.ceil() as u32));
        f.render_widget(gauge, chunks[1]);
    }

    // 2. picture placeholder with particles on top
    let word = view.round.target().to_string();
    let particles = view.particles;
    let picture = Canvas::default()
        .block(Block::default().borders(Borders::ALL))
        .background_color(tint_color(view.category.word_tint(view.round.target())))
        .x_bounds([-IMAGE_EXTENT, IMAGE_EXTENT])
        .y_bounds([-IMAGE_EXTENT, IMAGE_EXTENT])
        .paint(move |ctx| {
            ctx.print(
                -(word.chars().count() as f64) * 2.5,
                0.0,
                Line::from(word.clone()).style(Style::default().fg(Color::Black).bold()),
            );
            ctx.layer();
            for p in particles {
                ctx.draw(&Points {
                    coords: &[(p.x, -p.y)],
                    color: tint_color(p.color),
                });
            }
        });
    f.render_widget(picture, chunks[2]);

    // 3. definition
    if let Some(definition) = view.definition {
        f.render_widget(
            Paragraph::new(definition)
                .style(Style::default().fg(Color::LightBlue))
                .centered()
                .wrap(Wrap { trim: true }),
            chunks[3],
        );
    }

    // 4. options, two by two
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(chunks[4]);
    for (i, option) in view.round.options().iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[i / 2]);
        let style = if !view.awaiting_answer && view.round.is_correct(option) {
            Style::default().fg(Color::Black).bg(Color::LightGreen)
        } else {
            Style::default().fg(Color::White)
        };
        f.render_widget(
            Paragraph::new(format!("[{}] {option}", i + 1))
                .style(style)
                .centered()
                .block(Block::default().borders(Borders::ALL)),
            cols[i % 2],
        );
    }

    // 5. feedback
    if let Some(feedback) = view.feedback {
        let color = match feedback.outcome {
            Outcome::Correct => Color::LightGreen,
            _ => Color::LightRed,
        };
        f.render_widget(
            Paragraph::new(feedback.message.as_str())
                .style(Style::default().fg(color).bold())
                .centered(),
            chunks[5],
        );
    }

    // 6. progress
    let ratio = if view.max_attempts > 0 {
        (view.attempts as f64 / view.max_attempts as f64).min(1.0)
    } else {
        0.0
    };
    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::Black))
        .ratio(ratio)
        .label(format!("{}/{}", view.attempts, view.max_attempts));
    f.render_widget(progress, chunks[6]);

    f.render_widget(
        Paragraph::new(format!(
            "1-4 answer  ←/→ category  a audio: {}  v define: {}  Esc menu",
            on_off(view.settings.audio_enabled),
            on_off(view.settings.show_definitions)
        ))
        .style(Style::default().fg(Color::DarkGray))
        .centered(),
        chunks[7],
    );
}
