mod cli;
mod logging;

use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glowfield_animations::{BackdropOptions, BackdropState};
use glowfield_config::{Config, default_config_path};
use glowfield_core::AnimationSpeed;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use tracing::info;

use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load_from(&config_path)
        .wrap_err_with(|| format!("loading {}", config_path.display()))?;
    cli.apply(&mut config);

    if cli.write_config {
        config.save_to(&config_path)?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    let log_path = logging::init(&config);
    info!(log = ?log_path, style = config.style.label(), seed = ?config.seed, "starting");

    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Are animations frozen?
    paused: bool,
    /// Show the key help line.
    show_help: bool,
    /// Current frame pacing.
    speed: AnimationSpeed,
    /// When the next animation frame is due.
    next_frame: Instant,
    /// Mounted backdrops.
    backdrop: BackdropState,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let options = BackdropOptions {
            pixel_scale: config.pixel_scale,
            vignette: config.vignette,
        };
        Self {
            running: false,
            paused: false,
            show_help: config.show_help,
            speed: config.speed,
            next_frame: Instant::now(),
            backdrop: BackdropState::new(config.style, options, rng),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let advance = self.frame_due();
            terminal.draw(|frame| self.render(frame, advance))?;
            let timeout = self.next_frame.saturating_duration_since(Instant::now());
            self.handle_crossterm_events(timeout)?;
        }
        let stopped = self.backdrop.unmount_all();
        info!(stopped, "shut down");
        Ok(())
    }

    /// Whether an animation frame is due, scheduling the next one if so.
    fn frame_due(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next_frame {
            return false;
        }
        self.next_frame = now + self.speed.frame_interval();
        true
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, advance: bool) {
        let area = frame.area();
        self.backdrop.render(frame, area, self.paused || !advance);

        if !self.show_help {
            return;
        }
        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let key = Color::Cyan;
        let mut status = format!(
            " {} · {}",
            self.backdrop.style().label(),
            self.speed.label()
        );
        if self.paused {
            status.push_str(" · paused");
        }
        let help = Line::from(vec![
            "q".bold().fg(key),
            " quit  ".dark_gray(),
            "space".bold().fg(key),
            " style  ".dark_gray(),
            "p".bold().fg(key),
            " pause  ".dark_gray(),
            "s".bold().fg(key),
            " speed  ".dark_gray(),
            "r".bold().fg(key),
            " reseed  ".dark_gray(),
            "v".bold().fg(key),
            " vignette  ".dark_gray(),
            "h".bold().fg(key),
            " help ".dark_gray(),
            status.gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most until the next frame is due.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // Resizes need no handling: the next draw picks up the new size.
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ') | KeyCode::Char('b')) => self.cycle_style(),
            (_, KeyCode::Char('p')) => self.paused = !self.paused,
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('r')) => self.backdrop.reseed(None),
            (_, KeyCode::Char('v')) => {
                let vignette = !self.backdrop.options().vignette;
                self.backdrop.set_vignette(vignette);
            }
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Cycle through the backdrop styles.
    fn cycle_style(&mut self) {
        let style = self.backdrop.style().next();
        self.backdrop.set_style(style);
    }

    /// Cycle through frame rates; takes effect from the next frame.
    fn cycle_speed(&mut self) {
        self.speed = self.speed.next();
        self.next_frame = Instant::now();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
