//! Watch-mode orchestrator
//!
//! Owns the watch session: registers the data and config watchers, runs
//! one full placement-and-paint pass per trigger event, and deregisters
//! every watcher on shutdown. Each pass is synchronous and owns its own
//! placement registry; a new trigger simply starts a fresh pass after
//! the previous one finished.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::events::{self, Event, EventHandler, EventResult, WatchGuard};
use crate::data;
use crate::fonts::LoadedFont;
use crate::layout;
use crate::render::{Canvas, CloudPainter};
use crate::theme::Theme;

pub struct App {
    config: Config,
    config_path: Option<PathBuf>,
    data_path: PathBuf,
    out_path: PathBuf,
    theme: Theme,
    font: Option<LoadedFont>,
    event_tx: mpsc::UnboundedSender<Event>,
    watchers: Vec<WatchGuard>,
}

impl App {
    pub fn new(
        data_path: PathBuf,
        out_path: PathBuf,
        config: Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        let theme = Theme::from_name(&config.display.theme);

        // A missing font means there is no drawing surface; passes are
        // skipped rather than failing the session.
        let font = match LoadedFont::resolve(&config.font) {
            Ok(font) => {
                info!(family = font.family(), "font loaded");
                Some(font)
            }
            Err(error) => {
                warn!(%error, "no usable font, passes will be skipped");
                None
            }
        };

        // Placeholder sender - replaced in run()
        let (event_tx, _) = mpsc::unbounded_channel::<Event>();

        Self {
            config,
            config_path,
            data_path,
            out_path,
            theme,
            font,
            event_tx,
            watchers: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (mut event_handler, event_tx) = EventHandler::new();
        self.event_tx = event_tx.clone();

        let debounce = Duration::from_millis(self.config.watch.debounce_ms);
        self.watchers.push(events::watch_file(
            &self.data_path,
            debounce,
            event_tx.clone(),
            Event::DataChanged,
        )?);
        if let Some(config_path) = self.config_path.clone() {
            self.watchers.push(events::watch_file(
                &config_path,
                debounce,
                event_tx.clone(),
                Event::ConfigChanged,
            )?);
        }
        events::spawn_quit_source(event_tx);

        info!(
            data = %self.data_path.display(),
            out = %self.out_path.display(),
            "watch session started"
        );

        // Initial pass before the first trigger
        self.run_pass();

        let result = self.event_loop(&mut event_handler).await;
        self.shutdown();
        result
    }

    async fn event_loop(&mut self, event_handler: &mut EventHandler) -> Result<()> {
        loop {
            let Some(event) = event_handler.next().await else {
                break;
            };

            match self.handle_event(event) {
                EventResult::Continue => {}
                EventResult::Quit => break,
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::DataChanged => {
                info!("trend data changed");
                self.run_pass();
            }
            Event::ThemeChanged => {
                self.theme = Theme::from_name(&self.config.display.theme);
                info!(theme = %self.theme.name, "theme changed");
                self.run_pass();
            }
            Event::Resized(width, height) => {
                info!(width, height, "canvas resized");
                self.run_pass();
            }
            Event::ConfigChanged => self.reload_config(),
            Event::Quit => return EventResult::Quit,
        }
        EventResult::Continue
    }

    /// Reload the config file and re-emit the specific trigger it implies
    fn reload_config(&mut self) {
        let Some(config_path) = self.config_path.clone() else {
            return;
        };
        let next = match Config::load(&config_path) {
            Ok(config) => config,
            Err(error) => {
                warn!(%error, "config reload failed, keeping previous settings");
                return;
            }
        };

        let theme_changed = next.display.theme != self.config.display.theme;
        let resized = next.display.width != self.config.display.width
            || next.display.height != self.config.display.height;
        let font_changed = next.font != self.config.font;

        if font_changed {
            match LoadedFont::resolve(&next.font) {
                Ok(font) => self.font = Some(font),
                Err(error) => {
                    warn!(%error, "new font unusable, passes will be skipped");
                    self.font = None;
                }
            }
        }

        let (width, height) = (next.display.width, next.display.height);
        self.config = next;

        if theme_changed {
            let _ = self.event_tx.send(Event::ThemeChanged);
        }
        if resized {
            let _ = self.event_tx.send(Event::Resized(width, height));
        }
        if !theme_changed && !resized {
            // Some other knob moved (padding, seed, font); re-render once
            self.run_pass();
        }
    }

    /// One synchronous placement-and-paint pass
    ///
    /// Never fails the session: a missing surface or unreadable data file
    /// skips the pass with a warning.
    fn run_pass(&mut self) {
        let Some(font) = self.font.as_ref() else {
            warn!("skipping pass: no drawing surface");
            return;
        };

        let records = match data::load_records(&self.data_path) {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "skipping pass: trend data unreadable");
                return;
            }
        };
        let words = data::normalize(&records);

        let canvas_size = self.config.display.canvas();
        let params = self.config.cloud.params();
        let mut rng = layout::pass_rng(self.config.cloud.seed);
        let placements = layout::layout_words(&words, canvas_size, &params, font, &mut rng);

        let mut canvas = Canvas::new(canvas_size);
        CloudPainter::new(font, &self.theme).paint(&mut canvas, &placements);

        if let Err(error) = canvas.save_png(&self.out_path) {
            warn!(%error, "failed to write output image");
            return;
        }

        info!(
            placed = placements.len(),
            total = words.len(),
            out = %self.out_path.display(),
            "word cloud rendered"
        );
    }

    /// Deregister every watcher before the session ends
    fn shutdown(&mut self) {
        for guard in self.watchers.drain(..) {
            guard.stop();
        }
        info!("watch session ended");
    }
}
