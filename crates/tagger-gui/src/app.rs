//! Main application window: custom chrome, drop zone, options, status

use eframe::egui::{self, Color32, RichText, ViewportCommand};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tagger_app::thumbnail::create_thumbnail;
use tagger_app::{scan, Config, Tagger};
use tagger_store::{HistoryStore, OptionsStore};
use tagger_types::{HistoryEntry, OptionsState, TagOutcome};

use crate::history_panel::HistoryPanel;

const IDLE_STATUS: &str = "Ready to tag";
const STATUS_REVERT_AFTER: Duration = Duration::from_secs(3);

/// Event from the tagging thread
#[derive(Debug)]
pub enum TagEvent {
    /// A file finished (one way or another)
    Progress {
        done: usize,
        total: usize,
        message: String,
    },
    /// Tags were written; record for the history sidebar
    Tagged(HistoryEntry),
    /// The whole batch finished
    Finished { message: String },
}

/// Main application state
pub struct TaggerApp {
    config: Config,
    history: HistoryStore,
    options_store: OptionsStore,
    /// Working copy of the toggles bound to the checkboxes
    options: OptionsState,
    history_panel: HistoryPanel,

    status: String,
    /// When set, revert `status` to idle once the delay has passed
    status_set_at: Option<Instant>,
    progress: Option<(usize, usize)>,
    is_tagging: bool,
    event_receiver: Option<Receiver<TagEvent>>,
}

impl TaggerApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.interaction.tooltip_delay = 0.5;
        style.animation_time = 0.1;
        cc.egui_ctx.set_style(style);

        let config = Config::load().unwrap_or_default();

        let data_dir = config
            .data_dir()
            .unwrap_or_else(|_| std::env::temp_dir().join("gr-tagger"));
        let mut history = HistoryStore::open(&data_dir).unwrap_or_else(|_| {
            let fallback = std::env::temp_dir().join("gr-tagger-fallback");
            HistoryStore::open(&fallback).expect("Failed to create fallback history store")
        });
        let options_store = OptionsStore::open(&data_dir).unwrap_or_else(|_| {
            let fallback = std::env::temp_dir().join("gr-tagger-fallback");
            OptionsStore::open(&fallback).expect("Failed to create fallback options store")
        });

        // Drop stale entries and regenerate lost previews on startup
        let thumbnail_px = config.thumbnail_px;
        history.heal(
            |path| path.exists(),
            |path| create_thumbnail(path, thumbnail_px),
        );

        let options = options_store.state();

        Self {
            config,
            history,
            options_store,
            options,
            history_panel: HistoryPanel::new(),
            status: IDLE_STATUS.to_string(),
            status_set_at: None,
            progress: None,
            is_tagging: false,
            event_receiver: None,
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
        self.status_set_at = Some(Instant::now());
    }

    /// Revert a finished-batch status line back to the idle prompt.
    fn tick_status(&mut self, ctx: &egui::Context) {
        if self.is_tagging {
            return;
        }
        if let Some(set_at) = self.status_set_at {
            let elapsed = set_at.elapsed();
            if elapsed >= STATUS_REVERT_AFTER {
                self.status = IDLE_STATUS.to_string();
                self.status_set_at = None;
                self.progress = None;
            } else {
                ctx.request_repaint_after(STATUS_REVERT_AFTER - elapsed);
            }
        }
    }

    /// Drain events from the tagging thread
    fn poll_events(&mut self, ctx: &egui::Context) {
        let Some(receiver) = self.event_receiver.take() else {
            return;
        };

        let mut finished = false;
        loop {
            match receiver.try_recv() {
                Ok(TagEvent::Progress {
                    done,
                    total,
                    message,
                }) => {
                    self.progress = Some((done, total));
                    self.status = message;
                    self.status_set_at = None;
                }
                Ok(TagEvent::Tagged(entry)) => {
                    self.history.append(entry);
                }
                Ok(TagEvent::Finished { message }) => {
                    self.is_tagging = false;
                    finished = true;
                    self.set_status(message);
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => {
                    ctx.request_repaint();
                    break;
                }
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    if !finished {
                        self.is_tagging = false;
                        self.set_status("Tagging thread exited unexpectedly".to_string());
                    }
                    return;
                }
            }
        }

        if !finished {
            self.event_receiver = Some(receiver);
        }
    }

    /// Kick off a background batch over the given paths.
    fn start_tagging(&mut self, images: Vec<PathBuf>) {
        if self.is_tagging || images.is_empty() {
            return;
        }

        self.is_tagging = true;
        self.progress = Some((0, images.len()));
        self.status = format!("Tagging {} files...", images.len());
        self.status_set_at = None;

        let (sender, receiver): (Sender<TagEvent>, Receiver<TagEvent>) = channel();
        self.event_receiver = Some(receiver);

        let config = self.config.clone();
        let options = self.options;

        thread::spawn(move || {
            run_batch(sender, config, options, images);
        });
    }

    /// Accept a dropped or picked set of paths.
    fn handle_paths(&mut self, paths: Vec<PathBuf>) {
        let images = scan::filter_jpegs(&paths);
        if images.is_empty() {
            self.set_status("No JPEG images found".to_string());
        } else {
            self.start_tagging(images);
        }
    }

    fn render_title_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("title_bar")
            .exact_height(32.0)
            .show(ctx, |ui| {
                let bar_response = ui.interact(
                    ui.max_rect(),
                    ui.id().with("drag_region"),
                    egui::Sense::click_and_drag(),
                );
                if bar_response.drag_started() {
                    ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                }

                ui.horizontal_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new("GR Tagger").strong());
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("v{}", tagger_app::version()))
                            .small()
                            .color(Color32::GRAY),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(4.0);
                        if ui.button("✕").clicked() {
                            ctx.send_viewport_cmd(ViewportCommand::Close);
                        }
                        if ui.button("🗗").clicked() {
                            let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
                            ctx.send_viewport_cmd(ViewportCommand::Maximized(!maximized));
                        }
                        if ui.button("🗕").clicked() {
                            ctx.send_viewport_cmd(ViewportCommand::Minimized(true));
                        }
                    });
                });
            });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());

        let fill = if hovering_files {
            Color32::from_rgb(30, 50, 70)
        } else {
            Color32::from_gray(28)
        };
        let stroke_color = if hovering_files {
            Color32::LIGHT_BLUE
        } else {
            Color32::from_gray(80)
        };

        egui::Frame::new()
            .fill(fill)
            .stroke(egui::Stroke::new(1.5, stroke_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_height(140.0);
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);

                    if self.is_tagging {
                        ui.spinner();
                        ui.add_space(6.0);
                    }

                    ui.label(RichText::new(&self.status).size(15.0));
                    if !self.is_tagging && self.progress.is_none() {
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new("Drop GR JPEGs or folders here")
                                .color(Color32::GRAY),
                        );
                    }

                    if let Some((done, total)) = self.progress {
                        ui.add_space(8.0);
                        let fraction = if total == 0 {
                            0.0
                        } else {
                            done as f32 / total as f32
                        };
                        ui.add(
                            egui::ProgressBar::new(fraction)
                                .desired_width(280.0)
                                .text(format!("{done}/{total}")),
                        );
                    }

                    ui.add_space(12.0);
                    let enabled = !self.is_tagging;
                    if ui
                        .add_enabled(enabled, egui::Button::new("Select folder..."))
                        .clicked()
                    {
                        if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                            self.handle_paths(vec![folder]);
                        }
                    }
                    ui.add_space(16.0);
                });
            });

        // Files dropped anywhere on the window start a batch
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() && !self.is_tagging {
            self.handle_paths(dropped);
        }
    }

    fn render_options(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Descriptor tags").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.options.ev, "EV");
            ui.add_space(8.0);
            ui.checkbox(&mut self.options.iso, "ISO");
            ui.add_space(8.0);
            ui.checkbox(&mut self.options.wb, "WB");
        });

        // Persist checkbox changes as they happen
        self.options_store.replace(self.options);
    }
}

impl eframe::App for TaggerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);
        self.tick_status(ctx);

        self.render_title_bar(ctx);

        egui::SidePanel::right("history")
            .default_width(240.0)
            .show(ctx, |ui| {
                self.history_panel.ui(ui, &mut self.history);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_drop_zone(ui, ctx);
            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);
            self.render_options(ui);
        });
    }
}

/// Tag a batch on the worker thread, reporting through `sender`.
fn run_batch(sender: Sender<TagEvent>, config: Config, options: OptionsState, images: Vec<PathBuf>) {
    let tagger = match config.exiftool() {
        Ok(tool) => Tagger::new(tool),
        Err(e) => {
            let _ = sender.send(TagEvent::Finished {
                message: e.to_string(),
            });
            return;
        }
    };

    let total = images.len();
    let thumbnail_px = config.thumbnail_px;

    let summary = tagger.tag_batch(&images, &options, |index, report| {
        let _ = sender.send(TagEvent::Progress {
            done: index + 1,
            total,
            message: report.message(),
        });

        if let Ok(TagOutcome::Applied { tone, tags }) = &report.result {
            let thumbnail = create_thumbnail(&report.path, thumbnail_px);
            let entry = HistoryEntry::new(&report.path, tone.clone(), tags.clone(), thumbnail);
            let _ = sender.send(TagEvent::Tagged(entry));
        }
    });

    let _ = sender.send(TagEvent::Finished {
        message: summary.message(),
    });
}
