//! History sidebar listing recently tagged files

use eframe::egui::{self, Color32, ColorImage, RichText, ScrollArea, TextureHandle, Vec2};
use std::collections::HashMap;
use tagger_store::HistoryStore;

/// Panel showing the capped tagging history with thumbnails
pub struct HistoryPanel {
    /// Cached textures keyed by entry id; None marks a failed decode
    textures: HashMap<i64, Option<TextureHandle>>,
}

impl HistoryPanel {
    /// Create a new history panel
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Decode an entry's base64 thumbnail into a texture, caching the result.
    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        id: i64,
        thumbnail_base64: Option<&str>,
    ) -> Option<TextureHandle> {
        if let Some(cached) = self.textures.get(&id) {
            return cached.clone();
        }

        let texture = thumbnail_base64.and_then(|base64_data| {
            use base64::{engine::general_purpose::STANDARD, Engine};

            // Strip a data URL prefix if present
            let data = if base64_data.contains(',') {
                base64_data.split(',').nth(1).unwrap_or(base64_data)
            } else {
                base64_data
            };

            let bytes = STANDARD.decode(data).ok()?;
            let img = image::load_from_memory(&bytes).ok()?;
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.into_raw();
            let color_image = ColorImage::from_rgba_unmultiplied(size, &pixels);

            Some(ctx.load_texture(format!("history-{id}"), color_image, Default::default()))
        });

        self.textures.insert(id, texture.clone());
        texture
    }

    /// Render the panel UI
    pub fn ui(&mut self, ui: &mut egui::Ui, history: &mut HistoryStore) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("History").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = !history.is_empty();
                if ui.add_enabled(enabled, egui::Button::new("Clear")).clicked() {
                    history.clear();
                    self.textures.clear();
                }
            });
        });
        ui.separator();

        if history.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("No tagged files yet").color(Color32::GRAY));
            });
            return;
        }

        // Snapshot what we need so the borrow ends before texture lookups
        let rows: Vec<(i64, String, String, String, Option<String>)> = history
            .entries()
            .iter()
            .map(|e| {
                (
                    e.id,
                    e.filename.clone(),
                    e.tone.clone(),
                    e.timestamp_display(),
                    e.thumbnail_base64.clone(),
                )
            })
            .collect();

        ScrollArea::vertical().show(ui, |ui| {
            for (id, filename, tone, timestamp, thumbnail) in rows {
                let texture = self.texture_for(ui.ctx(), id, thumbnail.as_deref());

                ui.horizontal(|ui| {
                    match texture {
                        Some(texture) => {
                            ui.add(
                                egui::Image::new(&texture)
                                    .fit_to_exact_size(Vec2::new(48.0, 48.0)),
                            );
                        }
                        None => {
                            let (rect, _) =
                                ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                            ui.painter().rect_filled(rect, 4.0, Color32::from_gray(45));
                        }
                    }

                    ui.vertical(|ui| {
                        ui.label(RichText::new(filename).strong().size(12.0));
                        ui.label(RichText::new(tone).size(11.0));
                        ui.label(
                            RichText::new(timestamp)
                                .size(10.0)
                                .color(Color32::GRAY),
                        );
                    });
                });
                ui.add_space(4.0);
                ui.separator();
            }
        });
    }
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new()
    }
}
