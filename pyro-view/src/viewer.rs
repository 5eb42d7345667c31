//! Interactive firework viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (particle store, surface, configuration, quote) and implements
//! [`eframe::App`] to drive the simulation once per repaint and render
//! it alongside the quote-calculator side panel.

use eframe::App;
use glam::Vec2;
use pyro_core::{
    config::Config,
    phases::{self, StepStats},
    quote::{self, Mode, Pricing, Quote, Service},
    render::{self, Surface},
    store::ParticleStore,
};

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`ParticleStore`], [`Config`], [`Surface`].
/// - The quote widget state: [`Quote`].
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The per-frame update is:
/// 1. Handle UI interactions (clicks launch fireworks, sliders edit the
///    quote).
/// 2. If `running`, advance the store by the measured frame delta.
/// 3. Render the store into the surface and paint it as a texture.
pub struct Viewer {
    store: ParticleStore,
    cfg: Config,
    surface: Surface,
    texture: Option<egui::TextureHandle>,

    quote: Quote,

    rng: rand::rngs::ThreadRng,

    running: bool,
    show_quote: bool,
    show_details: bool,

    last_stats: StepStats,
}

impl Viewer {
    /// Creates a new viewer with an empty sky and an empty quote.
    ///
    /// The surface starts unsized; the first central-panel pass measures
    /// the available rect and allocates it. The simulation starts running
    /// so a click launches immediately.
    pub fn new() -> Self {
        Self {
            store: ParticleStore::new(),
            cfg: Config::default(),
            surface: Surface::new(),
            texture: None,
            quote: Quote::new(),
            rng: rand::rng(),
            running: true,
            show_quote: true,
            show_details: true,
            last_stats: StepStats::default(),
        }
    }

    /// Removes every live particle; the trail buffer fades out on its own.
    fn clear(&mut self) {
        self.store.clear();
        self.last_stats = StepStats::default();
    }

    /// Launches a firework at a canvas position.
    fn spawn_at(&mut self, at: Vec2) {
        phases::spawn_firework(&mut self.store, &self.cfg, at, &mut self.rng);
        log::debug!(
            "launch at ({:.0}, {:.0}), {} particles live",
            at.x,
            at.y,
            self.store.len()
        );
    }

    /// Converts a screen-space pointer position to canvas coordinates.
    ///
    /// The particle simulation runs in logical points with the origin at
    /// the canvas rect's top-left corner, so a window resize or panel
    /// toggle never rescales existing particles.
    fn canvas_pos(rect: egui::Rect, pointer: egui::Pos2) -> Vec2 {
        Vec2::new(pointer.x - rect.min.x, pointer.y - rect.min.y)
    }

    /// Builds the top panel UI (run controls, effect tuning).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                ui.add(
                    egui::Slider::new(&mut self.cfg.trail_fade, 0.02..=0.4).text("Trail fade"),
                );
                ui.add(
                    egui::DragValue::new(&mut self.cfg.max_particles)
                        .prefix("max particles = ")
                        .range(500..=20_000)
                        .speed(50),
                );

                ui.separator();
                ui.checkbox(&mut self.show_quote, "Quote panel");
                ui.label("Click the sky to launch a firework.");
            });
        });
    }

    /// Builds the bottom status bar (live counts, last-frame stats).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("sparks = {}", self.store.spark_count()));
                ui.label(format!("rockets = {}", self.store.rocket_count()));
                ui.separator();
                ui.label(format!("bursts/frame = {}", self.last_stats.explosions));
                ui.label(format!(
                    "glitter/frame = {}",
                    self.last_stats.glitter_children
                ));
            });
        });
    }

    /// One service row in the quote panel: name, live price line, warning
    /// and the quantity slider.
    fn ui_service_row(&mut self, ui: &mut egui::Ui, service: &'static Service) {
        let mut qty = self.quote.qty(service.id);
        let line = quote::compute_line(service, qty);

        ui.label(egui::RichText::new(service.name).strong());

        let price_text = match service.pricing {
            Pricing::Tiered(tiers) => {
                let first = tiers.first().map_or(0.0, |t| t.price);
                if qty == 0 {
                    format!("From {}/{}", quote::format_money(first), service.unit)
                } else {
                    format!(
                        "{}/{}  Tier: {}",
                        quote::format_money(line.unit_price),
                        service.unit,
                        line.tier_label.unwrap_or("-")
                    )
                }
            }
            Pricing::Flat(_) => {
                format!("{}/{}", quote::format_money(line.unit_price), service.unit)
            }
        };
        ui.weak(price_text);

        if let Some(warning) = line.warning {
            ui.colored_label(egui::Color32::YELLOW, warning);
        }

        if ui
            .add(egui::Slider::new(&mut qty, 0..=service.slider_max))
            .changed()
        {
            self.quote.set_qty(service.id, qty);
        }

        if let Some(note) = service.note {
            ui.weak(note);
        }
        ui.add_space(6.0);
    }

    /// The quote summary: one row per non-zero line, grand total and the
    /// competitor comparison.
    fn ui_quote_summary(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Summary").strong());
            if ui
                .button(if self.show_details {
                    "Hide details"
                } else {
                    "Show details"
                })
                .clicked()
            {
                self.show_details = !self.show_details;
            }
            if ui.button("Reset").clicked() {
                self.quote.reset();
            }
        });

        let lines = self.quote.lines();

        if self.show_details {
            if lines.is_empty() {
                ui.weak("Add quantities to see a breakdown.");
            }
            for l in &lines {
                let detail = match (l.packs, &l.service.pricing) {
                    (Some(packs), _) => format!(
                        "{} packs (pack size: {}) × {}",
                        packs,
                        l.qty,
                        quote::format_money(l.line.unit_price)
                    ),
                    (None, Pricing::Tiered(_)) => format!(
                        "{} × {} / {}  Tier {}",
                        l.qty,
                        quote::format_money(l.line.unit_price),
                        l.service.unit,
                        l.line.tier_label.unwrap_or("-")
                    ),
                    (None, Pricing::Flat(_)) => format!(
                        "{} × {} / {}",
                        l.qty,
                        quote::format_money(l.line.unit_price),
                        l.service.unit
                    ),
                };

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(l.service.name);
                        ui.weak(detail);
                    });
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            ui.label(quote::format_money(l.line.subtotal));
                        },
                    );
                });
            }
        }

        ui.separator();
        let grand = self.quote.grand_total();
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Total").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(quote::format_money(grand)).strong());
            });
        });

        if grand > 0.0 {
            ui.separator();
            ui.label(egui::RichText::new("Compared to").strong());
            for c in self.quote.comparisons() {
                ui.horizontal(|ui| {
                    ui.label(c.name);
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            ui.label(format!("Save {}", quote::format_money(c.savings)));
                            ui.weak(quote::format_money(c.total));
                        },
                    );
                });
            }
            ui.weak(
                "This is an estimate. Final pricing may vary based on item \
                 condition, special handling, or custom requests.",
            );
        }
    }

    /// Builds the right-hand quote calculator panel.
    fn ui_quote_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("quote_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Quote Calculator");

                ui.horizontal(|ui| {
                    for mode in [Mode::Fba, Mode::Fbm] {
                        if ui
                            .selectable_label(self.quote.mode == mode, mode.label())
                            .clicked()
                        {
                            self.quote.mode = mode;
                        }
                    }
                    ui.weak("Small Standard");
                });

                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    let services: Vec<&'static Service> = self.quote.services().collect();
                    for service in services {
                        self.ui_service_row(ui, service);
                    }

                    ui.separator();
                    self.ui_quote_summary(ui);
                });
            });
    }

    /// Builds the central canvas: launches on click, steps the simulation
    /// and paints the rendered surface.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
            let rect = response.rect;

            if response.clicked()
                && let Some(pointer) = response.interact_pointer_pos()
            {
                self.spawn_at(Self::canvas_pos(rect, pointer));
            }

            // Re-acquire the drawable size and device pixel ratio when
            // either changes; particle coordinates stay logical.
            let logical = Vec2::new(rect.width(), rect.height());
            let ppp = ctx.pixels_per_point();
            if !self.surface.matches(logical, ppp) {
                self.surface.resize(logical, ppp, self.cfg.background);
                log::info!(
                    "surface resized to {}x{} at scale {}",
                    self.surface.width(),
                    self.surface.height(),
                    self.surface.scale()
                );
            }

            if self.running {
                let dt = ctx.input(|i| i.stable_dt);
                self.last_stats =
                    phases::step_phase(&mut self.store, &self.cfg, dt, &mut self.rng);
            }

            render::render_phase(&self.store, &self.cfg, &mut self.surface);

            if !self.surface.is_empty() {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [self.surface.width(), self.surface.height()],
                    self.surface.pixels(),
                );
                match &mut self.texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("fireworks", image, egui::TextureOptions::LINEAR));
                    }
                }
                if let Some(texture) = &self.texture {
                    ui.painter_at(rect).image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            }

            // Keep animating while running, even without input events.
            if self.running {
                ctx.request_repaint();
            }
        });
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        if self.show_quote {
            self.ui_quote_panel(ctx);
        }
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(40.0, 24.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn canvas_pos_is_relative_to_rect_origin() {
        let rect = test_rect();

        let at = Viewer::canvas_pos(rect, egui::Pos2::new(40.0, 24.0));
        assert_eq!(at, Vec2::ZERO);

        let at = Viewer::canvas_pos(rect, egui::Pos2::new(140.0, 324.0));
        assert_eq!(at, Vec2::new(100.0, 300.0));
    }

    #[test]
    fn new_viewer_starts_empty_and_running() {
        let viewer = Viewer::new();
        assert!(viewer.store.is_empty());
        assert!(viewer.surface.is_empty());
        assert!(viewer.running);
        assert_eq!(viewer.quote.grand_total(), 0.0);
    }

    #[test]
    fn spawn_at_launches_one_or_two_rockets() {
        let mut viewer = Viewer::new();
        viewer.spawn_at(Vec2::new(200.0, 400.0));

        let n = viewer.store.rocket_count();
        assert!(n == 1 || n == 2, "expected a launch, got {n} rockets");
        assert_eq!(viewer.store.spark_count(), 0);
    }

    #[test]
    fn clear_removes_all_particles() {
        let mut viewer = Viewer::new();
        viewer.spawn_at(Vec2::new(200.0, 400.0));
        assert!(!viewer.store.is_empty());

        viewer.clear();
        assert!(viewer.store.is_empty());
        assert_eq!(viewer.last_stats, StepStats::default());
    }

    #[test]
    fn stepping_a_launch_eventually_fills_the_sky_with_sparks() {
        let mut viewer = Viewer::new();
        viewer.spawn_at(Vec2::new(200.0, 500.0));

        // Drive the simulation directly; rockets must resolve within
        // their lifetime and leave only sparks behind.
        for _ in 0..120 {
            viewer.last_stats = phases::step_phase(
                &mut viewer.store,
                &viewer.cfg,
                1.0 / 60.0,
                &mut viewer.rng,
            );
            if viewer.store.rocket_count() == 0 {
                break;
            }
        }

        assert_eq!(viewer.store.rocket_count(), 0);
        assert!(viewer.store.spark_count() >= 185);
    }
}
