use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender};
use deck_core::{session::Transition, DeckSnapshot, InputEvent, Settings};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::{Item, ItemId, Phase, SwipeDirection};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::SessionView;
use crate::media::PreviewImage;
use crate::ui::card::{card_transform, DragOffset, ExitAnimation};

const CARD_SIZE: egui::Vec2 = egui::vec2(300.0, 400.0);
const THUMB_SIZE: egui::Vec2 = egui::vec2(80.0, 40.0);
const SUMMARY_THUMB_SIZE: egui::Vec2 = egui::vec2(96.0, 96.0);
const CARD_ROUNDING: f32 = 16.0;

enum CardImage {
    Loading,
    Ready {
        image: PreviewImage,
        texture: Option<TextureHandle>,
    },
    Failed(String),
}

pub struct DeckGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    settings: Settings,

    session: SessionView,
    images: HashMap<ItemId, CardImage>,
    drag: DragOffset,
    exit: Option<ExitAnimation>,

    status: String,
    status_banner: Option<UiError>,
}

impl DeckGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, settings: Settings) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            session: SessionView::new(&settings),
            settings,
            images: HashMap::new(),
            drag: DragOffset::default(),
            exit: None,
            status: "Loading cats...".to_string(),
            status_banner: None,
        };
        app.start_session();
        app
    }

    /// Discards the deck, liked set, textures and any running animation, then
    /// requests a fresh deck.
    fn start_session(&mut self) {
        let generation = self.session.restart();
        self.images.clear();
        self.drag.snap_back();
        self.exit = None;
        self.status = "Loading cats...".to_string();
        tracing::info!(generation = generation.0, "requesting new deck");
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::LoadDeck {
                generation,
                count: self.settings.deck_size,
            },
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if !self.session.accepts(&event) {
                continue;
            }
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::DeckLoaded { generation, deck } => {
                    if self.session.install_deck(generation, deck) {
                        self.status.clear();
                    }
                }
                UiEvent::ImageLoaded { item_id, image, .. } => {
                    self.images.insert(
                        item_id,
                        CardImage::Ready {
                            image,
                            texture: None,
                        },
                    );
                }
                UiEvent::ImageFailed { item_id, error, .. } => {
                    tracing::debug!(
                        %item_id,
                        category = err_label(error.category()),
                        context = ?error.context(),
                        "{}",
                        error.message()
                    );
                    self.images
                        .insert(item_id, CardImage::Failed(error.message().to_string()));
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status_banner = Some(err);
                }
            }
        }
    }

    /// Issues downloads for the visible cards that have not been requested yet.
    fn request_visible_images(&mut self) {
        let generation = self.session.generation();
        let Some(controller) = self.session.controller() else {
            return;
        };
        let snapshot = controller.snapshot();
        let wanted: Vec<Item> = snapshot
            .current_item
            .into_iter()
            .chain(snapshot.upcoming_items)
            .chain(snapshot.liked_items)
            .filter(|item| !self.images.contains_key(&item.id))
            .cloned()
            .collect();

        for item in wanted {
            let queued = dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::FetchImage {
                    generation,
                    item_id: item.id.clone(),
                    url: item.image_url.clone(),
                },
                &mut self.status,
            );
            if queued {
                self.images.insert(item.id, CardImage::Loading);
            }
        }
    }

    fn texture_for(&mut self, ctx: &egui::Context, item_id: &ItemId) -> Option<TextureHandle> {
        match self.images.get_mut(item_id)? {
            CardImage::Ready { image, texture } => {
                if texture.is_none() {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    *texture = Some(ctx.load_texture(
                        format!("card_{item_id}"),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                texture.clone()
            }
            CardImage::Loading | CardImage::Failed(_) => None,
        }
    }

    fn image_failure(&self, item_id: &ItemId) -> Option<&str> {
        match self.images.get(item_id) {
            Some(CardImage::Failed(reason)) => Some(reason),
            _ => None,
        }
    }

    fn apply_input(&mut self, event: InputEvent) {
        let from_dx = match event {
            InputEvent::DragReleased { dx } => dx,
            InputEvent::ButtonPressed(direction) => deck_core::gesture::button_exit_offset(direction),
            InputEvent::DragStarted => 0.0,
        };
        let Some(controller) = self.session.controller_mut() else {
            return;
        };
        let departing = controller.current().map(|item| item.id.clone());
        let Some(transition) = controller.handle(event) else {
            return;
        };

        match transition {
            Transition::Advanced { decision, .. } => {
                self.drag.snap_back();
                if let Some(item_id) = departing {
                    self.exit = Some(ExitAnimation::start(
                        item_id,
                        decision,
                        from_dx,
                        self.settings.exit_animation(),
                        Instant::now(),
                    ));
                }
            }
            Transition::SnappedBack | Transition::Ignored => self.drag.snap_back(),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("{} error: {}", err_label(err.category()), err.message()),
                    );
                    if ui.small_button("Dismiss").clicked() {
                        self.status_banner = None;
                    }
                });
            });
    }

    fn paint_card(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        item: &Item,
        label: Option<&str>,
        dx: f32,
    ) {
        let transform = card_transform(dx);
        let rect = rect.translate(egui::vec2(dx, 0.0));
        let tint = egui::Color32::WHITE.gamma_multiply(transform.opacity);

        match self.texture_for(ui.ctx(), &item.id) {
            Some(texture) => {
                egui::Image::new(&texture)
                    .maintain_aspect_ratio(false)
                    .corner_radius(CARD_ROUNDING)
                    .rotate(transform.rotation_deg.to_radians(), egui::Vec2::splat(0.5))
                    .tint(tint)
                    .paint_at(ui, rect);
            }
            None => {
                let painter = ui.painter();
                painter.rect_filled(
                    rect,
                    CARD_ROUNDING,
                    ui.visuals().faint_bg_color.gamma_multiply(transform.opacity),
                );
                let text = match self.image_failure(&item.id) {
                    Some(_) => format!("🐱 {}", placeholder_caption(item)),
                    None => "Fetching picture…".to_string(),
                };
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(18.0),
                    ui.visuals().weak_text_color().gamma_multiply(transform.opacity),
                );
            }
        }

        if let Some(label) = label {
            let badge = egui::Rect::from_min_size(
                rect.left_bottom() + egui::vec2(12.0, -36.0),
                egui::vec2(96.0, 24.0),
            );
            let painter = ui.painter();
            painter.rect_filled(badge, 12.0, egui::Color32::from_black_alpha(100));
            painter.text(
                badge.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }
    }

    fn show_card_stack(&mut self, ui: &mut egui::Ui, snapshot: &DeckSnapshot<'_>) {
        let (rect, response) = ui.allocate_exact_size(CARD_SIZE, egui::Sense::click_and_drag());
        let now = Instant::now();

        if let Some(exit) = self.exit.clone() {
            if exit.is_finished(now) {
                self.exit = None;
            } else if let Some(item) = self
                .session
                .controller()
                .and_then(|c| c.deck().items().iter().find(|item| item.id == exit.item_id))
                .cloned()
            {
                self.paint_card(ui, rect, &item, None, exit.offset(now));
            }
        }

        let Some(current) = snapshot.current_item.cloned() else {
            return;
        };

        if response.drag_started() {
            self.apply_input(InputEvent::DragStarted);
        }
        if response.dragged() {
            self.drag.accumulate(response.drag_delta().x);
        }
        if response.drag_stopped() {
            let dx = self.drag.dx;
            self.apply_input(InputEvent::DragReleased { dx });
        }

        let label = snapshot.position_label();
        let dx = self.drag.dx;
        self.paint_card(ui, rect, &current, Some(&label), dx);
    }

    fn show_upcoming_row(&mut self, ui: &mut egui::Ui, snapshot: &DeckSnapshot<'_>) {
        ui.horizontal(|ui| {
            if snapshot.upcoming_items.is_empty() {
                ui.small("No upcoming cats to preview");
                return;
            }
            for item in snapshot.upcoming_items {
                match self.texture_for(ui.ctx(), &item.id) {
                    Some(texture) => {
                        ui.add(
                            egui::Image::new(&texture)
                                .fit_to_exact_size(THUMB_SIZE)
                                .corner_radius(8.0),
                        );
                    }
                    None => {
                        let (rect, _) = ui.allocate_exact_size(THUMB_SIZE, egui::Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 8.0, ui.visuals().faint_bg_color);
                    }
                }
            }
        });
    }

    fn show_deck_screen(&mut self, ui: &mut egui::Ui) {
        let Some(controller) = self.session.controller() else {
            ui.add_space(120.0);
            ui.spinner();
            ui.label(&self.status);
            return;
        };
        // Clone out of the controller so painting can borrow `self` mutably.
        let deck = controller.deck().clone();
        let state = controller.state().clone();
        let preview: Vec<Item> = controller.snapshot().upcoming_items.to_vec();
        let snapshot = DeckSnapshot {
            current_item: state.current(&deck),
            upcoming_items: &preview,
            liked_items: state.liked(),
            phase: state.phase(),
            cursor: state.cursor(),
            len: deck.len(),
        };

        ui.heading("Paws & Preferences");
        ui.label("Swipe right if you like the kitty, left if you don't!");
        ui.add_space(12.0);

        self.show_card_stack(ui, &snapshot);
        ui.add_space(8.0);
        self.show_upcoming_row(ui, &snapshot);
        ui.add_space(8.0);

        let mut pressed = None;
        ui.horizontal(|ui| {
            let dislike = egui::Button::new(egui::RichText::new("👎").size(24.0))
                .min_size(egui::vec2(56.0, 56.0));
            if ui.add(dislike).on_hover_text("Dislike").clicked() {
                pressed = Some(SwipeDirection::Left);
            }
            ui.add_space(32.0);
            let like = egui::Button::new(egui::RichText::new("👍").size(24.0))
                .min_size(egui::vec2(56.0, 56.0));
            if ui.add(like).on_hover_text("Like").clicked() {
                pressed = Some(SwipeDirection::Right);
            }
        });
        ui.input(|input| {
            if input.key_pressed(egui::Key::ArrowLeft) {
                pressed = Some(SwipeDirection::Left);
            } else if input.key_pressed(egui::Key::ArrowRight) {
                pressed = Some(SwipeDirection::Right);
            }
        });
        if let Some(direction) = pressed {
            self.apply_input(InputEvent::ButtonPressed(direction));
        }

        ui.add_space(12.0);
        ui.small(format!("{} cats remaining", snapshot.remaining()));
    }

    fn show_summary_screen(&mut self, ui: &mut egui::Ui) {
        let Some(controller) = self.session.controller() else {
            return;
        };
        let snapshot = controller.snapshot();
        let summary = snapshot.summary_line();
        let liked: Vec<Item> = snapshot.liked_items.to_vec();

        ui.heading("Your Cat Preferences");
        ui.label(summary);
        ui.add_space(12.0);

        if liked.is_empty() {
            ui.weak("No cats liked. Try again!");
        } else {
            egui::Grid::new("liked_cats")
                .num_columns(3)
                .spacing([8.0, 8.0])
                .show(ui, |ui| {
                    for (index, item) in liked.iter().enumerate() {
                        match self.texture_for(ui.ctx(), &item.id) {
                            Some(texture) => {
                                ui.add(
                                    egui::Image::new(&texture)
                                        .fit_to_exact_size(SUMMARY_THUMB_SIZE)
                                        .corner_radius(8.0),
                                )
                                .on_hover_text(item.tags.join(", "));
                            }
                            None => {
                                ui.add_sized(
                                    SUMMARY_THUMB_SIZE,
                                    egui::Label::new(placeholder_caption(item)),
                                );
                            }
                        }
                        if index % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
        }

        ui.add_space(16.0);
        if ui.button("Start Over").clicked() {
            self.start_session();
        }
    }
}

fn placeholder_caption(item: &Item) -> String {
    item.id
        .as_str()
        .strip_prefix("mock-cat-")
        .and_then(|n| n.parse::<usize>().ok())
        .map(|n| format!("Cat {}", n + 1))
        .unwrap_or_else(|| item.id.to_string())
}

impl eframe::App for DeckGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.request_visible_images();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.vertical_centered(|ui| {
                let phase = self.session.controller().map(|c| c.state().phase());
                match phase {
                    Some(Phase::Summary) => self.show_summary_screen(ui),
                    Some(Phase::Active) | None => self.show_deck_screen(ui),
                }
            });
        });

        if self.exit.is_some() || self.session.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
