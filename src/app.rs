//! Main application UI wiring.
//! Renders the quiz and edit screens and connects widget interactions to
//! the session state machine and the card store.

use std::sync::mpsc::{self, Receiver};

use eframe::egui;

use quizcards_app::state::{Event, Mode, QuizState};
use quizcards_app::store::{STORE_URL, StoreClient};

/// The hosting shell: owns the state machine, the store client and the
/// channel the store threads report back on.
pub struct QuizApp {
    state: QuizState,
    store: StoreClient,
    events: Receiver<Event>,

    show_quit_dialog: bool,
    allowed_to_close: bool,
}

impl QuizApp {
    /// Creates the app and issues the initial deck fetch.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let store = StoreClient::new(STORE_URL, sender, cc.egui_ctx.clone());

        let (state, initial_request) = QuizState::new();
        store.dispatch(initial_request);

        Self {
            state,
            store,
            events: receiver,
            show_quit_dialog: false,
            allowed_to_close: false,
        }
    }

    /// Runs one event through the machine and executes whatever store
    /// request the transition produced.
    fn dispatch(&mut self, event: Event) {
        if let Some(request) = self.state.update(event) {
            self.store.dispatch(request);
        }
    }

    /// Renders the quiz screen: the current question with the answer
    /// revealed on demand.
    fn render_quiz_screen(&mut self, ctx: &egui::Context) {
        // We store the clicked action and dispatch after UI rendering
        // to avoid borrowing conflicts
        let mut action: Option<Event> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Quiz");

            if let Some(card) = self.state.current_card() {
                let answer_visible = self.state.answer_visible();

                ui.label(format!(
                    "Card {} of {}",
                    self.state.current_index() + 1,
                    self.state.deck().len()
                ));
                ui.separator();

                ui.group(|ui| {
                    ui.set_min_height(160.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(10.0);

                        ui.heading("Question:");
                        ui.label(&card.question);

                        ui.add_space(10.0);

                        if answer_visible {
                            ui.heading("Answer:");
                            ui.label(&card.answer);
                        } else {
                            ui.label("(Click 'Show Answer' to reveal)");
                        }

                        ui.add_space(10.0);
                    });
                });

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    let toggle_label = if answer_visible {
                        "Hide Answer"
                    } else {
                        "Show Answer"
                    };
                    if ui.button(toggle_label).clicked() {
                        action = Some(Event::ToggleAnswer);
                    }

                    if ui.button("Pick Random Card").clicked() {
                        action = Some(Event::PickRandom);
                    }

                    if ui.button("Edit Card").clicked() {
                        action = Some(Event::EnterEdit);
                    }
                });
            } else {
                ui.separator();
                ui.label("The deck is empty.");
            }
        });

        if let Some(event) = action {
            self.dispatch(event);
        }
    }

    /// Renders the edit screen for the current card's drafts.
    fn render_edit_screen(&mut self, ctx: &egui::Context) {
        let mut action_question: Option<String> = None;
        let mut action_answer: Option<String> = None;
        let mut action_save = false;
        let mut action_cancel = false;

        // The machine's drafts stay canonical; the widgets edit copies and
        // every change is routed back through an event.
        let mut question = self.state.question_draft().to_string();
        let mut answer = self.state.answer_draft().to_string();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Edit Card");
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Question:");
                if ui.text_edit_singleline(&mut question).changed() {
                    action_question = Some(question.clone());
                }
            });

            ui.horizontal(|ui| {
                ui.label("Answer:");
                if ui.text_edit_singleline(&mut answer).changed() {
                    action_answer = Some(answer.clone());
                }
            });

            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    action_save = true;
                }
                if ui.button("Cancel").clicked() {
                    action_cancel = true;
                }
            });
        });

        if let Some(text) = action_question {
            self.dispatch(Event::QuestionDraftChanged(text));
        }
        if let Some(text) = action_answer {
            self.dispatch(Event::AnswerDraftChanged(text));
        }
        if action_save {
            self.dispatch(Event::SaveEdit);
        }
        if action_cancel {
            self.dispatch(Event::CancelEdit);
        }
    }
}

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Store completions arrive from worker threads between frames.
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event);
        }

        match self.state.mode() {
            Mode::Quiz => self.render_quiz_screen(ctx),
            Mode::Edit => self.render_edit_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_quit_dialog = true;
        }

        if self.show_quit_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_quit_dialog = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_quit_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }
    }
}
