use chrono::Utc;
use roster_business::{ApiHealth, CheckApiHealthCommand, Route, SessionState};
use roster_states::Time;

use crate::{pages, state::State, widgets};

/// Top-level eframe app: the shared state context plus the page router.
pub struct RosterApp {
    pub state: State,
}

impl RosterApp {
    /// Called once before the first frame.
    pub fn new(mut state: State, egui_ctx: &egui::Context) -> Self {
        // Wake the event loop when a background command finishes, so results
        // land on screen without waiting for user input.
        let repaint_ctx = egui_ctx.clone();
        state.ctx.set_waker(move || repaint_ctx.request_repaint());
        Self { state }
    }
}

impl eframe::App for RosterApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sync Compute for render
        self.state.ctx.sync_computes();

        // Frame clock; commands and computes read this instead of calling
        // `Utc::now()` themselves.
        let now = Utc::now();
        self.state.ctx.update::<Time>(|time| *time.as_mut() = now);

        if self
            .state
            .ctx
            .cached::<ApiHealth>()
            .is_some_and(|health| health.should_refresh(now))
        {
            self.state.ctx.dispatch::<CheckApiHealthCommand>();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong("Roster");
                ui.separator();
                widgets::api_health(&self.state.ctx, ui);
                widgets::env_version(ui);
                if let Some(operator) = self.state.ctx.state::<SessionState>().operator() {
                    ui.separator();
                    ui.label(format!("Signed in as {operator}"));
                }
            });
        });

        let route = self.state.ctx.state::<Route>().clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            match route {
                Route::Users => pages::users_page(&mut self.state, ui),
                Route::Denied => pages::denied_page(&mut self.state, ui),
            };
        });

        // Run background jobs
        self.state.ctx.run_computed();
    }
}
