use crate::simulation::evaluation::GenerationSummary;
use crate::simulation::event_log::EventLog;
use crate::simulation::params::Params;
use crate::simulation::snapshot::Snapshot;
use egui_macroquad::egui;
use std::collections::VecDeque;

const MAX_HISTORY_POINTS: usize = 500;

#[allow(clippy::struct_excessive_bools)]
pub struct UIState {
    pub stats_panel_width: f32,
    pub best_fitness_history: VecDeque<(f64, f64)>,
    pub mean_fitness_history: VecDeque<(f64, f64)>,
    pub score_history: VecDeque<(f64, f64)>,
    pub event_log: EventLog,
    pub save_requested: bool,
    pub reset_requested: bool,
    pub paused: bool,
    pub status_message: Option<String>,
    /// Ticks played per rendered frame.
    pub simulation_speed: u32,
    pub rendering_enabled: bool,
    pub last_step_time_ms: f32,
    pub actual_ticks_per_sec: f32,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: 300.0,
            best_fitness_history: VecDeque::new(),
            mean_fitness_history: VecDeque::new(),
            score_history: VecDeque::new(),
            event_log: EventLog::default(),
            save_requested: false,
            reset_requested: false,
            paused: false,
            status_message: None,
            simulation_speed: 1,
            rendering_enabled: true,
            last_step_time_ms: 0.0,
            actual_ticks_per_sec: 0.0,
        }
    }

    /// Clears histories and events for a fresh training run.
    pub fn reset(&mut self) {
        self.best_fitness_history.clear();
        self.mean_fitness_history.clear();
        self.score_history.clear();
        self.event_log.clear();
        self.status_message = None;
    }

    pub fn record_generation(&mut self, summary: &GenerationSummary) {
        let x = summary.generation as f64;
        push_capped(
            &mut self.best_fitness_history,
            (x, summary.best_fitness as f64),
        );
        push_capped(
            &mut self.mean_fitness_history,
            (x, summary.mean_fitness as f64),
        );
        push_capped(&mut self.score_history, (x, summary.score as f64));
        self.event_log.record_generation(summary);
    }
}

fn push_capped(history: &mut VecDeque<(f64, f64)>, point: (f64, f64)) {
    history.push_back(point);
    if history.len() > MAX_HISTORY_POINTS {
        history.pop_front();
    }
}

pub fn draw_ui(state: &mut UIState, snapshot: &Snapshot, params: &Params) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(220, 220, 220);
        visuals.widgets.inactive.fg_stroke.color = egui::Color32::from_rgb(200, 200, 200);
        visuals.widgets.hovered.fg_stroke.color = egui::Color32::WHITE;
        visuals.widgets.active.fg_stroke.color = egui::Color32::WHITE;
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, snapshot, params);
        super::events::draw_events_panel(egui_ctx, &state.event_log);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
