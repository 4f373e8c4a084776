use crate::simulation::params::Params;
use crate::simulation::snapshot::Snapshot;
use egui_macroquad::egui;
use egui_plot::{Line, Plot, PlotPoints};
use std::collections::VecDeque;

use super::ui::UIState;

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    snapshot: &Snapshot,
    params: &Params,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(true)
        .show(egui_ctx, |ui| {
            ui.heading("Training Stats");
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("💾 Save config").clicked() {
                    state.save_requested = true;
                }
                if ui.button("🔄 Reset").clicked() {
                    state.reset_requested = true;
                }
                let pause_text = if state.paused { "▶ Resume" } else { "⏸ Pause" };
                if ui.button(pause_text).clicked() {
                    state.paused = !state.paused;
                }
            });

            ui.horizontal(|ui| {
                let button_text = if state.rendering_enabled {
                    "🎨 Rendering: ON"
                } else {
                    "🎨 Rendering: OFF"
                };
                if ui.button(button_text).clicked() {
                    state.rendering_enabled = !state.rendering_enabled;
                }
            });

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();

            ui.label("Simulation Speed");
            ui.add(egui::Slider::new(&mut state.simulation_speed, 1..=200).text("ticks/frame"));
            ui.label(format!("Ticks/sec: {:.1}", state.actual_ticks_per_sec));
            ui.label(format!("Step time: {:.2}ms", state.last_step_time_ms));

            ui.separator();

            if let Some(generation) = snapshot.generation {
                ui.label(format!("Generation: {}/{}", generation, params.generations));
            }
            ui.label(format!("Score: {}", snapshot.score));
            ui.label(format!("Tick: {}", snapshot.tick));
            ui.label(format!("Alive: {}/{}", snapshot.alive, snapshot.birds.len()));
            if let Some(max_fitness) = snapshot.max_fitness {
                ui.label(format!("Best live fitness: {:.1}", max_fitness));
            }

            ui.separator();

            ui.heading("Fitness");
            draw_fitness_plot(ui, state);

            ui.separator();

            ui.heading("Score");
            draw_time_series_plot(
                ui,
                "score_plot",
                &state.score_history,
                "Score",
                egui::Color32::from_rgb(255, 200, 100),
            );
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, state: &UIState) {
    let best: PlotPoints = state
        .best_fitness_history
        .iter()
        .map(|&(x, y)| [x, y])
        .collect();
    let mean: PlotPoints = state
        .mean_fitness_history
        .iter()
        .map(|&(x, y)| [x, y])
        .collect();

    Plot::new("fitness_plot")
        .height(150.0)
        .show_axes([true, true])
        .legend(egui_plot::Legend::default())
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("gen {:.0}: {:.1}", value.x, value.y)
            } else {
                format!("{}\ngen {:.0}: {:.1}", name, value.x, value.y)
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(best)
                    .color(egui::Color32::from_rgb(100, 255, 100))
                    .name("Best"),
            );
            plot_ui.line(
                Line::new(mean)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );
        });
}

fn draw_time_series_plot(
    ui: &mut egui::Ui,
    id: &str,
    data: &VecDeque<(f64, f64)>,
    name: &str,
    color: egui::Color32,
) {
    let points: PlotPoints = data.iter().map(|&(x, y)| [x, y]).collect();

    Plot::new(id)
        .height(120.0)
        .show_axes([true, true])
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(color).name(name));
        });
}
