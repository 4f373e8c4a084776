use crate::simulation::params::Params;
use egui_macroquad::egui;
use macroquad::prelude::*;

/// What the start screen asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Evolve a population of brains.
    Train,
    /// Play a single bird with the keyboard.
    Play,
}

pub fn draw_genesis_screen(params: &mut Params) -> Option<StartMode> {
    clear_background(LIGHTGRAY);

    let mut start = None;

    egui_macroquad::ui(|egui_ctx| {
        egui::CentralPanel::default().show(egui_ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Flappy Evo - Configuration");
                ui.add_space(10.0);

                ui.collapsing("Population", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.population_size, 1..=500)
                            .text("Population Size"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.elite_count, 0..=20).text("Elite Count"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.survival_fraction, 0.01..=1.0)
                            .text("Survival Fraction"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.generations, 1..=1000).text("Generations"),
                    );
                });

                ui.collapsing("Mutation", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.mutation_scale_min, 0.001..=0.1)
                            .text("Min Scale")
                            .logarithmic(true),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.mutation_scale_max, 0.1..=2.0)
                            .text("Max Scale")
                            .logarithmic(true),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.weight_scale, 0.1..=5.0)
                            .text("Initial Weight Scale"),
                    );
                });

                ui.collapsing("Brain Architecture", |ui| {
                    if params.layer_sizes.len() >= 3 {
                        let hidden = params.layer_sizes.len() - 1;
                        for size in &mut params.layer_sizes[1..hidden] {
                            ui.add(egui::Slider::new(size, 1..=32).text("Hidden Layer"));
                        }
                    }
                    ui.label(format!("Layers: {:?}", params.layer_sizes));
                });

                ui.collapsing("Rewards", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.survival_reward, 0.0..=1.0)
                            .text("Survival (per tick)"),
                    );
                    ui.add(egui::Slider::new(&mut params.pass_reward, 0.0..=20.0).text("Pass"));
                    ui.add(
                        egui::Slider::new(&mut params.collision_penalty, 0.0..=10.0)
                            .text("Collision Penalty"),
                    );
                });

                ui.collapsing("World", |ui| {
                    ui.add(egui::Slider::new(&mut params.pipe_gap, 100.0..=300.0).text("Pipe Gap"));
                    ui.add(
                        egui::Slider::new(&mut params.pipe_speed, 1.0..=15.0).text("Pipe Speed"),
                    );
                    ui.add(egui::Slider::new(&mut params.frame_rate, 10..=120).text("Frame Rate"));
                });

                ui.add_space(20.0);
                ui.separator();
                ui.add_space(10.0);

                if let Err(err) = params.validate() {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), err.to_string());
                }

                ui.horizontal(|ui| {
                    let valid = params.validate().is_ok();
                    if ui
                        .add_enabled(valid, egui::Button::new("Start Training"))
                        .clicked()
                    {
                        start = Some(StartMode::Train);
                    }
                    if ui.add_enabled(valid, egui::Button::new("Play")).clicked() {
                        start = Some(StartMode::Play);
                    }
                    ui.label("Space to flap in play mode");
                });
            });
        });
    });

    egui_macroquad::draw();

    start
}
