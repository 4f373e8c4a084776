use crate::simulation::params::Params;
use crate::simulation::snapshot::{BirdView, PipeView, Presentation, Snapshot};
use macroquad::prelude::*;

const SKY: Color = Color::new(0.31, 0.75, 0.79, 1.0);
const PIPE_BODY: Color = Color::new(0.45, 0.75, 0.18, 1.0);
const PIPE_EDGE: Color = Color::new(0.33, 0.50, 0.15, 1.0);
const GROUND: Color = Color::new(0.87, 0.84, 0.59, 1.0);
const GRASS: Color = Color::new(0.45, 0.75, 0.18, 1.0);

trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        self * world_scale(params)
    }
}

impl ToScreen for (f32, f32) {
    type Output = Vec2;
    fn to_screen(&self, params: &Params) -> Vec2 {
        vec2(self.0.to_screen(params), self.1.to_screen(params))
    }
}

/// World units to pixels, fitting the world height to the window.
fn world_scale(params: &Params) -> f32 {
    screen_height() / params.window_height
}

/// Draws one frame of the world.
pub fn draw_world(snapshot: &Snapshot, presentation: &Presentation, params: &Params) {
    clear_background(SKY);

    for pipe in &snapshot.pipes {
        draw_pipe(pipe, params);
    }

    for bird in snapshot.birds.iter().filter(|bird| bird.alive) {
        draw_bird(bird, presentation, params);
    }

    draw_base(snapshot, params);
    draw_score(snapshot.score, params);
}

fn draw_pipe(pipe: &PipeView, params: &Params) {
    let width = (params.pipe_width as f32).to_screen(params);
    let body_height = (params.pipe_height as f32).to_screen(params);
    let lip_height = (params.pipe_lip_height as f32).to_screen(params);
    let inset = (params.pipe_lip_inset as f32).to_screen(params);

    let top = (pipe.x, pipe.top).to_screen(params);
    draw_rectangle(top.x + inset, top.y, width - 2.0 * inset, body_height, PIPE_BODY);
    draw_rectangle(top.x, top.y + body_height - lip_height, width, lip_height, PIPE_BODY);
    draw_rectangle_lines(top.x, top.y + body_height - lip_height, width, lip_height, 2.0, PIPE_EDGE);

    let bottom = (pipe.x, pipe.bottom).to_screen(params);
    draw_rectangle(bottom.x + inset, bottom.y, width - 2.0 * inset, body_height, PIPE_BODY);
    draw_rectangle(bottom.x, bottom.y, width, lip_height, PIPE_BODY);
    draw_rectangle_lines(bottom.x, bottom.y, width, lip_height, 2.0, PIPE_EDGE);
}

fn draw_bird(bird: &BirdView, presentation: &Presentation, params: &Params) {
    let pose = presentation.pose(bird.id);
    let width = (params.bird_width as f32).to_screen(params);
    let height = (params.bird_height as f32).to_screen(params);
    let center = (bird.x, bird.y).to_screen(params) + vec2(width / 2.0, height / 2.0);
    let rotation = -pose.tilt.to_radians();

    draw_rectangle_ex(
        center.x,
        center.y,
        width,
        height,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation,
            color: Color::from_rgba(245, 200, 60, 230),
        },
    );

    // wing position follows the animation frame
    let wing_lift = (f32::from(pose.frame) - 1.0) * height * 0.2;
    draw_rectangle_ex(
        center.x - width * 0.15,
        center.y + wing_lift,
        width * 0.35,
        height * 0.25,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation,
            color: Color::from_rgba(250, 240, 220, 255),
        },
    );

    let eye = center + Vec2::from_angle(rotation).rotate(vec2(width * 0.25, -height * 0.15));
    draw_circle(eye.x, eye.y, height * 0.1, BLACK);
}

fn draw_base(snapshot: &Snapshot, params: &Params) {
    let y = snapshot.base_y.to_screen(params);
    let width = params.base_width.to_screen(params);
    let height = screen_height() - y;

    for tile in snapshot.base_tiles {
        let x = tile.to_screen(params);
        draw_rectangle(x, y, width, height, GROUND);
        draw_rectangle(x, y, width, 6.0, GRASS);
    }
}

fn draw_score(score: u32, params: &Params) {
    let text = format!("Score: {}", score);
    let font_size = 40.0;
    let text_size = measure_text(&text, None, font_size as _, 1.0);
    draw_text(
        &text,
        params.window_width.to_screen(params) - text_size.width - 15.0,
        10.0 + text_size.height,
        font_size,
        WHITE,
    );
}

/// Draws the generation counters in the top-left corner.
pub fn draw_counters(snapshot: &Snapshot) {
    let mut lines = Vec::new();
    if let Some(generation) = snapshot.generation {
        lines.push(format!("Gen: {}", generation));
    }
    lines.push(format!("Alive: {}", snapshot.alive));
    if let Some(fitness) = snapshot.max_fitness {
        lines.push(format!("Fitness: {:.1}", fitness));
    }

    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 10.0, 30.0 + i as f32 * 28.0, 30.0, WHITE);
    }
}
