#![allow(missing_docs)]

use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::collision::{collides, out_of_bounds, pipe_offsets};
use flappy_evo::simulation::mask::{Mask, ShapeSet, bird_polygon, pipe_polygon};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::pipe::Pipe;

fn create_test_params() -> Params {
    Params::default()
}

fn bird_at(y: f32, params: &Params) -> Bird {
    Bird::new(0, params.bird_spawn_x, y)
}

#[test]
fn test_filled_masks_overlap() {
    let a = Mask::filled(4, 4);
    let b = Mask::filled(2, 2);

    assert_eq!(a.overlap(&b, (0, 0)), Some((0, 0)));
    assert_eq!(a.overlap(&b, (3, 3)), Some((3, 3)));
    assert_eq!(a.overlap(&b, (-1, -1)), Some((0, 0)));
    assert_eq!(a.overlap(&b, (4, 0)), None);
    assert_eq!(a.overlap(&b, (0, -2)), None);
}

#[test]
fn test_empty_mask_never_overlaps() {
    let empty = Mask::new(10, 10);
    let full = Mask::filled(10, 10);

    assert_eq!(empty.count(), 0);
    assert_eq!(empty.overlap(&full, (0, 0)), None);
    assert_eq!(full.overlap(&empty, (2, 2)), None);
}

#[test]
fn test_bird_mask_is_inside_its_box() {
    let params = create_test_params();
    let shapes = ShapeSet::new(&params);
    let bird = &shapes.bird;

    assert_eq!(bird.width(), params.bird_width);
    assert_eq!(bird.height(), params.bird_height);
    assert!(bird.get(34, 24));
    assert!(!bird.get(0, 0));
    assert!(!bird.get(67, 47));
    assert!(bird.count() > 0);
    assert!(bird.count() < (params.bird_width * params.bird_height) as usize);
}

#[test]
fn test_pipe_masks_have_lip_at_the_opening() {
    let params = create_test_params();
    let shapes = ShapeSet::new(&params);
    let last_row = params.pipe_height - 1;

    // bottom part opens upward
    assert!(shapes.pipe_bottom.get(0, 0));
    assert!(!shapes.pipe_bottom.get(0, last_row));
    assert!(shapes.pipe_bottom.get(50, last_row));

    // top part opens downward
    assert!(shapes.pipe_top.get(0, last_row));
    assert!(!shapes.pipe_top.get(0, 0));
    assert!(shapes.pipe_top.get(50, 0));

    assert_eq!(shapes.pipe_top.count(), shapes.pipe_bottom.count());
    assert_eq!(shapes.pipe_top.flipped_vertical(), shapes.pipe_bottom);
}

#[test]
fn test_polygons_rasterise_to_expected_area() {
    let mask = Mask::from_polygon(&pipe_polygon(10, 20, 5, 2), 10, 20);
    // 10x5 lip plus 6x15 body
    assert_eq!(mask.count(), 50 + 90);

    let ellipse = Mask::from_polygon(&bird_polygon(40, 40), 40, 40);
    let circle_area = std::f32::consts::PI * 19.0 * 19.0;
    let ratio = ellipse.count() as f32 / circle_area;
    assert!((0.9..1.05).contains(&ratio), "ratio {}", ratio);
}

#[test]
fn test_pipe_offsets_use_rounded_positions() {
    let params = create_test_params();
    let bird = bird_at(350.4, &params);
    let pipe = Pipe::with_height(300.0, 200.0, &params);

    let (top, bottom) = pipe_offsets(&bird, &pipe);

    assert_eq!(top, (70, -440 - 350));
    assert_eq!(bottom, (70, 400 - 350));
}

#[test]
fn test_bird_inside_gap_does_not_collide() {
    let params = create_test_params();
    let shapes = ShapeSet::new(&params);
    // gap from 330 to 530, bird spans 350..398
    let pipe = Pipe::with_height(240.0, 330.0, &params);
    let bird = bird_at(350.0, &params);

    assert!(!collides(&bird, &pipe, &shapes));
}

#[test]
fn test_bird_overlapping_pipe_body_collides() {
    let params = create_test_params();
    let shapes = ShapeSet::new(&params);
    let pipe = Pipe::with_height(240.0, 300.0, &params);

    assert!(collides(&bird_at(200.0, &params), &pipe, &shapes));
    assert!(collides(&bird_at(480.0, &params), &pipe, &shapes));
}

#[test]
fn test_box_corner_overlap_is_not_a_collision() {
    let params = create_test_params();
    let shapes = ShapeSet::new(&params);
    let bird = bird_at(350.0, &params);

    // bottom lip covers only the lower right 4x4 corner of the bird's box
    let corner = Pipe::with_height(294.0, 394.0 - params.pipe_gap, &params);
    assert!(!collides(&bird, &corner, &shapes));

    // sliding the lip up to the bird's mid height hits the silhouette
    let deeper = Pipe::with_height(294.0, 360.0 - params.pipe_gap, &params);
    assert!(collides(&bird, &deeper, &shapes));
}

#[test]
fn test_pipe_far_away_does_not_collide() {
    let params = create_test_params();
    let shapes = ShapeSet::new(&params);
    let pipe = Pipe::with_height(700.0, 50.0, &params);

    assert!(!collides(&bird_at(350.0, &params), &pipe, &shapes));
}

#[test]
fn test_out_of_bounds_at_ground_and_above_ceiling() {
    let params = create_test_params();

    assert!(!out_of_bounds(&bird_at(0.0, &params), &params));
    assert!(!out_of_bounds(&bird_at(681.0, &params), &params));
    assert!(out_of_bounds(&bird_at(682.0, &params), &params));
    assert!(out_of_bounds(&bird_at(-0.5, &params), &params));
}
