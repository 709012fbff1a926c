use super::*;

fn small_canvas() -> Canvas {
    Canvas::new(32, 24).unwrap()
}

#[test]
fn finish_frame_returns_full_byte_buffer() {
    let canvas = small_canvas();
    let mut ctx = SceneCtx::new(canvas).unwrap();
    ctx.begin_frame();
    let frame = ctx.finish_frame().unwrap();
    assert_eq!(frame.width, 32);
    assert_eq!(frame.height, 24);
    assert_eq!(frame.data.len(), 32 * 24 * 4);
    assert!(frame.data.iter().all(|&b| b == 0), "empty frame is transparent");
}

#[test]
fn solid_fill_covers_the_frame() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    ctx.fill_rect(Rect::new(0.0, 0.0, 32.0, 24.0), Rgba8::opaque(255, 0, 0));
    let frame = ctx.finish_frame().unwrap();
    // Every pixel red, fully opaque.
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px[0], 255);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn begin_frame_clears_previous_drawing() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    ctx.fill_rect(Rect::new(0.0, 0.0, 32.0, 24.0), Rgba8::opaque(0, 255, 0));
    let first = ctx.finish_frame().unwrap();
    assert!(first.data.iter().any(|&b| b != 0));

    ctx.begin_frame();
    let second = ctx.finish_frame().unwrap();
    assert!(second.data.iter().all(|&b| b == 0));
}

#[test]
fn with_transform_restores_on_success_and_error() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    let result = ctx.with_transform(Affine::translate((100.0, 100.0)), |ctx| {
        ctx.with_transform(Affine::scale(2.0), |_| {
            Err(StagefxError::render("boom"))
        })
    });
    assert!(result.is_err());

    // Transform stack is back at identity: a fill at the origin lands at the origin.
    ctx.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::opaque(0, 0, 255));
    let frame = ctx.finish_frame().unwrap();
    assert_eq!(frame.data[2], 255, "top-left pixel is blue");
}

#[test]
fn with_alpha_halves_coverage() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    ctx.with_alpha(0.5, |ctx| {
        ctx.fill_rect(Rect::new(0.0, 0.0, 32.0, 24.0), Rgba8::opaque(255, 255, 255));
        Ok(())
    })
    .unwrap();
    let frame = ctx.finish_frame().unwrap();
    let alpha = frame.data[3];
    assert!(alpha > 100 && alpha < 155, "expected ~50% alpha, got {alpha}");
}

#[test]
fn vertical_gradient_interpolates_top_to_bottom() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    ctx.fill_vertical_gradient(
        Rect::new(0.0, 0.0, 32.0, 24.0),
        Rgba8::opaque(255, 0, 0),
        Rgba8::opaque(0, 0, 255),
    )
    .unwrap();
    let frame = ctx.finish_frame().unwrap();
    let row = |y: usize| &frame.data[y * 32 * 4..y * 32 * 4 + 4];
    let top = row(0);
    let bottom = row(23);
    assert!(top[0] > 200 && top[2] < 60, "top is red");
    assert!(bottom[2] > 200 && bottom[0] < 60, "bottom is blue");
}

#[test]
fn radial_glow_is_brightest_at_center() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    ctx.fill_radial_glow(Point::new(16.0, 12.0), 10.0, Rgba8::opaque(255, 255, 255), 1.0)
        .unwrap();
    let frame = ctx.finish_frame().unwrap();
    let px = |x: usize, y: usize| frame.data[(y * 32 + x) * 4 + 3];
    let center = px(16, 12);
    let edge = px(0, 0);
    assert!(center > 0);
    assert!(center > edge);
}

#[test]
fn degenerate_glow_draws_nothing() {
    let mut ctx = SceneCtx::new(small_canvas()).unwrap();
    ctx.begin_frame();
    ctx.fill_radial_glow(Point::new(16.0, 12.0), 0.0, Rgba8::opaque(255, 255, 255), 1.0)
        .unwrap();
    ctx.fill_radial_glow(Point::new(16.0, 12.0), 10.0, Rgba8::opaque(255, 255, 255), 0.0)
        .unwrap();
    let frame = ctx.finish_frame().unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}
