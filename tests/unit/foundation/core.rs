use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 600).is_err());
    assert!(Canvas::new(800, 0).is_err());
}

#[test]
fn canvas_rejects_dimensions_beyond_u16() {
    assert!(Canvas::new(70_000, 600).is_err());
    assert!(Canvas::new(800, 70_000).is_err());
    assert!(Canvas::new(u32::from(u16::MAX), 600).is_ok());
}

#[test]
fn default_canvas_matches_play_field() {
    let canvas = Canvas::default();
    assert_eq!(canvas.width, 800);
    assert_eq!(canvas.height, 600);
    assert_eq!(canvas.center(), Point::new(400.0, 300.0));
    assert_eq!(canvas.rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
}

#[test]
fn with_opacity_scales_and_clamps_alpha() {
    let c = Rgba8::new(10, 20, 30, 200);
    assert_eq!(c.with_opacity(0.5).a, 100);
    assert_eq!(c.with_opacity(2.0).a, 200);
    assert_eq!(c.with_opacity(-1.0).a, 0);
    // Color channels untouched.
    let half = c.with_opacity(0.5);
    assert_eq!((half.r, half.g, half.b), (10, 20, 30));
}

#[test]
fn lerp_hits_endpoints_and_clamps() {
    let a = Rgba8::opaque(0, 0, 0);
    let b = Rgba8::opaque(255, 100, 50);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 5.0), b);
    let mid = a.lerp(b, 0.5);
    assert_eq!(mid.g, 50);
}
