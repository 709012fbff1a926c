//! Rasterization smoke: every stage draws a visible mid-animation frame.
//!
//! Set `STAGEFX_DUMP=1` to write the frames as PNGs into the target directory for
//! eyeballing.

use stagefx::{Canvas, EventConfig, LifeStage, Point, QualityLevel, SceneCtx, stages};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::level_filters::LevelFilter::DEBUG)
        .try_init();
}

fn render_mid_frame(stage: LifeStage, event_type: &str) -> stagefx::FrameRGBA {
    init_tracing();
    let canvas = Canvas::default();
    let config = EventConfig {
        event_type: event_type.into(),
        duration_ms: 4000.0,
        origin: Point::new(400.0, 420.0),
        seed: 1234,
        quality: QualityLevel::High,
        shape: None,
    };
    let mut anim = stages::create(stage, canvas, &config).unwrap();
    let mut t = 0.0;
    while t <= 2000.0 {
        anim.update(t, 16.0);
        t += 16.0;
    }
    let mut ctx = SceneCtx::new(canvas).unwrap();
    ctx.begin_frame();
    anim.render(&mut ctx).unwrap();
    ctx.finish_frame().unwrap()
}

fn dump(name: &str, frame: &stagefx::FrameRGBA) {
    if std::env::var_os("STAGEFX_DUMP").is_none() {
        return;
    }
    let path = format!("{}/smoke_{name}.png", env!("CARGO_TARGET_TMPDIR"));
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .expect("frame buffer size");
    img.save(&path).expect("write png");
    eprintln!("wrote {path}");
}

#[test]
fn every_stage_default_event_draws_pixels() {
    for stage in LifeStage::ALL {
        // Empty event type resolves to each stage's default entry.
        let frame = render_mid_frame(stage, "");
        let lit = frame.data.chunks_exact(4).filter(|px| px[3] != 0).count();
        let total = (frame.width * frame.height) as usize;
        assert!(
            lit > total / 2,
            "{}: only {lit}/{total} pixels drawn",
            stage.as_str()
        );
        dump(stage.as_str(), &frame);
    }
}

#[test]
fn celebration_events_draw_pixels() {
    let events = [
        (LifeStage::Birth, "celebrated-arrival"),
        (LifeStage::Baby, "new-toy"),
        (LifeStage::Child, "birthday"),
        (LifeStage::Teen, "big-game"),
        (LifeStage::Adult, "wedding"),
        (LifeStage::Elder, "retirement"),
    ];
    for (stage, event) in events {
        let frame = render_mid_frame(stage, event);
        assert!(
            frame.data.iter().any(|&b| b != 0),
            "{}/{event} drew nothing",
            stage.as_str()
        );
        dump(&format!("{}_{event}", stage.as_str()), &frame);
    }
}

#[test]
fn quiet_events_still_fill_the_backdrop() {
    let events = [
        (LifeStage::Birth, "quiet-arrival"),
        (LifeStage::Baby, "sick-day"),
        (LifeStage::Child, "scraped-knee"),
        (LifeStage::Teen, "argument"),
        (LifeStage::Adult, "burnout"),
        (LifeStage::Elder, "quiet-evening"),
    ];
    for (stage, event) in events {
        let frame = render_mid_frame(stage, event);
        // The backdrop gradient alone covers the whole canvas.
        assert!(
            frame.data.chunks_exact(4).all(|px| px[3] != 0),
            "{}/{event} left transparent pixels",
            stage.as_str()
        );
    }
}
