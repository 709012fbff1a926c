//! Host-contract sweep: every stage animation obeys the same lifecycle.

use stagefx::{
    BodyShape, Canvas, EventConfig, LifeStage, Point, QualityLevel, SceneCtx, stages,
};

fn config(event_type: &str, seed: u64) -> EventConfig {
    EventConfig {
        event_type: event_type.into(),
        duration_ms: 4000.0,
        origin: Point::new(400.0, 300.0),
        seed,
        quality: QualityLevel::High,
        shape: None,
    }
}

/// One representative event per stage.
fn sample_event(stage: LifeStage) -> &'static str {
    match stage {
        LifeStage::Birth => "celebrated-arrival",
        LifeStage::Baby => "first-steps",
        LifeStage::Child => "birthday",
        LifeStage::Teen => "exam-passed",
        LifeStage::Adult => "windfall",
        LifeStage::Elder => "memory-lane",
    }
}

#[test]
fn every_stage_runs_to_completion_and_latches() {
    let canvas = Canvas::default();
    for stage in LifeStage::ALL {
        let cfg = config(sample_event(stage), 7);
        let mut anim = stages::create(stage, canvas, &cfg).unwrap();

        let mut t = 0.0;
        while t < 3984.0 {
            anim.update(t, 16.0);
            assert!(
                !anim.is_animation_complete(),
                "{} completed early at t={t}",
                stage.as_str()
            );
            t += 16.0;
        }
        anim.update(4000.0, 16.0);
        assert!(anim.is_animation_complete(), "{} did not latch", stage.as_str());
        // The latch holds for any further updates.
        anim.update(4016.0, 16.0);
        anim.update(100.0, 16.0);
        assert!(anim.is_animation_complete());
    }
}

#[test]
fn unknown_event_type_falls_back_without_panicking() {
    let canvas = Canvas::default();
    let mut ctx = SceneCtx::new(canvas).unwrap();
    for stage in LifeStage::ALL {
        let cfg = config("xyz", 3);
        let mut anim = stages::create(stage, canvas, &cfg).unwrap();
        anim.update(0.0, 16.0);
        anim.update(1000.0, 16.0);
        ctx.begin_frame();
        anim.render(&mut ctx).unwrap();
        let frame = ctx.finish_frame().unwrap();
        assert!(
            frame.data.iter().any(|&b| b != 0),
            "{} fallback drew nothing",
            stage.as_str()
        );
    }
}

#[test]
fn same_seed_and_updates_produce_identical_frames() {
    let canvas = Canvas::default();
    for stage in LifeStage::ALL {
        let cfg = config(sample_event(stage), 99);
        let mut a = stages::create(stage, canvas, &cfg).unwrap();
        let mut b = stages::create(stage, canvas, &cfg).unwrap();

        let mut t = 0.0;
        for _ in 0..60 {
            a.update(t, 16.0);
            b.update(t, 16.0);
            t += 16.0;
        }

        let mut ctx_a = SceneCtx::new(canvas).unwrap();
        let mut ctx_b = SceneCtx::new(canvas).unwrap();
        ctx_a.begin_frame();
        a.render(&mut ctx_a).unwrap();
        ctx_b.begin_frame();
        b.render(&mut ctx_b).unwrap();
        let frame_a = ctx_a.finish_frame().unwrap();
        let frame_b = ctx_b.finish_frame().unwrap();
        assert_eq!(frame_a.data, frame_b.data, "{} is not deterministic", stage.as_str());
    }
}

#[test]
fn cleanup_is_idempotent_and_rendering_after_cleanup_is_safe() {
    let canvas = Canvas::default();
    let mut ctx = SceneCtx::new(canvas).unwrap();
    for stage in LifeStage::ALL {
        let cfg = config(sample_event(stage), 5);
        let mut anim = stages::create(stage, canvas, &cfg).unwrap();
        for i in 0..30 {
            anim.update(i as f64 * 16.0, 16.0);
        }
        anim.cleanup();
        anim.cleanup();
        ctx.begin_frame();
        anim.render(&mut ctx).unwrap();
        ctx.finish_frame().unwrap();
    }
}

#[test]
fn quality_changes_mid_animation_are_safe() {
    let canvas = Canvas::default();
    let mut ctx = SceneCtx::new(canvas).unwrap();
    for stage in LifeStage::ALL {
        let cfg = config(sample_event(stage), 21);
        let mut anim = stages::create(stage, canvas, &cfg).unwrap();
        for i in 0..20 {
            anim.update(i as f64 * 16.0, 16.0);
        }
        anim.set_quality(QualityLevel::Low);
        anim.update(320.0, 16.0);
        anim.set_quality(QualityLevel::High);
        anim.update(336.0, 16.0);
        ctx.begin_frame();
        anim.render(&mut ctx).unwrap();
        ctx.finish_frame().unwrap();
    }
}

#[test]
fn body_shape_override_flows_through() {
    let canvas = Canvas::default();
    let mut ctx = SceneCtx::new(canvas).unwrap();
    let mut cfg = config("first-smile", 1);
    cfg.shape = Some(BodyShape {
        head_radius: 25.0,
        ..BodyShape::default()
    });
    let mut anim = stages::create(LifeStage::Baby, canvas, &cfg).unwrap();
    anim.update(1000.0, 16.0);
    // And a mid-animation push from the morphing side.
    anim.set_body_shape(BodyShape::default());
    anim.update(1016.0, 16.0);
    ctx.begin_frame();
    anim.render(&mut ctx).unwrap();
    ctx.finish_frame().unwrap();
}

#[test]
fn degenerate_duration_completes_on_first_update() {
    let canvas = Canvas::default();
    for stage in LifeStage::ALL {
        let mut cfg = config(sample_event(stage), 2);
        cfg.duration_ms = 0.0;
        let mut anim = stages::create(stage, canvas, &cfg).unwrap();
        assert!(!anim.is_animation_complete());
        anim.update(0.0, 16.0);
        assert!(
            anim.is_animation_complete(),
            "{} with zero duration did not complete immediately",
            stage.as_str()
        );
    }
}

#[test]
fn event_config_json_round_trip() {
    let cfg = EventConfig::from_json(
        r#"{"event_type":"birthday","duration_ms":2500.0,"origin":{"x":120.0,"y":340.0},"seed":17,"quality":"medium"}"#,
    )
    .unwrap();
    assert_eq!(cfg.event_type, "birthday");
    assert_eq!(cfg.duration_ms, 2500.0);
    assert_eq!(cfg.seed, 17);
    assert_eq!(cfg.quality, QualityLevel::Medium);

    // Missing fields fall back to game defaults.
    let sparse = EventConfig::from_json(r#"{"event_type":"wedding"}"#).unwrap();
    assert_eq!(sparse.duration_ms, 4000.0);
    assert_eq!(sparse.quality, QualityLevel::High);

    assert!(EventConfig::from_json("not json").is_err());
}
