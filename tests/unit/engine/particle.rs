use super::*;

fn spec(fade: FadeRule, expire: ExpirePolicy) -> FieldSpec {
    FieldSpec {
        name: "test-field",
        motion_scale: 1.0,
        gravity: None,
        fade,
        expire,
        caps: QualityCaps::new(5, 8, 10),
        flutter: None,
    }
}

fn canvas() -> Canvas {
    Canvas::default()
}

#[test]
fn spawn_fills_up_to_count_and_clamps_invariants() {
    let mut field = ParticleField::new(spec(FadeRule::LifeRatio, ExpirePolicy::Remove), canvas(), 1);
    field.spawn(4, |_, _| Particle {
        opacity: 5.0,
        max_opacity: 3.0,
        max_life_ms: -10.0,
        ..Particle::default()
    });
    assert_eq!(field.len(), 4);
    for p in field.iter() {
        assert!(p.max_opacity <= 1.0);
        assert!(p.opacity <= p.max_opacity);
        assert!(p.max_life_ms > 0.0);
    }
    // Spawning again with a smaller target is a no-op.
    field.spawn(2, |_, _| Particle::default());
    assert_eq!(field.len(), 4);
}

#[test]
fn tick_applies_scaled_euler_step() {
    let mut field = ParticleField::new(
        FieldSpec {
            motion_scale: 0.5,
            ..spec(FadeRule::LifeRatio, ExpirePolicy::Remove)
        },
        canvas(),
        1,
    );
    field.spawn(1, |_, _| Particle {
        position: Point::new(100.0, 100.0),
        velocity: Vec2::new(2.0, -1.0),
        life_ms: 10_000.0,
        max_life_ms: 10_000.0,
        ..Particle::default()
    });
    field.tick(10.0);
    let p = field.iter().next().unwrap();
    // position += velocity * dt * k
    assert_eq!(p.position.x, 110.0);
    assert_eq!(p.position.y, 95.0);
}

#[test]
fn gravity_makes_vertical_velocity_non_decreasing() {
    let mut field = ParticleField::new(
        FieldSpec {
            gravity: Some(0.05),
            ..spec(FadeRule::LifeRatio, ExpirePolicy::Remove)
        },
        canvas(),
        1,
    );
    field.spawn(3, |_, rng| Particle {
        velocity: Vec2::new(0.0, rng.next_range(-1.0, 1.0)),
        life_ms: 60_000.0,
        max_life_ms: 60_000.0,
        ..Particle::default()
    });
    let mut last: Vec<f64> = field.iter().map(|p| p.velocity.y).collect();
    for _ in 0..50 {
        field.tick(16.0);
        let now: Vec<f64> = field.iter().map(|p| p.velocity.y).collect();
        for (prev, cur) in last.iter().zip(&now) {
            assert!(cur > prev);
        }
        last = now;
    }
}

#[test]
fn remove_policy_drops_expired_particles() {
    let mut field = ParticleField::new(spec(FadeRule::LifeRatio, ExpirePolicy::Remove), canvas(), 1);
    field.spawn(3, |i, _| Particle {
        life_ms: 100.0 + i as f64 * 150.0,
        max_life_ms: 400.0,
        ..Particle::default()
    });
    field.tick(150.0);
    assert_eq!(field.len(), 2);
    field.tick(150.0);
    assert_eq!(field.len(), 1);
    field.tick(150.0);
    assert!(field.is_empty());
}

#[test]
fn recycle_respawns_at_top_edge_with_fresh_life() {
    let mut field = ParticleField::new(
        spec(FadeRule::LifeRatio, ExpirePolicy::Recycle(RespawnEdge::Top)),
        canvas(),
        1,
    );
    field.spawn(1, |_, _| Particle {
        position: Point::new(400.0, 300.0),
        life_ms: 10.0,
        max_life_ms: 5000.0,
        ..Particle::default()
    });
    field.tick(20.0);
    let p = field.iter().next().unwrap();
    assert_eq!(field.len(), 1, "recycled, not removed");
    assert_eq!(p.life_ms, p.max_life_ms);
    assert!(p.position.y < 0.0, "re-entered above the top edge");
    assert!((0.0..=800.0).contains(&p.position.x));
}

#[test]
fn recycle_respawns_at_bottom_edge_when_leaving_top() {
    let mut field = ParticleField::new(
        spec(FadeRule::LifeRatio, ExpirePolicy::Recycle(RespawnEdge::Bottom)),
        canvas(),
        1,
    );
    field.spawn(1, |_, _| Particle {
        position: Point::new(100.0, -50.0),
        velocity: Vec2::new(0.0, -1.0),
        life_ms: 5000.0,
        max_life_ms: 5000.0,
        ..Particle::default()
    });
    field.tick(16.0);
    let p = field.iter().next().unwrap();
    assert!(p.position.y > 600.0, "re-entered below the bottom edge");
}

#[test]
fn opacity_never_exceeds_max_opacity() {
    for fade in [
        FadeRule::SinePulse { freq_hz: 2.0 },
        FadeRule::FadeIn { ramp_ms: 300.0 },
        FadeRule::FadeOut { ramp_ms: 300.0 },
        FadeRule::LifeRatio,
    ] {
        let mut field = ParticleField::new(spec(fade, ExpirePolicy::Remove), canvas(), 3);
        field.spawn(8, |_, rng| Particle {
            max_opacity: rng.next_range(0.2, 1.0),
            life_ms: 2000.0,
            max_life_ms: 2000.0,
            ..Particle::default()
        });
        for _ in 0..40 {
            field.tick(16.0);
            for p in field.iter() {
                assert!(p.opacity >= 0.0);
                assert!(p.opacity <= p.max_opacity + 1e-12);
            }
        }
    }
}

#[test]
fn intensity_scales_opacity_and_clamps() {
    let mut field = ParticleField::new(spec(FadeRule::LifeRatio, ExpirePolicy::Remove), canvas(), 1);
    field.spawn(1, |_, _| Particle {
        max_opacity: 0.8,
        life_ms: 1000.0,
        max_life_ms: 1000.0,
        ..Particle::default()
    });
    field.set_intensity(0.5);
    field.tick(0.0);
    let p = field.iter().next().unwrap();
    assert!((p.opacity - 0.4).abs() < 1e-9);

    field.set_intensity(7.0);
    assert_eq!(field.intensity(), 1.0);
    field.set_intensity(-1.0);
    assert_eq!(field.intensity(), 0.0);
}

#[test]
fn fade_out_ramps_to_zero_at_end_of_life() {
    let mut field = ParticleField::new(
        spec(FadeRule::FadeOut { ramp_ms: 200.0 }, ExpirePolicy::Recycle(RespawnEdge::Top)),
        canvas(),
        1,
    );
    field.spawn(1, |_, _| Particle {
        position: Point::new(400.0, 300.0),
        life_ms: 1000.0,
        max_life_ms: 1000.0,
        max_opacity: 1.0,
        ..Particle::default()
    });
    field.tick(800.0);
    let early = field.iter().next().unwrap().opacity;
    assert_eq!(early, 1.0, "before the ramp the particle is fully visible");
    field.tick(100.0);
    let fading = field.iter().next().unwrap().opacity;
    assert!((fading - 0.5).abs() < 1e-9);
}

#[test]
fn truncate_is_idempotent() {
    let mut field = ParticleField::new(spec(FadeRule::LifeRatio, ExpirePolicy::Remove), canvas(), 1);
    field.spawn(10, |_, _| Particle::default());
    field.truncate(6);
    assert_eq!(field.len(), 6);
    field.truncate(6);
    assert_eq!(field.len(), 6);
    field.truncate(20);
    assert_eq!(field.len(), 6, "truncation never grows the field");
}

#[test]
fn clear_empties_and_is_idempotent() {
    let mut field = ParticleField::new(spec(FadeRule::LifeRatio, ExpirePolicy::Remove), canvas(), 1);
    field.spawn(5, |_, _| Particle::default());
    field.clear();
    assert!(field.is_empty());
    field.clear();
    assert!(field.is_empty());
}

#[test]
fn scatter_in_stays_inside_rect() {
    let mut rng = Rng64::new(11);
    let rect = Rect::new(10.0, 20.0, 110.0, 220.0);
    for _ in 0..200 {
        let p = scatter_in(&mut rng, rect);
        assert!((rect.x0..rect.x1).contains(&p.x));
        assert!((rect.y0..rect.y1).contains(&p.y));
    }
}

#[test]
fn ring_around_respects_radius_and_jitter() {
    let mut rng = Rng64::new(13);
    let center = Point::new(50.0, 50.0);
    for _ in 0..200 {
        let p = ring_around(&mut rng, center, 40.0, 5.0);
        let d = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
        assert!((35.0..=45.0).contains(&d));
    }
}
