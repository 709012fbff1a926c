use super::*;
use crate::engine::particle::{ExpirePolicy, FadeRule, FieldSpec, Particle, ParticleField};
use crate::foundation::core::Canvas;

fn field(caps: QualityCaps) -> ParticleField {
    let spec = FieldSpec {
        name: "test-field",
        motion_scale: 1.0,
        gravity: None,
        fade: FadeRule::LifeRatio,
        expire: ExpirePolicy::Remove,
        caps,
        flutter: None,
    };
    let mut f = ParticleField::new(spec, Canvas::default(), 1);
    f.spawn(caps.high, |_, _| Particle::default());
    f
}

#[test]
fn parse_and_as_str_are_inverse() {
    for level in [QualityLevel::Low, QualityLevel::Medium, QualityLevel::High] {
        assert_eq!(QualityLevel::parse(level.as_str()), Some(level));
    }
    assert_eq!(QualityLevel::parse("ultra"), None);
    assert_eq!(QualityLevel::parse(""), None);
}

#[test]
fn default_level_is_high() {
    assert_eq!(QualityLevel::default(), QualityLevel::High);
    assert_eq!(QualityController::new().level(), QualityLevel::High);
}

#[test]
fn caps_map_per_tier() {
    let caps = QualityCaps::new(5, 8, 12);
    assert_eq!(caps.cap(QualityLevel::Low), 5);
    assert_eq!(caps.cap(QualityLevel::Medium), 8);
    assert_eq!(caps.cap(QualityLevel::High), 12);
}

#[test]
fn apply_truncates_each_field_to_its_own_cap() {
    let mut a = field(QualityCaps::new(3, 6, 10));
    let mut b = field(QualityCaps::new(2, 4, 8));
    let mut ctl = QualityController::new();
    ctl.apply(QualityLevel::Low, &mut [&mut a, &mut b]);
    assert_eq!(ctl.level(), QualityLevel::Low);
    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 2);
}

#[test]
fn raising_the_level_never_resurrects_particles() {
    let mut f = field(QualityCaps::new(3, 6, 10));
    let mut ctl = QualityController::new();
    ctl.apply(QualityLevel::Low, &mut [&mut f]);
    assert_eq!(f.len(), 3);
    // Truncation is lossy; going back up only raises the ceiling.
    ctl.apply(QualityLevel::High, &mut [&mut f]);
    assert_eq!(ctl.level(), QualityLevel::High);
    assert_eq!(f.len(), 3);
}

#[test]
fn reapplying_the_same_level_is_a_no_op() {
    let mut f = field(QualityCaps::new(3, 6, 10));
    let mut ctl = QualityController::new();
    ctl.apply(QualityLevel::Medium, &mut [&mut f]);
    assert_eq!(f.len(), 6);
    ctl.apply(QualityLevel::Medium, &mut [&mut f]);
    assert_eq!(f.len(), 6);
}
