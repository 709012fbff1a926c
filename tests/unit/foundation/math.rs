use super::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..100 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = Rng64::new(1);
    let mut b = Rng64::new(2);
    let same = (0..10).filter(|_| a.next_u64() == b.next_u64()).count();
    assert_eq!(same, 0);
}

#[test]
fn next_f64_01_stays_in_unit_interval() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.next_f64_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn next_range_respects_bounds() {
    let mut rng = Rng64::new(9);
    for _ in 0..1000 {
        let v = rng.next_range(-3.0, 5.0);
        assert!((-3.0..5.0).contains(&v));
    }
}

#[test]
fn clamp01_bounds() {
    assert_eq!(clamp01(-0.5), 0.0);
    assert_eq!(clamp01(0.25), 0.25);
    assert_eq!(clamp01(1.5), 1.0);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
    assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
}

#[test]
fn pulse01_is_zero_at_ends_and_one_at_midpoint() {
    assert!(pulse01(0.0).abs() < 1e-12);
    assert!((pulse01(0.5) - 1.0).abs() < 1e-12);
    assert!(pulse01(1.0).abs() < 1e-12);
    // Out-of-range progress clamps instead of going negative.
    assert!(pulse01(-2.0).abs() < 1e-12);
    assert!(pulse01(3.0).abs() < 1e-12);
}
