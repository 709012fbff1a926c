use super::*;
use crate::foundation::core::Point;

struct Dummy {
    hits: usize,
}

fn bump(s: &mut Dummy, _: &FrameCtx) {
    s.hits += 1;
}

fn noop_render(_: &Dummy, _: &mut SceneCtx) -> StagefxResult<()> {
    Ok(())
}

static TABLE: BehaviorTable<Dummy> = BehaviorTable::new(&[
    BehaviorEntry {
        key: "default-event",
        emotion: Emotion::Calm,
        environment: EnvironmentFlags::INDOORS,
        update: bump,
        render: noop_render,
    },
    BehaviorEntry {
        key: "party-event",
        emotion: Emotion::Excited,
        environment: EnvironmentFlags::PARTY,
        update: bump,
        render: noop_render,
    },
]);

#[test]
fn select_returns_matching_entry() {
    let entry = TABLE.select("party-event");
    assert_eq!(entry.key, "party-event");
    assert_eq!(entry.emotion, Emotion::Excited);
    assert!(entry.environment.celebration);
}

#[test]
fn unknown_key_falls_back_to_first_entry() {
    let entry = TABLE.select("xyz");
    assert_eq!(entry.key, "default-event");
    assert_eq!(entry.emotion, Emotion::Calm);

    let empty = TABLE.select("");
    assert_eq!(empty.key, "default-event");
}

#[test]
fn keys_lists_default_first() {
    let keys: Vec<_> = TABLE.keys().collect();
    assert_eq!(keys, vec!["default-event", "party-event"]);
}

#[test]
fn selected_handlers_are_callable() {
    let entry = TABLE.select("does-not-exist");
    let mut state = Dummy { hits: 0 };
    let frame = FrameCtx {
        time_ms: 0.0,
        delta_ms: 16.0,
        progress: 0.0,
        phase: "progress",
        phase_progress: 0.0,
        origin: Point::new(400.0, 300.0),
    };
    (entry.update)(&mut state, &frame);
    (entry.update)(&mut state, &frame);
    assert_eq!(state.hits, 2);
}

#[test]
fn environment_flag_presets() {
    assert!(!EnvironmentFlags::NONE.indoors);
    assert!(EnvironmentFlags::INDOORS.indoors && !EnvironmentFlags::INDOORS.celebration);
    assert!(EnvironmentFlags::PARTY.indoors && EnvironmentFlags::PARTY.celebration);
    assert!(EnvironmentFlags::OUTDOORS.nature && !EnvironmentFlags::OUTDOORS.indoors);
    assert!(EnvironmentFlags::FESTIVAL.nature && EnvironmentFlags::FESTIVAL.celebration);
}
