use logomorph::{
    AnimatedLogo, AnimationPhase, CycleStep, Driver, LogoEvent, LogoState, LogoTiming, ManualClock,
    StarState, TimeMs, Timeline,
};

fn mounted() -> AnimatedLogo {
    let mut logo = AnimatedLogo::new(LogoTiming::default()).unwrap();
    logo.mount(TimeMs::ZERO).unwrap();
    logo
}

fn state_at(t: u64) -> LogoState {
    let mut logo = mounted();
    logo.advance_to(TimeMs(t)).unwrap();
    logo.state()
}

#[test]
fn initial_state_shows_white_star() {
    let s = state_at(0);
    assert_eq!(s, LogoState::INITIAL);
    assert!(s.white_visible());
    assert!(!s.black_visible());
}

#[test]
fn reference_instants_match_state_table() {
    let s = state_at(15_400);
    assert_eq!(
        (s.phase, s.star),
        (AnimationPhase::Collapsing, StarState::Collapsing)
    );
    assert!(s.white_visible());

    let s = state_at(17_400);
    assert_eq!((s.phase, s.star), (AnimationPhase::Emerging, StarState::Black));
    assert!(s.black_visible());

    let s = state_at(19_600);
    assert_eq!((s.phase, s.star), (AnimationPhase::Paused, StarState::Paused));
    assert!(s.black_visible());

    let s = state_at(20_799);
    assert_eq!(s.star, StarState::Paused);
}

#[test]
fn full_cycle_returns_to_initial() {
    let timing = LogoTiming::default();
    assert_eq!(timing.cycle_ms(), 20_800);
    assert_eq!(state_at(20_800), LogoState::INITIAL);
    assert_eq!(state_at(2 * 20_800), LogoState::INITIAL);
}

#[test]
fn exactly_one_star_visible_at_all_times() {
    let mut logo = mounted();
    for t in (0..3 * 20_800).step_by(50) {
        logo.advance_to(TimeMs(t)).unwrap();
        let s = logo.state();
        assert!(s.white_visible() ^ s.black_visible(), "t={t} {s:?}");
    }
}

#[test]
fn cursor_only_moves_while_initial() {
    let mut logo = mounted();
    let mut phase = logo.state().phase;
    let mut ticks = 0;
    for t in (0..3 * 20_800).step_by(100) {
        for event in logo.advance_to(TimeMs(t)).unwrap() {
            match event {
                LogoEvent::Step { state, .. } => phase = state.phase,
                LogoEvent::Cursor { at, .. } => {
                    ticks += 1;
                    assert_eq!(phase, AnimationPhase::Initial, "at={at}");
                }
            }
        }
    }
    assert_eq!(ticks, 18);
}

#[test]
fn driver_reports_every_change_in_order() {
    let mut logo = mounted();
    let mut driver = Driver::new(ManualClock::default());
    let mut times = Vec::new();
    let stats = driver
        .run(&mut logo, TimeMs(20_800), |event| {
            times.push(event.at().0);
            Ok(())
        })
        .unwrap();
    assert_eq!(stats.cursor_ticks, 6);
    assert_eq!(stats.steps, 4);
    assert_eq!(
        times,
        vec![2_200, 4_400, 6_600, 8_800, 11_000, 13_200, 15_400, 17_400, 19_600, 20_800]
    );
}

#[test]
fn component_agrees_with_timeline() {
    let timing = LogoTiming::default();
    let timeline = Timeline::new(timing).unwrap();
    let mut logo = mounted();
    for t in (0..4 * 20_800).step_by(37) {
        logo.advance_to(TimeMs(t)).unwrap();
        let sample = timeline.sample(TimeMs(t));
        assert_eq!(logo.state(), sample.state, "t={t}");
        assert_eq!(logo.step(), sample.step, "t={t}");
        assert_eq!(logo.cycles_completed(), sample.cycle, "t={t}");
    }
}

#[test]
fn component_agrees_with_timeline_on_custom_timing() {
    let timing = LogoTiming {
        showcase_ms: 1_000,
        collapse_ms: 300,
        emerge_ms: 200,
        pause_ms: 100,
        shape_interval_ms: 250,
        morph_ms: 100,
    };
    let timeline = Timeline::new(timing).unwrap();
    // 250 divides 1000 evenly: the tick that would land on 1000 loses to the phase step.
    assert_eq!(timeline.ticks_per_cycle(), 3);

    let mut logo = AnimatedLogo::new(timing).unwrap();
    logo.mount(TimeMs::ZERO).unwrap();
    for t in 0..5 * timing.cycle_ms() {
        logo.advance_to(TimeMs(t)).unwrap();
        assert_eq!(logo.state(), timeline.sample(TimeMs(t)).state, "t={t}");
    }
}

#[test]
fn step_order_is_fixed() {
    let mut step = CycleStep::Showcase;
    let mut seen = Vec::new();
    for _ in 0..4 {
        step = step.next();
        seen.push(step);
    }
    assert_eq!(
        seen,
        vec![
            CycleStep::Collapse,
            CycleStep::Emerge,
            CycleStep::Pause,
            CycleStep::Showcase
        ]
    );
}
