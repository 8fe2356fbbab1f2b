//! Fixed timestep simulation tick
//!
//! Core game loop that advances a round deterministically.

use super::physics::{self, Contact};
use super::stack;
use super::state::{GameEvent, GameState, RoundPhase};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move platform left (held)
    pub left: bool,
    /// Move platform right (held)
    pub right: bool,
    /// Start / play again (one-shot)
    pub start: bool,
}

impl TickInput {
    /// -1, 0 or 1. Both keys held cancel out.
    pub fn direction(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == RoundPhase::Over {
        return;
    }

    state.time_ticks += 1;

    // Physics, then promote settled pieces
    let mut contacts: Vec<Contact> = Vec::new();
    physics::step(&mut state.pieces, &state.platform, dt, &mut contacts);
    stack::apply_contacts(state, &contacts);

    // 1. Off-field pieces: collapse or quiet loss
    stack::check_bounds(state);

    // 2. Stack growth
    stack::track_stack_growth(state);

    // 3. Platform control
    let config = &state.config;
    state.platform.steer(
        input.direction(),
        config.platform_accel,
        config.platform_max_speed,
        config.field_width,
        dt,
    );

    // 4. Scheduled timers
    if state.spawn_timer.step() {
        state.revive_one();
    }
    if state.countdown_timer.step() {
        state.round.timer = state.round.timer.saturating_sub(1);
        state.events.push(GameEvent::CountdownTick {
            remaining: state.round.timer,
        });
    }

    // 5. Round over
    if state.round.timer == 0 {
        state.phase = RoundPhase::Over;
        log::info!("Round over with score {}", state.round.score);
        state.events.push(GameEvent::RoundOver {
            score: state.round.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::consts::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn count_events(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_collapse_scenario() {
        let config = SessionConfig {
            piece_pool: 5,
            ..Default::default()
        };
        let mut state = GameState::new(&config, 12345).unwrap();
        let slot = state.revive_one().unwrap();
        {
            let piece = state.pieces.get_mut(slot).unwrap();
            piece.stacked = true;
            piece.pos = Vec2::new(300.0, config.field_height + 50.0);
        }
        state.events.clear();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(
            count_events(&state, |e| matches!(e, GameEvent::Collapse { .. })),
            1
        );
        assert_eq!(state.round.stacked_count, 0);
        assert_eq!(state.round.score, 50);
        assert!(!state.pieces.is_alive(slot));
    }

    #[test]
    fn test_piece_lands_and_stacks() {
        let mut state = GameState::new(&SessionConfig::default(), 7).unwrap();
        let slot = state.revive_one().unwrap();
        state.pieces.get_mut(slot).unwrap().pos.x = state.platform.pos.x;

        let mut grew = false;
        for _ in 0..(TICKS_PER_SECOND * 3) {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.events.contains(&GameEvent::StackGrew { count: 1 }) {
                grew = true;
                break;
            }
        }

        assert!(grew);
        assert!(state.pieces.get(slot).unwrap().stacked);
        assert_eq!(state.round.stacked_count, 1);
    }

    #[test]
    fn test_missed_piece_is_lost_without_penalty() {
        let mut state = GameState::new(&SessionConfig::default(), 7).unwrap();
        let slot = state.revive_one().unwrap();
        state.pieces.get_mut(slot).unwrap().pos.x = 60.0;

        let mut lost = false;
        for _ in 0..(TICKS_PER_SECOND * 4) {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.events.contains(&GameEvent::PieceLost { slot }) {
                lost = true;
                break;
            }
        }

        assert!(lost);
        assert_eq!(state.round.score, 0);
    }

    #[test]
    fn test_spawn_timer_revives_pieces() {
        let mut state = GameState::new(&SessionConfig::default(), 99).unwrap();
        let interval = state.config.spawn_interval_ticks();
        for _ in 0..interval {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(
            count_events(&state, |e| matches!(e, GameEvent::PieceSpawned { .. })),
            1
        );
        assert_eq!(state.pieces.count_alive(), 1);
    }

    #[test]
    fn test_countdown_reaches_zero_once() {
        let config = SessionConfig {
            round_seconds: 3,
            ..Default::default()
        };
        let mut state = GameState::new(&config, 1).unwrap();

        let mut remaining = Vec::new();
        let mut round_over = 0;
        for _ in 0..(TICKS_PER_SECOND * 10) {
            tick(&mut state, &TickInput::default(), SIM_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::CountdownTick { remaining: r } => remaining.push(r),
                    GameEvent::RoundOver { .. } => round_over += 1,
                    _ => {}
                }
            }
        }

        assert_eq!(remaining, vec![2, 1, 0]);
        assert_eq!(round_over, 1);
        assert_eq!(state.phase, RoundPhase::Over);
        assert_eq!(state.round.timer, 0);
        assert_eq!(state.time_ticks, u64::from(TICKS_PER_SECOND * 3));
    }

    #[test]
    fn test_round_over_freezes_state() {
        let config = SessionConfig {
            round_seconds: 1,
            ..Default::default()
        };
        let mut state = GameState::new(&config, 1).unwrap();
        for _ in 0..TICKS_PER_SECOND {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.is_playing());

        let platform_x = state.platform.pos.x;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.platform.pos.x, platform_x);
    }

    #[test]
    fn test_direction() {
        let both = TickInput {
            left: true,
            right: true,
            start: false,
        };
        assert_eq!(both.direction(), 0);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        assert_eq!(left.direction(), -1);
    }

    #[test]
    fn test_determinism() {
        let config = SessionConfig::default();
        let mut state1 = GameState::new(&config, 99999).unwrap();
        let mut state2 = GameState::new(&config, 99999).unwrap();

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                ..Default::default()
            },
        ];

        for i in 0..600 {
            let input = &inputs[(i / 40) % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        assert_eq!(state1.events, state2.events);
        assert!((state1.platform.pos.x - state2.platform.pos.x).abs() < 0.0001);
    }

    proptest! {
        #[test]
        fn prop_platform_speed_bounded(inputs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..400)) {
            let config = SessionConfig::default();
            let mut state = GameState::new(&config, 4).unwrap();
            for (left, right) in inputs {
                let input = TickInput { left, right, start: false };
                tick(&mut state, &input, SIM_DT);
                prop_assert!(state.platform.vel_x.abs() <= config.platform_max_speed);
                prop_assert!(state.platform.left() >= 0.0);
                prop_assert!(state.platform.right() <= config.field_width);
            }
        }

        #[test]
        fn prop_timer_never_negative_and_monotonic(ticks in 1u32..2000) {
            let config = SessionConfig { round_seconds: 5, ..Default::default() };
            let mut state = GameState::new(&config, 8).unwrap();
            let mut last = state.round.timer;
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default(), SIM_DT);
                let collapsed = state
                    .drain_events()
                    .iter()
                    .any(|e| matches!(e, GameEvent::Collapse { .. }));
                if !collapsed {
                    prop_assert!(state.round.timer <= last);
                    prop_assert!(last - state.round.timer <= 1);
                }
                last = state.round.timer;
            }
        }
    }
}
