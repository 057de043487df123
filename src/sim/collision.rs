//! Collision detection and response
//!
//! Brute-force distance checks between the player sphere and every live
//! object. Object counts per lane segment are small, so no spatial index.

use glam::Vec3;

use super::state::{EndReason, ObjectKind, RunEvent, RunState};
use crate::tuning::ShieldPolicy;

/// What happened when the player touched an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Coin { id: u32, value: u32 },
    PowerUp { id: u32 },
    ShieldBlocked { id: u32 },
    Fatal { id: u32 },
}

/// Squared distance from `p` to the segment `a`-`b`
#[inline]
pub fn segment_distance_squared(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// True if `p` came within `radius` of a player that moved from `from` to `to`.
///
/// Sweeping the whole step keeps a long frame from skipping over objects.
#[inline]
pub fn swept_contact(from: Vec3, to: Vec3, p: Vec3, radius: f32) -> bool {
    segment_distance_squared(from, to, p) < radius * radius
}

/// Pull nearby coins toward the player while magnet is active.
///
/// A coin never moves past the player in one step.
pub fn apply_magnet(state: &mut RunState, dt: f32) {
    if !state.magnet_active() {
        return;
    }

    let target = state.player.pos;
    let radius = state.tuning.magnet_radius;
    let step = state.tuning.magnet_pull_speed * dt;

    for obj in state.objects.iter_mut() {
        if obj.kind != ObjectKind::Coin {
            continue;
        }
        let to_player = target - obj.pos;
        let dist = to_player.length();
        if dist >= radius || dist == 0.0 {
            continue;
        }
        if dist <= step {
            obj.pos = target;
        } else {
            obj.pos += to_player / dist * step;
        }
    }
}

/// Resolve every contact between the player and the world this tick.
///
/// Distance is measured against the path the player swept since the last
/// tick. Objects are visited in spawn order. Processing stops at the first fatal
/// obstacle, which ends the run; nothing happens unless the run is active.
///
/// Under [`ShieldPolicy::PassThrough`] an obstacle stays in the world, so it
/// reports `ShieldBlocked` on every tick the player overlaps it. If the shield
/// runs out while still overlapping, the next tick's contact is fatal.
pub fn resolve_collisions(state: &mut RunState) -> Vec<Contact> {
    let mut contacts = Vec::new();
    if !state.is_running() {
        return contacts;
    }

    let (from, to) = (state.player.prev_pos, state.player.pos);
    let radius = state.tuning.pickup_radius;

    let mut i = 0;
    while i < state.objects.len() {
        let obj = &state.objects[i];
        if !swept_contact(from, to, obj.pos, radius) {
            i += 1;
            continue;
        }

        let (id, kind) = (obj.id, obj.kind);
        match kind {
            ObjectKind::Coin => {
                let value = state.effects.coin_value();
                state.tokens += value;
                state.objects.remove(i);
                state.push_event(RunEvent::CoinCollected { id, value });
                log::debug!("Coin #{} collected (+{}), tokens {}", id, value, state.tokens);
                contacts.push(Contact::Coin { id, value });
            }
            ObjectKind::PowerUp(power) => {
                let duration = state.tuning.effect_duration(power);
                state.effects.activate(power, duration);
                state.objects.remove(i);
                state.push_event(RunEvent::PowerUpCollected { id, kind: power });
                log::debug!("Power-up {} #{} active for {}s", power.as_str(), id, duration);
                contacts.push(Contact::PowerUp { id });
            }
            ObjectKind::Obstacle if state.shield_active() => {
                match state.tuning.shield_policy {
                    ShieldPolicy::Destroy => {
                        state.objects.remove(i);
                    }
                    ShieldPolicy::PassThrough => i += 1,
                }
                state.push_event(RunEvent::ShieldBlocked { id });
                log::debug!("Shield absorbed obstacle #{}", id);
                contacts.push(Contact::ShieldBlocked { id });
            }
            ObjectKind::Obstacle => {
                contacts.push(Contact::Fatal { id });
                state.end_run(EndReason::ObstacleHit { id });
                break;
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PowerUpKind, RunPhase};
    use crate::tuning::Tuning;

    fn running() -> RunState {
        let mut s = RunState::new(1, Tuning::default());
        s.start_run();
        s.drain_events();
        s
    }

    #[test]
    fn coin_at_player_is_collected() {
        let mut s = running();
        let id = s.place_object(ObjectKind::Coin, s.player.pos);
        let contacts = resolve_collisions(&mut s);
        assert_eq!(contacts, vec![Contact::Coin { id, value: 1 }]);
        assert_eq!(s.tokens, 1);
        assert!(s.objects.is_empty());
    }

    #[test]
    fn double_tokens_doubles_coin_value() {
        let mut s = running();
        s.effects.activate(PowerUpKind::DoubleTokens, 10.0);
        s.place_object(ObjectKind::Coin, s.player.pos);
        resolve_collisions(&mut s);
        assert_eq!(s.tokens, 2);
    }

    #[test]
    fn distant_objects_are_untouched() {
        let mut s = running();
        s.place_object(ObjectKind::Obstacle, Vec3::new(0.0, 0.0, -1.0));
        s.place_object(ObjectKind::Coin, Vec3::new(0.4, 0.0, 0.0));
        assert!(resolve_collisions(&mut s).is_empty());
        assert_eq!(s.objects.len(), 2);
        assert!(s.is_running());
    }

    #[test]
    fn segment_distance() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.0, -4.0);
        assert_eq!(segment_distance_squared(a, b, Vec3::new(1.0, 0.0, -2.0)), 1.0);
        assert_eq!(segment_distance_squared(a, b, Vec3::new(0.0, 0.0, 3.0)), 9.0);
        assert_eq!(segment_distance_squared(a, b, Vec3::new(0.0, 0.0, -6.0)), 4.0);
        assert_eq!(segment_distance_squared(a, a, Vec3::new(0.0, 2.0, 0.0)), 4.0);
    }

    #[test]
    fn long_step_does_not_tunnel() {
        let mut s = running();
        s.player.prev_pos = Vec3::ZERO;
        s.player.pos = Vec3::new(0.0, 0.0, -4.5);
        let id = s.place_object(ObjectKind::Obstacle, Vec3::new(0.1, 0.0, -2.0));
        assert_eq!(resolve_collisions(&mut s), vec![Contact::Fatal { id }]);
    }

    #[test]
    fn jumping_clears_obstacles() {
        let mut s = running();
        s.player.pos.y = 1.0;
        s.player.prev_pos.y = 1.0;
        s.place_object(ObjectKind::Obstacle, Vec3::ZERO);
        assert!(resolve_collisions(&mut s).is_empty());
        assert!(s.is_running());
    }

    #[test]
    fn power_up_activates_its_own_kind() {
        let mut s = running();
        s.place_object(ObjectKind::PowerUp(PowerUpKind::Magnet), s.player.pos);
        resolve_collisions(&mut s);
        assert!(s.magnet_active());
        assert!(!s.shield_active());
        assert_eq!(s.effects.magnet, s.tuning.magnet_duration);
        assert!(s.objects.is_empty());
    }

    #[test]
    fn obstacle_without_shield_ends_run() {
        let mut s = running();
        let id = s.place_object(ObjectKind::Obstacle, s.player.pos);
        let contacts = resolve_collisions(&mut s);
        assert_eq!(contacts, vec![Contact::Fatal { id }]);
        assert_eq!(s.phase, RunPhase::Ended);
        assert!(matches!(
            s.drain_events().last(),
            Some(RunEvent::RunEnded(summary)) if summary.reason == EndReason::ObstacleHit { id }
        ));
    }

    #[test]
    fn shield_destroys_obstacle_by_default() {
        let mut s = running();
        s.effects.activate(PowerUpKind::Shield, 10.0);
        let id = s.place_object(ObjectKind::Obstacle, s.player.pos);
        assert_eq!(resolve_collisions(&mut s), vec![Contact::ShieldBlocked { id }]);
        assert!(s.is_running());
        assert!(s.objects.is_empty());
    }

    #[test]
    fn shield_pass_through_keeps_obstacle() {
        let mut s = running();
        s.tuning.shield_policy = ShieldPolicy::PassThrough;
        s.effects.activate(PowerUpKind::Shield, 10.0);
        s.place_object(ObjectKind::Obstacle, s.player.pos);
        resolve_collisions(&mut s);
        assert!(s.is_running());
        assert_eq!(s.objects.len(), 1);
    }

    #[test]
    fn pass_through_blocks_every_overlapping_tick() {
        let mut s = running();
        s.tuning.shield_policy = ShieldPolicy::PassThrough;
        s.effects.activate(PowerUpKind::Shield, 10.0);
        let id = s.place_object(ObjectKind::Obstacle, s.player.pos);

        for _ in 0..3 {
            assert_eq!(resolve_collisions(&mut s), vec![Contact::ShieldBlocked { id }]);
        }
        let blocked = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, RunEvent::ShieldBlocked { .. }))
            .count();
        assert_eq!(blocked, 3);

        // Shield gone while still inside the obstacle
        s.effects.clear();
        assert_eq!(resolve_collisions(&mut s), vec![Contact::Fatal { id }]);
        assert_eq!(s.phase, RunPhase::Ended);
    }

    #[test]
    fn processing_stops_at_fatal_hit() {
        let mut s = running();
        let first = s.place_object(ObjectKind::Coin, s.player.pos);
        let obstacle = s.place_object(ObjectKind::Obstacle, s.player.pos);
        let _second_obstacle = s.place_object(ObjectKind::Obstacle, s.player.pos);
        let late_coin = s.place_object(ObjectKind::Coin, s.player.pos);

        let contacts = resolve_collisions(&mut s);
        assert_eq!(
            contacts,
            vec![
                Contact::Coin { id: first, value: 1 },
                Contact::Fatal { id: obstacle }
            ]
        );
        assert_eq!(s.tokens, 1);
        assert!(s.objects.iter().any(|o| o.id == late_coin));

        let ended = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, RunEvent::RunEnded(_)))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn no_processing_when_not_running() {
        let mut s = running();
        s.pause();
        s.place_object(ObjectKind::Coin, s.player.pos);
        assert!(resolve_collisions(&mut s).is_empty());
        assert_eq!(s.tokens, 0);
    }

    #[test]
    fn magnet_pulls_coins_only() {
        let mut s = running();
        s.effects.activate(PowerUpKind::Magnet, 10.0);
        let coin = s.place_object(ObjectKind::Coin, Vec3::new(2.0, 0.0, 0.0));
        let obstacle = s.place_object(ObjectKind::Obstacle, Vec3::new(-2.0, 0.0, 0.0));
        let far = s.place_object(ObjectKind::Coin, Vec3::new(0.0, 0.0, -10.0));

        apply_magnet(&mut s, 0.1);
        let pos = |id: u32| s.objects.iter().find(|o| o.id == id).map(|o| o.pos);
        assert!((pos(coin).unwrap().x - 0.8).abs() < 1e-5);
        assert_eq!(pos(obstacle).unwrap(), Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(pos(far).unwrap(), Vec3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn magnet_does_not_overshoot() {
        let mut s = running();
        s.effects.activate(PowerUpKind::Magnet, 10.0);
        s.place_object(ObjectKind::Coin, Vec3::new(0.5, 0.0, 0.0));
        apply_magnet(&mut s, 1.0);
        assert_eq!(s.objects[0].pos, s.player.pos);
    }

    #[test]
    fn magnet_inactive_leaves_coins() {
        let mut s = running();
        s.place_object(ObjectKind::Coin, Vec3::new(1.0, 0.0, 0.0));
        apply_magnet(&mut s, 1.0);
        assert_eq!(s.objects[0].pos, Vec3::new(1.0, 0.0, 0.0));
    }
}
