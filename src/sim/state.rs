//! Run state and core simulation types
//!
//! Everything a run needs lives in [`RunState`]; there is no global state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::effects::ActiveEffects;
use super::rng::SimRng;
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run yet; waiting for start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-run; nothing advances
    Paused,
    /// Run over; state kept for display until restart
    Ended,
}

/// Power-up effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Shield,
    DoubleTokens,
    Magnet,
    SlowMotion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::DoubleTokens,
        PowerUpKind::Magnet,
        PowerUpKind::SlowMotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::DoubleTokens => "double",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::SlowMotion => "slow",
        }
    }
}

/// What a world object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Coin,
    PowerUp(PowerUpKind),
    Obstacle,
}

/// A coin, power-up or obstacle on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec3,
}

/// The player's sphere
///
/// `pos.x` is the lane offset, `pos.y` the height above the track and
/// `pos.z` the forward distance (decreasing while running).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Position at the start of the last tick (collision sweep start)
    pub prev_pos: Vec3,
    /// Lateral slide velocity applied on the last tick
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            prev_pos: Vec3::ZERO,
            vx: 0.0,
            vy: 0.0,
            on_ground: true,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Touched an obstacle without a shield
    ObstacleHit { id: u32 },
    /// Slid off the lane edge or dropped below the track
    FellOff,
    /// Host stopped the run
    Stopped,
}

/// Final numbers of a finished run, handed to score persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: u64,
    pub tokens: u32,
    /// Forward distance covered
    pub distance: f32,
    /// Running time in seconds (pauses excluded)
    pub duration: f32,
    pub reason: EndReason,
}

/// Things that happened during a tick, for audio/UI/persistence hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    RunStarted { seed: u64 },
    Jumped,
    CoinCollected { id: u32, value: u32 },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    ShieldBlocked { id: u32 },
    EffectExpired { kind: PowerUpKind },
    Paused,
    Resumed,
    RunEnded(RunSummary),
}

/// Pending events kept when the host never drains them
pub const MAX_PENDING_EVENTS: usize = 256;

/// Read-only view of a run returned by every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub phase: RunPhase,
    pub running: bool,
    pub score: f64,
    pub tokens: u32,
    pub distance: f32,
    pub player: Player,
    pub effects: ActiveEffects,
    pub object_count: usize,
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Seed of the current run; replaying it with the same inputs reproduces the run
    pub seed: u64,
    pub rng: SimRng,
    pub tuning: Tuning,
    pub phase: RunPhase,
    /// Accumulated score; hosts display `floor(score)`
    pub score: f64,
    pub tokens: u32,
    /// Running time of the current run (seconds)
    pub run_time: f64,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    pub player: Player,
    /// Live objects in spawn (id) order
    pub objects: Vec<WorldObject>,
    pub effects: ActiveEffects,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<RunEvent>,
    /// Runs started on this state
    #[serde(default)]
    pub runs_started: u32,
    /// Next entity ID
    next_id: u32,
}

impl RunState {
    /// Create an idle run with the given seed and (validated) tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: SimRng::new(seed),
            tuning,
            phase: RunPhase::Idle,
            score: 0.0,
            tokens: 0,
            run_time: 0.0,
            time_ticks: 0,
            player: Player::default(),
            objects: Vec::new(),
            effects: ActiveEffects::default(),
            events: Vec::new(),
            runs_started: 0,
            next_id: 1,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Forward distance covered this run
    pub fn distance(&self) -> f32 {
        -self.player.pos.z
    }

    /// Forward speed after slow motion
    pub fn effective_speed(&self) -> f32 {
        self.tuning.forward_speed * self.effects.speed_multiplier(self.tuning.slow_motion_factor)
    }

    pub fn shield_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::Shield)
    }

    pub fn magnet_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::Magnet)
    }

    pub fn double_tokens_active(&self) -> bool {
        self.effects.is_active(PowerUpKind::DoubleTokens)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put an object into the world and return its ID
    pub fn place_object(&mut self, kind: ObjectKind, pos: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.objects.push(WorldObject { id, kind, pos });
        id
    }

    /// Start a run from Idle or Ended. Returns false if a run is already
    /// in progress (running or paused).
    pub fn start_run(&mut self) -> bool {
        match self.phase {
            RunPhase::Idle | RunPhase::Ended => {
                self.begin();
                true
            }
            RunPhase::Running | RunPhase::Paused => {
                log::warn!("start_run ignored: run already in progress ({:?})", self.phase);
                false
            }
        }
    }

    /// Throw away the current run (whatever its phase) and start a fresh one
    pub fn restart(&mut self) {
        self.begin();
    }

    /// Back to Idle with an empty world
    pub fn reset(&mut self) {
        self.clear_run();
        self.phase = RunPhase::Idle;
    }

    /// Freeze a running run. Returns true if the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Paused;
            self.push_event(RunEvent::Paused);
            log::debug!("Run paused at score {}", self.score.floor());
            true
        } else {
            false
        }
    }

    /// Continue a paused run. Returns true if the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase == RunPhase::Paused {
            self.phase = RunPhase::Running;
            self.push_event(RunEvent::Resumed);
            log::debug!("Run resumed");
            true
        } else {
            false
        }
    }

    /// Abandon the current run (running or paused) as if it had ended.
    /// Returns true if a run was stopped.
    pub fn stop(&mut self) -> bool {
        if matches!(self.phase, RunPhase::Running | RunPhase::Paused) {
            self.end_run(EndReason::Stopped);
            true
        } else {
            false
        }
    }

    /// Pause button behaviour: flips between Running and Paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            RunPhase::Running => self.pause(),
            RunPhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// End the run, recording the summary for the host
    pub(crate) fn end_run(&mut self, reason: EndReason) {
        if !matches!(self.phase, RunPhase::Running | RunPhase::Paused) {
            return;
        }
        self.phase = RunPhase::Ended;
        let summary = self.summary(reason);
        log::info!(
            "Run ended ({:?}): score {}, tokens {}, distance {:.1}",
            reason,
            summary.score,
            summary.tokens,
            summary.distance
        );
        self.push_event(RunEvent::RunEnded(summary));
    }

    pub fn summary(&self, reason: EndReason) -> RunSummary {
        RunSummary {
            seed: self.seed,
            score: self.score.floor() as u64,
            tokens: self.tokens,
            distance: self.distance(),
            duration: self.run_time as f32,
            reason,
        }
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            phase: self.phase,
            running: self.is_running(),
            score: self.score,
            tokens: self.tokens,
            distance: self.distance(),
            player: self.player,
            effects: self.effects,
            object_count: self.objects.len(),
        }
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: RunEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Ensure objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }

    fn clear_run(&mut self) {
        self.score = 0.0;
        self.tokens = 0;
        self.run_time = 0.0;
        self.time_ticks = 0;
        self.player = Player::default();
        self.objects.clear();
        self.effects.clear();
        self.next_id = 1;
    }

    /// Every run gets its own seed and a rewound stream. The first run uses
    /// the seed the state was created with; later ones draw theirs from the
    /// previous stream, so a whole session is still reproducible.
    fn begin(&mut self) {
        if self.runs_started > 0 {
            self.seed = self.rng.next_seed();
        }
        self.rng.reseed(self.seed);
        self.runs_started = self.runs_started.saturating_add(1);
        self.clear_run();
        self.phase = RunPhase::Running;
        self.push_event(RunEvent::RunStarted { seed: self.seed });
        log::info!("Run started (seed {})", self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RunState {
        RunState::new(12345, Tuning::default())
    }

    #[test]
    fn new_state_is_idle_and_empty() {
        let s = state();
        assert_eq!(s.phase, RunPhase::Idle);
        assert!(!s.is_running());
        assert_eq!(s.score, 0.0);
        assert_eq!(s.tokens, 0);
        assert!(s.objects.is_empty());
    }

    #[test]
    fn start_run_resets_everything() {
        let mut s = state();
        assert!(s.start_run());
        s.score = 42.0;
        s.tokens = 7;
        s.player.pos = Vec3::new(1.0, 2.0, -30.0);
        s.place_object(ObjectKind::Coin, Vec3::new(0.0, 0.0, -40.0));
        s.effects.activate(PowerUpKind::Shield, 10.0);
        s.end_run(EndReason::FellOff);
        assert_eq!(s.phase, RunPhase::Ended);

        assert!(s.start_run());
        assert!(s.is_running());
        assert_eq!(s.score, 0.0);
        assert_eq!(s.tokens, 0);
        assert_eq!(s.player, Player::default());
        assert!(s.objects.is_empty());
        assert!(!s.shield_active());
    }

    #[test]
    fn ended_run_keeps_pose_until_next_start() {
        let mut s = state();
        s.start_run();
        s.player.pos = Vec3::new(1.5, 0.0, -30.0);
        s.player.prev_pos = Vec3::new(1.4, 0.0, -29.9);
        s.end_run(EndReason::FellOff);
        assert_eq!(s.player.pos, Vec3::new(1.5, 0.0, -30.0));
        assert_eq!(s.snapshot().distance, 30.0);

        s.start_run();
        assert_eq!(s.player.pos, Vec3::ZERO);
        assert_eq!(s.player.prev_pos, Vec3::ZERO);
    }

    #[test]
    fn each_run_reports_its_own_seed() {
        let mut s = state();
        s.start_run();
        assert_eq!(s.seed, 12345);
        s.stop();
        s.start_run();
        let second = s.seed;
        assert_ne!(second, 12345);
        assert_eq!(s.runs_started, 2);

        let events = s.drain_events();
        assert!(events.contains(&RunEvent::RunStarted { seed: second }));
        let first_summary = events.iter().find_map(|e| match e {
            RunEvent::RunEnded(summary) => Some(summary.seed),
            _ => None,
        });
        assert_eq!(first_summary, Some(12345));

        // The stream restarts at the run's seed
        let mut replay = SimRng::new(second);
        assert_eq!(s.rng.unit(), replay.unit());
    }

    #[test]
    fn run_seeds_are_reproducible() {
        let mut a = state();
        let mut b = state();
        for _ in 0..3 {
            a.restart();
            b.restart();
            assert_eq!(a.seed, b.seed);
        }
    }

    #[test]
    fn start_run_ignored_mid_run() {
        let mut s = state();
        s.start_run();
        s.tokens = 3;
        assert!(!s.start_run());
        assert_eq!(s.tokens, 3);

        s.pause();
        assert!(!s.start_run());
        assert_eq!(s.phase, RunPhase::Paused);
    }

    #[test]
    fn restart_works_from_any_phase() {
        let mut s = state();
        s.start_run();
        s.tokens = 5;
        s.pause();
        s.restart();
        assert!(s.is_running());
        assert_eq!(s.tokens, 0);
    }

    #[test]
    fn pause_resume_toggle() {
        let mut s = state();
        assert!(!s.pause(), "cannot pause while idle");

        s.start_run();
        assert!(s.toggle_pause());
        assert_eq!(s.phase, RunPhase::Paused);
        assert!(!s.pause());
        assert!(s.toggle_pause());
        assert_eq!(s.phase, RunPhase::Running);
        assert!(!s.resume());
    }

    #[test]
    fn end_run_records_summary_once() {
        let mut s = state();
        s.start_run();
        s.drain_events();
        s.score = 12.7;
        s.tokens = 4;
        s.player.pos.z = -20.0;
        s.end_run(EndReason::ObstacleHit { id: 9 });
        s.end_run(EndReason::FellOff);

        let events = s.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RunEvent::RunEnded(summary) => {
                assert_eq!(summary.score, 12);
                assert_eq!(summary.tokens, 4);
                assert_eq!(summary.distance, 20.0);
                assert_eq!(summary.reason, EndReason::ObstacleHit { id: 9 });
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn stop_ends_paused_run() {
        let mut s = state();
        assert!(!s.stop());
        s.start_run();
        s.pause();
        assert!(s.stop());
        assert_eq!(s.phase, RunPhase::Ended);
        assert!(matches!(
            s.drain_events().last(),
            Some(RunEvent::RunEnded(summary)) if summary.reason == EndReason::Stopped
        ));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut s = state();
        s.start_run();
        s.place_object(ObjectKind::Obstacle, Vec3::new(0.0, 0.0, -25.0));
        s.reset();
        assert_eq!(s.phase, RunPhase::Idle);
        assert!(s.objects.is_empty());
    }

    #[test]
    fn entity_ids_are_unique() {
        let mut s = state();
        let a = s.place_object(ObjectKind::Coin, Vec3::ZERO);
        let b = s.place_object(ObjectKind::Coin, Vec3::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn event_queue_is_bounded() {
        let mut s = state();
        for _ in 0..(MAX_PENDING_EVENTS + 10) {
            s.push_event(RunEvent::Jumped);
        }
        assert_eq!(s.events.len(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn state_serializes() {
        let mut s = state();
        s.start_run();
        s.place_object(
            ObjectKind::PowerUp(PowerUpKind::Magnet),
            Vec3::new(1.0, 0.0, -22.0),
        );
        let json = serde_json::to_string(&s).expect("serialize");
        let back: RunState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.objects, s.objects);
        assert_eq!(back.phase, RunPhase::Running);
    }
}
