/// Notification hooks the simulation fires while it updates.
///
/// Audio, persistence, achievements and HUD banners all live outside the
/// core and subscribe through `GameHooks`.  Hooks are called synchronously
/// from inside `Simulation::update`, in the order the events happen.

use std::time::Duration;

use crate::entities::{Collectible, CollectibleKind, Enemy, EnemyKind};

/// Subscriber interface.  Every method defaults to a no-op so collaborators
/// only implement what they care about.
pub trait GameHooks {
    fn on_collect(&mut self, _item: &Collectible) {}

    fn on_enemy_defeated(&mut self, _enemy: &Enemy, _combo_count: u32) {}

    fn on_level_complete(&mut self, _final_score: u32, _elapsed: Duration) {}

    fn on_player_died(&mut self, _lives_remaining: u32) {}

    fn on_checkpoint(&mut self, _id: u32) {}

    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Subscriber that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl GameHooks for NoHooks {}

// ── Recorded events ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Collected { kind: CollectibleKind, value: u32 },
    EnemyDefeated { kind: EnemyKind, combo_count: u32 },
    LevelComplete { final_score: u32, elapsed: Duration },
    PlayerDied { lives_remaining: u32 },
    Checkpoint { id: u32 },
    GameOver { final_score: u32 },
}

/// Subscriber that records every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, matches: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }
}

impl GameHooks for EventLog {
    fn on_collect(&mut self, item: &Collectible) {
        self.events.push(GameEvent::Collected {
            kind: item.kind,
            value: item.value,
        });
    }

    fn on_enemy_defeated(&mut self, enemy: &Enemy, combo_count: u32) {
        self.events.push(GameEvent::EnemyDefeated {
            kind: enemy.kind,
            combo_count,
        });
    }

    fn on_level_complete(&mut self, final_score: u32, elapsed: Duration) {
        self.events.push(GameEvent::LevelComplete { final_score, elapsed });
    }

    fn on_player_died(&mut self, lives_remaining: u32) {
        self.events.push(GameEvent::PlayerDied { lives_remaining });
    }

    fn on_checkpoint(&mut self, id: u32) {
        self.events.push(GameEvent::Checkpoint { id });
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.events.push(GameEvent::GameOver { final_score });
    }
}

// ── Fan-out ───────────────────────────────────────────────────────────────────

/// Forwards every hook to a list of borrowed subscribers, in order.
#[derive(Default)]
pub struct HookSet<'a> {
    subscribers: Vec<&'a mut dyn GameHooks>,
}

impl<'a> HookSet<'a> {
    pub fn new() -> Self {
        Self { subscribers: Vec::new() }
    }

    pub fn with(mut self, subscriber: &'a mut dyn GameHooks) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl GameHooks for HookSet<'_> {
    fn on_collect(&mut self, item: &Collectible) {
        for s in self.subscribers.iter_mut() {
            s.on_collect(item);
        }
    }

    fn on_enemy_defeated(&mut self, enemy: &Enemy, combo_count: u32) {
        for s in self.subscribers.iter_mut() {
            s.on_enemy_defeated(enemy, combo_count);
        }
    }

    fn on_level_complete(&mut self, final_score: u32, elapsed: Duration) {
        for s in self.subscribers.iter_mut() {
            s.on_level_complete(final_score, elapsed);
        }
    }

    fn on_player_died(&mut self, lives_remaining: u32) {
        for s in self.subscribers.iter_mut() {
            s.on_player_died(lives_remaining);
        }
    }

    fn on_checkpoint(&mut self, id: u32) {
        for s in self.subscribers.iter_mut() {
            s.on_checkpoint(id);
        }
    }

    fn on_game_over(&mut self, final_score: u32) {
        for s in self.subscribers.iter_mut() {
            s.on_game_over(final_score);
        }
    }
}
