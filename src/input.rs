/// Logical input actions, decoupled from physical keys.
///
/// The front-end decides which keys map to which action; the simulation
/// only ever sees an `InputState` snapshot.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Roll,
    /// "Down": combined with a jump while airborne to ground-pound.
    GroundPound,
    /// "Up": hold near a vine's free end to grab it.
    Grab,
    SwitchCharacter,
    Dash,
    Pause,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Roll,
        Action::GroundPound,
        Action::Grab,
        Action::SwitchCharacter,
        Action::Dash,
        Action::Pause,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

const ACTION_COUNT: usize = Action::ALL.len();

/// Held / just-pressed state for every action.
///
/// `was_pressed` is edge-triggered against the previous frame.  The frame
/// driver must call `end_frame` exactly once per frame, after the
/// simulation has consumed the snapshot, so each press fires once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: [bool; ACTION_COUNT],
    previous: [bool; ACTION_COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held[action.index()] = true;
    }

    pub fn release(&mut self, action: Action) {
        self.held[action.index()] = false;
    }

    pub fn set_held(&mut self, action: Action, held: bool) {
        self.held[action.index()] = held;
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Held now but not on the previous frame.
    pub fn was_pressed(&self, action: Action) -> bool {
        self.held[action.index()] && !self.previous[action.index()]
    }

    /// Horizontal axis from the two move actions: -1, 0 or +1.
    pub fn horizontal(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(Action::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_held(Action::MoveRight) {
            axis += 1.0;
        }
        axis
    }

    /// Latch the current held set as "previous".  Call once per frame.
    pub fn end_frame(&mut self) {
        self.previous = self.held;
    }

    pub fn clear(&mut self) {
        self.held = [false; ACTION_COUNT];
        self.previous = [false; ACTION_COUNT];
    }
}
