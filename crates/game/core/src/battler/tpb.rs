//! Time progress battle gauge.
//!
//! In the time progress modes every battler owns a charge gauge that fills by
//! an acceleration derived from its agility. A full gauge lets the battler
//! decide actions; a queued action with negative item speed then needs a cast
//! time before it becomes ready. The gauge itself is pure bookkeeping: the
//! battler computes the acceleration and the phase driver reacts to the
//! `Charged`/`Ready` transitions.

/// Gauge phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TpbState {
    #[default]
    Charging,
    Charged,
    Casting,
    Ready,
    Acting,
}

/// Time scale shared by every battler in one battle.
///
/// Accelerations are relative to the party's base speed and divided by the
/// reference time of the active battle system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TpbClock {
    pub base_speed: f64,
    pub reference_time: f64,
}

impl TpbClock {
    pub fn new(base_speed: f64, reference_time: f64) -> Self {
        Self {
            base_speed: if base_speed > 0.0 { base_speed } else { 1.0 },
            reference_time: if reference_time > 0.0 { reference_time } else { 1.0 },
        }
    }

    pub fn relative_speed(&self, speed: f64) -> f64 {
        speed / self.base_speed
    }

    pub fn acceleration(&self, speed: f64) -> f64 {
        self.relative_speed(speed) / self.reference_time
    }
}

impl Default for TpbClock {
    fn default() -> Self {
        Self::new(1.0, 60.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TpbGauge {
    state: TpbState,
    charge_time: f64,
    cast_time: f64,
    idle_time: f64,
    turn_count: u32,
    turn_end: bool,
}

impl TpbGauge {
    pub fn state(&self) -> TpbState {
        self.state
    }

    pub fn charge_time(&self) -> f64 {
        self.charge_time
    }

    pub fn cast_time(&self) -> f64 {
        self.cast_time
    }

    pub fn idle_time(&self) -> f64 {
        self.idle_time
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn is_turn_end(&self) -> bool {
        self.turn_end
    }

    pub fn is_charged(&self) -> bool {
        self.state == TpbState::Charged
    }

    pub fn is_ready(&self) -> bool {
        self.state == TpbState::Ready
    }

    /// One full turn of idle time elapsed without acting.
    pub fn is_timeout(&self) -> bool {
        self.idle_time >= 1.0
    }

    /// Starting charge: `initial` is already scaled by the caller.
    pub fn init_charge_time(&mut self, initial: f64) {
        self.state = TpbState::Charging;
        self.charge_time = initial.clamp(0.0, 1.0);
        self.cast_time = 0.0;
    }

    pub fn init_turn(&mut self) {
        self.turn_count = 0;
        self.idle_time = 0.0;
        self.turn_end = false;
    }

    pub fn clear_charge_time(&mut self) {
        self.state = TpbState::Charging;
        self.charge_time = 0.0;
    }

    /// Penalty for a failed escape: the gauge restarts one full charge behind.
    pub fn apply_penalty(&mut self) {
        self.state = TpbState::Charging;
        self.charge_time -= 1.0;
    }

    /// Advances a charging gauge; returns `true` when it just became full.
    pub fn update_charge(&mut self, acceleration: f64) -> bool {
        if self.state != TpbState::Charging {
            return false;
        }
        self.charge_time += acceleration;
        if self.charge_time >= 1.0 {
            self.charge_time = 1.0;
            self.state = TpbState::Charged;
            return true;
        }
        false
    }

    /// Advances a casting gauge; returns `true` when the cast completed.
    pub fn update_cast(&mut self, acceleration: f64, required: f64) -> bool {
        if self.state != TpbState::Casting {
            return false;
        }
        self.cast_time += acceleration;
        if self.cast_time >= required {
            self.cast_time = required;
            self.state = TpbState::Ready;
            return true;
        }
        false
    }

    pub fn update_idle(&mut self, acceleration: f64) {
        if !self.is_timeout() {
            self.idle_time += acceleration;
        }
    }

    pub fn start_casting(&mut self) {
        self.state = TpbState::Casting;
        self.cast_time = 0.0;
    }

    pub fn start_action(&mut self) {
        self.state = TpbState::Acting;
    }

    /// Opens the battler's own turn once its gauge is full.
    pub fn start_turn(&mut self) {
        self.turn_end = false;
        self.turn_count += 1;
        self.idle_time = 0.0;
    }

    pub fn end_turn(&mut self) {
        self.turn_end = true;
    }

    /// Idle battlers (unable to act) still end a turn every timeout.
    pub fn on_timeout(&mut self) {
        self.turn_end = true;
        self.idle_time = 0.0;
    }

    /// Fraction of the cast completed, for gauge display.
    pub fn cast_ratio(&self, required: f64) -> f64 {
        if required > 0.0 {
            (self.cast_time / required).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
