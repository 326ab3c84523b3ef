//! Gain envelope built from scheduled automation events.
//!
//! Events are absolute times in seconds on the engine clock. A ramp event
//! interpolates from the previous event's (time, value) to its own.

/// One scheduled automation point.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Automation {
    /// Jump to `value` at `time`.
    Set { time: f64, value: f64 },
    /// Linear ramp ending at `value` at `time`.
    Linear { time: f64, value: f64 },
    /// Exponential ramp ending at `value` at `time`. `value` must be > 0.
    Exponential { time: f64, value: f64 },
}

impl Automation {
    fn time(&self) -> f64 {
        match *self {
            Automation::Set { time, .. }
            | Automation::Linear { time, .. }
            | Automation::Exponential { time, .. } => time,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            Automation::Set { value, .. }
            | Automation::Linear { value, .. }
            | Automation::Exponential { value, .. } => value,
        }
    }
}

/// A gain parameter driven by a timeline of automation events.
#[derive(Debug, Clone)]
pub struct GainAutomation {
    initial: f64,
    events: Vec<Automation>,
}

impl GainAutomation {
    pub fn new(initial: f64) -> Self {
        GainAutomation {
            initial,
            events: Vec::new(),
        }
    }

    pub fn set_value_at(&mut self, value: f64, time: f64) {
        self.insert(Automation::Set { time, value });
    }

    pub fn linear_ramp_to(&mut self, value: f64, end_time: f64) {
        self.insert(Automation::Linear { time: end_time, value });
    }

    /// Exponential ramps cannot reach zero; non-positive targets are
    /// clamped to `f64::MIN_POSITIVE`.
    pub fn exponential_ramp_to(&mut self, value: f64, end_time: f64) {
        let value = value.max(f64::MIN_POSITIVE);
        self.insert(Automation::Exponential { time: end_time, value });
    }

    /// Drop every event at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    /// Drop every event at or after `time`, pinning the value the
    /// curve had at that instant so later ramps start from it.
    pub fn cancel_and_hold_at(&mut self, time: f64) {
        let held = self.value_at(time);
        self.cancel_scheduled_values(time);
        self.set_value_at(held, time);
    }

    /// Value of the curve at `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        let mut prev_time = 0.0;
        let mut prev_value = self.initial;

        for event in &self.events {
            let end = event.time();
            if end <= time {
                prev_time = end;
                prev_value = event.value();
                continue;
            }
            return match *event {
                Automation::Set { .. } => prev_value,
                Automation::Linear { value, .. } => {
                    let t = (time - prev_time) / (end - prev_time);
                    prev_value + (value - prev_value) * t
                }
                Automation::Exponential { value, .. } => {
                    // The start must also be positive; a ramp out of
                    // silence begins at the smallest representable level.
                    let from = prev_value.max(f64::MIN_POSITIVE);
                    let t = (time - prev_time) / (end - prev_time);
                    from * (value / from).powf(t)
                }
            };
        }
        prev_value
    }

    fn insert(&mut self, event: Automation) {
        // Keep events ordered; equal times keep insertion order.
        let at = self
            .events
            .iter()
            .position(|e| e.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(at, event);
    }
}
