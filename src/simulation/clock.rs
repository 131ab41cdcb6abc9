//! Simulated clock and speed tiers
//!
//! The clock never runs backwards. One real second at 1x is one simulated
//! minute, so a full day at 15x takes 96 real seconds.

use std::fmt;

pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

/// Simulated seconds that pass per real second at 1x
pub const SIM_SECONDS_PER_REAL_SECOND: f64 = 60.0;

/// Every speed the clock can run at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum GameSpeed {
    Paused,
    One,
    Two,
    Six,
    Fifteen,
}

impl GameSpeed {
    pub fn multiplier(self) -> f32 {
        match self {
            GameSpeed::Paused => 0.0,
            GameSpeed::One => 1.0,
            GameSpeed::Two => 2.0,
            GameSpeed::Six => 6.0,
            GameSpeed::Fifteen => 15.0,
        }
    }
}

impl fmt::Display for GameSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameSpeed::Paused => write!(f, "paused"),
            speed => write!(f, "{}x", speed.multiplier()),
        }
    }
}

/// Maps numbered speed buttons (1-based) onto the tiers a deployment enables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedControl {
    tiers: Vec<GameSpeed>,
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self::new(vec![GameSpeed::One, GameSpeed::Six, GameSpeed::Fifteen])
    }
}

impl SpeedControl {
    pub fn new(tiers: Vec<GameSpeed>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[GameSpeed] {
        &self.tiers
    }

    /// Tier bound to `button`, or `None` if no tier is bound to it
    pub fn button(&self, button: usize) -> Option<GameSpeed> {
        button.checked_sub(1).and_then(|i| self.tiers.get(i).copied())
    }
}

#[derive(Debug, Clone)]
pub struct SimClock {
    /// Seconds since midnight of day 0
    seconds: f64,
    speed: GameSpeed,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl SimClock {
    pub fn new(start_seconds: f64) -> Self {
        Self {
            seconds: start_seconds.max(0.0),
            speed: GameSpeed::One,
        }
    }

    /// Clock starting at the given wall time on day 0
    pub fn at(hour: u32, minute: u32) -> Self {
        Self::new(f64::from(hour) * 3600.0 + f64::from(minute) * 60.0)
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.speed = speed;
    }

    pub fn multiplier(&self) -> f32 {
        self.speed.multiplier()
    }

    /// Advance by `delta_secs` of real time scaled by the current speed
    pub fn advance(&mut self, delta_secs: f32) {
        let step =
            SIM_SECONDS_PER_REAL_SECOND * f64::from(delta_secs) * f64::from(self.multiplier());
        self.seconds += step.max(0.0);
    }

    pub fn day(&self) -> u64 {
        (self.seconds / SECONDS_PER_DAY) as u64
    }

    /// Hours since midnight of the current day, with minutes and seconds as a fraction
    pub fn time_of_day_hours(&self) -> f64 {
        self.seconds.rem_euclid(SECONDS_PER_DAY) / 3600.0
    }

    /// 24h `HH:MM`, the format the host clock displays
    pub fn format_hhmm(&self) -> String {
        let minutes = (self.seconds.rem_euclid(SECONDS_PER_DAY) / 60.0) as u64;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Parse an `HH:MM` wall time into seconds since midnight
pub fn parse_hhmm(text: &str) -> Result<f64, String> {
    let (hours, minutes) = text
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{text}'"))?;
    let hours: u32 = hours
        .trim()
        .parse()
        .map_err(|_| format!("invalid hour in '{text}'"))?;
    let minutes: u32 = minutes
        .trim()
        .parse()
        .map_err(|_| format!("invalid minute in '{text}'"))?;
    if hours > 23 || minutes > 59 {
        return Err(format!("'{text}' is not a valid time of day"));
    }
    Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_real_second_is_one_simulated_minute() {
        let mut clock = SimClock::at(8, 0);
        clock.advance(1.0);
        assert_eq!(clock.format_hhmm(), "08:01");

        clock.set_speed(GameSpeed::Fifteen);
        clock.advance(1.0);
        assert_eq!(clock.format_hhmm(), "08:16");
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut clock = SimClock::at(17, 30);
        clock.set_speed(GameSpeed::Paused);
        clock.advance(10.0);
        assert_eq!(clock.time_of_day_hours(), 17.5);
    }

    #[test]
    fn clock_wraps_time_of_day_but_not_timestamp() {
        let mut clock = SimClock::at(23, 59);
        clock.advance(2.0);
        assert_eq!(clock.format_hhmm(), "00:01");
        assert_eq!(clock.day(), 1);
        assert!(clock.seconds() > SECONDS_PER_DAY);
    }

    #[test]
    fn buttons_map_onto_active_tiers() {
        let control = SpeedControl::new(vec![GameSpeed::Paused, GameSpeed::One, GameSpeed::Two]);
        assert_eq!(control.button(1), Some(GameSpeed::Paused));
        assert_eq!(control.button(3), Some(GameSpeed::Two));
        assert_eq!(control.button(0), None);
        assert_eq!(control.button(4), None);
    }

    #[test]
    fn parses_wall_times() {
        assert_eq!(parse_hhmm("08:30"), Ok(30600.0));
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("noon").is_err());
    }
}
