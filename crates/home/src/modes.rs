//! Session-wide modes: away mode and automatic lighting

use chrono::NaiveTime;
use serde::Serialize;
use shared::{HomeError, Result};

/// Alarm countdown used when away mode is armed, in milliseconds.
///
/// Only positive values can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AwayDelay(u64);

impl AwayDelay {
    pub fn new(millis: i64) -> Result<Self> {
        if millis <= 0 {
            return Err(HomeError::InvalidDelay(millis));
        }
        Ok(Self(millis as u64))
    }

    pub fn millis(&self) -> u64 {
        self.0
    }
}

/// Daily period during which away lights are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl LightWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether `time` falls inside the window. Windows may wrap past midnight.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// Away mode state kept by the session. Timers are driven by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwayMode {
    pub enabled: bool,
    pub delay: Option<AwayDelay>,
    pub light_window: Option<LightWindow>,
}

/// Every session-wide flag
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSettings {
    pub away: AwayMode,
    pub auto_light: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_delay_must_be_positive() {
        assert_eq!(AwayDelay::new(30_000).unwrap().millis(), 30_000);
        assert!(matches!(AwayDelay::new(0), Err(HomeError::InvalidDelay(0))));
        assert!(matches!(AwayDelay::new(-5), Err(HomeError::InvalidDelay(-5))));
    }

    #[test]
    fn test_light_window_same_day() {
        let window = LightWindow::new(at(18, 0), at(23, 0));
        assert!(window.contains(at(20, 30)));
        assert!(!window.contains(at(23, 0)));
        assert!(!window.contains(at(7, 0)));
    }

    #[test]
    fn test_light_window_wraps_midnight() {
        let window = LightWindow::new(at(22, 0), at(6, 0));
        assert!(window.contains(at(23, 0)));
        assert!(window.contains(at(2, 0)));
        assert!(!window.contains(at(12, 0)));
    }

    #[test]
    fn test_defaults() {
        let settings = ModeSettings::default();
        assert!(!settings.away.enabled);
        assert!(!settings.auto_light);
        assert!(settings.away.delay.is_none());
    }
}
