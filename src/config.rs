use std::env;
use std::net::SocketAddr;

use chrono::FixedOffset;

use crate::clock::Clock;
use crate::error::AppError;

/// Upper bound for `REMINDER_LEAD_MINUTES`: one year.
pub const MAX_REMINDER_LEAD_MINUTES: i64 = 365 * 24 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub addr: SocketAddr,
    pub utc_offset: Option<FixedOffset>,
    /// 0 disables reminders.
    pub reminder_interval_secs: u64,
    pub reminder_lead_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://planner.db?mode=rwc".to_string());

        let addr = parse_or(&lookup, "PLANNER_ADDR", "127.0.0.1:3000".parse().ok())?;

        let utc_offset = match lookup("PLANNER_UTC_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes: i32 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("PLANNER_UTC_OFFSET_MINUTES is not a number: {}", raw))
                })?;
                let offset = minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        AppError::Config(format!("PLANNER_UTC_OFFSET_MINUTES out of range: {}", raw))
                    })?;
                Some(offset)
            }
            None => None,
        };

        let reminder_interval_secs = parse_or(&lookup, "REMINDER_INTERVAL_SECS", Some(60))?;
        let reminder_lead_minutes: i64 = parse_or(&lookup, "REMINDER_LEAD_MINUTES", Some(60))?;
        if !(0..=MAX_REMINDER_LEAD_MINUTES).contains(&reminder_lead_minutes) {
            return Err(AppError::Config(format!(
                "REMINDER_LEAD_MINUTES must be between 0 and {}: {}",
                MAX_REMINDER_LEAD_MINUTES, reminder_lead_minutes
            )));
        }

        Ok(Self {
            database_url,
            addr,
            utc_offset,
            reminder_interval_secs,
            reminder_lead_minutes,
        })
    }

    pub fn clock(&self) -> Clock {
        match self.utc_offset {
            Some(offset) => Clock::with_offset(offset),
            None => Clock::system(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => default.ok_or_else(|| AppError::Config(format!("{} is not set", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.database_url, "sqlite://planner.db?mode=rwc");
        assert_eq!(config.addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.utc_offset, None);
        assert_eq!(config.reminder_interval_secs, 60);
        assert_eq!(config.reminder_lead_minutes, 60);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PLANNER_ADDR", "0.0.0.0:8080"),
            ("PLANNER_UTC_OFFSET_MINUTES", "-300"),
            ("REMINDER_INTERVAL_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.utc_offset, FixedOffset::west_opt(5 * 3600));
        assert_eq!(config.reminder_interval_secs, 0);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = AppConfig::from_lookup(lookup(&[("REMINDER_LEAD_MINUTES", "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = AppConfig::from_lookup(lookup(&[("PLANNER_UTC_OFFSET_MINUTES", "100000")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = AppConfig::from_lookup(lookup(&[("PLANNER_UTC_OFFSET_MINUTES", "2147483647")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn reminder_lead_must_be_in_range() {
        for raw in ["-5", "9223372036854775807", "525601"] {
            let err = AppConfig::from_lookup(lookup(&[("REMINDER_LEAD_MINUTES", raw)])).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{} accepted", raw);
        }

        let config = AppConfig::from_lookup(lookup(&[("REMINDER_LEAD_MINUTES", "525600")])).unwrap();
        assert_eq!(config.reminder_lead_minutes, MAX_REMINDER_LEAD_MINUTES);
    }
}
