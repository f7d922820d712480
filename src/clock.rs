use chrono::{
    DateTime, FixedOffset, Local, MappedLocalTime, NaiveDate, NaiveDateTime, TimeZone, Utc,
};

/// Local time zone for calendar questions: a pinned offset, or the host zone.
///
/// `Host` resolves the offset separately for every instant, so due dates on
/// the far side of a DST change keep their own wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    Host,
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

impl TimeZone for Zone {
    type Offset = FixedOffset;

    fn from_offset(offset: &FixedOffset) -> Self {
        Zone::Fixed(*offset)
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
        match self {
            Zone::Fixed(offset) => offset.offset_from_local_date(local),
            Zone::Host => Local.offset_from_local_date(local),
        }
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> MappedLocalTime<FixedOffset> {
        match self {
            Zone::Fixed(offset) => offset.offset_from_local_datetime(local),
            Zone::Host => Local.offset_from_local_datetime(local),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        match self {
            Zone::Fixed(offset) => offset.offset_from_utc_date(utc),
            Zone::Host => Local.offset_from_utc_date(utc),
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            Zone::Fixed(offset) => offset.offset_from_utc_datetime(utc),
            Zone::Host => Local.offset_from_utc_datetime(utc),
        }
    }
}

/// Source of "now" and of the local time zone used for calendar questions.
///
/// Handlers and services receive a `Clock` through `AppState` instead of
/// reading the wall clock, so tests can pin both the instant and the zone.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    zone: Zone,
    frozen_at: Option<DateTime<Utc>>,
}

impl Clock {
    /// Wall clock in the host's local zone.
    pub fn system() -> Self {
        Self {
            zone: Zone::Host,
            frozen_at: None,
        }
    }

    /// Wall clock pinned to a fixed UTC offset.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            zone: Zone::Fixed(offset),
            frozen_at: None,
        }
    }

    /// A clock that always reports `at`.
    pub fn frozen(at: DateTime<Utc>, zone: impl Into<Zone>) -> Self {
        Self {
            zone: zone.into(),
            frozen_at: Some(at),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn local_now(&self) -> DateTime<Zone> {
        self.now().with_timezone(&self.zone)
    }

    pub fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }
}
