//! Date constraints evaluated against the time of a write.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::Error;

/// A constraint on one timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalRule {
    /// `value >= now`.
    NotBefore,
    /// `value > now`.
    After,
    /// `value <= now`.
    NotAfter,
    /// Same UTC calendar day as `now`; the value is normalised to UTC midnight.
    SameUtcDay,
}

/// Evaluates [`TemporalRule`]s against a single instant read once per write.
#[derive(Debug, Clone, Copy)]
pub struct TemporalRuleEvaluator {
    now: DateTime<Utc>,
}

impl TemporalRuleEvaluator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Check `value` against `rule`, returning the value to store.
    pub fn evaluate(
        &self,
        rule: TemporalRule,
        field: &str,
        value: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, Error> {
        match rule {
            TemporalRule::NotBefore if value < self.now => {
                Err(Error::invalid_field(field, "must not be in the past"))
            }
            TemporalRule::After if value <= self.now => {
                Err(Error::invalid_field(field, "must be in the future"))
            }
            TemporalRule::NotAfter if value > self.now => {
                Err(Error::invalid_field(field, "must not be in the future"))
            }
            TemporalRule::SameUtcDay => {
                let day = value.date_naive();
                if day == self.now.date_naive() {
                    Ok(utc_midnight(day))
                } else {
                    Err(Error::invalid_field(field, "must be today (UTC)"))
                }
            }
            _ => Ok(value),
        }
    }

    /// [`Self::evaluate`] for a field that is only present in some patches.
    pub fn evaluate_present(
        &self,
        rule: TemporalRule,
        field: &str,
        value: Option<DateTime<Utc>>,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        value
            .map(|value| self.evaluate(rule, field, value))
            .transpose()
    }
}

/// Start of `day` in UTC.
pub fn utc_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
