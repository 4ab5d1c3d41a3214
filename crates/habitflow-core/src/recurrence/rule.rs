//! Repeat rule vocabulary.
//!
//! Rules arrive from the record store as plain data, so a rule can be
//! malformed (zero frequency, an unit this build does not know, a weekly
//! custom rule with no weekdays). Such rules deserialize fine and simply
//! never occur; [`RepeatRule::validate`] names the defect.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RuleDefect, RuleParseError, ValidationError};

/// Unit a custom rule's frequency counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    Days,
    Weeks,
    Months,
    /// Any unit written by a newer client.
    #[serde(other)]
    Unknown,
}

impl RepeatUnit {
    fn as_label(self) -> &'static str {
        match self {
            RepeatUnit::Days => "days",
            RepeatUnit::Weeks => "weeks",
            RepeatUnit::Months => "months",
            RepeatUnit::Unknown => "unknown",
        }
    }
}

/// Ordered set of weekdays, serialized as `["mon", "wed"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WeekdaySet(BTreeSet<u8>);

impl WeekdaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0.insert(day.num_days_from_monday() as u8);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&(day.num_days_from_monday() as u8))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Weekdays in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().filter_map(|n| weekday_from_index(*n))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl TryFrom<Vec<String>> for WeekdaySet {
    type Error = RuleParseError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        names.iter().map(|name| parse_weekday(name)).collect()
    }
}

impl From<WeekdaySet> for Vec<String> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().map(|d| weekday_label(d).to_string()).collect()
    }
}

fn weekday_from_index(n: u8) -> Option<Weekday> {
    match n {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn parse_weekday(name: &str) -> Result<Weekday, RuleParseError> {
    Weekday::from_str(name.trim()).map_err(|_| RuleParseError::UnknownWeekday(name.to_string()))
}

/// How a recurring item repeats after its anchor date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RepeatRule {
    /// Only on the anchor date.
    #[default]
    None,
    Daily,
    /// Same weekday as the anchor.
    Weekly,
    /// Same day of month as the anchor.
    Monthly,
    Custom {
        frequency: i32,
        unit: RepeatUnit,
        /// Only consulted for `unit = weeks`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weekdays: Option<WeekdaySet>,
    },
}

impl RepeatRule {
    pub fn every_days(frequency: i32) -> Self {
        RepeatRule::Custom {
            frequency,
            unit: RepeatUnit::Days,
            weekdays: None,
        }
    }

    pub fn every_weeks(frequency: i32, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        RepeatRule::Custom {
            frequency,
            unit: RepeatUnit::Weeks,
            weekdays: Some(weekdays.into_iter().collect()),
        }
    }

    pub fn every_months(frequency: i32) -> Self {
        RepeatRule::Custom {
            frequency,
            unit: RepeatUnit::Months,
            weekdays: None,
        }
    }

    /// Checks the rule can produce occurrences at all.
    ///
    /// # Errors
    /// Returns [`ValidationError::MalformedRule`] naming the first defect found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.defect() {
            Some(defect) => Err(ValidationError::MalformedRule(defect)),
            None => Ok(()),
        }
    }

    pub(crate) fn defect(&self) -> Option<RuleDefect> {
        let RepeatRule::Custom {
            frequency,
            unit,
            weekdays,
        } = self
        else {
            return None;
        };

        if *frequency <= 0 {
            return Some(RuleDefect::NonPositiveFrequency(*frequency));
        }
        match unit {
            RepeatUnit::Unknown => Some(RuleDefect::UnknownUnit),
            RepeatUnit::Weeks if weekdays.as_ref().map_or(true, WeekdaySet::is_empty) => {
                Some(RuleDefect::EmptyWeekdays)
            }
            _ => None,
        }
    }

    /// True when a weekly custom rule is anchored on a weekday it never
    /// repeats on, so the anchor date itself is not an occurrence.
    ///
    /// Occurrence semantics are unchanged; this only surfaces the case for
    /// callers that want to warn about it.
    pub fn anchor_weekday_excluded(&self, anchor: NaiveDate) -> bool {
        match self {
            RepeatRule::Custom {
                unit: RepeatUnit::Weeks,
                weekdays: Some(days),
                ..
            } if !days.is_empty() => !days.contains(anchor.weekday()),
            _ => false,
        }
    }

    /// Short label form, e.g. `every:2:weeks:mon,thu`.
    pub fn as_label(&self) -> String {
        match self {
            RepeatRule::None => "none".into(),
            RepeatRule::Daily => "daily".into(),
            RepeatRule::Weekly => "weekly".into(),
            RepeatRule::Monthly => "monthly".into(),
            RepeatRule::Custom {
                frequency,
                unit,
                weekdays,
            } => {
                let mut label = format!("every:{frequency}:{}", unit.as_label());
                if let Some(days) = weekdays {
                    if !days.is_empty() {
                        let names: Vec<&str> = days.iter().map(weekday_label).collect();
                        label.push(':');
                        label.push_str(&names.join(","));
                    }
                }
                label
            }
        }
    }

    /// Parse the label form.
    ///
    /// Formats:
    /// - `"none"`, `"daily"`, `"weekly"`, `"monthly"`
    /// - `"every:3:days"`
    /// - `"every:2:weeks:mon,wed"`
    /// - `"every:6:months"`
    pub fn parse(s: &str) -> Result<Self, RuleParseError> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "none" => return Ok(RepeatRule::None),
            "daily" => return Ok(RepeatRule::Daily),
            "weekly" => return Ok(RepeatRule::Weekly),
            "monthly" => return Ok(RepeatRule::Monthly),
            _ => {}
        }

        let Some(rest) = lower.strip_prefix("every:") else {
            return Err(RuleParseError::Unrecognized(s.to_string()));
        };
        let mut parts = rest.splitn(3, ':');
        let frequency_str = parts.next().unwrap_or_default();
        let frequency: i32 = frequency_str
            .parse()
            .map_err(|_| RuleParseError::InvalidFrequency(frequency_str.to_string()))?;
        let unit = match parts.next() {
            Some("days") => RepeatUnit::Days,
            Some("weeks") => RepeatUnit::Weeks,
            Some("months") => RepeatUnit::Months,
            Some(other) => return Err(RuleParseError::UnknownUnit(other.to_string())),
            None => return Err(RuleParseError::Unrecognized(s.to_string())),
        };
        let weekdays = match parts.next() {
            Some(list) if !list.is_empty() => Some(
                list.split(',')
                    .map(parse_weekday)
                    .collect::<Result<WeekdaySet, _>>()?,
            ),
            _ => None,
        };

        Ok(RepeatRule::Custom {
            frequency,
            unit,
            weekdays,
        })
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_label())
    }
}

impl FromStr for RepeatRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
