//! Calendar periods used to bucket transactions for reporting.
//!
//! Weekly bins close on Sunday and include it: a week is (Sunday-7, Sunday].
//! Biweekly bins are two of those merged. Their edges fall every 14 days and
//! the first bin closes on the Sunday ending the earliest transaction's week.
//! Month, quarter and year bins follow the calendar.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Period granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Short code, pandas-style (`2W` for biweekly)
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
            Frequency::Biweekly => "2W",
            Frequency::Monthly => "M",
            Frequency::Quarterly => "Q",
            Frequency::Yearly => "Y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let freq = match s.trim().to_lowercase().as_str() {
            "d" | "1d" | "daily" | "day" => Frequency::Daily,
            "w" | "1w" | "w-sun" | "weekly" | "week" => Frequency::Weekly,
            "2w" | "2w-sun" | "biweekly" | "fortnightly" => Frequency::Biweekly,
            "m" | "me" | "monthly" | "month" => Frequency::Monthly,
            "q" | "qe" | "q-dec" | "quarterly" | "quarter" => Frequency::Quarterly,
            "y" | "ye" | "a" | "yearly" | "annual" | "year" => Frequency::Yearly,
            other => {
                return Err(format!(
                    "unknown frequency '{other}' (expected D, W, 2W, M, Q or Y)"
                ));
            }
        };
        Ok(freq)
    }
}

impl TryFrom<String> for Frequency {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.code().to_string()
    }
}

/// An inclusive span of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// Maps dates to the period they fall in for one frequency.
///
/// Biweekly bins depend on the earliest date in the data set, so a binner is
/// built per data set rather than per frequency.
#[derive(Debug, Clone, Copy)]
pub struct PeriodBinner {
    frequency: Frequency,
    first_week_end: NaiveDate,
}

impl PeriodBinner {
    pub fn new(frequency: Frequency, earliest: NaiveDate) -> Self {
        Self {
            frequency,
            first_week_end: week_end(earliest),
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn period_of(&self, date: NaiveDate) -> Period {
        match self.frequency {
            Frequency::Daily => Period {
                start: date,
                end: date,
            },
            Frequency::Weekly => {
                let end = week_end(date);
                Period {
                    start: shift(end, -6),
                    end,
                }
            }
            Frequency::Biweekly => {
                let weeks = (week_end(date) - self.first_week_end).num_days() / 7;
                let bin = (weeks + 1).div_euclid(2);
                let end = shift(self.first_week_end, bin * 14);
                Period {
                    start: shift(end, -13),
                    end,
                }
            }
            Frequency::Monthly => month_span(date, 1, 1),
            Frequency::Quarterly => {
                let first_month = (date.month0() / 3) * 3 + 1;
                month_span(date, first_month, 3)
            }
            Frequency::Yearly => month_span(date, 1, 12),
        }
    }
}

/// The Sunday on or after `date`
fn week_end(date: NaiveDate) -> NaiveDate {
    let to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
    shift(date, to_sunday)
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(TimeDelta::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Span of `months` calendar months starting at `first_month` of `date`'s
/// year (or `date`'s own month when `months == 1`).
fn month_span(date: NaiveDate, first_month: u32, months: u32) -> Period {
    let month = if months == 1 { date.month() } else { first_month };
    let start = NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date);
    let end = start
        .checked_add_months(Months::new(months))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    Period { start, end }
}
