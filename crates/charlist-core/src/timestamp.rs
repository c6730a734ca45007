//! Fixed-format timestamp codec
//!
//! Every timestamp column (`last_opened`, `backup_date`) is stored as text in
//! `yyyy-MM-dd HH:mm:ss`. Values have whole-second precision, so a value
//! produced by [`now`] survives a write/read cycle unchanged.

use crate::errors::CharlistError;
use chrono::{Local, NaiveDateTime, SubsecRound};

/// `yyyy-MM-dd HH:mm:ss`
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

pub fn parse(value: &str) -> Result<NaiveDateTime, CharlistError> {
    NaiveDateTime::parse_from_str(value, FORMAT).map_err(|_| CharlistError::MalformedTimestamp {
        value: value.to_string(),
    })
}

/// Current local wall-clock time truncated to whole seconds
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
