//! US state and territory postal codes for `us_states` matching.

use std::sync::LazyLock;

use regex::Regex;

/// The 50 states, the District of Columbia and the 5 inhabited territories.
pub const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", //
    "DC", //
    "AS", "GU", "MP", "PR", "VI",
];

/// Case-insensitive full match against [`US_STATE_CODES`].
pub(crate) static US_STATES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\A(?:{})\z", US_STATE_CODES.join("|")))
        .expect("Invalid US states regex")
});
