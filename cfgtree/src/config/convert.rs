//! Typed reads of leaf strings.

use std::path::PathBuf;

use camino::Utf8PathBuf;

/// Types that [`crate::Config::get`] can produce from a leaf value.
pub trait FromConfigValue: Sized {
    /// Convert `raw`, or `None` when it does not represent a `Self`.
    fn from_config_value(raw: &str) -> Option<Self>;
}

impl FromConfigValue for String {
    fn from_config_value(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

/// `true` and `false` are read literally; any integer is true unless zero.
impl FromConfigValue for bool {
    fn from_config_value(raw: &str) -> Option<Self> {
        match raw.trim() {
            "true" => Some(true),
            "false" => Some(false),
            other => other.parse::<i128>().ok().map(|number| number != 0),
        }
    }
}

impl FromConfigValue for char {
    fn from_config_value(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromConfigValue for PathBuf {
    fn from_config_value(raw: &str) -> Option<Self> {
        Some(Self::from(raw))
    }
}

impl FromConfigValue for Utf8PathBuf {
    fn from_config_value(raw: &str) -> Option<Self> {
        Some(Self::from(raw))
    }
}

macro_rules! parse_trimmed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

parse_trimmed!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
