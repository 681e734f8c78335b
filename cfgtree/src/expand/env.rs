//! `%env.NAME%` substitution on raw document text.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use regex::Regex;
use tracing::trace;

use super::ContentExpander;
use crate::error::{ConfigError, ConfigResult};

/// Source of environment variables.
pub trait EnvLookup {
    /// Value of `name`, or `None` when unset.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: BuildHasher> EnvLookup for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

const ENV_MACRO: &str = "%env\\.(?P<name>[^%]+)%";

/// Replaces every `%env.NAME%` with the variable's value.
///
/// Unset variables leave the macro text untouched.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use cfgtree::{ContentExpander, EnvExpander};
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let env = HashMap::from([("RUNTIME".to_owned(), "/root".to_owned())]);
/// let expander = EnvExpander::new(env)?;
/// assert_eq!(expander.expand("%env.RUNTIME%/data"), "/root/data");
/// assert_eq!(expander.expand("%env.MISSING%/data"), "%env.MISSING%/data");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EnvExpander<L> {
    env: L,
    pattern: Regex,
}

impl<L: EnvLookup> EnvExpander<L> {
    /// Create an expander reading variables from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the macro regex fails to
    /// compile.
    pub fn new(env: L) -> ConfigResult<Self> {
        let pattern =
            Regex::new(ENV_MACRO).map_err(|err| ConfigError::invalid_pattern(ENV_MACRO, err))?;
        Ok(Self { env, pattern })
    }
}

impl<L: EnvLookup> ContentExpander for EnvExpander<L> {
    fn expand(&self, contents: &str) -> String {
        self.pattern
            .replace_all(contents, |caps: &regex::Captures<'_>| {
                let name = caps.name("name").map_or("", |m| m.as_str());
                self.env.lookup(name).map_or_else(
                    || caps.get(0).map_or_else(String::new, |m| m.as_str().to_owned()),
                    |value| {
                        trace!(name, "substituted environment variable");
                        value
                    },
                )
            })
            .into_owned()
    }
}
