//! Command-line selection of configuration files.

use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser};

use crate::config::Config;
use crate::error::ConfigResult;
use crate::factory::{DefaultFactory, FileFactory};
use crate::separator::{ArrayKey, Separator};

/// Arguments naming the configuration files to load.
///
/// Flatten this into an application's own `clap` parser, then hand it to
/// [`InitFactory::from_parsed`].
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Configuration file (repeat or list several; later files win).
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        num_args = 1..,
        action = ArgAction::Append,
        required = true
    )]
    pub config: Vec<Utf8PathBuf>,
    /// Character separating path segments.
    #[arg(long, value_name = "CHAR", default_value_t = '.')]
    pub separator: char,
    /// Character marking anonymous array entries.
    #[arg(long = "array-key", value_name = "CHAR", default_value_t = '.')]
    pub array_key: char,
}

#[derive(Debug, Parser)]
#[command(about = "Merge configuration documents and expand their macros")]
#[command(version)]
struct InitCli {
    #[command(flatten)]
    config: ConfigArgs,
}

/// Builds a configuration from files named on the command line.
///
/// # Examples
///
/// ```
/// use cfgtree::InitFactory;
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let factory = InitFactory::from_args(["app", "-c", "base.json", "override.xml"])?;
/// assert_eq!(factory.files().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct InitFactory {
    files: FileFactory,
}

impl InitFactory {
    /// Parse `args` (including the program name).
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::CliParsing`] for invalid arguments and
    /// for `--help`/`--version`; see [`crate::is_display_request`].
    pub fn from_args<I, T>(args: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_parsed(&InitCli::try_parse_from(args)?.config))
    }

    /// Use arguments that were already parsed.
    #[must_use]
    pub fn from_parsed(args: &ConfigArgs) -> Self {
        let factory = DefaultFactory::new()
            .with_separator(Separator::new(args.separator))
            .with_array_key(ArrayKey::new(args.array_key));
        Self {
            files: FileFactory::new(args.config.iter().cloned()).with_factory(factory),
        }
    }

    /// The selected files, in merge order.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        self.files.files()
    }

    /// Read, merge and expand the selected files.
    ///
    /// # Errors
    ///
    /// See [`FileFactory::create`].
    pub fn create(&self) -> ConfigResult<Config> {
        self.files.create()
    }
}
