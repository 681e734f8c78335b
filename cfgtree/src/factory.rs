//! Ready-made builders: the standard pipeline, file lists and command lines.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::builder::ConfigBuilder;
use crate::config::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::expand::{EnvLookup, Pipeline, ProcessEnv};
use crate::separator::{ArrayKey, Separator};

/// Builds configurations with [`Pipeline::standard`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use cfgtree::DefaultFactory;
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let env = HashMap::from([("RUNTIME".to_owned(), "/root".to_owned())]);
/// let config = DefaultFactory::new().with_env(env).create([
///     r#"{"System": {"DataPath": "%env.RUNTIME%/data", "Copy": "%config.System.DataPath%"}}"#,
/// ])?;
/// assert_eq!(config.get::<String>("System.Copy")?.as_deref(), Some("/root/data"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultFactory<L = ProcessEnv> {
    separator: Separator,
    array_key: ArrayKey,
    env: L,
}

impl DefaultFactory {
    /// A factory reading the process environment, with `.` as separator and
    /// array key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L> DefaultFactory<L>
where
    L: EnvLookup + Clone + 'static,
{
    /// Set the path separator.
    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Set the array key.
    #[must_use]
    pub fn with_array_key(mut self, array_key: ArrayKey) -> Self {
        self.array_key = array_key;
        self
    }

    /// Read `%env.NAME%` values from `env` instead.
    #[must_use]
    pub fn with_env<M>(self, env: M) -> DefaultFactory<M>
    where
        M: EnvLookup + Clone + 'static,
    {
        DefaultFactory {
            separator: self.separator,
            array_key: self.array_key,
            env,
        }
    }

    /// A builder configured with the standard pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a macro pattern cannot be
    /// built for the separator.
    pub fn builder(&self) -> ConfigResult<ConfigBuilder> {
        Ok(ConfigBuilder::new()
            .with_separator(self.separator)
            .with_array_key(self.array_key)
            .with_pipeline(Pipeline::standard(self.separator, self.env.clone())?))
    }

    /// Build a configuration from document texts, later ones winning.
    ///
    /// # Errors
    ///
    /// Returns any parse, merge or expansion error.
    pub fn create<I, S>(&self, contents: I) -> ConfigResult<Config>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.builder()?.build(contents)
    }
}

/// Builds a configuration from files, merged in the order given.
#[derive(Debug, Clone)]
pub struct FileFactory<L = ProcessEnv> {
    files: Vec<Utf8PathBuf>,
    factory: DefaultFactory<L>,
}

impl FileFactory {
    /// A factory for `files` using [`DefaultFactory::new`].
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            factory: DefaultFactory::new(),
        }
    }
}

impl<L> FileFactory<L>
where
    L: EnvLookup + Clone + 'static,
{
    /// Use `factory` to build from the file contents.
    #[must_use]
    pub fn with_factory<M>(self, factory: DefaultFactory<M>) -> FileFactory<M>
    where
        M: EnvLookup + Clone + 'static,
    {
        FileFactory {
            files: self.files,
            factory,
        }
    }

    /// The files, in merge order.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Read every file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for the first file that cannot be read.
    pub fn read(&self) -> ConfigResult<Vec<String>> {
        self.files.iter().map(|path| read_source(path)).collect()
    }

    /// Read, merge and expand the files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for unreadable files and any parse, merge
    /// or expansion error.
    pub fn create(&self) -> ConfigResult<Config> {
        self.factory.create(self.read()?)
    }
}

fn read_source(path: &Utf8Path) -> ConfigResult<String> {
    debug!(%path, "reading configuration source");
    std::fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))
}
