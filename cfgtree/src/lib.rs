//! Layered configuration trees with macro expansion.
//!
//! `cfgtree` reads several configuration documents (JSON, TOML or XML),
//! merges them into one [`ConfigTree`] with later documents overriding
//! earlier ones, and then rewrites the result through a pipeline of macro
//! passes:
//!
//! - `%env.NAME%` is replaced with an environment variable before parsing,
//! - `%config.PATH%` and `%param.PATH%` interpolate other values,
//! - a `%template.PATH%` key instantiates a copy of another node,
//! - a `%node.PATH%` value becomes an alias of another node.
//!
//! The finished tree is read through [`Config`], a cheap, cloneable view that
//! splits paths on a [`Separator`] and converts values on demand.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cfgtree::DefaultFactory;
//!
//! # fn main() -> cfgtree::ConfigResult<()> {
//! let base = r#"{
//!     "Gateway": {
//!         "Parameters": { "Destination": "None" },
//!         "Settings": { "Name": "%param..Parameters.Destination%" }
//!     },
//!     "Gateways": [
//!         { "%template.Gateway%": { "Parameters": { "Destination": "XETRA" } } }
//!     ]
//! }"#;
//! let config = DefaultFactory::new().with_env(HashMap::new()).create([base])?;
//!
//! let gateways = config.scopes("Gateways.");
//! assert_eq!(gateways[0].get::<String>("Settings.Name")?.as_deref(), Some("XETRA"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod cli;
mod config;
mod document;
mod error;
mod expand;
mod factory;
mod separator;
mod tree;

pub use builder::ConfigBuilder;
pub use cli::{ConfigArgs, InitFactory};
pub use config::{Config, ConfigVisitor, FromConfigValue, PathAlternatives};
pub use document::{Document, DocumentNode, Format};
pub use error::{ChildKind, ConfigError, ConfigResult, is_display_request};
pub use expand::{
    ContentExpander, EnvExpander, EnvLookup, LocalExpander, MacroPattern, MacroRef,
    NodeExpander, ParamExpander, Pipeline, ProcessEnv, TemplateExpander, TreeExpander,
};
pub use factory::{DefaultFactory, FileFactory};
pub use separator::{ArrayKey, LevelMarker, Separator};
pub use tree::{
    Attachment, Children, ConfigTree, NodeId, NodeSite, TreeVisitor, ValueSite, Walk,
};
