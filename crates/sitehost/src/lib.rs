//! Per-owner static sites with atomic deploys.
//!
//! A site is a directory `<sites_dir>/<owner>/<site>/` whose content is
//! replaced wholesale by each deploy, from an uploaded zip bundle or from a
//! repository snapshot.
//!
//! # Architecture
//!
//! - [`config`] - figment-layered settings
//! - [`paths`] - `(owner, site)` to directory mapping
//! - [`lock`] - per-site deploy serialization
//! - [`import`] - snapshot root detection and subdirectory selection
//! - [`service`] - create, list, and the two deploy operations
//! - [`api`] - request and response bodies
//! - [`cli`] - the `sitehost` command line

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod lock;
pub mod paths;
pub mod service;

pub use config::{Config, ConfigError};
pub use error::{Error, ErrorBody, ErrorKind, Result};
pub use service::SiteService;
