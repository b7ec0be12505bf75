//! schoolscope - school/grade/class scope model
//!
//! Rules and autorun tasks in the scheduling backend apply to a *scope*: a
//! whole school, one grade of a school, or a single class. Scopes are encoded
//! as slash-delimited strings and selected from a tree built out of the
//! backend's navigation menu.
//!
//! # Architecture
//!
//! ```text
//! MenuSource ──fetch──▶ [menu JSON] ──build_tree──▶ ScopeTreeCache
//!  (HTTP/file)                                          │
//!                                                       ▼
//!              selection ──normalize/apply_disabled──▶ options
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use schoolscope::{HttpMenuSource, ScopeService, config::Config, scope};
//!
//! let source = HttpMenuSource::from_config(&Config::default())?;
//! let service = ScopeService::new(Arc::new(source));
//! let tree = service.build_tree().await?;
//!
//! assert_eq!(scope::normalize(&["39", "39/2023/1"]), vec!["39"]);
//! let options = scope::apply_disabled(&scope::flatten(&tree), &["39"]);
//! ```

pub mod autorun;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod scope;
pub mod service;
pub mod source;

pub use cache::{ScopeTree, ScopeTreeCache};
pub use error::ScopeError;
pub use scope::{ParsedScope, ScopeLevel, ScopeNode, ScopeOption};
pub use service::ScopeService;
pub use source::{FileMenuSource, HttpMenuSource, MenuSource};
