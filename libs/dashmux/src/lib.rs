//! # Dashmux - Combine Dashboard Apps on a Single Server
//!
//! A thin integration layer that mounts independently-built dashboard apps
//! onto one axum server under distinct URL prefixes, with a shared navigation
//! menu, a pluggable visual theme, and a per-view access-control gate.
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use dashmux::{DashboardApp, Element, Node, RunOptions, TemplateMode, ViewAdapter, ViewRegistry};
//!
//! struct SalesDash;
//!
//! impl DashboardApp for SalesDash {
//!     fn name(&self) -> &str { "Sales" }
//!     fn base_path(&self) -> &str { "/sales" }
//!     fn content(&self) -> Node {
//!         Element::new("h1").text("Sales overview").into()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = ViewRegistry::new(TemplateMode::Themed);
//!     registry.add_view(ViewAdapter::new(SalesDash).with_category("Revenue"));
//!     registry.run(RunOptions::from_env()).await?;
//!     Ok(())
//! }
//! ```
//!
//! Registration is an explicit, single-threaded startup phase; at request
//! time the registry is only read. The menu is re-evaluated on every render,
//! so accessibility predicates may depend on per-request state the host
//! manages.

pub mod error;
pub mod markup;
pub mod menu;
pub mod middleware;
pub mod registry;
pub mod server;
pub mod template;
pub mod view;

pub use error::DashmuxError;
pub use markup::{Asset, Element, Node};
pub use menu::{MenuKind, MenuNode};
pub use registry::{ManagerConfig, RouteGroup, ViewRegistry};
pub use server::{RunOptions, DEFAULT_HOST, DEFAULT_PORT};
pub use template::{PlainTemplate, TemplateMode, TemplateStrategy, ThemedTemplate};
pub use view::{AccessFn, DashboardApp, ViewAdapter};
