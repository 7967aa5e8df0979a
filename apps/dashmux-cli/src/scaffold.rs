//! `dashmux new`: write a runnable two-dashboard project skeleton.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

const CARGO_TOML: &str = r##"[package]
name = "webapp"
version = "0.1.0"
edition = "2021"

[dependencies]
dashmux = "0.1"
dashmux-bootstrap = "0.1"
anyhow = "1.0"
tokio = { version = "1", features = ["full"] }
"##;

const MAIN_RS: &str = r##"mod config;
mod server;
mod views;

use dashmux::RunOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashmux_bootstrap::logging::init_cli_logging(0, false, None);

    let registry = server::create_app()?;
    registry.run(RunOptions::from_env()).await?;
    Ok(())
}
"##;

const CONFIG_RS: &str = r##"use dashmux::ManagerConfig;

// Environment-specific settings belong here. For file- and env-layered
// configuration see dashmux_bootstrap::AppConfig.
pub fn manager_config() -> ManagerConfig {
    ManagerConfig {
        brand: "My Dashboards".into(),
        ..ManagerConfig::default()
    }
}
"##;

const SERVER_RS: &str = r##"use std::sync::Arc;

use dashmux::{TemplateMode, ViewRegistry};

// The application factory: build a configured registry instead of mounting
// views in global scope.
pub fn create_app() -> anyhow::Result<Arc<ViewRegistry>> {
    let registry = ViewRegistry::with_config(TemplateMode::Themed, crate::config::manager_config());

    registry.add_view(crate::views::first_dash());
    registry.add_view(crate::views::second_dash());

    Ok(registry)
}
"##;

const VIEWS_MOD_RS: &str = r##"mod first_dash;
mod second_dash;

pub use first_dash::first_dash;
pub use second_dash::second_dash;
"##;

const FIRST_DASH_RS: &str = r##"use dashmux::{DashboardApp, Element, Node, ViewAdapter};

struct FirstDash;

impl DashboardApp for FirstDash {
    fn name(&self) -> &str {
        "First Dashboard"
    }

    fn content(&self) -> Node {
        Element::new("div").text("This is the first dashboard").into()
    }
}

pub fn first_dash() -> ViewAdapter {
    ViewAdapter::new(FirstDash)
}
"##;

const SECOND_DASH_RS: &str = r##"use dashmux::{DashboardApp, Element, Node, ViewAdapter};

struct SecondDash;

impl DashboardApp for SecondDash {
    fn name(&self) -> &str {
        "Second Dashboard"
    }

    fn base_path(&self) -> &str {
        "/two"
    }

    fn content(&self) -> Node {
        Element::new("div").text("This is the second dashboard").into()
    }
}

pub fn second_dash() -> ViewAdapter {
    ViewAdapter::new(SecondDash)
}
"##;

/// Create the project skeleton in `output_dir`. No-op with an informational
/// message when the skeleton is already present.
pub fn new_project(output_dir: &Path) -> Result<()> {
    let assets_dir = output_dir.join("assets");
    let src_dir = output_dir.join("src");
    let views_dir = src_dir.join("views");

    if src_dir.exists() {
        tracing::info!("project already exists");
        return Ok(());
    }

    if !output_dir.exists() {
        tracing::info!("creating project directory: {}", output_dir.display());
    }

    for dir in [output_dir, &assets_dir, &src_dir, &views_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    }

    let files = [
        (output_dir.join("Cargo.toml"), CARGO_TOML),
        (src_dir.join("main.rs"), MAIN_RS),
        (src_dir.join("config.rs"), CONFIG_RS),
        (src_dir.join("server.rs"), SERVER_RS),
        (views_dir.join("mod.rs"), VIEWS_MOD_RS),
        (views_dir.join("first_dash.rs"), FIRST_DASH_RS),
        (views_dir.join("second_dash.rs"), SECOND_DASH_RS),
    ];

    for (path, contents) in files {
        tracing::info!("writing: {}", path.display());
        fs::write(&path, contents)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_the_full_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("myproj");

        new_project(&project).unwrap();

        for expected in [
            "Cargo.toml",
            "src/main.rs",
            "src/config.rs",
            "src/server.rs",
            "src/views/mod.rs",
            "src/views/first_dash.rs",
            "src/views/second_dash.rs",
        ] {
            assert!(project.join(expected).is_file(), "missing {expected}");
        }
        assert!(project.join("assets").is_dir());

        let server = fs::read_to_string(project.join("src/server.rs")).unwrap();
        assert!(server.contains("create_app"));
        assert!(server.contains("add_view"));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("myproj");

        new_project(&project).unwrap();

        // A user edit must survive the re-run untouched.
        let main_rs = project.join("src/main.rs");
        fs::write(&main_rs, "// customized\n").unwrap();

        new_project(&project).unwrap();
        assert_eq!(fs::read_to_string(&main_rs).unwrap(), "// customized\n");
    }

    #[test]
    fn works_when_the_target_directory_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        // tempdir itself exists but holds no skeleton yet.
        new_project(dir.path()).unwrap();
        assert!(dir.path().join("src/main.rs").is_file());
    }
}
