//! xtopo — display-topology reconciliation for multi-GPU machines.
//!
//! Loads a configuration document, rewrites its screen topology to match the
//! requested shape, and writes it back.
//!
//! # Usage
//!
//! ```text
//! xtopo <CONFIG> [OPTIONS]
//!
//! Options:
//!   --enable-all-gpus            One X screen per detected GPU
//!   --separate-x-screens <BOOL>  Split (true) or merge (false) per-GPU screens
//!   --screen <NAME>              Restrict --separate-x-screens to one screen
//!   --xinerama <BOOL>            Set the spanning-desktop flag
//!   --only-one-screen            Collapse the layout to its first screen
//!   --inventory <PATH>           Read GPUs from a [[gpu]] TOML file
//!   --output <PATH>              Write the result here instead of in place
//!   --dry-run                    Reconcile and report, write nothing
//! ```
//!
//! # Environment variable overrides
//!
//! CLI arguments take precedence when both are present.
//!
//! | Variable          | Meaning                                  |
//! |-------------------|------------------------------------------|
//! | `XTOPO_CONFIG`    | Configuration document path              |
//! | `XTOPO_INVENTORY` | GPU inventory file (skips the live scan) |
//!
//! Without `--inventory` the GPUs are scanned live from sysfs, which only
//! exists on Linux; other platforms must pass an inventory file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xtopo_core::inventory::DeviceInventory;
use xtopo_core::reconcile::TopologyRequest;

use xtopo_cli::application::apply_topology::{self, ApplyOptions};
use xtopo_cli::infrastructure::FileInventory;
#[cfg(target_os = "linux")]
use xtopo_cli::infrastructure::SysfsInventory;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Reconciles a display configuration document against the machine's GPU
/// topology.
#[derive(Debug, Parser)]
#[command(
    name = "xtopo",
    about = "Reconciles a display configuration document against the machine's GPU topology",
    version
)]
struct Cli {
    /// Configuration document to reconcile (TOML).
    ///
    /// A missing file starts from an empty document, so `--enable-all-gpus`
    /// can bootstrap a machine's first configuration.
    #[arg(env = "XTOPO_CONFIG")]
    config: PathBuf,

    /// Rebuild the whole topology with one X screen per detected GPU.
    #[arg(long)]
    enable_all_gpus: bool,

    /// Give each GPU's second output its own X screen (true), or merge
    /// per-GPU screens back into one (false).
    #[arg(long, value_name = "BOOL")]
    separate_x_screens: Option<bool>,

    /// Restrict --separate-x-screens to this screen instead of the whole
    /// layout.
    #[arg(long, value_name = "NAME", requires = "separate_x_screens")]
    screen: Option<String>,

    /// Turn the spanning-desktop Xinerama flag on or off.
    #[arg(long, value_name = "BOOL")]
    xinerama: Option<bool>,

    /// Collapse the layout to its first screen.
    #[arg(long)]
    only_one_screen: bool,

    /// Read GPU descriptors from a [[gpu]] TOML file instead of scanning the
    /// machine.
    #[arg(long, value_name = "PATH", env = "XTOPO_INVENTORY")]
    inventory: Option<PathBuf>,

    /// Write the result here instead of back over the configuration file.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Reconcile and report, but write nothing.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// The topology transformations this invocation asks for.
    fn topology_request(&self) -> TopologyRequest {
        TopologyRequest {
            enable_all_gpus: self.enable_all_gpus,
            separate_screens: self.separate_x_screens,
            screen: self.screen.clone(),
            xinerama: self.xinerama,
            only_one_screen: self.only_one_screen,
        }
    }

    /// Where to load from and where to save to.
    fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            config: self.config.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Picks the inventory source: the `--inventory` file when given, otherwise
/// the live sysfs scan.
///
/// # Errors
///
/// Fails on non-Linux platforms when no inventory file was given, since there
/// is no live scanner to fall back to.
fn select_inventory(path: Option<&Path>) -> anyhow::Result<Box<dyn DeviceInventory>> {
    match path {
        Some(path) => Ok(Box::new(FileInventory::new(path))),
        None => live_inventory(),
    }
}

#[cfg(target_os = "linux")]
fn live_inventory() -> anyhow::Result<Box<dyn DeviceInventory>> {
    Ok(Box::new(SysfsInventory::new()))
}

#[cfg(not(target_os = "linux"))]
fn live_inventory() -> anyhow::Result<Box<dyn DeviceInventory>> {
    anyhow::bail!("live GPU scanning needs Linux sysfs; pass --inventory <PATH> instead")
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Structured logging first; level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let request = cli.topology_request();
    if request.is_empty() {
        anyhow::bail!(
            "nothing to do: request at least one of --enable-all-gpus, \
             --separate-x-screens, --xinerama, --only-one-screen"
        );
    }

    let inventory = select_inventory(cli.inventory.as_deref())?;
    let options = cli.apply_options();

    info!(config = %options.config.display(), "reconciling display topology");

    let summary = apply_topology::run(inventory.as_ref(), &options, &request)
        .with_context(|| format!("failed to reconcile {}", options.config.display()))?;

    match &summary.saved_to {
        Some(path) => info!(
            screens = summary.after.screens,
            adjacencies = summary.after.adjacencies,
            path = %path.display(),
            "topology written"
        ),
        None => info!(
            screens = summary.after.screens,
            adjacencies = summary.after.adjacencies,
            "dry run, nothing written"
        ),
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_request_nothing() {
        // Arrange: only the config path, no operations.
        let cli = Cli::parse_from(["xtopo", "layout.toml"]);

        // Assert
        assert_eq!(cli.config, PathBuf::from("layout.toml"));
        assert!(cli.topology_request().is_empty());
        assert!(!cli.dry_run);
        assert_eq!(cli.inventory, None);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_cli_enable_all_gpus_flag() {
        let cli = Cli::parse_from(["xtopo", "layout.toml", "--enable-all-gpus"]);
        assert!(cli.topology_request().enable_all_gpus);
    }

    #[test]
    fn test_cli_separate_x_screens_takes_a_bool() {
        let on = Cli::parse_from(["xtopo", "layout.toml", "--separate-x-screens", "true"]);
        assert_eq!(on.topology_request().separate_screens, Some(true));

        let off = Cli::parse_from(["xtopo", "layout.toml", "--separate-x-screens", "false"]);
        assert_eq!(off.topology_request().separate_screens, Some(false));
    }

    #[test]
    fn test_cli_rejects_non_bool_separate_value() {
        let result = Cli::try_parse_from(["xtopo", "layout.toml", "--separate-x-screens", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_screen_requires_separate_x_screens() {
        let result = Cli::try_parse_from(["xtopo", "layout.toml", "--screen", "Screen0"]);
        assert!(result.is_err(), "--screen alone must be rejected");
    }

    #[test]
    fn test_cli_screen_with_separate_x_screens_parses() {
        let cli = Cli::parse_from([
            "xtopo",
            "layout.toml",
            "--separate-x-screens",
            "true",
            "--screen",
            "Screen1",
        ]);

        let request = cli.topology_request();
        assert_eq!(request.separate_screens, Some(true));
        assert_eq!(request.screen.as_deref(), Some("Screen1"));
    }

    #[test]
    fn test_cli_xinerama_takes_a_bool() {
        let cli = Cli::parse_from(["xtopo", "layout.toml", "--xinerama", "false"]);
        assert_eq!(cli.topology_request().xinerama, Some(false));
    }

    #[test]
    fn test_cli_only_one_screen_flag() {
        let cli = Cli::parse_from(["xtopo", "layout.toml", "--only-one-screen"]);
        assert!(cli.topology_request().only_one_screen);
    }

    #[test]
    fn test_cli_inventory_and_output_paths() {
        let cli = Cli::parse_from([
            "xtopo",
            "layout.toml",
            "--enable-all-gpus",
            "--inventory",
            "gpus.toml",
            "--output",
            "out.toml",
            "--dry-run",
        ]);

        assert_eq!(cli.inventory, Some(PathBuf::from("gpus.toml")));
        let options = cli.apply_options();
        assert_eq!(options.output, Some(PathBuf::from("out.toml")));
        assert!(options.dry_run);
    }

    #[test]
    fn test_cli_full_request_maps_every_field() {
        let cli = Cli::parse_from([
            "xtopo",
            "layout.toml",
            "--enable-all-gpus",
            "--separate-x-screens",
            "true",
            "--xinerama",
            "true",
            "--only-one-screen",
        ]);

        let request = cli.topology_request();
        assert!(request.enable_all_gpus);
        assert_eq!(request.separate_screens, Some(true));
        assert_eq!(request.xinerama, Some(true));
        assert!(request.only_one_screen);
    }

    #[test]
    fn test_select_inventory_prefers_the_given_file() {
        let inventory = select_inventory(Some(Path::new("/tmp/gpus.toml")));
        assert!(inventory.is_ok());
    }
}
