//! Node configuration.

use motenet_groups::GroupsConfig;

use crate::error::Result;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "motenet_node=info,motenet_groups=info";

/// Configuration for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Group engine settings, including the sweep interval.
    pub groups: GroupsConfig,

    /// Print a store snapshot to stdout after every handled message.
    pub print_snapshots: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            groups: GroupsConfig::default(),
            print_snapshots: true,
        }
    }
}

impl NodeConfig {
    /// Create config from environment variables with defaults.
    ///
    /// Reads the `MOTENET_*` group settings plus `MOTENET_PRINT_SNAPSHOTS`
    /// (`0`/`false` disables snapshot output).
    pub fn from_env() -> Result<Self> {
        let groups = GroupsConfig::from_env()?;
        let print_snapshots = std::env::var("MOTENET_PRINT_SNAPSHOTS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            groups,
            print_snapshots,
        })
    }

    #[must_use]
    pub fn with_groups(mut self, groups: GroupsConfig) -> Self {
        self.groups = groups;
        self
    }

    #[must_use]
    pub fn without_snapshots(mut self) -> Self {
        self.print_snapshots = false;
        self
    }
}
