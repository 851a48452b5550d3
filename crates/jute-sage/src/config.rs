//! Plot settings for generated scripts, readable from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Plot settings written into generated scripts.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SageConfig {
    /// Directory the `H.save(...)` call writes PNG files into.
    pub plot_dir: PathBuf,
    /// Sage layout name.
    pub layout: String,
    /// Edge color.
    pub edge_color: String,
    /// Figure size `(width, height)`.
    pub figsize: (u32, u32),
    /// Emit an `H.show(...)` line.
    pub show: bool,
    /// Emit an `H.save(...)` line.
    pub save: bool,
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            plot_dir: PathBuf::from("/home/user/plots"),
            layout: "acyclic".into(),
            edge_color: "grey".into(),
            figsize: (5, 16),
            show: true,
            save: true,
        }
    }
}

impl SageConfig {
    /// Render-only settings: no show or save calls.
    pub fn plot_only() -> Self {
        Self {
            show: false,
            save: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = SageConfig::default();
        assert_eq!(c.plot_dir, PathBuf::from("/home/user/plots"));
        assert_eq!(c.layout, "acyclic");
        assert_eq!(c.edge_color, "grey");
        assert_eq!(c.figsize, (5, 16));
        assert!(c.show && c.save);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: SageConfig = toml::from_str("plot_dir = \"/tmp/plots\"\nfigsize = [8, 8]\n").unwrap();
        assert_eq!(c.plot_dir, PathBuf::from("/tmp/plots"));
        assert_eq!(c.figsize, (8, 8));
        assert_eq!(c.layout, "acyclic");
    }

    #[test]
    fn plot_only_disables_output_calls() {
        let c = SageConfig::plot_only();
        assert!(!c.show);
        assert!(!c.save);
    }
}
