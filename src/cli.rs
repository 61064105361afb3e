// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "lidar-viewer")]
#[command(about = "Interactive viewer for recorded lidar sequences", long_about = None)]
pub struct Cli {
    /// Directory holding the per-frame lidar, label and trail files
    #[arg(long = "data-dir", default_value = "public/data")]
    pub data_dir: PathBuf,

    /// Number of frames in the sequence
    #[arg(long = "frames")]
    pub frames: Option<usize>,

    /// JSON viewer configuration
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Derive trails from labels when a frame has no trail file
    #[arg(long = "derive-trails", default_value = "false")]
    pub derive_trails: bool,

    /// Build everything, log the build report and exit without a window
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["lidar-viewer"]);
        assert_eq!(cli.data_dir, PathBuf::from("public/data"));
        assert_eq!(cli.frames, None);
        assert!(!cli.no_ui);
        assert!(!cli.derive_trails);
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "lidar-viewer",
            "--data-dir",
            "/tmp/seq",
            "--frames",
            "12",
            "--derive-trails",
            "--no-ui",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/seq"));
        assert_eq!(cli.frames, Some(12));
        assert!(cli.derive_trails);
        assert!(cli.no_ui);
    }
}
