use python3_def::ManifestFormat;
#[cfg(feature = "implib")]
use std::path::PathBuf;

/// Generate python3.dll module-definition file from stable ABI manifest on stdin
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Args {
    /// Manifest format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: ManifestFormat,

    /// Command to run (module-definition file goes to stdout when omitted)
    #[cfg(feature = "implib")]
    #[command(subcommand)]
    pub command: Option<Cmd>,
}

/// Command-line subcommands
#[cfg(feature = "implib")]
#[derive(Debug, clap::Subcommand)]
pub enum Cmd {
    /// Generate import library
    Implib {
        /// Target architecture (x86_64, x86, aarch64)
        #[arg(short, long)]
        arch: String,

        /// Target environment ABI (gnu, msvc)
        #[arg(short, long)]
        env: String,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,
    },
}
