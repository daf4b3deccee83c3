//! framework-maker - packages third-party dylibs into relocatable frameworks.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use framework_maker::commands;
use framework_maker::commands::pluginize::{known_frameworks_from_sources, PluginizeConfig};
use framework_maker::rewrite::DEFAULT_FRAMEWORKS_ROOT;

#[derive(Parser)]
#[command(name = "framework-maker")]
#[command(about = "Packages third-party dylibs into relocatable framework bundles")]
#[command(
    after_help = "TYPICAL FLOW:\n  framework-maker download -f urls.txt   Fetch dependency sources\n  framework-maker frameworkize ...       Build framework bundles\n  framework-maker pluginize ...          Fix plugin load paths\n  framework-maker universalize ...       Merge per-arch dylibs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert dylibs and their transitive dependencies into frameworks
    Frameworkize {
        /// Seed dylib paths (full paths)
        #[arg(required = true)]
        libraries: Vec<String>,

        /// Directory to build frameworks into
        #[arg(short, long)]
        output: PathBuf,

        /// Run-time frameworks root recorded in load commands
        #[arg(long, default_value = DEFAULT_FRAMEWORKS_ROOT)]
        frameworks_root: String,
    },

    /// Rewrite plugin load paths to point at relocated frameworks
    Pluginize {
        /// Directory containing .so plugin bundles
        plugins_dir: PathBuf,

        /// Run-time root that replaces the plugins dir in load paths
        #[arg(long)]
        relocated_plugins: String,

        /// Directory whose *.subproj entries name the shipped frameworks
        #[arg(long)]
        framework_sources: Option<PathBuf>,

        /// Add a shipped framework by name (repeatable)
        #[arg(long = "known-framework")]
        known_frameworks: Vec<String>,

        /// Run-time frameworks root recorded in load commands
        #[arg(long, default_value = DEFAULT_FRAMEWORKS_ROOT)]
        frameworks_root: String,
    },

    /// Merge single-arch dylibs into a universal binary and fix load paths
    Universalize {
        /// Output path for the merged binary
        target: PathBuf,

        /// arch=path input slice (repeatable; full paths only)
        #[arg(long = "slice", required = true)]
        slices: Vec<String>,

        /// old=new load-path replacement (repeatable; may be partial paths)
        #[arg(long = "replace")]
        replacements: Vec<String>,
    },

    /// Show the parsed dependency listing for one binary
    Show {
        /// Binary to inspect
        binary: String,

        /// Inspect a single architecture slice
        #[arg(long)]
        arch: Option<String>,
    },

    /// Download and unpack dependency source archives
    Download {
        /// URLs to fetch
        urls: Vec<String>,

        /// File with one URL per line (# comments allowed)
        #[arg(short = 'f', long)]
        input_file: Option<PathBuf>,

        /// Number of hosts to download from at once
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Remove and redownload already-unpacked archives
        #[arg(long)]
        force: bool,

        /// Directory to download into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Frameworkize {
            libraries,
            output,
            frameworks_root,
        } => {
            commands::cmd_frameworkize(&libraries, &output, &frameworks_root)?;
        }

        Commands::Pluginize {
            plugins_dir,
            relocated_plugins,
            framework_sources,
            known_frameworks,
            frameworks_root,
        } => {
            let mut known: std::collections::BTreeSet<String> =
                known_frameworks.into_iter().collect();
            if let Some(sources) = framework_sources {
                known.extend(known_frameworks_from_sources(&sources)?);
            }
            let config = PluginizeConfig {
                plugins_dir,
                frameworks_root,
                relocated_plugins_root: relocated_plugins,
                known_frameworks: known,
            };
            commands::cmd_pluginize(&config)?;
        }

        Commands::Universalize {
            target,
            slices,
            replacements,
        } => {
            commands::cmd_universalize(&slices, &replacements, &target)?;
        }

        Commands::Show { binary, arch } => {
            commands::cmd_show(&binary, arch.as_deref())?;
        }

        Commands::Download {
            urls,
            input_file,
            jobs,
            force,
            dir,
        } => {
            commands::cmd_download(&urls, input_file.as_deref(), jobs, force, &dir)?;
        }
    }

    Ok(())
}
