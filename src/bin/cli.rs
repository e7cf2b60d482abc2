//! flattree CLI
//!
//! Command-line interface over a snapshot file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use flattree::{render, seed, Catalog, Config, DirId, FilePolicy, Result, TreeStore};
use tracing_subscriber::{fmt, EnvFilter};

/// flattree CLI
#[derive(Parser, Debug)]
#[command(name = "flattree-cli")]
#[command(about = "Inspect and edit a flattree directory index")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long, default_value = "./flattree.snap")]
    snapshot: PathBuf,

    /// Refuse to remove directories that still own files
    #[arg(long)]
    keep_files: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty index holding only the root
    Init {
        /// Name of the root directory
        #[arg(long, default_value = "root")]
        root: String,
    },

    /// Replace the index with the demo tree
    Seed,

    /// List a directory's children and files
    Ls {
        /// Directory id
        id: DirId,
    },

    /// Print the whole hierarchy
    Tree,

    /// Create a directory
    Mkdir {
        /// Parent directory id
        parent: DirId,

        /// Name of the new directory
        name: String,
    },

    /// Remove a directory and everything under it
    Rmdir {
        /// Directory id
        id: DirId,

        /// Only remove the directory if it has no children
        #[arg(long)]
        leaf: bool,
    },

    /// Add a file to a directory
    Touch {
        /// Directory id
        dir: DirId,

        /// File name
        name: String,

        /// File size in bytes
        #[arg(default_value = "0")]
        size: u32,
    },

    /// Remove a file by its index within a directory
    Rm {
        /// Directory id
        dir: DirId,

        /// Index of the file within the directory
        index: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,flattree=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let policy = if args.keep_files {
        FilePolicy::Reject
    } else {
        FilePolicy::Discard
    };

    let builder = Config::builder()
        .snapshot_path(&args.snapshot)
        .file_policy(policy);

    match args.command {
        Commands::Init { root } => {
            let config = builder.root_name(root).build();
            let store = TreeStore::from_config(&config)?;
            Catalog::from_store(config, store).close()
        }
        Commands::Seed => {
            let store = seed::sample_store()?;
            Catalog::from_store(builder.build(), store).close()
        }
        Commands::Ls { id } => {
            let catalog = Catalog::open(builder.build())?;
            let listing = catalog.read(|store| render::list_dir(store, id))?;
            print!("{}", listing);
            Ok(())
        }
        Commands::Tree => {
            let catalog = Catalog::open(builder.build())?;
            let listing = catalog.read(render::tree);
            print!("{}", listing);
            Ok(())
        }
        Commands::Mkdir { parent, name } => {
            let catalog = Catalog::open(builder.build())?;
            let id = catalog.write(|store| store.add_dir(parent, name.as_str()))?;
            println!("{}", id);
            catalog.close()
        }
        Commands::Rmdir { id, leaf } => {
            let catalog = Catalog::open(builder.build())?;
            if leaf {
                catalog.write(|store| store.rem_dir_leaf(id))?;
            } else {
                let removed = catalog.write(|store| store.rem_dir(id))?;
                println!("removed {} directories", removed);
            }
            catalog.close()
        }
        Commands::Touch { dir, name, size } => {
            let catalog = Catalog::open(builder.build())?;
            catalog.write(|store| store.add_file(dir, name.as_str(), size))?;
            catalog.close()
        }
        Commands::Rm { dir, index } => {
            let catalog = Catalog::open(builder.build())?;
            let file = catalog.write(|store| store.rem_file(dir, index))?;
            println!("removed {}", file.name);
            catalog.close()
        }
    }
}
