use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;

mod extract;

use crate::extract::{ExtractOptions, Extractor};
use gdunpack_core::pck::PackIndex;
use gdunpack_core::MappedFile;

#[derive(ClapParser, Debug)]
#[command(version, about = "Godot pck unpacker with compiled script decompiler")]
struct Args {
    /// Path to the .pck container
    input: PathBuf,

    /// Output directory, defaults to `<stem>_unpacked` next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a `.gdc_dump` section report for every compiled script
    #[arg(long)]
    dump: bool,

    /// Check each asset against its stored MD5
    #[arg(long)]
    verify: bool,

    /// Do not remove an existing output directory
    #[arg(long)]
    keep_existing: bool,

    /// Copy assets only, skip script decoding
    #[arg(long)]
    no_decompile: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pack".to_string());
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{}_unpacked", stem))
}

fn prepare_output_dir(dir: &Path, keep_existing: bool) -> Result<()> {
    if dir.exists() && !keep_existing {
        log::info!("removing existing output directory {}", dir.display());
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let medium = MappedFile::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let index = PackIndex::parse(medium.data())
        .with_context(|| format!("failed to read pack index of {}", args.input.display()))?;

    log::info!(
        "pack format {}, engine {}, {} files",
        index.header.format_version,
        index.header.engine_version(),
        index.header.file_count
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));
    prepare_output_dir(&output, args.keep_existing)?;

    let options = ExtractOptions {
        decompile: !args.no_decompile,
        dump: args.dump,
        verify: args.verify,
    };
    let mut extractor = Extractor::new(&medium, &output, options);
    for entry in &index.entries {
        extractor.extract(entry);
    }

    let stats = extractor.stats();
    log::info!(
        "extracted {} assets to {}, decompiled {} scripts, {} failures",
        stats.extracted,
        output.display(),
        stats.decompiled,
        stats.failures()
    );
    Ok(())
}
