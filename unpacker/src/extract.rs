//! Per-asset extraction: copy the payload out, then decode compiled scripts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path};

use anyhow::{Context, Result};
use gdunpack_core::pck::PackEntry;
use gdunpack_core::MappedFile;
use gdunpack_script::{CompiledScript, DecodeError};

pub const DECOMPILED_EXT: &str = "gdc_decompiled";
pub const DUMP_EXT: &str = "gdc_dump";

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub decompile: bool,
    pub dump: bool,
    pub verify: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub extracted: usize,
    pub decompiled: usize,
    /// Malformed records and asset ranges outside the container.
    pub format_failures: usize,
    /// Asset names that would land outside the output directory.
    pub rejected_paths: usize,
    pub io_failures: usize,
    pub checksum_mismatches: usize,
}

impl ExtractStats {
    pub fn failures(&self) -> usize {
        self.format_failures + self.rejected_paths + self.io_failures
    }
}

pub struct Extractor<'a> {
    medium: &'a MappedFile,
    output: &'a Path,
    options: ExtractOptions,
    stats: ExtractStats,
}

/// The asset path as a relative path made only of plain names.
fn contained_path(relative: &str) -> Option<&Path> {
    let path = Path::new(relative);
    let mut components = path.components().peekable();
    components.peek()?;
    components
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(path)
}

fn placeholder(entry: &PackEntry, err: &DecodeError) -> String {
    format!(
        "# could not decompile {}\n# offset 0x{:X}, size {}\n# {}\n",
        entry.name, entry.offset, entry.size, err
    )
}

impl<'a> Extractor<'a> {
    pub fn new(medium: &'a MappedFile, output: &'a Path, options: ExtractOptions) -> Self {
        Self {
            medium,
            output,
            options,
            stats: ExtractStats::default(),
        }
    }

    pub fn stats(&self) -> ExtractStats {
        self.stats
    }

    /// Extract one asset. Failures are logged and counted, never returned.
    pub fn extract(&mut self, entry: &PackEntry) {
        let Some(relative) = contained_path(entry.relative_path()) else {
            log::error!("{}: asset path escapes the output directory, skipped", entry.name);
            self.stats.rejected_paths += 1;
            return;
        };
        let target = self.output.join(relative);

        let payload = match self.medium.range(entry.offset, Some(entry.size)) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("{}: {}", entry.name, e);
                self.stats.format_failures += 1;
                return;
            }
        };

        if let Err(e) = self.copy_asset(entry, payload, &target) {
            log::error!("{}: {:#}", entry.name, e);
            self.stats.io_failures += 1;
            return;
        }
        self.stats.extracted += 1;

        if self.options.decompile && entry.is_compiled_script() {
            if let Err(e) = self.decompile_asset(entry, &target) {
                log::error!("{}: {:#}", entry.name, e);
                self.stats.io_failures += 1;
            }
        }
    }

    fn copy_asset(&mut self, entry: &PackEntry, payload: &[u8], target: &Path) -> Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        if self.options.verify && !entry.verify(payload) {
            log::warn!("{}: md5 mismatch", entry.name);
            self.stats.checksum_mismatches += 1;
        }

        let file = File::create(target).with_context(|| format!("failed to create {}", target.display()))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(payload)
            .and_then(|()| writer.flush())
            .with_context(|| format!("failed to write {}", target.display()))?;

        log::debug!("{} -> {} ({} bytes)", entry.name, target.display(), entry.size);
        Ok(())
    }

    /// Decode errors produce a placeholder file; only I/O errors propagate.
    fn decompile_asset(&mut self, entry: &PackEntry, target: &Path) -> Result<()> {
        let decompiled_path = target.with_extension(DECOMPILED_EXT);

        let decoded = CompiledScript::from_medium(self.medium, entry.offset, Some(entry.size))
            .and_then(|script| {
                let text = script.decompile()?;
                Ok((script, text))
            });

        let (script, text) = match decoded {
            Ok(v) => v,
            Err(e) => {
                log::warn!("{}: {}", entry.name, e);
                self.stats.format_failures += 1;
                fs::write(&decompiled_path, placeholder(entry, &e))
                    .with_context(|| format!("failed to write {}", decompiled_path.display()))?;
                return Ok(());
            }
        };

        if script.encoded_len as u64 != entry.size {
            log::debug!(
                "{}: record is {} bytes, asset is {}",
                entry.name,
                script.encoded_len,
                entry.size
            );
        }

        fs::write(&decompiled_path, text)
            .with_context(|| format!("failed to write {}", decompiled_path.display()))?;
        self.stats.decompiled += 1;

        if self.options.dump {
            let dump_path = target.with_extension(DUMP_EXT);
            match script.dump() {
                Ok(report) => fs::write(&dump_path, report)
                    .with_context(|| format!("failed to write {}", dump_path.display()))?,
                Err(e) => log::warn!("{}: dump failed: {}", entry.name, e),
            }
        }

        Ok(())
    }
}
