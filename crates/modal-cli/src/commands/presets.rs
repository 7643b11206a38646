//! Patch management commands.
//!
//! Lists factory patches, prints a patch's contents and exports patches
//! to TOML files for editing.

use crate::commands::common::load_patch;
use anyhow::Context;
use clap::{Args, Subcommand};
use modal_config::{Patch, factory_presets};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory presets
    List,

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Write a preset to a TOML file
    Export {
        /// Preset name or path
        name: String,

        /// Destination file
        file: PathBuf,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list_presets(),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Export { name, file, force } => export_preset(&name, &file, force),
    }
}

fn list_presets() -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:10} - {}", preset.name, desc);
    }
    println!();
    println!("Use 'modal presets show <name>' for details.");
    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_patch(name)?;
    // resolves every value, so a broken file fails here instead of at render
    preset
        .to_params()
        .with_context(|| format!("preset '{}' is invalid", preset.name))?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
        println!();
    }

    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!();

    if preset.params.is_empty() {
        println!("Parameters: (all defaults)");
    } else {
        println!("Parameters ({}):", preset.params.len());
        for (id, value) in &preset.params {
            println!("  {:15} = {}", id, value);
        }
    }

    if !preset.macros.is_empty() {
        println!();
        println!("Macros:");
        for (slot, m) in preset.macros.iter().enumerate() {
            let target = m.target.as_deref().unwrap_or("(unmapped)");
            println!(
                "  {}. {:15} range {:.3}..{:.3}  value {:.3}",
                slot, target, m.low, m.high, m.value
            );
        }
    }

    Ok(())
}

fn export_preset(name: &str, file: &Path, force: bool) -> anyhow::Result<()> {
    let preset: Patch = load_patch(name)?;
    preset
        .to_params()
        .with_context(|| format!("preset '{}' is invalid", preset.name))?;

    if file.exists() && !force {
        anyhow::bail!(
            "File '{}' already exists. Use --force to overwrite.",
            file.display()
        );
    }

    preset.save(file)?;
    println!("Exported preset '{}' to {}", preset.name, file.display());
    Ok(())
}
