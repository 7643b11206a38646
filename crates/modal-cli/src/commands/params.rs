//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use modal_config::resolve_param;
use modal_core::ParamDescriptor;
use modal_synth::Param;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for a single parameter (string id)
    #[arg(value_name = "PARAM")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.param {
        let param = resolve_param(id)?;
        show_param(&param.descriptor());
        return Ok(());
    }

    println!("Synth Parameters");
    println!("================");
    println!();
    println!(
        "  {:15}  {:26}  {:22}  {:10}  {}",
        "Id", "Name", "Range", "Default", "Unit"
    );
    println!(
        "  {:15}  {:26}  {:22}  {:10}  {}",
        "--", "----", "-----", "-------", "----"
    );
    for param in Param::ALL {
        let desc = param.descriptor();
        println!(
            "  {:15}  {:26}  {:22}  {:10}  {}",
            desc.string_id,
            desc.name,
            range_text(&desc),
            default_text(&desc),
            desc.unit.suffix()
        );
    }
    println!();
    println!("Use 'modal params <id>' for details, 'modal render --set id=value' to override.");

    Ok(())
}

fn show_param(desc: &ParamDescriptor) {
    println!("{}", desc.name);
    println!("{}", "=".repeat(desc.name.len()));
    println!();
    println!("  Id:       {} ({})", desc.string_id, desc.id.0);
    println!("  Short:    {}", desc.short_name);
    println!("  Range:    {}", range_text(desc));
    println!("  Default:  {}", default_text(desc));
    if !desc.unit.suffix().is_empty() {
        println!("  Unit:     {}", desc.unit.suffix());
    }
    if desc.is_choice() {
        println!();
        println!("  Choices:");
        for (i, label) in desc.choices.iter().enumerate() {
            println!("    {}  {}", i, label);
        }
    }
}

fn range_text(desc: &ParamDescriptor) -> String {
    if desc.is_choice() {
        desc.choices.join(" | ")
    } else {
        format!("{} .. {}", desc.min, desc.max)
    }
}

fn default_text(desc: &ParamDescriptor) -> String {
    desc.choice_label(desc.default)
        .filter(|_| desc.is_choice())
        .map_or_else(|| desc.default.to_string(), str::to_string)
}
