//! Patch demo: values with units, factory patches and capturing a synth.
//!
//! Run with: cargo run -p modal-config --example patch_demo

use modal_config::{
    MacroConfig, Patch, factory_preset_names, get_factory_preset, is_factory_preset,
    parse_param_value,
};
use modal_synth::{NoteEvent, Param, StandardSynth};

fn main() {
    println!("=== Value Parsing ===\n");
    for text in ["0.5", "30%", "250ms", "1.5s", "1.2kHz", "Blow"] {
        println!("  {:>8} -> {:?}", text, parse_param_value(text));
    }

    println!("\n=== Factory Patches ===\n");
    for name in factory_preset_names() {
        if let Some(patch) = get_factory_preset(name) {
            println!(
                "  {:<8} {} params, {} macros  {}",
                name,
                patch.params.len(),
                patch.macros.len(),
                patch.description.as_deref().unwrap_or("")
            );
        }
    }
    println!("\n  is_factory_preset(\"Gong\") = {}", is_factory_preset("Gong"));

    println!("\n=== Custom Patch ===\n");
    let patch = Patch::new("Glass")
        .with_description("Thin, bright and long")
        .with_param("falloff", 0.4)
        .with_param("decay", "3s")
        .with_param("foldback_mode", "Undertones")
        .with_macro(MacroConfig::new(Some("detune"), 0.03, 0.1, 0.5));

    match patch.to_toml() {
        Ok(toml) => println!("{toml}"),
        Err(e) => eprintln!("serialize failed: {e}"),
    }

    let mut synth = StandardSynth::new(48000.0);
    if let Err(e) = patch.apply_to(&mut synth) {
        eprintln!("apply failed: {e}");
        return;
    }

    let mut block = [0.0f32; 512];
    synth.process_block(&[NoteEvent::on(60, 0.8)], &mut block);
    let peak = block.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    println!("First block peak: {peak:.4}");
    println!("Detune after macro: {:.4}", synth.get(Param::Detune));

    let captured = Patch::from_synth("Glass (captured)", &synth);
    println!("Captured {} parameters", captured.params.len());
}
