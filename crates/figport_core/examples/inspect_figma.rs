//! Example: Decode a Figma file export and print its scene hierarchy.
//!
//! Run with: cargo run --example inspect_figma -- FigmaFiles/<key>.json

use std::env;

use figport_core::{import_figma_file, CustomMap, ImportSettings};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_figma <path-to-figma-json>");
        println!("\nExamples:");
        println!("  cargo run --example inspect_figma -- FigmaFiles/abc123.json");
        return;
    }

    let path = &args[1];
    println!("Loading Figma file: {}", path);

    // No custom map: every instance becomes a placeholder group
    let map = CustomMap::new();
    match import_figma_file(path, &ImportSettings::default(), &map) {
        Ok((scene, report)) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Nodes built: {}", report.nodes_built);
            println!("Scene nodes: {}", scene.node_count());
            println!("Instances without a prefab: {}", report.lookup_misses.len());

            println!("\n--- Hierarchy ---");
            print!("{}", scene.dump());

            if !report.lookup_misses.is_empty() {
                println!("\n--- Unmapped instances ---");
                for miss in &report.lookup_misses {
                    match &miss.component {
                        Some(component) => println!("  {} ({}) -> {}", miss.node_name, miss.node_id, component),
                        None => println!("  {} ({})", miss.node_name, miss.node_id),
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error loading Figma file: {}", e);
            std::process::exit(1);
        }
    }
}
