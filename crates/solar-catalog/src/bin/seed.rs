//! # Sample Catalog Writer
//!
//! Writes the built-in sample catalog to disk for development.
//!
//! ## Usage
//! ```bash
//! # Write ./data/catalog.json
//! cargo run -p solar-catalog --bin seed
//!
//! # Choose the output path, replacing an existing file
//! cargo run -p solar-catalog --bin seed -- --out ./catalog.json --force
//! ```

use std::env;
use std::path::PathBuf;

use solar_catalog::{sample_catalog, write_catalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut out = PathBuf::from("./data/catalog.json");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                if i + 1 < args.len() {
                    out = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Solar Quote Sample Catalog Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --out <PATH>   Output file (default: ./data/catalog.json)");
                println!("  -f, --force        Overwrite an existing file");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Solar Quote Sample Catalog");
    println!("=============================");
    println!("Output: {}", out.display());
    println!();

    if out.exists() && !force {
        println!("⚠ {} already exists", out.display());
        println!("  Pass --force to overwrite it.");
        return Ok(());
    }

    let catalog = sample_catalog();
    write_catalog(&out, &catalog).await?;

    println!("✓ Panels:      {}", catalog.pv_panels.len());
    println!("✓ Inverters:   {}", catalog.inverters.len());
    println!("✓ Batteries:   {}", catalog.batteries.len());
    println!("✓ Accessories: {}", catalog.accessories.len());
    println!();
    println!("Done.");
    Ok(())
}
