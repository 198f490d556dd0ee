use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Copy the runtime configuration into OUT_DIR at build time
fn embed_config(input_path: &str, output_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={}", input_path);

    // Check if input file exists
    if !Path::new(input_path).exists() {
        println!(
            "cargo:warning=Config file '{}' not found, using built-in defaults",
            input_path
        );
        // Empty document so include_str! does not fail, it parses to Config::default()
        let mut file = File::create(output_path)?;
        file.write_all(&[])?;
        return Ok(());
    }

    let contents = std::fs::read(input_path)?;
    println!(
        "cargo:warning=Embedding config: {} ({} bytes)",
        input_path,
        contents.len()
    );

    let mut file = File::create(output_path)?;
    file.write_all(&contents)?;

    Ok(())
}

fn main() {
    // esp-idf-sys only exports its build environment for ESP-IDF targets
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get output directory
    let out_dir = env::var("OUT_DIR").unwrap();

    let config_output = format!("{}/config.toml", out_dir);

    if let Err(e) = embed_config("config.toml", &config_output) {
        println!("cargo:warning=Failed to embed config.toml: {}", e);
        // Still provide an empty document
        File::create(&config_output).unwrap();
    }

    println!("cargo:rerun-if-changed=config.toml");
}
