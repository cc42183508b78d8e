use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Create config template if it doesn't exist
    let out_dir = env::var("OUT_DIR").unwrap_or_else(|_| "./".to_string());
    let template_path = Path::new(&out_dir).join("../../../config.template.toml");

    let template = r#"# AVREC Configuration Template
# Copy this file to 'config.toml' and fill in your actual values

# Ticks per second of the video presentation time base
video_tick_rate = 90000

# Frame rate assumed when video options carry no explicit fps
default_fps = 30
"#;

    let _ = fs::write(template_path, template);
    println!("cargo:rerun-if-changed=build.rs");
}
