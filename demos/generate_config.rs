//! Generate the default pipeline configuration file
//!
//! Creates a JSON config with all default parameters

use std::{env, path::Path, process};
use wire_sequence::PipelineConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/default.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = PipelineConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Segmentation: blur {}, adaptive block {} offset {:.0}, morph kernel {}",
                config.segmentation.blur_kernel_size,
                config.segmentation.adaptive_block_size,
                config.segmentation.adaptive_offset,
                config.segmentation.morph_kernel_size
            );
            eprintln!(
                "  Crop: up {:.1}h, down {:.1}h, sides {:.1}w",
                config.roi.expand_up, config.roi.expand_down, config.roi.expand_horizontal
            );
            eprintln!(
                "  Edges: Canny ({:.0}, {:.0}) on row {}",
                config.edges.canny_low_threshold, config.edges.canny_high_threshold, config.edges.scan_row
            );
            eprintln!(
                "  Pairing: body > {}px, spacing > {}px",
                config.pairing.min_body_width, config.pairing.min_spacing
            );
            eprintln!("  Comparison: distance <= {:.0}", config.comparison.color_threshold);
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
