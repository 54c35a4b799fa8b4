//! Command-line interface for wire_sequence
//!
//! Detects the wire sequence of one connector (or both sides of a dual-sided
//! one) and optionally compares it against an expected sequence file.

use serde::Deserialize;
use std::{env, fs, path::Path, process};
use wire_sequence::{
    image_loader::load_image, ColorConverter, ComparisonResult, ExpectedSequence, InspectionMode, Inspector,
    PipelineConfig, RasterImage, WireSequence,
};

/// Expected file: one sequence, or one per side
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpectedFile {
    One(ExpectedSequence),
    Sides(Vec<ExpectedSequence>),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut expected_path = None;
    let mut mode_arg = None;
    let mut image_paths = Vec::new();

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "--expected" | "--mode" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: {} requires a value", args[i]);
                    process::exit(1);
                };
                match args[i].as_str() {
                    "--config" => config_path = Some(value.clone()),
                    "--expected" => expected_path = Some(value.clone()),
                    _ => mode_arg = Some(value.clone()),
                }
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => image_paths.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    if image_paths.is_empty() {
        print_help(&args[0]);
        process::exit(1);
    }

    // Mode defaults to the number of images given
    let mode = match mode_arg {
        Some(flag) => flag.parse::<InspectionMode>().unwrap_or_else(|e| fail(&e)),
        None if image_paths.len() == 2 => InspectionMode::DualSided,
        None => InspectionMode::SingleSided,
    };

    let config = match config_path {
        Some(path) => PipelineConfig::from_json_file(Path::new(&path)).unwrap_or_else(|e| fail(&e)),
        None => PipelineConfig::default(),
    };
    let inspector = Inspector::with_config(config).unwrap_or_else(|e| fail(&e));

    let images: Vec<RasterImage> = image_paths
        .iter()
        .map(|path| load_image(Path::new(path)).unwrap_or_else(|e| fail(&e)))
        .collect();

    match expected_path {
        Some(path) => {
            let expected = read_expected(Path::new(&path));
            let result = inspector
                .inspect(mode, &images, &expected)
                .unwrap_or_else(|e| fail(&e));
            print_comparison(&result);
            if !result.matched {
                process::exit(2);
            }
        }
        None => {
            let sequences = inspector.detect(mode, &images).unwrap_or_else(|e| fail(&e));
            print_sequences(mode, &image_paths, &sequences);
        }
    }
}

fn read_expected(path: &Path) -> Vec<ExpectedSequence> {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        process::exit(1);
    });
    match serde_json::from_str::<ExpectedFile>(&text) {
        Ok(ExpectedFile::One(sequence)) => vec![sequence],
        Ok(ExpectedFile::Sides(sides)) => sides,
        Err(e) => {
            eprintln!("Error parsing {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn fail(error: &wire_sequence::InspectionError) -> ! {
    eprintln!("Inspection failed: {}", error);
    eprintln!("Suggestion: {}", error.user_message());
    process::exit(1);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image> [back_image]", program_name);
    eprintln!();
    eprintln!("Detect the wire color sequence of a connector.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE     Pipeline configuration JSON (default: built-in tuning)");
    eprintln!("  --expected FILE   Expected sequence JSON; prints a comparison result");
    eprintln!("                    colors as [b, g, r] arrays or \"#RRGGBB\" strings");
    eprintln!("  --mode MODE       singlewire or doublewire (default: from image count)");
    eprintln!("  --help, -h        Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} connector.jpg", program_name);
    eprintln!("  {} --expected expected.json connector.jpg", program_name);
    eprintln!("  {} --mode doublewire --expected both.json front.jpg back.jpg", program_name);
}

fn print_sequences(mode: InspectionMode, paths: &[String], sequences: &[WireSequence]) {
    match serde_json::to_string_pretty(sequences) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    let converter = ColorConverter::new();
    eprintln!();
    eprintln!("Wire Sequence Summary ({}):", mode);
    for (path, sequence) in paths.iter().zip(sequences) {
        let hex: Vec<String> = sequence.colors().iter().map(|c| converter.bgr_to_hex(*c)).collect();
        eprintln!("  {}: {} wires {}", path, sequence.count(), hex.join(" "));
    }
}

fn print_comparison(result: &ComparisonResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    eprintln!();
    eprintln!("Inspection: {}", if result.matched { "PASS" } else { "FAIL" });
    for line in result.details.lines() {
        eprintln!("  {}", line);
    }
}
