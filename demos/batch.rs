use std::path::PathBuf;

use dmnify::batch::process_directory;
use dmnify::{BatchConfig, ConvertConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let input: PathBuf = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("demos/rules"), PathBuf::from);
    let output = std::env::temp_dir().join("dmnify-demo");

    let config = BatchConfig {
        output_dir: output.clone(),
        convert: ConvertConfig {
            max_rules_per_table: 4,
            ..ConvertConfig::default()
        },
        ..BatchConfig::default()
    };

    let report = process_directory(&input, &config).expect("batch failed");
    print!("{report}");
    println!("written to {}", output.display());
}
