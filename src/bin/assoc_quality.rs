use plane_assoc::cloud::io::write_json_file;
use plane_assoc::config::{load_config, ExperimentConfig};
use plane_assoc::dataset::Sequence;
use plane_assoc::evaluation::{evaluate_quality, MethodQuality, QualityReport};
use plane_assoc::Frame;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let sequence = config.open_sequence()?;
    let methods = config.methods()?;
    let step = config.frame_step.unwrap_or(1);

    let mut report = QualityReport {
        frame_count: sequence.len(),
        methods: methods
            .iter()
            .map(|m| MethodQuality::new(m.label()))
            .collect(),
    };

    let mut cached: Option<(usize, Frame)> = None;
    for prev_idx in (0..sequence.len().saturating_sub(1)).step_by(step) {
        let previous = match cached.take() {
            Some((idx, frame)) if idx == prev_idx => frame,
            _ => load_frame(&sequence, &config, prev_idx)?,
        };
        let cur_idx = prev_idx + 1;
        let current = load_frame(&sequence, &config, cur_idx)?;

        for (method, entry) in methods.iter().zip(report.methods.iter_mut()) {
            let association = method.run(&current, &previous);
            entry.push(cur_idx, evaluate_quality(&current, &previous, &association));
        }
        cached = Some((cur_idx, current));
    }

    print_text_summary(&report);
    match &config.output.report_json {
        Some(path) => {
            write_json_file(path, &report)?;
            println!("\nJSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("\nJSON report:\n{json}");
        }
    }
    Ok(())
}

fn load_frame(sequence: &Sequence, config: &ExperimentConfig, idx: usize) -> Result<Frame, String> {
    sequence.planes_for_frame(idx, &config.down_sample, config.min_plane_points)
}

fn print_text_summary(report: &QualityReport) {
    println!("Association quality over {} frames", report.frame_count);
    for method in &report.methods {
        println!(
            "  {:<36} pairs={:<5} planes={} points={}",
            method.method,
            method.frames.len(),
            fmt_ratio(method.mean_plane_accuracy),
            fmt_ratio(method.mean_point_accuracy)
        );
    }
}

fn fmt_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

fn usage() -> String {
    "Usage: assoc_quality <config.json>".to_string()
}
