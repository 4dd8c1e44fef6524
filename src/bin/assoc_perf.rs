use plane_assoc::cloud::io::write_json_file;
use plane_assoc::config::load_config;
use plane_assoc::evaluation::{time_association, MethodPerformance, PerformanceReport};
use std::env;
use std::path::Path;

const DEFAULT_FRAME_STEP: usize = 10;

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
    let step = config.frame_step.unwrap_or(DEFAULT_FRAME_STEP);

    let mut report = PerformanceReport {
        repeats: config.repeats.max(1),
        frame_step: step,
        methods: methods
            .iter()
            .map(|m| MethodPerformance::new(m.label()))
            .collect(),
    };

    for prev_idx in (0..sequence.len().saturating_sub(1)).step_by(step) {
        let previous =
            sequence.planes_for_frame(prev_idx, &config.down_sample, config.min_plane_points)?;
        let current =
            sequence.planes_for_frame(prev_idx + 1, &config.down_sample, config.min_plane_points)?;
        for (method, entry) in methods.iter().zip(report.methods.iter_mut()) {
            let mean_ms = time_association(report.repeats, || method.run(&current, &previous));
            entry.push(prev_idx, mean_ms);
        }
    }

    println!(
        "Association timing ({} repeats, every {} frames)",
        report.repeats, report.frame_step
    );
    for method in &report.methods {
        let mean = method
            .mean_ms
            .map_or_else(|| "n/a".to_string(), |v| format!("{v:.3} ms"));
        println!(
            "  {:<36} samples={:<5} mean={mean}",
            method.method,
            method.timing.stages.len()
        );
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    } else {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        println!("\nJSON report:\n{json}");
    }
    Ok(())
}

fn usage() -> String {
    "Usage: assoc_perf <config.json>".to_string()
}
