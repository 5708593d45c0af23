use lane_geometry::config::lane_demo::load_config;
use lane_geometry::image::io::{load_rgb_image, save_mask, save_rgb_image, write_json_file};
use lane_geometry::image::Frame;
use lane_geometry::LanePipeline;
use log::{info, warn};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: lane_demo <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let rgb = load_rgb_image(&config.input)?;
    let pipeline = LanePipeline::new(config.params.clone()).map_err(|e| e.to_string())?;
    let frame = Frame::Rgb(rgb.as_view());
    let report = pipeline
        .process_with_diagnostics(&frame)
        .map_err(|e| e.to_string())?;

    let estimate = &report.estimate;
    if estimate.degraded {
        warn!(
            "low-confidence fit: left={:?} right={:?}",
            estimate.left.fallback_reason(),
            estimate.right.fallback_reason()
        );
    }
    info!(
        "radius={:.2} m offset={:.2} m latency={:.3} ms",
        estimate.measurement.radius_m,
        estimate.measurement.offset.magnitude_m,
        estimate.latency_ms
    );

    let overlay = pipeline
        .render(&rgb.as_view(), estimate)
        .map_err(|e| e.to_string())?;
    save_rgb_image(&overlay, &config.output.overlay_image)?;
    println!("Saved overlay to {}", config.output.overlay_image.display());

    if let Some(path) = &config.output.birdseye_mask {
        save_mask(&report.birdseye_mask, path)?;
        println!("Saved bird's-eye mask to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("Saved report to {}", path.display());
    }
    Ok(())
}
