use std::env;
use std::sync::Arc;

use image::ImageReader;

use cellspot::FramePipeline;
use cellspot::build_standard_pipeline;
use cellspot::detection::stages::*;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        std::process::exit(1);
    }

    let image_path = &args[1];
    let img = ImageReader::open(image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    println!("Loaded image: {}x{}", img.width(), img.height());

    // Example 1: the standard pipeline
    println!("\n=== Standard Detection Pipeline ===");
    let results = build_standard_pipeline(true).run(img.clone())?;
    if let Some(item) = results.first() {
        println!(
            "\nVerdict: {} ({} infected cells)",
            item.get_text("verdict").unwrap_or("?"),
            item.get_int("count").unwrap_or(0)
        );
    } else {
        println!("\nNo blobs survived the radius filter.");
    }

    // Example 2: stricter parameters - darker cutoff, larger minimum radius
    println!("\n\n=== Custom Pipeline (Stricter Parameters) ===");
    let custom = FramePipeline::new()
        .add_stage(Arc::new(NormalizeStage { target_size: 224 }))
        .add_stage(Arc::new(GrayscaleStage))
        .add_stage(Arc::new(ThresholdStage { cutoff: 120 }))
        .add_stage(Arc::new(BlobExtractStage { padding: 2 }))
        .add_stage(Arc::new(RadiusFilterStage { min_radius: 10 }))
        .add_stage(Arc::new(AnnotateStage));

    let results = custom.run(img)?;
    if let Some(item) = results.first() {
        println!(
            "Verdict: {} ({} infected cells)",
            item.get_text("verdict").unwrap_or("?"),
            item.get_int("count").unwrap_or(0)
        );
    } else {
        println!("No blobs survived the radius filter.");
    }

    Ok(())
}
