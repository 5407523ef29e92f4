use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;

use cellspot::{CellDetector, build_standard_pipeline};

#[derive(Parser)]
#[command(name = "cellspot")]
#[command(about = "Detect infected cells in microscope images")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: Option<PathBuf>,

    /// Where to write the annotated PNG
    #[arg(short, long, value_name = "PATH", default_value = "output/test_result.png")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save per-stage debug images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print the detection report as JSON
    #[arg(long)]
    json: bool,

    /// Launch the graphical interface
    #[cfg(feature = "gui")]
    #[arg(long)]
    gui: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    #[cfg(feature = "gui")]
    if args.gui {
        cellspot::gui::run()?;
        return Ok(());
    }

    let Some(image_path) = &args.image_path else {
        anyhow::bail!("an input image is required (or run with --gui)");
    };

    if args.verbose {
        println!("Loading image: {:?}", image_path);
    }

    // Load image
    let img = ImageReader::open(image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    // Stage-by-stage image dumps via the composable pipeline
    if let Some(debug_dir) = &args.debug_out {
        let pipeline = build_standard_pipeline(args.verbose).with_debug(debug_dir.clone())?;
        pipeline.run(img.clone())?;
        if args.verbose {
            println!("Debug images written to {}\n", debug_dir.display());
        }
    }

    // The output directory is a precondition of the detector, not part of it
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let detector = CellDetector::new().with_verbose(args.verbose);
    let report = detector.detect(&img, &args.output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
        return Ok(());
    }

    println!("\n=== Infected Cell Detection Results ===");
    println!("Verdict: {}", report.verdict);
    println!("Infected cells: {}", report.count);

    if !report.blobs.is_empty() && args.verbose {
        println!("\nDetected cells:");
        for (i, blob) in report.blobs.iter().enumerate() {
            println!(
                "  Cell {} at ({}, {}) - radius: {}, area: {:.1}",
                i + 1,
                blob.center.0,
                blob.center.1,
                blob.radius,
                blob.area
            );
        }
    }

    println!("Annotated image: {}", report.output_path.display());

    Ok(())
}
