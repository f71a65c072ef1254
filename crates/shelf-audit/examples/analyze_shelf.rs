use shelf_audit::core::Detection;
use shelf_audit::imageio::load_gray;
use shelf_audit::{analyze, AnalyzeParams, Planogram};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(image), Some(planogram), Some(detections)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("Usage: analyze_shelf <image_path> <planogram.json> <detections.json>");
        return Ok(());
    };

    let gray = load_gray(image.as_ref())?;
    let planogram: Planogram = serde_json::from_str(&std::fs::read_to_string(planogram)?)?;
    let detections: Vec<Detection> = serde_json::from_str(&std::fs::read_to_string(detections)?)?;

    let report = analyze(&gray.view(), &planogram, &detections, &AnalyzeParams::default())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
