use rawtensor_rs::image_pipeline::{PipelineConfig, RawDevelopPipeline, TiffCompression};
use rawtensor_rs::logger;

use tracing::{error, info};

const USAGE: &str = "usage: rawtensor <input.raw> <developed.tiff> [tensor.tiff|-] [saturation] [vibrance]\n\
    pass '-' as tensor.tiff to skip the tensor when setting saturation or vibrance";

fn parse_knob(value: Option<&String>, name: &str) -> anyhow::Result<f32> {
    match value {
        Some(v) => {
            let knob = v
                .parse::<f32>()
                .map_err(|e| anyhow::anyhow!("invalid {} '{}': {}", name, v, e))?;
            if !knob.is_finite() {
                anyhow::bail!("invalid {} '{}': must be a finite number", name, v);
            }
            Ok(knob)
        }
        None => Ok(0.0),
    }
}

/// Turns the list of outputs that failed into the process result.
fn check_outputs(failed: &[&str], input: &str) -> anyhow::Result<()> {
    if failed.is_empty() {
        return Ok(());
    }
    anyhow::bail!("{} failed for {}", failed.join(" and "), input)
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(input), Some(developed)) = (args.first(), args.get(1)) else {
        anyhow::bail!(USAGE);
    };
    let tensor_output = args.get(2).filter(|p| p.as_str() != "-");
    let saturation = parse_knob(args.get(3), "saturation")?;
    let vibrance = parse_knob(args.get(4), "vibrance")?;

    info!("Starting rawtensor...");

    let config = PipelineConfig::builder()
        .compression(TiffCompression::DeflateFast)
        .saturation(saturation)
        .vibrance(vibrance)
        .build();
    let pipeline = RawDevelopPipeline::new(config);

    info!("Compression: {:?}", pipeline.config().compression);
    info!(
        "Color: saturation {:+.2}, vibrance {:+.2}",
        pipeline.config().color.saturation,
        pipeline.config().color.vibrance
    );

    match pipeline.metadata_file(input) {
        Ok(metadata) => info!(
            make = %metadata.make,
            model = %metadata.model,
            cfa = %metadata.cfa_pattern,
            device_id = metadata.device_id(),
            "Loaded {}x{} RAW",
            metadata.raw_width,
            metadata.raw_height
        ),
        Err(e) => {
            error!("Failed to read RAW metadata: {}", e);
            return Err(e.into());
        }
    }

    let mut failed = Vec::new();
    match pipeline.develop_file(input, developed) {
        Ok(_) => info!("Develop successful: {}", developed),
        Err(e) => {
            error!("Develop failed: {}", e);
            failed.push("develop");
        }
    }

    if let Some(tensor_path) = tensor_output {
        match pipeline.extract_file(input, tensor_path) {
            Ok(tensor) => info!(
                "Tensor written: {} (4 x {}x{})",
                tensor_path,
                tensor.width(),
                tensor.height()
            ),
            Err(e) => {
                error!("Tensor extraction failed: {}", e);
                failed.push("tensor extraction");
            }
        }
    }

    check_outputs(&failed, input)
}
