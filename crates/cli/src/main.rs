use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use facesort_core::dedup::domain::duplicate_filter::DuplicatePolicy;
use facesort_core::dedup::infrastructure::average_hash_fingerprinter::AverageHashFingerprinter;
use facesort_core::detection::domain::signature_extractor::{FacePolicy, SignatureExtractor};
use facesort_core::detection::infrastructure::onnx_arcface_embedder::OnnxArcFaceEmbedder;
use facesort_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use facesort_core::distribution::distributor::{CollisionPolicy, NoisePolicy};
use facesort_core::distribution::infrastructure::fs_file_sink::FsFileSink;
use facesort_core::imaging::infrastructure::image_file_loader::ImageFileLoader;
use facesort_core::pipeline::extraction_executor::ExtractorFactory;
use facesort_core::pipeline::pipeline_logger::SummaryPipelineLogger;
use facesort_core::pipeline::sort_config::{ConfigError, SortConfig};
use facesort_core::pipeline::sort_faces_use_case::SortFacesUseCase;
use facesort_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facesort_core::shared::model_resolver;

/// Sort photos into one folder per person.
#[derive(Parser)]
#[command(name = "facesort")]
struct Cli {
    /// Directory tree to scan for photos (png, jpg, jpeg).
    input: PathBuf,

    /// Output root; person_<id> folders are created here.
    output: PathBuf,

    /// Neighbourhood radius for grouping face signatures.
    #[arg(long)]
    epsilon: Option<f32>,

    /// Photos needed (including itself) for a face to anchor a group.
    #[arg(long)]
    min_neighbors: Option<usize>,

    /// Keep perceptually identical photos instead of skipping repeats.
    #[arg(long)]
    no_dedup: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,

    /// Parallel face extraction workers.
    #[arg(long)]
    workers: Option<usize>,

    /// Which face represents a photo with several faces.
    #[arg(long, value_enum)]
    face: Option<FaceArg>,

    /// Where ungrouped photos go.
    #[arg(long, value_enum)]
    noise: Option<NoiseArg>,

    /// What to do when two photos in a group share a file name.
    #[arg(long, value_enum)]
    collision: Option<CollisionArg>,

    /// JSON config file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with bundled model files, checked before downloading.
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FaceArg {
    First,
    Largest,
}

#[derive(Clone, Copy, ValueEnum)]
enum NoiseArg {
    Singleton,
    Pooled,
}

#[derive(Clone, Copy, ValueEnum)]
enum CollisionArg {
    Counter,
    Overwrite,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    config.validate()?;

    if !cli.input.is_dir() {
        return Err(format!("Input directory not found: {}", cli.input.display()).into());
    }

    let factory = build_extractor_factory(&config, cli.models_dir.as_deref())?;

    let mut use_case = SortFacesUseCase::new(
        config,
        Box::new(ImageFileLoader::new()),
        Box::new(AverageHashFingerprinter::default()),
        factory,
        Box::new(FsFileSink::new()),
    )
    .with_logger(Box::new(SummaryPipelineLogger::default()))
    .with_progress(Box::new(|current, total| {
        eprint!("\rProcessing image {current}/{total}");
        true
    }));

    let summary = use_case.execute(&cli.input, &cli.output)?;
    eprintln!();
    println!("{summary}");
    log::info!("Output written to {}", cli.output.display());
    Ok(())
}

/// Defaults, then the config file, then explicit flags.
fn build_config(cli: &Cli) -> Result<SortConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => SortConfig::load(path)?,
        None => SortConfig::default(),
    };

    if let Some(epsilon) = cli.epsilon {
        config.epsilon = epsilon;
    }
    if let Some(min_neighbors) = cli.min_neighbors {
        config.min_neighbors = min_neighbors;
    }
    if cli.no_dedup {
        config.dedup = DuplicatePolicy::Disabled;
    }
    if let Some(confidence) = cli.confidence {
        config.confidence = confidence;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(face) = cli.face {
        config.face_policy = match face {
            FaceArg::First => FacePolicy::FirstDetected,
            FaceArg::Largest => FacePolicy::Largest,
        };
    }
    if let Some(noise) = cli.noise {
        config.noise = match noise {
            NoiseArg::Singleton => NoisePolicy::Singleton,
            NoiseArg::Pooled => NoisePolicy::Pooled,
        };
    }
    if let Some(collision) = cli.collision {
        config.collision = match collision {
            CollisionArg::Counter => CollisionPolicy::Counter,
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
        };
    }
    Ok(config)
}

/// Resolves both models once, then hands each worker its own sessions.
fn build_extractor_factory(
    config: &SortConfig,
    models_dir: Option<&Path>,
) -> Result<Box<ExtractorFactory>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let detector_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        models_dir,
        Some(Box::new(|d, t| download_progress("face detection", d, t))),
    )?;
    log::info!("Resolving model: {EMBEDDING_MODEL_NAME}");
    let embedder_path = model_resolver::resolve(
        EMBEDDING_MODEL_NAME,
        EMBEDDING_MODEL_URL,
        models_dir,
        Some(Box::new(|d, t| download_progress("face embedding", d, t))),
    )?;
    eprintln!();

    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let intra_threads = (cores / config.workers).max(1);
    let confidence = config.confidence;
    let policy = config.face_policy;
    let crop_margin = config.crop_margin;

    Ok(Box::new(
        move || -> Result<SignatureExtractor, Box<dyn std::error::Error>> {
            let detector = OnnxYoloDetector::new(&detector_path, confidence, intra_threads)?;
            let embedder = OnnxArcFaceEmbedder::new(&embedder_path, intra_threads)?;
            Ok(
                SignatureExtractor::new(Box::new(detector), Box::new(embedder), policy)
                    .with_crop_margin(crop_margin),
            )
        },
    ))
}

fn download_progress(what: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {what} model... {pct}%");
    } else {
        eprint!("\rDownloading {what} model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("facesort").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&parse(&["in", "out"])).unwrap();
        assert_eq!(config, SortConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "in",
            "out",
            "--epsilon",
            "0.8",
            "--min-neighbors",
            "2",
            "--no-dedup",
            "--workers",
            "3",
            "--face",
            "largest",
            "--noise",
            "pooled",
            "--collision",
            "overwrite",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.epsilon, 0.8);
        assert_eq!(config.min_neighbors, 2);
        assert_eq!(config.dedup, DuplicatePolicy::Disabled);
        assert_eq!(config.workers, 3);
        assert_eq!(config.face_policy, FacePolicy::Largest);
        assert_eq!(config.noise, NoisePolicy::Pooled);
        assert_eq!(config.collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("facesort.json");
        fs::write(&path, r#"{ "epsilon": 0.6, "min_neighbors": 3 }"#).unwrap();

        let cli = parse(&[
            "in",
            "out",
            "--config",
            path.to_str().unwrap(),
            "--min-neighbors",
            "1",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.epsilon, 0.6);
        assert_eq!(config.min_neighbors, 1);
    }

    #[test]
    fn test_invalid_flag_value_fails_validation() {
        let config = build_config(&parse(&["in", "out", "--min-neighbors", "0"])).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMinNeighbors)));
    }

    #[test]
    fn test_unknown_noise_policy_rejected() {
        let result = Cli::try_parse_from(["facesort", "in", "out", "--noise", "scatter"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["facesort", "in"]).is_err());
    }
}
