pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Lowercase extensions the walker accepts.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Prefix for per-identity output directories (`person_<id>`).
pub const GROUP_DIR_PREFIX: &str = "person_";

/// Integer rendering of the noise label in directory names and summaries.
pub const NOISE_LABEL: i64 = -1;

/// Neighbourhood radius for L2-normalized ArcFace embeddings.
///
/// Unit vectors at Euclidean distance 1.0 have cosine similarity 0.5.
pub const DEFAULT_EPSILON: f32 = 1.0;

/// Minimum neighbourhood size (including the point itself) for a core point.
pub const DEFAULT_MIN_NEIGHBORS: usize = 5;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Upper bound on extraction workers; each worker owns its own model sessions.
pub const MAX_DEFAULT_WORKERS: usize = 4;
