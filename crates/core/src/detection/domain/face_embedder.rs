use crate::shared::face_signature::FaceSignature;
use crate::shared::frame::Frame;

/// Domain interface for turning a face crop into an identity signature.
pub trait FaceEmbedder: Send {
    fn embed(&mut self, crop: &Frame) -> Result<FaceSignature, Box<dyn std::error::Error>>;
}
