//! Data models shared by detectors, strategies and engines

pub mod annotation;

pub use annotation::{
    Annotation, AnnotationRequest, AnnotationResult, EntityCategory, PatientMetadata,
};
