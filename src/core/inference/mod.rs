//! Inference collaborator
//!
//! Turns raw equipment readings into a prediction event. The engine never
//! owns a model; it calls out to a prediction service through
//! [`InferenceClient`].

mod client;

pub use client::{HttpInferenceClient, InferenceClient, PredictionResponse, Readings};
