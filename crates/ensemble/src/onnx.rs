//! ONNX Runtime backed classifier (feature `onnx`)

use crate::classifier::Classifier;
use ich_common::{IchError, Result, LABEL_COUNT};
use ndarray::{ArrayView3, Axis};
use ort::{session::Session, value::TensorRef};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier wrapping an ONNX model with input `[1, H, W, 3]` and sigmoid output `[1, 6]`
pub struct OnnxClassifier {
    name: String,
    /// `Session::run` needs `&mut self`
    session: Mutex<Session>,
}

impl OnnxClassifier {
    /// Load a model file
    ///
    /// # Errors
    /// Returns `IchError::Classifier` if the session cannot be created
    pub fn from_file(name: impl Into<String>, model_path: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let model_path = model_path.as_ref();
        info!("Loading {} from: {}", name, model_path.display());

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| classifier_error(&name, e))?;

        debug!("{} loaded successfully", name);

        Ok(Self {
            name,
            session: Mutex::new(session),
        })
    }
}

fn classifier_error(name: &str, err: impl std::fmt::Display) -> IchError {
    IchError::Classifier {
        model: name.to_string(),
        reason: err.to_string(),
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Vec<f32>> {
        // Add batch dimension: [1, H, W, 3]
        let batch = input.insert_axis(Axis(0)).to_owned();

        let mut session = self
            .session
            .lock()
            .map_err(|e| classifier_error(&self.name, format!("Failed to lock session mutex: {}", e)))?;

        let input_tensor = TensorRef::from_array_view(batch.view())
            .map_err(|e| classifier_error(&self.name, e))?;
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| classifier_error(&self.name, e))?;

        let (shape, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| classifier_error(&self.name, e))?;

        if scores.len() != LABEL_COUNT {
            return Err(IchError::ShapeMismatch {
                context: format!("{} output", self.name),
                expected: format!("[1, {}]", LABEL_COUNT),
                actual: format!("{:?}", shape.to_vec()),
            });
        }

        Ok(scores.to_vec())
    }
}
