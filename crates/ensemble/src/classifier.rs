//! Classifier abstraction
//!
//! Trained models live outside this crate. Anything that maps a prepared
//! `(height, width, 3)` image to one probability per label, in label order, can
//! take part in an ensemble.

use ich_common::Result;
use ndarray::ArrayView3;

/// A multi-label hemorrhage classifier
pub trait Classifier: Send + Sync {
    /// Short identifier, e.g. `model_a`
    fn name(&self) -> &str;

    /// Predict one probability per label for a channels-last image
    ///
    /// # Errors
    /// Implementations report their own failures as `IchError::Classifier`
    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Vec<f32>>;
}

/// Adapter turning a closure into a [`Classifier`]
pub struct FnClassifier<F> {
    name: String,
    predict: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(ArrayView3<'_, f32>) -> Result<Vec<f32>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, predict: F) -> Self {
        Self {
            name: name.into(),
            predict,
        }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(ArrayView3<'_, f32>) -> Result<Vec<f32>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Vec<f32>> {
        (self.predict)(input)
    }
}

/// Display name for a classifier identifier: `model_a` -> `Model A`
#[must_use]
pub fn display_name(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
