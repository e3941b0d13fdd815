use super::*;
use crate::core::errors::SimpleError;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    /// Name of the model's first output tensor.
    fn get_output_name(&self) -> Result<String, DiagnosisError> {
        let session = self.sessions[0]
            .lock()
            .map_err(|_| DiagnosisError::invalid_input("Failed to acquire session lock"))?;
        session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                DiagnosisError::invalid_input(
                    "No outputs available in session - model may be invalid or corrupted",
                )
            })
    }

    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs one forward pass and hands the raw output to `processor`.
    ///
    /// The session outputs only live for the duration of this call, so they
    /// are released on every path once `processor` returns.
    fn run_inference_with_processor<T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[f32]) -> Result<T, DiagnosisError>,
    ) -> Result<T, DiagnosisError> {
        let input_shape = x.shape().to_vec();
        let output_name = self.get_output_name()?;

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            DiagnosisError::inference_error(
                &self.model_name,
                format!("failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            DiagnosisError::inference_error(
                &self.model_name,
                format!(
                    "failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
                SimpleError::new("session lock poisoned"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            DiagnosisError::inference_error(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DiagnosisError::inference_error(
                    &self.model_name,
                    format!("failed to extract output tensor '{}' as f32", output_name),
                    e,
                )
            })?;

        processor(output_shape, output_data)
    }

    /// Runs a classification forward pass, returning `(batch, classes)` scores.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, DiagnosisError> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();
        self.run_inference_with_processor(x, |output_shape, output_data| {
            if output_shape.len() != 2 {
                return Err(DiagnosisError::inference_error(
                    &self.model_name,
                    format!(
                        "expected 2D output tensor, got {}D with shape {:?}",
                        output_shape.len(),
                        output_shape
                    ),
                    SimpleError::new("invalid output tensor dimensions"),
                ));
            }

            let num_classes = output_shape[1].max(0) as usize;
            let expected_len = batch_size * num_classes;
            if output_data.len() != expected_len {
                return Err(DiagnosisError::inference_error(
                    &self.model_name,
                    format!(
                        "output data size mismatch for input shape {:?} -> output shape {:?}",
                        input_shape, output_shape
                    ),
                    SimpleError::new("output tensor data size mismatch"),
                ));
            }

            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)?;
            Ok(array_view.to_owned())
        })
    }
}
