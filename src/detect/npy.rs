//! Precomputed heatmaps stored as NumPy `.npy` files.

use std::io::{Cursor, Read};
use std::path::Path;

use ndarray::{Array3, ArrayD, Axis, Ix3};
use ndarray_npy::ReadNpyExt;

use super::{DetectError, HeatmapModel};

/// Heatmaps loaded from disk, replayed for any input.
///
/// **Accepted array shapes:**
/// - 3D `(joints, height, width)`
/// - 4D `(1, joints, height, width)`, the batch output of a model
///
/// Supported data types: `f32` and `f64`.
#[derive(Debug, Clone)]
pub struct NpyHeatmaps {
    heatmaps: Array3<f32>,
}

impl NpyHeatmaps {
    pub fn new(heatmaps: Array3<f32>) -> Self {
        Self { heatmaps }
    }

    /// Read heatmaps from a `.npy` file.
    pub fn load(path: &Path) -> Result<Self, DetectError> {
        let bytes = std::fs::read(path)?;
        let heatmaps = Self::from_bytes(&bytes)?;
        log::info!("Loaded heatmaps from {}", path.display());
        Ok(heatmaps)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DetectError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Parse `.npy` bytes, trying `f32` first and falling back to `f64`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DetectError> {
        let array = match ArrayD::<f32>::read_npy(Cursor::new(data)) {
            Ok(array) => array,
            Err(f32_err) => match ArrayD::<f64>::read_npy(Cursor::new(data)) {
                Ok(array) => array.mapv(|v| v as f32),
                Err(_) => return Err(f32_err.into()),
            },
        };
        log::debug!("NpyHeatmaps: array shape = {:?}", array.shape());
        Ok(Self::new(into_joint_stack(array)?))
    }

    pub fn heatmaps(&self) -> &Array3<f32> {
        &self.heatmaps
    }

    pub fn joint_count(&self) -> usize {
        self.heatmaps.len_of(Axis(0))
    }
}

fn into_joint_stack(array: ArrayD<f32>) -> Result<Array3<f32>, DetectError> {
    let shape = array.shape().to_vec();
    let array = match shape.as_slice() {
        [_, _, _] => array,
        [1, _, _, _] => array.index_axis_move(Axis(0), 0),
        _ => {
            return Err(DetectError::Shape {
                message: format!("expected (joints, height, width) heatmaps, got {shape:?}"),
            })
        }
    };
    array.into_dimensionality::<Ix3>().map_err(|e| DetectError::Shape {
        message: e.to_string(),
    })
}

impl HeatmapModel for NpyHeatmaps {
    fn predict(&self, _input: &Array3<f32>) -> Result<Array3<f32>, DetectError> {
        Ok(self.heatmaps.clone())
    }
}
