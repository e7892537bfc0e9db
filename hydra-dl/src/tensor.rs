use crate::common::*;
use hydra_data::Batch;
use ndarray::{ArrayView, Dimension};

/// A batch moved onto a device.
#[derive(Debug)]
pub struct TensorBatch {
    /// Images of shape `[batch, height, width]`.
    pub images: Tensor,
    /// Labels of shape `[batch, variables]`.
    pub labels: Tensor,
}

impl TensorBatch {
    pub fn from_batch(batch: &Batch, device: Device) -> Result<Self> {
        Ok(Self {
            images: images_to_tensor(batch.images.view(), device)?,
            labels: labels_to_tensor(batch.labels.view(), device)?,
        })
    }
}

pub fn images_to_tensor(images: ArrayView3<'_, f32>, device: Device) -> Result<Tensor> {
    array_to_tensor(images, device)
}

pub fn labels_to_tensor(labels: ArrayView2<'_, f32>, device: Device) -> Result<Tensor> {
    array_to_tensor(labels, device)
}

fn array_to_tensor<D>(array: ArrayView<'_, f32, D>, device: Device) -> Result<Tensor>
where
    D: Dimension,
{
    let shape: Vec<i64> = array.shape().iter().map(|&size| size as i64).collect();
    let array = array.as_standard_layout();
    let data = array
        .as_slice()
        .ok_or_else(|| format_err!("the array is not contiguous"))?;
    let tensor = Tensor::of_slice(data).view(shape.as_slice()).to_device(device);
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_to_tensor_keeps_layout() -> Result<()> {
        let array = Array2::from_shape_fn((3, 2), |(row, col)| (row * 2 + col) as f32);
        let tensor = labels_to_tensor(array.t(), Device::Cpu)?;
        assert_eq!(tensor.size(), vec![2, 3]);
        assert_eq!(f32::from(&tensor.get(1).get(2)), 5.0);
        Ok(())
    }
}
