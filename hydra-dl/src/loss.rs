use crate::common::*;

/// The regression loss of a head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossKind {
    Mse,
    L1,
}

impl Default for LossKind {
    fn default() -> Self {
        Self::Mse
    }
}

impl LossKind {
    /// Computes the mean loss over the entries where the target is not the
    /// missing-value sentinel.
    pub fn compute(&self, pred: &Tensor, target: &Tensor) -> Result<Tensor> {
        ensure!(
            pred.size() == target.size(),
            "prediction shape {:?} does not match target shape {:?}",
            pred.size(),
            target.size()
        );

        let mask = target.isnan().logical_not();
        let pred = pred.masked_select(&mask);
        let target = target.masked_select(&mask);

        let loss = match self {
            Self::Mse => pred.mse_loss(&target, Reduction::Mean),
            Self::L1 => pred.l1_loss(&target, Reduction::Mean),
        };
        Ok(loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn loss_skips_missing_targets() -> Result<()> {
        let pred = Tensor::of_slice(&[0.5f32, 1.0, -1.0, 0.0]).view([2, 2]);
        let target = Tensor::of_slice(&[0.0f32, f32::NAN, -1.0, f32::NAN]).view([2, 2]);

        let mse = f64::from(&LossKind::Mse.compute(&pred, &target)?);
        assert_abs_diff_eq!(mse, 0.125, epsilon = 1e-6);

        let l1 = f64::from(&LossKind::L1.compute(&pred, &target)?);
        assert_abs_diff_eq!(l1, 0.25, epsilon = 1e-6);

        assert!(LossKind::Mse.compute(&pred, &target.view([4])).is_err());
        Ok(())
    }
}
