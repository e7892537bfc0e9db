use crate::common::*;

/// Whether rendered scenes contain the object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectPresence {
    Present,
    Absent,
    /// Decided by a fair coin for each scene.
    Random,
}

impl From<bool> for ObjectPresence {
    fn from(has_object: bool) -> Self {
        if has_object {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

/// A rendered image with its label.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Grayscale image of shape `(height, width)` with values in `[0, 1]`.
    pub image: Array2<f32>,
    pub label: RawLabel,
}

/// A source of labeled scenes.
///
/// Renderers own their randomness, so concurrent callers should each hold an
/// independently seeded renderer.
pub trait Renderer {
    /// The `[height, width]` of produced images.
    fn image_shape(&self) -> [usize; 2];

    fn render(&mut self, presence: ObjectPresence, noise_level: f64) -> Scene;
}

impl<R> Renderer for &mut R
where
    R: Renderer + ?Sized,
{
    fn image_shape(&self) -> [usize; 2] {
        (**self).image_shape()
    }

    fn render(&mut self, presence: ObjectPresence, noise_level: f64) -> Scene {
        (**self).render(presence, noise_level)
    }
}

impl<R> Renderer for Box<R>
where
    R: Renderer + ?Sized,
{
    fn image_shape(&self) -> [usize; 2] {
        (**self).image_shape()
    }

    fn render(&mut self, presence: ObjectPresence, noise_level: f64) -> Scene {
        (**self).render(presence, noise_level)
    }
}
