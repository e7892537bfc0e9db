use crate::{
    common::*,
    draw::{box_points, draw_line, draw_polyline, nose_point},
    renderer::{ObjectPresence, Renderer, Scene},
};

/// Options of [SpaceshipRenderer].
///
/// The ship center is drawn from `[margin, image_size - margin]` on both axes,
/// the width from `width_range` and the height from `[width, max_height]`, so
/// every range must be non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, getset::CopyGetters)]
#[serde(try_from = "RawSpaceshipConfig", into = "RawSpaceshipConfig")]
pub struct SpaceshipConfig {
    /// The side length of the square canvas in pixels.
    #[getset(get_copy = "pub")]
    image_size: usize,
    /// The minimum distance of the ship center from the canvas border.
    #[getset(get_copy = "pub")]
    margin: R64,
    /// The `(min, max)` ship width.
    #[getset(get_copy = "pub")]
    width_range: (R64, R64),
    /// The maximum ship height.
    #[getset(get_copy = "pub")]
    max_height: R64,
    /// The number of distracting lines drawn on the background.
    #[getset(get_copy = "pub")]
    num_lines: usize,
}

impl SpaceshipConfig {
    pub fn new(
        image_size: usize,
        margin: R64,
        width_range: (R64, R64),
        max_height: R64,
        num_lines: usize,
    ) -> Result<Self> {
        let (min_width, max_width) = width_range;
        ensure!(image_size > 0, "image_size must be positive");
        ensure!(
            margin >= 0.0 && margin * 2.0 <= image_size as f64,
            "margin {} does not fit into an image of size {}",
            margin,
            image_size
        );
        ensure!(
            min_width > 0.0 && min_width <= max_width,
            "width_range ({}, {}) must be positive and non-decreasing",
            min_width,
            max_width
        );
        ensure!(
            max_height >= min_width,
            "max_height {} must not be less than the minimum width {}",
            max_height,
            min_width
        );

        Ok(Self {
            image_size,
            margin,
            width_range,
            max_height,
            num_lines,
        })
    }

    /// Options of an example without background lines.
    pub fn clean() -> Self {
        Self {
            num_lines: 0,
            ..Default::default()
        }
    }
}

impl Default for SpaceshipConfig {
    fn default() -> Self {
        Self {
            image_size: default_image_size(),
            margin: default_margin(),
            width_range: default_width_range(),
            max_height: default_max_height(),
            num_lines: default_num_lines(),
        }
    }
}

impl TryFrom<RawSpaceshipConfig> for SpaceshipConfig {
    type Error = Error;

    fn try_from(from: RawSpaceshipConfig) -> Result<Self, Self::Error> {
        let RawSpaceshipConfig {
            image_size,
            margin,
            width_range,
            max_height,
            num_lines,
        } = from;
        Self::new(image_size, margin, width_range, max_height, num_lines)
    }
}

impl From<SpaceshipConfig> for RawSpaceshipConfig {
    fn from(from: SpaceshipConfig) -> Self {
        let SpaceshipConfig {
            image_size,
            margin,
            width_range,
            max_height,
            num_lines,
        } = from;
        Self {
            image_size,
            margin,
            width_range,
            max_height,
            num_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RawSpaceshipConfig {
    #[serde(default = "default_image_size")]
    image_size: usize,
    #[serde(default = "default_margin")]
    margin: R64,
    #[serde(default = "default_width_range")]
    width_range: (R64, R64),
    #[serde(default = "default_max_height")]
    max_height: R64,
    #[serde(default = "default_num_lines")]
    num_lines: usize,
}

/// Renders a spaceship outline over random lines and uniform noise.
#[derive(Debug, Clone)]
pub struct SpaceshipRenderer {
    rng: StdRng,
    config: SpaceshipConfig,
}

impl SpaceshipRenderer {
    pub fn new(config: SpaceshipConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(config: SpaceshipConfig, rng: StdRng) -> Self {
        Self { rng, config }
    }

    pub fn config(&self) -> &SpaceshipConfig {
        &self.config
    }

    fn sample_label(&mut self) -> RawLabel {
        let SpaceshipConfig {
            image_size,
            margin,
            width_range: (min_width, max_width),
            max_height,
            ..
        } = self.config;
        let rng = &mut self.rng;
        let low = margin.raw();
        let high = image_size as f64 - margin.raw();

        let x = rng.gen_range(low..=high);
        let y = rng.gen_range(low..=high);
        let yaw = rng.gen_range(0.0..(2.0 * PI));
        let width = rng.gen_range(min_width.raw()..=max_width.raw());
        let height = rng.gen_range(width..=max_height.raw().max(width));

        RawLabel::new(x, y, yaw, width, height)
    }
}

impl Renderer for SpaceshipRenderer {
    fn image_shape(&self) -> [usize; 2] {
        [self.config.image_size, self.config.image_size]
    }

    fn render(&mut self, presence: ObjectPresence, noise_level: f64) -> Scene {
        let size = self.config.image_size;
        let mut image = Array2::<f32>::zeros((size, size));

        let has_object = match presence {
            ObjectPresence::Present => true,
            ObjectPresence::Absent => false,
            ObjectPresence::Random => self.rng.gen_bool(0.5),
        };

        // distracting lines
        for _ in 0..self.config.num_lines {
            let rng = &mut self.rng;
            let from = [rng.gen_range(0.0..size as f64), rng.gen_range(0.0..size as f64)];
            let to = [rng.gen_range(0.0..size as f64), rng.gen_range(0.0..size as f64)];
            let value = rng.gen_range(0.3..=1.0);
            draw_line(&mut image, from, to, value);
        }

        let label = if has_object {
            let label = self.sample_label();
            let RawLabel {
                x,
                y,
                yaw,
                width,
                height,
            } = label;
            draw_polyline(&mut image, &box_points(x, y, yaw, width, height), 1.0);
            draw_line(&mut image, [x, y], nose_point(x, y, yaw, height), 1.0);
            label
        } else {
            RawLabel::absent()
        };

        if noise_level > 0.0 {
            let rng = &mut self.rng;
            let level = noise_level as f32;
            image.mapv_inplace(|value| value + level * rng.gen::<f32>());
        }

        // stretch into [0, 1]
        let (min, max) = image
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &value| {
                (min.min(value), max.max(value))
            });
        if max > min {
            image.mapv_inplace(|value| (value - min) / (max - min));
        } else {
            image.fill(0.0);
        }

        Scene { image, label }
    }
}

fn default_image_size() -> usize {
    200
}

fn default_margin() -> R64 {
    r64(10.0)
}

fn default_width_range() -> (R64, R64) {
    (r64(18.0), r64(36.0))
}

fn default_max_height() -> R64 {
    r64(75.0)
}

fn default_num_lines() -> usize {
    10
}
