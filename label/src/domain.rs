use crate::{
    common::*,
    normalize::{Bounds, RangeNormalizer},
    variable::Variable,
};

/// Raw value range of each label variable.
///
/// The default table matches the renderer: positions inside a 200 pixel canvas with
/// a 10 pixel margin, yaw in `[0, 2π]`, ship widths in `[18, 36]` and heights in
/// `[18, 75]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainTable {
    pub x: Bounds,
    pub y: Bounds,
    pub yaw: Bounds,
    pub width: Bounds,
    pub height: Bounds,
    #[serde(default = "Bounds::unit")]
    pub sin: Bounds,
    #[serde(default = "Bounds::unit")]
    pub cos: Bounds,
    #[serde(default = "Bounds::unit")]
    pub detection: Bounds,
}

impl DomainTable {
    pub fn bounds(&self, var: Variable) -> Bounds {
        match var {
            Variable::X => self.x,
            Variable::Y => self.y,
            Variable::Yaw => self.yaw,
            Variable::Width => self.width,
            Variable::Height => self.height,
            Variable::Sin => self.sin,
            Variable::Cos => self.cos,
            Variable::Detection => self.detection,
        }
    }

    pub fn normalizer(&self, var: Variable) -> RangeNormalizer {
        RangeNormalizer::new(self.bounds(var))
    }
}

impl Default for DomainTable {
    fn default() -> Self {
        let bounds = |min, max| Bounds::new(min, max).unwrap();

        Self {
            x: bounds(10.0, 190.0),
            y: bounds(10.0, 190.0),
            yaw: bounds(0.0, 2.0 * PI),
            width: bounds(18.0, 36.0),
            height: bounds(18.0, 75.0),
            sin: Bounds::unit(),
            cos: Bounds::unit(),
            detection: Bounds::unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_from_json() {
        let text = r#"{
            "x": [0, 100],
            "y": [0, 100],
            "yaw": [0, 6.283185307179586],
            "width": [5, 10],
            "height": [5, 20]
        }"#;
        let table: DomainTable = serde_json::from_str(text).unwrap();
        assert_eq!(table.bounds(Variable::X), Bounds::new(0.0, 100.0).unwrap());
        assert_eq!(table.bounds(Variable::Detection), Bounds::unit());
    }

    #[test]
    fn default_table() {
        let table = DomainTable::default();
        assert_eq!(table.normalizer(Variable::Height).normalize(75.0), 1.0);
        assert_eq!(table.normalizer(Variable::Width).normalize(18.0), -1.0);
    }
}
