use crate::common::*;
use model_config::Module;

/// A model trained by the program: the base regressor or one of the heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Base,
    Head(HeadRole),
}

impl Target {
    /// The training order of `train all`. The base model comes first so the
    /// heads can start from its trunk.
    pub const ALL: [Target; 5] = [
        Self::Base,
        Self::Head(HeadRole::Detection),
        Self::Head(HeadRole::Position),
        Self::Head(HeadRole::Angle),
        Self::Head(HeadRole::Area),
    ];

    pub fn artifact_name(&self) -> String {
        match self {
            Self::Base => "best_model_base".to_string(),
            Self::Head(role) => role.artifact_name(),
        }
    }

    /// The label variables the model predicts, in output order.
    pub fn variables(&self) -> &'static [Variable] {
        match self {
            Self::Base => &[Variable::X, Variable::Y, Variable::Height, Variable::Width],
            Self::Head(role) => role.variables(),
        }
    }

    pub fn layers(&self, zoo: &ZooConfig) -> Result<Vec<Module>> {
        match *self {
            Self::Base => zoo.base_model(),
            Self::Head(role) => zoo.head_model(role),
        }
    }

    pub(crate) fn seed_offset(&self) -> u64 {
        match self {
            Self::Base => 0,
            Self::Head(HeadRole::Detection) => 1,
            Self::Head(HeadRole::Position) => 2,
            Self::Head(HeadRole::Angle) => 3,
            Self::Head(HeadRole::Area) => 4,
        }
    }
}

impl FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        if text == "base" {
            return Ok(Self::Base);
        }
        let role = HeadRole::from_str(text).map_err(|_| {
            format_err!(
                "'{}' is not a model, expect one of base, detection, position, angle, area",
                text
            )
        })?;
        Ok(Self::Head(role))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Head(role) => Display::fmt(role, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target() {
        assert_eq!("base".parse::<Target>().unwrap(), Target::Base);
        assert_eq!(
            "angle".parse::<Target>().unwrap(),
            Target::Head(HeadRole::Angle)
        );
        assert!("combined".parse::<Target>().is_err());
        assert_eq!(Target::Head(HeadRole::Area).to_string(), "area");
    }

    #[test]
    fn target_outputs_match_variables() {
        let zoo = ZooConfig {
            image_size: 32,
            filters: 1,
        };

        for target in Target::ALL {
            let graph = Graph::from_sequential(target.layers(&zoo).unwrap()).unwrap();
            let shape = graph.output_shape(model_graph::SEQUENTIAL_OUTPUT).unwrap();
            assert_eq!(
                shape.sample_sizes(),
                Some(vec![target.variables().len()])
            );
        }
    }
}
