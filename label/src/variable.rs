use crate::common::*;

/// A named column of the label matrix.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Variable {
    X = 0,
    Y = 1,
    Yaw = 2,
    Width = 3,
    Height = 4,
    Sin = 5,
    Cos = 6,
    Detection = 7,
}

impl Variable {
    /// The number of label variables.
    pub const COUNT: usize = 8;

    /// Variables in column order of the encoded label matrix.
    pub const ALL: [Variable; Self::COUNT] = [
        Self::X,
        Self::Y,
        Self::Yaw,
        Self::Width,
        Self::Height,
        Self::Sin,
        Self::Cos,
        Self::Detection,
    ];

    /// Column index in the encoded label matrix.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// The prediction head that is trained for one group of variables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeadRole {
    Detection,
    Position,
    Angle,
    Area,
}

impl HeadRole {
    /// All roles in the output order of a composite model.
    pub const ALL: [HeadRole; 4] = [Self::Detection, Self::Position, Self::Angle, Self::Area];

    /// The label variables the head predicts, in output column order.
    pub fn variables(&self) -> &'static [Variable] {
        match self {
            Self::Detection => &[Variable::Detection],
            Self::Position => &[Variable::X, Variable::Y],
            Self::Angle => &[Variable::Sin, Variable::Cos],
            Self::Area => &[Variable::Width, Variable::Height],
        }
    }

    /// The directory name of the trained head under an artifact root.
    pub fn artifact_name(&self) -> String {
        format!("best_model_{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_names() {
        let names: Vec<String> = Variable::iter().map(|var| var.to_string()).collect();
        assert_eq!(
            names,
            ["x", "y", "yaw", "width", "height", "sin", "cos", "detection"]
        );
        assert!(Variable::iter().zip(Variable::ALL).all(|(lhs, rhs)| lhs == rhs));
        assert!(Variable::ALL
            .iter()
            .enumerate()
            .all(|(index, var)| var.index() == index));
    }

    #[test]
    fn unknown_variable_names_are_rejected() {
        let vars: Vec<Variable> = serde_json::from_str(r#"["detection", "x", "y"]"#).unwrap();
        assert_eq!(vars, [Variable::Detection, Variable::X, Variable::Y]);
        assert!(serde_json::from_str::<Vec<Variable>>(r#"["x", "z"]"#).is_err());
        assert!(Variable::from_str("z").is_err());
    }

    #[test]
    fn head_role_artifacts() {
        assert_eq!(HeadRole::Angle.artifact_name(), "best_model_angle");
        assert_eq!(HeadRole::Angle.variables(), &[Variable::Sin, Variable::Cos]);
        assert_eq!(HeadRole::from_str("area").unwrap(), HeadRole::Area);
    }
}
