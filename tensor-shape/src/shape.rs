use crate::{common::*, dim::Dim};

/// A tensor shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<Dim>);

impl Shape {
    pub fn new(dims: impl IntoIterator<Item = Dim>) -> Self {
        Self(dims.into_iter().collect())
    }

    /// A shape with an inferred leading batch dimension.
    pub fn batched(dims: &[usize]) -> Self {
        Self::new(std::iter::once(Dim::Infer).chain(dims.iter().cloned().map(Dim::Size)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dims(&self) -> &[Dim] {
        &self.0
    }

    /// The dimensions after the leading batch dimension.
    pub fn sample_dims(&self) -> &[Dim] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// The product of the dimensions after the leading batch dimension.
    pub fn sample_numel(&self) -> Dim {
        self.sample_dims()
            .iter()
            .fold(Dim::Size(1), |product, &dim| product * dim)
    }

    /// Known sizes of the dimensions after the batch dimension, if none is inferred.
    pub fn sample_sizes(&self) -> Option<Vec<usize>> {
        self.sample_dims().iter().map(Dim::size).collect()
    }

    pub fn is_compatible_with(&self, other: &Shape) -> bool {
        self.equalize(other).is_some()
    }

    pub fn equalize(&self, other: &Shape) -> Option<Shape> {
        if self.len() != other.len() {
            return None;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(lhs, rhs)| lhs.equalize(rhs))
            .collect::<Option<Vec<_>>>()
            .map(Shape)
    }
}

impl From<Vec<Dim>> for Shape {
    fn from(dims: Vec<Dim>) -> Self {
        Self(dims)
    }
}

impl AsRef<[Dim]> for Shape {
    fn as_ref(&self) -> &[Dim] {
        &self.0
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, dim) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            Display::fmt(dim, f)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_serde() {
        let shape: Shape = serde_json::from_str(r#"["_", 1, 200, 200]"#).unwrap();
        assert_eq!(shape, Shape::batched(&[1, 200, 200]));
        assert_eq!(serde_json::to_string(&shape).unwrap(), r#"["_",1,200,200]"#);
        assert!(serde_json::from_str::<Shape>(r#"["?", 1]"#).is_err());
    }

    #[test]
    fn shape_equalize() {
        let lhs = Shape::batched(&[200, 200]);
        let rhs = Shape::new([Dim::Size(32), Dim::Size(200), Dim::Infer]);
        assert_eq!(
            lhs.equalize(&rhs),
            Some(Shape::new([Dim::Size(32), Dim::Size(200), Dim::Size(200)]))
        );
        assert!(!lhs.is_compatible_with(&Shape::batched(&[200, 100])));
        assert!(!lhs.is_compatible_with(&Shape::batched(&[200])));
    }

    #[test]
    fn sample_numel() {
        let shape = Shape::batched(&[64, 2, 3]);
        assert_eq!(shape.sample_numel(), Dim::Size(384));
        assert_eq!(shape.sample_sizes(), Some(vec![64, 2, 3]));
        assert_eq!(shape.to_string(), "[_, 64, 2, 3]");
    }
}
