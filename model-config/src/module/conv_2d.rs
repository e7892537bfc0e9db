use super::*;
use crate::common::*;

/// A 2D convolution. The padding defaults to `k / 2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawConv2D", into = "RawConv2D")]
pub struct Conv2D {
    pub name: ModuleName,
    pub c: usize,
    pub k: usize,
    pub s: usize,
    pub p: usize,
    pub bias: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct RawConv2D {
    pub name: ModuleName,
    pub c: usize,
    pub k: usize,
    #[serde(default = "default_stride")]
    pub s: usize,
    pub p: Option<usize>,
    #[serde(default = "default_bias")]
    pub bias: bool,
}

impl From<RawConv2D> for Conv2D {
    fn from(raw: RawConv2D) -> Self {
        let RawConv2D {
            name,
            c,
            k,
            s,
            p,
            bias,
        } = raw;

        Self {
            name,
            c,
            k,
            s,
            p: p.unwrap_or(k / 2),
            bias,
        }
    }
}

impl From<Conv2D> for RawConv2D {
    fn from(orig: Conv2D) -> Self {
        let Conv2D {
            name,
            c,
            k,
            s,
            p,
            bias,
        } = orig;

        Self {
            name,
            c,
            k,
            s,
            p: Some(p),
            bias,
        }
    }
}

impl Conv2D {
    pub fn new(name: ModuleName, c: usize, k: usize) -> Self {
        Self {
            name,
            c,
            k,
            s: default_stride(),
            p: k / 2,
            bias: default_bias(),
        }
    }

    pub fn stride(self, s: usize) -> Self {
        Self { s, ..self }
    }

    fn output_size(&self, size: Dim) -> Option<Dim> {
        let out = match size {
            Dim::Size(size) => {
                let padded = size + 2 * self.p;
                if padded < self.k || self.s == 0 {
                    return None;
                }
                Dim::Size((padded - self.k) / self.s + 1)
            }
            Dim::Infer => Dim::Infer,
        };
        Some(out)
    }
}

impl ModuleEx for Conv2D {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        match input_shape?.dims() {
            &[b, _c, h, w] => {
                let h = self.output_size(h)?;
                let w = self.output_size(w)?;
                Some(vec![b, Dim::Size(self.c), h, w].into())
            }
            _ => None,
        }
    }
}

fn default_stride() -> usize {
    1
}

fn default_bias() -> bool {
    true
}
