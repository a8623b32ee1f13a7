use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConvRelu2DInit {
    pub in_c: usize,
    pub out_c: usize,
    pub k: usize,
    pub s: usize,
    pub p: usize,
}

impl ConvRelu2DInit {
    /// A stride-1 convolution that keeps the spatial size for odd kernels.
    pub fn new(in_c: usize, out_c: usize, k: usize) -> Self {
        Self {
            in_c,
            out_c,
            k,
            s: 1,
            p: k / 2,
        }
    }

    pub fn build<'p, P>(self, path: P) -> ConvRelu2D
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            in_c,
            out_c,
            k,
            s,
            p,
        } = self;

        let conv = nn::conv2d(
            path / "conv",
            in_c as i64,
            out_c as i64,
            k as i64,
            nn::ConvConfig {
                stride: s as i64,
                padding: p as i64,
                ..Default::default()
            },
        );

        ConvRelu2D { conv }
    }

    /// Spatial output length of the convolution for an input length.
    pub fn output_len(&self, input_len: usize) -> Option<usize> {
        let Self { k, s, p, .. } = *self;
        let padded = input_len + 2 * p;
        (padded >= k && s > 0).then(|| (padded - k) / s + 1)
    }
}

#[derive(Debug)]
pub struct ConvRelu2D {
    conv: nn::Conv2D,
}

impl nn::Module for ConvRelu2D {
    fn forward(&self, xs: &Tensor) -> Tensor {
        self.conv.forward(xs).relu()
    }
}
