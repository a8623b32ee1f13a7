use crate::common::*;

/// Fully-connected layer followed by ReLU and dropout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FcBlockInit {
    pub in_c: usize,
    pub out_c: usize,
    pub dropout: R64,
}

impl FcBlockInit {
    pub fn new(in_c: usize, out_c: usize) -> Self {
        Self {
            in_c,
            out_c,
            dropout: r64(0.5),
        }
    }

    pub fn build<'p, P>(self, path: P) -> FcBlock
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            in_c,
            out_c,
            dropout,
        } = self;

        let linear = nn::linear(path / "linear", in_c as i64, out_c as i64, Default::default());

        FcBlock {
            linear,
            dropout: dropout.raw(),
        }
    }
}

#[derive(Debug)]
pub struct FcBlock {
    linear: nn::Linear,
    dropout: f64,
}

impl nn::ModuleT for FcBlock {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        self.linear.forward(xs).relu().dropout(self.dropout, train)
    }
}
