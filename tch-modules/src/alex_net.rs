//! AlexNet sized for single-channel digit images.

use crate::{
    common::*,
    conv_relu_2d::{ConvRelu2D, ConvRelu2DInit},
    fc_block::{FcBlock, FcBlockInit},
    max_pool_2d::MaxPool2D,
};

/// Construction parameters of [AlexNet].
///
/// The default builds the 10-class network for 1x224x224 inputs, for example
/// MNIST digits upsampled to 224 pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlexNetInit {
    pub in_c: usize,
    pub num_classes: usize,
    pub dropout: R64,
}

impl Default for AlexNetInit {
    fn default() -> Self {
        Self {
            in_c: 1,
            num_classes: 10,
            dropout: r64(0.5),
        }
    }
}

impl AlexNetInit {
    /// The input height and width the fully-connected head is sized for.
    pub const INPUT_SIZE: usize = 224;

    const FEATURE_C: usize = 256;
    const HIDDEN_C: usize = 4096;

    pub fn build<'p, P>(self, path: P) -> AlexNet
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            in_c,
            num_classes,
            dropout,
        } = self;

        // large window with stride 4 to shrink the input early
        let conv1 = ConvRelu2DInit {
            s: 4,
            p: 1,
            ..ConvRelu2DInit::new(in_c, 96, 11)
        };
        let conv2 = ConvRelu2DInit::new(96, 256, 5);
        let conv3 = ConvRelu2DInit::new(256, 384, 3);
        let conv4 = ConvRelu2DInit::new(384, 384, 3);
        let conv5 = ConvRelu2DInit::new(384, Self::FEATURE_C, 3);
        let pool = MaxPool2D::new(3, 2);

        let feature_len = [&conv1, &conv2, &conv3, &conv4, &conv5]
            .iter()
            .zip([true, true, false, false, true])
            .try_fold(Self::INPUT_SIZE, |len, (conv, pooled)| {
                let len = conv.output_len(len)?;
                if pooled {
                    pool.output_len(len)
                } else {
                    Some(len)
                }
            })
            .unwrap(); // fixed layer sizes, never fails
        let flat_c = Self::FEATURE_C * feature_len * feature_len;
        debug!(
            "build AlexNet with {} flattened features and {} classes",
            flat_c, num_classes
        );

        let fc1 = FcBlockInit {
            dropout,
            ..FcBlockInit::new(flat_c, Self::HIDDEN_C)
        };
        let fc2 = FcBlockInit {
            dropout,
            ..FcBlockInit::new(Self::HIDDEN_C, Self::HIDDEN_C)
        };

        AlexNet {
            conv1: conv1.build(path / "conv1"),
            conv2: conv2.build(path / "conv2"),
            conv3: conv3.build(path / "conv3"),
            conv4: conv4.build(path / "conv4"),
            conv5: conv5.build(path / "conv5"),
            pool,
            fc1: fc1.build(path / "fc1"),
            fc2: fc2.build(path / "fc2"),
            classifier: nn::linear(
                path / "classifier",
                Self::HIDDEN_C as i64,
                num_classes as i64,
                Default::default(),
            ),
            in_c: in_c as i64,
        }
    }
}

/// Builds the default digit classifier under `path`.
pub fn alex_net<'p, P>(path: P) -> AlexNet
where
    P: Borrow<nn::Path<'p>>,
{
    AlexNetInit::default().build(path)
}

#[derive(Debug)]
pub struct AlexNet {
    conv1: ConvRelu2D,
    conv2: ConvRelu2D,
    conv3: ConvRelu2D,
    conv4: ConvRelu2D,
    conv5: ConvRelu2D,
    pool: MaxPool2D,
    fc1: FcBlock,
    fc2: FcBlock,
    classifier: nn::Linear,
    in_c: i64,
}

impl AlexNet {
    /// Runs the network after checking the input is a `[B, C, 224, 224]` batch.
    pub fn f_forward_t(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let (_b, c, h, w) = xs.size4()?;
        let input_size = AlexNetInit::INPUT_SIZE as i64;
        ensure!(
            c == self.in_c && h == input_size && w == input_size,
            "expect input of shape [_, {}, {}, {}], but get {:?}",
            self.in_c,
            input_size,
            input_size,
            xs.size()
        );
        Ok(self.forward_t(xs, train))
    }
}

impl nn::ModuleT for AlexNet {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let Self {
            conv1,
            conv2,
            conv3,
            conv4,
            conv5,
            pool,
            fc1,
            fc2,
            classifier,
            ..
        } = self;

        let xs = pool.forward(&conv1.forward(xs));
        let xs = pool.forward(&conv2.forward(&xs));
        let xs = conv3.forward(&xs);
        let xs = conv4.forward(&xs);
        let xs = pool.forward(&conv5.forward(&xs));
        let xs = xs.flatten(1, -1);
        let xs = fc1.forward_t(&xs, train);
        let xs = fc2.forward_t(&xs, train);
        classifier.forward(&xs)
    }
}
