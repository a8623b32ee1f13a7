use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaxPool2D {
    pub k: usize,
    pub s: usize,
    pub p: usize,
    pub d: usize,
    pub ceil_mode: bool,
}

impl MaxPool2D {
    pub fn new(k: usize, s: usize) -> Self {
        Self {
            k,
            s,
            p: 0,
            d: 1,
            ceil_mode: false,
        }
    }

    pub fn output_len(&self, input_len: usize) -> Option<usize> {
        let Self {
            k,
            s,
            p,
            d,
            ceil_mode,
        } = *self;
        let window = d * k.checked_sub(1)? + 1;
        let padded = input_len + 2 * p;
        if padded < window || s == 0 {
            return None;
        }
        let span = padded - window;
        let len = if ceil_mode {
            (span + s - 1) / s + 1
        } else {
            span / s + 1
        };
        Some(len)
    }
}

impl nn::Module for MaxPool2D {
    fn forward(&self, xs: &Tensor) -> Tensor {
        let Self {
            k,
            s,
            p,
            d,
            ceil_mode,
        } = *self;
        let (k, s, p, d) = (k as i64, s as i64, p as i64, d as i64);
        xs.max_pool2d(&[k, k], &[s, s], &[p, p], &[d, d], ceil_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn max_pool_output_size() {
        let pool = MaxPool2D::new(3, 2);
        assert_eq!(pool.output_len(54), Some(26));
        assert_eq!(pool.output_len(2), None);

        let empty = MaxPool2D::new(0, 1);
        assert_eq!(empty.output_len(10), None);

        let input = Tensor::randn(&[1, 4, 54, 54], FLOAT_CPU);
        let output = pool.forward(&input);
        assert_eq!(output.size(), [1, 4, 26, 26]);
    }

    #[test]
    fn max_pool_picks_window_maximum() {
        let pool = MaxPool2D::new(2, 2);
        let input = Tensor::of_slice(&[1f32, 5.0, 3.0, 2.0]).view([1, 1, 2, 2]);
        let output = pool.forward(&input);
        assert_eq!(output.double_value(&[0, 0, 0, 0]), 5.0);
    }
}
