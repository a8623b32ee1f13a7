use crate::common::*;

pub trait TensorExt {
    fn is_floating(&self) -> bool;

    /// Computes `(self - mean) / std` per channel of a `[C, H, W]` image.
    fn f_normalize_channels(&self, mean: &[f64], std: &[f64]) -> Result<Tensor>;

    fn normalize_channels(&self, mean: &[f64], std: &[f64]) -> Tensor {
        self.f_normalize_channels(mean, std).unwrap()
    }

    /// Bilinearly rescales a `[C, H, W]` image by the same factor on both axes.
    ///
    /// The output size is `floor(H * scale) x floor(W * scale)`.
    fn f_resize_bilinear(&self, scale: f64) -> Result<Tensor>;

    fn resize_bilinear(&self, scale: f64) -> Tensor {
        self.f_resize_bilinear(scale).unwrap()
    }

    /// Zero-pads a `[C, H, W]` image at the channel end, bottom and right to `shape`.
    fn f_pad_to(&self, shape: [i64; 3]) -> Result<Tensor>;
}

impl TensorExt for Tensor {
    fn is_floating(&self) -> bool {
        matches!(
            self.kind(),
            Kind::Half | Kind::BFloat16 | Kind::Float | Kind::Double
        )
    }

    fn f_normalize_channels(&self, mean: &[f64], std: &[f64]) -> Result<Tensor> {
        let (channels, _height, _width) = self.size3()?;
        ensure!(
            self.is_floating(),
            "expect a floating point image, but get {:?}",
            self.kind()
        );
        ensure!(
            mean.len() as i64 == channels && std.len() as i64 == channels,
            "expect {} mean and std values, but get {} and {}",
            channels,
            mean.len(),
            std.len()
        );

        let options = (self.kind(), self.device());
        let mean = Tensor::of_slice(mean)
            .to_kind(options.0)
            .to_device(options.1)
            .view([channels, 1, 1]);
        let std = Tensor::of_slice(std)
            .to_kind(options.0)
            .to_device(options.1)
            .view([channels, 1, 1]);

        let normalized = self.f_sub(&mean)?.f_div(&std)?;
        Ok(normalized)
    }

    fn f_resize_bilinear(&self, scale: f64) -> Result<Tensor> {
        let (_channels, height, width) = self.size3()?;
        ensure!(
            scale.is_finite() && scale > 0.0,
            "scale must be positive, but get {}",
            scale
        );

        let new_height = (height as f64 * scale).floor() as i64;
        let new_width = (width as f64 * scale).floor() as i64;
        ensure!(
            new_height > 0 && new_width > 0,
            "resizing a {}x{} image by {} leaves no pixels",
            height,
            width,
            scale
        );

        // bilinear interpolation only accepts 4D input. Pixels are sampled at
        // exactly 1 / scale even when the output size was floored.
        let resized = self
            .f_unsqueeze(0)?
            .f_upsample_bilinear2d(&[new_height, new_width], false, scale, scale)?
            .f_select(0, 0)?;
        Ok(resized)
    }

    fn f_pad_to(&self, shape: [i64; 3]) -> Result<Tensor> {
        let (channels, height, width) = self.size3()?;
        let [new_channels, new_height, new_width] = shape;
        ensure!(
            new_channels >= channels && new_height >= height && new_width >= width,
            "cannot pad a tensor of shape {:?} to {:?}",
            self.size(),
            shape
        );

        // padding amounts are listed from the last dimension backwards
        let padded = self.f_constant_pad_nd(&[
            0,
            new_width - width,
            0,
            new_height - height,
            0,
            new_channels - channels,
        ])?;
        Ok(padded)
    }
}
