//! The normalize, resize, batch and postprocess pipeline around a detector.

use crate::{
    batch::batch_images,
    boxes::resize_boxes,
    common::*,
    config::{BatchMode, TransformConfig},
    image_list::ImageList,
    target::{Prediction, Target},
    tensor::TensorExt,
};

/// Records the `(h, w)` of each `[C, H, W]` image.
///
/// Detectors call it on raw inputs before [GeneralizedRcnnTransform::forward_t]
/// so that [GeneralizedRcnnTransform::postprocess] can restore the boxes.
pub fn image_sizes(images: &[Tensor]) -> Result<Vec<HW<i64>>> {
    images.iter().map(image_size).try_collect()
}

fn image_size(image: &Tensor) -> Result<HW<i64>> {
    ensure!(
        image.dim() == 3,
        "images is expected to be a list of 3d tensors of shape [C, H, W], got {:?}",
        image.size()
    );
    let (_c, h, w) = image.size3()?;
    HW::try_from_hw([h, w])
}

#[derive(Debug)]
pub struct GeneralizedRcnnTransform {
    min_size: Vec<usize>,
    max_size: usize,
    image_mean: Vec<f64>,
    image_std: Vec<f64>,
    size_divisible: usize,
    batch_mode: BatchMode,
    rng: StdRng,
}

impl GeneralizedRcnnTransform {
    pub fn new(config: &TransformConfig) -> Result<Self> {
        config.validate()?;

        let TransformConfig {
            ref min_size,
            max_size,
            ref image_mean,
            ref image_std,
            size_divisible,
            batch_mode,
            seed,
        } = *config;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            min_size: min_size.clone(),
            max_size,
            image_mean: image_mean.iter().map(|mean| mean.raw()).collect(),
            image_std: image_std.iter().map(|std| std.raw()).collect(),
            size_divisible,
            batch_mode,
            rng,
        })
    }

    pub fn normalize(&self, image: &Tensor) -> Result<Tensor> {
        image.f_normalize_channels(&self.image_mean, &self.image_std)
    }

    /// The length the shorter image edge is resized to.
    ///
    /// Training samples one of the configured lengths uniformly, inference
    /// always takes the largest one.
    pub fn target_min_size(&mut self, train: bool) -> usize {
        let Self { min_size, rng, .. } = self;

        let size = if train {
            min_size.choose(rng)
        } else {
            min_size.iter().max()
        };

        // the config validation guarantees a non-empty list
        *size.unwrap()
    }

    /// The uniform scale that brings the shorter edge of `size` to
    /// `target_min_size`, reduced if the longer edge would exceed `max_size`.
    pub fn scale_factor(&self, size: &HW<i64>, target_min_size: usize) -> f64 {
        let size = size.cast::<f64>();
        let max_size = self.max_size as f64;

        let scale = target_min_size as f64 / size.min_edge();
        if size.max_edge() * scale > max_size {
            max_size / size.max_edge()
        } else {
            scale
        }
    }

    /// Resizes an image into the configured edge length range and rescales
    /// the boxes of its target onto the new pixel grid.
    pub fn resize(
        &mut self,
        image: &Tensor,
        target: Option<Target>,
        train: bool,
    ) -> Result<(Tensor, Option<Target>)> {
        let orig_size = image_size(image)?;
        ensure!(
            orig_size.h() > 0 && orig_size.w() > 0,
            "cannot resize an empty image of shape {:?}",
            image.size()
        );

        let target_min_size = self.target_min_size(train);
        let scale = self.scale_factor(&orig_size, target_min_size);
        let image = image.f_resize_bilinear(scale)?;
        let new_size = image_size(&image)?;

        debug!(
            "resize image from {:?} to {:?}, scale = {}, min_size = {}",
            orig_size.hw(),
            new_size.hw(),
            scale,
            target_min_size
        );

        let target = target
            .map(|mut target| -> Result<_> {
                target.boxes = resize_boxes(&target.boxes, &orig_size, &new_size)?;
                Ok(target)
            })
            .transpose()?;

        Ok((image, target))
    }

    pub fn batch_images(&self, images: &[Tensor]) -> Result<Tensor> {
        batch_images(images, self.size_divisible, self.batch_mode)
    }

    /// Maps predicted boxes from the resized images back to the original images.
    ///
    /// Training-mode predictions are returned untouched.
    pub fn postprocess(
        &self,
        result: Vec<Prediction>,
        image_shapes: &[HW<i64>],
        original_image_sizes: &[HW<i64>],
        train: bool,
    ) -> Result<Vec<Prediction>> {
        if train {
            return Ok(result);
        }

        ensure!(
            result.len() == image_shapes.len() && result.len() == original_image_sizes.len(),
            "got {} predictions, {} image shapes and {} original image sizes",
            result.len(),
            image_shapes.len(),
            original_image_sizes.len()
        );

        izip!(result, image_shapes, original_image_sizes)
            .map(|(mut pred, image_shape, orig_size)| -> Result<_> {
                pred.boxes = resize_boxes(&pred.boxes, image_shape, orig_size)?;
                Ok(pred)
            })
            .try_collect()
    }

    /// Normalizes and resizes each image with its target, then packs the
    /// images into an [ImageList].
    pub fn forward_t(
        &mut self,
        images: &[Tensor],
        targets: Option<Vec<Target>>,
        train: bool,
    ) -> Result<(ImageList, Option<Vec<Target>>)> {
        if let Some(targets) = &targets {
            ensure!(
                targets.len() == images.len(),
                "got {} images but {} targets",
                images.len(),
                targets.len()
            );
        }

        let has_targets = targets.is_some();
        let mut targets_iter = targets.into_iter().flatten();
        let mut resized_images = Vec::with_capacity(images.len());
        let mut resized_targets = Vec::with_capacity(images.len());

        for image in images {
            let target = targets_iter.next();
            image_size(image)?;

            let image = self.normalize(image)?;
            let (image, target) = self.resize(&image, target, train)?;
            resized_images.push(image);
            resized_targets.extend(target);
        }

        let image_sizes = image_sizes(&resized_images)?;
        let batched = self.batch_images(&resized_images)?;
        let image_list = ImageList::new(batched, image_sizes)?;

        Ok((image_list, has_targets.then(|| resized_targets)))
    }
}

impl Display for GeneralizedRcnnTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let indent = "\n    ";
        write!(f, "GeneralizedRcnnTransform(")?;
        write!(
            f,
            "{}Normalize(mean={:?}, std={:?})",
            indent, self.image_mean, self.image_std
        )?;
        write!(
            f,
            "{}Resize(min_size={:?}, max_size={}, mode='bilinear')",
            indent, self.min_size, self.max_size
        )?;
        write!(f, "\n)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::kind::FLOAT_CPU;

    fn transform(min_size: Vec<usize>, max_size: usize) -> GeneralizedRcnnTransform {
        let config = TransformConfig::new(min_size, max_size, &[0.0; 3], &[1.0; 3]).unwrap();
        GeneralizedRcnnTransform::new(&config).unwrap()
    }

    #[test]
    fn scale_factor_clamps_longer_edge() {
        let transform = transform(vec![800], 1000);
        let scale = transform.scale_factor(&HW::from_hw([100, 400]), 800);
        assert_eq!(scale, 2.5);

        let scale = transform.scale_factor(&HW::from_hw([400, 400]), 800);
        assert_eq!(scale, 2.0);
    }

    #[test]
    fn inference_uses_largest_min_size() {
        let mut transform = transform(vec![640, 800, 720], 1333);
        (0..10).for_each(|_| assert_eq!(transform.target_min_size(false), 800));
    }

    #[test]
    fn training_samples_configured_min_size() {
        let mut transform = transform(vec![64, 96, 128], 1000);
        let samples: Vec<_> = (0..200)
            .map(|_| transform.target_min_size(true))
            .collect();
        assert!(samples.iter().all(|size| [64, 96, 128].contains(size)));
        assert!(samples.iter().unique().count() > 1);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let config = TransformConfig {
            seed: Some(7),
            ..TransformConfig::new(vec![480, 512, 544, 576, 608, 640], 1000, &[0.0], &[1.0])
                .unwrap()
        };
        let mut lhs = GeneralizedRcnnTransform::new(&config).unwrap();
        let mut rhs = GeneralizedRcnnTransform::new(&config).unwrap();

        (0..50).for_each(|_| {
            assert_eq!(lhs.target_min_size(true), rhs.target_min_size(true));
        });
    }

    #[test]
    fn resize_without_target() {
        let mut transform = transform(vec![800], 1000);
        let image = Tensor::rand(&[3, 100, 400], FLOAT_CPU);
        let (resized, target) = transform.resize(&image, None, false).unwrap();
        assert_eq!(resized.size(), [3, 250, 1000]);
        assert!(target.is_none());
    }

    #[test]
    fn display_transform() {
        let config =
            TransformConfig::new(vec![800], 1333, &[0.485, 0.456, 0.406], &[0.229, 0.224, 0.225])
                .unwrap();
        let transform = GeneralizedRcnnTransform::new(&config).unwrap();
        let expect = "GeneralizedRcnnTransform(
    Normalize(mean=[0.485, 0.456, 0.406], std=[0.229, 0.224, 0.225])
    Resize(min_size=[800], max_size=1333, mode='bilinear')
)";
        assert_eq!(transform.to_string(), expect);
    }
}
