use crate::common::*;

/// A padded image batch with the size each image had before padding.
#[derive(Debug, TensorLike)]
pub struct ImageList {
    /// `[B, C, H, W]` batch with images aligned to the top-left corner.
    pub tensors: Tensor,
    #[tensor_like(clone)]
    pub image_sizes: Vec<HW<i64>>,
}

impl ImageList {
    pub fn new(tensors: Tensor, image_sizes: Vec<HW<i64>>) -> Result<Self> {
        let (batch_size, _channels, height, width) = tensors.size4()?;
        ensure!(
            batch_size == image_sizes.len() as i64,
            "the batch has {} images, but {} image sizes are given",
            batch_size,
            image_sizes.len()
        );
        ensure!(
            image_sizes
                .iter()
                .all(|size| size.h() <= height && size.w() <= width),
            "image sizes {:?} do not fit in a {}x{} batch",
            image_sizes,
            height,
            width
        );

        Ok(Self {
            tensors,
            image_sizes,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.image_sizes.len()
    }

    /// Crops the unpadded image at `index` out of the batch.
    pub fn image(&self, index: usize) -> Option<Tensor> {
        let size = self.image_sizes.get(index)?;
        let image = self
            .tensors
            .select(0, index as i64)
            .narrow(1, 0, size.h())
            .narrow(2, 0, size.w());
        Some(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn crop_unpadded_images() {
        let tensors = Tensor::rand(&[2, 3, 32, 64], FLOAT_CPU);
        let image_list = ImageList::new(
            tensors.shallow_clone(),
            vec![HW::from_hw([20, 64]), HW::from_hw([32, 10])],
        )
        .unwrap();

        assert_eq!(image_list.batch_size(), 2);
        assert_eq!(image_list.image(0).unwrap().size(), [3, 20, 64]);
        assert_eq!(image_list.image(1).unwrap().size(), [3, 32, 10]);
        assert!(image_list.image(2).is_none());
        assert!(image_list
            .image(1)
            .unwrap()
            .equal(&tensors.select(0, 1).narrow(2, 0, 10)));
    }

    #[test]
    fn reject_inconsistent_sizes() {
        let tensors = Tensor::zeros(&[2, 3, 32, 32], FLOAT_CPU);
        assert!(ImageList::new(tensors.shallow_clone(), vec![HW::from_hw([32, 32])]).is_err());
        assert!(ImageList::new(
            tensors.shallow_clone(),
            vec![HW::from_hw([32, 32]), HW::from_hw([33, 8])]
        )
        .is_err());
        assert!(ImageList::new(Tensor::zeros(&[3, 32, 32], FLOAT_CPU), vec![]).is_err());
    }

    #[test]
    fn move_to_device_keeps_sizes() {
        let image_list = ImageList::new(
            Tensor::ones(&[1, 3, 8, 8], FLOAT_CPU),
            vec![HW::from_hw([5, 6])],
        )
        .unwrap();
        let moved = image_list.to_device(Device::Cpu);
        assert_eq!(moved.image_sizes, image_list.image_sizes);
        assert!(moved.tensors.equal(&image_list.tensors));
    }
}
