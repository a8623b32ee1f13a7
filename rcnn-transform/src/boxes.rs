use crate::{common::*, tensor::TensorExt};

/// Rescales `[N, 4]` boxes in (xmin, ymin, xmax, ymax) order from an image of
/// `original_size` to the same image resized to `new_size`.
///
/// The x and y ratios are computed independently. Integer boxes are promoted
/// to single precision floats.
pub fn resize_boxes(boxes: &Tensor, original_size: &HW<i64>, new_size: &HW<i64>) -> Result<Tensor> {
    let (_num_boxes, num_coords) = boxes.size2()?;
    ensure!(
        num_coords == 4,
        "expect boxes of shape [N, 4], but get {:?}",
        boxes.size()
    );
    ensure!(
        original_size.h() > 0 && original_size.w() > 0,
        "the original image size must be positive, but get {:?}",
        original_size.hw()
    );

    let Scale { sy, sx } = Scale::from_sizes(&original_size.cast::<f64>(), &new_size.cast::<f64>());

    let boxes = if boxes.is_floating() {
        boxes.shallow_clone()
    } else {
        boxes.to_kind(Kind::Float)
    };
    let ratios = Tensor::of_slice(&[sx, sy, sx, sy])
        .to_kind(boxes.kind())
        .to_device(boxes.device())
        .view([1, 4]);

    let resized = boxes.f_mul(&ratios)?;
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn resize_boxes_per_axis() {
        let boxes = Tensor::of_slice(&[10f32, 10.0, 50.0, 50.0]).view([1, 4]);
        let resized = resize_boxes(
            &boxes,
            &HW::from_hw([600, 800]),
            &HW::from_hw([640, 853]),
        )
        .unwrap();
        assert_eq!(resized.size(), [1, 4]);

        let expect = [
            10.0 * 853.0 / 800.0,
            10.0 * 640.0 / 600.0,
            50.0 * 853.0 / 800.0,
            50.0 * 640.0 / 600.0,
        ];
        expect.iter().enumerate().for_each(|(index, &value)| {
            assert_abs_diff_eq!(
                resized.double_value(&[0, index as i64]),
                value,
                epsilon = 1e-3
            );
        });
    }

    #[test]
    fn resize_boxes_round_trip() {
        let boxes = Tensor::rand(&[16, 4], FLOAT_CPU) * 500.0;
        let orig = HW::from_hw([480, 640]);
        let new = HW::from_hw([333, 999]);

        let resized = resize_boxes(&boxes, &orig, &new).unwrap();
        let restored = resize_boxes(&resized, &new, &orig).unwrap();
        let max_diff = f64::from((restored - &boxes).abs().max());
        assert_abs_diff_eq!(max_diff, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn resize_empty_boxes() {
        let boxes = Tensor::zeros(&[0, 4], FLOAT_CPU);
        let resized =
            resize_boxes(&boxes, &HW::from_hw([10, 10]), &HW::from_hw([20, 20])).unwrap();
        assert_eq!(resized.size(), [0, 4]);
    }

    #[test]
    fn resize_integer_boxes() {
        let boxes = Tensor::of_slice(&[1i64, 2, 3, 4]).view([1, 4]);
        let resized = resize_boxes(&boxes, &HW::from_hw([10, 10]), &HW::from_hw([5, 20])).unwrap();
        assert_eq!(resized.kind(), Kind::Float);
        assert_abs_diff_eq!(resized.double_value(&[0, 0]), 2.0);
        assert_abs_diff_eq!(resized.double_value(&[0, 1]), 1.0);
        assert_abs_diff_eq!(resized.double_value(&[0, 2]), 6.0);
        assert_abs_diff_eq!(resized.double_value(&[0, 3]), 2.0);
    }

    #[test]
    fn reject_malformed_boxes() {
        let boxes = Tensor::zeros(&[3, 5], FLOAT_CPU);
        assert!(resize_boxes(&boxes, &HW::from_hw([10, 10]), &HW::from_hw([5, 5])).is_err());

        let boxes = Tensor::zeros(&[4], FLOAT_CPU);
        assert!(resize_boxes(&boxes, &HW::from_hw([10, 10]), &HW::from_hw([5, 5])).is_err());
    }
}
