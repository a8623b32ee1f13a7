use crate::{common::*, config::BatchMode, tensor::TensorExt};

/// Element-wise maximum over a list of equally long shapes.
pub fn max_by_axis<S>(shapes: impl IntoIterator<Item = S>) -> Option<Vec<i64>>
where
    S: AsRef<[i64]>,
{
    let mut iter = shapes.into_iter();
    let mut maxes = iter.next()?.as_ref().to_vec();
    for shape in iter {
        maxes
            .iter_mut()
            .zip(shape.as_ref())
            .for_each(|(max, &dim)| *max = (*max).max(dim));
    }
    Some(maxes)
}

/// The `[C, H, W]` shape every image is padded to, with H and W rounded up
/// to multiples of `size_divisible`.
pub fn padded_shape(images: &[Tensor], size_divisible: usize) -> Result<[i64; 3]> {
    ensure!(!images.is_empty(), "cannot batch an empty list of images");
    ensure!(size_divisible > 0, "size_divisible must be positive");

    let shapes: Vec<[i64; 3]> = images
        .iter()
        .map(|image| -> Result<_> {
            let (c, h, w) = image.size3()?;
            Ok([c, h, w])
        })
        .try_collect()?;
    if !shapes.iter().map(|[c, _, _]| c).all_equal() {
        warn!(
            "batched images have different channel counts, missing channels are zero-filled: {:?}",
            shapes
        );
    }

    let max_size = max_by_axis(&shapes).ok_or_else(|| format_err!("no image shapes"))?;
    let stride = size_divisible as i64;
    let round_up = |len: i64| (len + stride - 1) / stride * stride;
    Ok([max_size[0], round_up(max_size[1]), round_up(max_size[2])])
}

/// Packs `[C, H, W]` images into one zero-padded `[B, C, H, W]` batch.
///
/// Each image lands on the top-left corner of its slot so that box
/// coordinates stay valid without offsets.
pub fn batch_images(images: &[Tensor], size_divisible: usize, mode: BatchMode) -> Result<Tensor> {
    let shape = padded_shape(images, size_divisible)?;
    debug!(
        "batch {} images into shape {:?} with {:?} mode",
        images.len(),
        shape,
        mode
    );

    match mode {
        BatchMode::Copy => copy_into_batch(images, shape),
        BatchMode::Pad => pad_and_stack(images, shape),
    }
}

fn copy_into_batch(images: &[Tensor], shape: [i64; 3]) -> Result<Tensor> {
    let [channels, height, width] = shape;
    let first = &images[0];
    let batched = Tensor::f_zeros(
        &[images.len() as i64, channels, height, width],
        (first.kind(), first.device()),
    )?;

    for (index, image) in images.iter().enumerate() {
        let (c, h, w) = image.size3()?;
        let mut slot = batched
            .f_select(0, index as i64)?
            .f_narrow(0, 0, c)?
            .f_narrow(1, 0, h)?
            .f_narrow(2, 0, w)?;
        slot.f_copy_(image)?;
    }

    Ok(batched)
}

fn pad_and_stack(images: &[Tensor], shape: [i64; 3]) -> Result<Tensor> {
    // follow the kind of the first image as the copy mode does
    let kind = images[0].kind();
    let padded: Vec<_> = images
        .iter()
        .map(|image| -> Result<_> {
            let padded = image.f_pad_to(shape)?.f_to_kind(kind)?;
            Ok(padded)
        })
        .try_collect()?;
    let batched = Tensor::f_stack(padded.as_slice(), 0)?;
    Ok(batched)
}
