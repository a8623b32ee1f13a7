use crate::common::*;

/// Per-image annotations or predictions.
///
/// `boxes` is a `[N, 4]` tensor in (xmin, ymin, xmax, ymax) pixel order on
/// the image's current pixel grid. Other per-box fields such as labels and
/// scores are kept by name and are never touched by the transforms.
#[derive(Debug)]
pub struct Target {
    pub boxes: Tensor,
    pub fields: IndexMap<String, Tensor>,
}

/// Detector output uses the same layout as training targets.
pub type Prediction = Target;

impl Target {
    pub fn new(boxes: Tensor) -> Result<Self> {
        let (_num_boxes, num_coords) = boxes.size2()?;
        ensure!(
            num_coords == 4,
            "expect boxes of shape [N, 4], but get {:?}",
            boxes.size()
        );

        Ok(Self {
            boxes,
            fields: IndexMap::new(),
        })
    }

    pub fn from_boxes<B>(boxes: impl IntoIterator<Item = B>) -> Self
    where
        B: Borrow<Xyxy<f32>>,
    {
        let values: Vec<f32> = boxes
            .into_iter()
            .flat_map(|bbox| bbox.borrow().xyxy())
            .collect();
        let boxes = Tensor::of_slice(&values).view([-1, 4]);

        Self {
            boxes,
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, tensor: Tensor) -> Self {
        self.fields.insert(name.into(), tensor);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Tensor> {
        self.fields.get(name)
    }

    /// The length of the first axis of `boxes`, zero for a scalar tensor.
    pub fn num_boxes(&self) -> i64 {
        self.boxes.size().first().copied().unwrap_or(0)
    }

    /// Copies the boxes to the host.
    pub fn to_xyxy_vec(&self) -> Result<Vec<Xyxy<f32>>> {
        let values: Vec<f32> = self
            .boxes
            .to_device(Device::Cpu)
            .to_kind(Kind::Float)
            .reshape(&[-1])
            .into();
        values
            .chunks_exact(4)
            .map(|xyxy| Xyxy::try_from_xyxy([xyxy[0], xyxy[1], xyxy[2], xyxy[3]]))
            .try_collect()
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            boxes: self.boxes.shallow_clone(),
            fields: self
                .fields
                .iter()
                .map(|(name, tensor)| (name.clone(), tensor.shallow_clone()))
                .collect(),
        }
    }

    pub fn to_device(&self, device: Device) -> Self {
        Self {
            boxes: self.boxes.to_device(device),
            fields: self
                .fields
                .iter()
                .map(|(name, tensor)| (name.clone(), tensor.to_device(device)))
                .collect(),
        }
    }
}
