//! Transform configuration format.

use crate::common::*;

/// The resize, normalization and batching options of the transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Candidate lengths of the shorter image edge.
    ///
    /// A single integer is accepted in place of a list. Training picks one at
    /// random per image, inference always uses the largest.
    #[serde(deserialize_with = "deserialize_min_size")]
    pub min_size: Vec<usize>,
    /// The upper bound of the longer image edge.
    pub max_size: usize,
    /// Per-channel mean subtracted from images.
    pub image_mean: Vec<R64>,
    /// Per-channel standard deviation images are divided by.
    pub image_std: Vec<R64>,
    /// Batched height and width are rounded up to multiples of this value.
    #[serde(default = "default_size_divisible")]
    pub size_divisible: usize,
    #[serde(default)]
    pub batch_mode: BatchMode,
    /// If set, training-time size sampling is reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TransformConfig {
    pub fn new(
        min_size: Vec<usize>,
        max_size: usize,
        image_mean: &[f64],
        image_std: &[f64],
    ) -> Result<Self> {
        let to_r64 = |name: &str, values: &[f64]| -> Result<Vec<R64>> {
            values
                .iter()
                .map(|&value| {
                    R64::try_new(value)
                        .ok_or_else(|| format_err!("{} contains non-finite value {}", name, value))
                })
                .try_collect()
        };

        let config = Self {
            min_size,
            max_size,
            image_mean: to_r64("image_mean", image_mean)?,
            image_std: to_r64("image_std", image_std)?,
            size_divisible: default_size_divisible(),
            batch_mode: BatchMode::default(),
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Self = json5::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            min_size,
            max_size,
            image_mean,
            image_std,
            size_divisible,
            ..
        } = self;

        ensure!(!min_size.is_empty(), "min_size must not be empty");
        ensure!(
            min_size.iter().all(|&size| size > 0),
            "min_size must be positive, but get {:?}",
            min_size
        );
        ensure!(*max_size > 0, "max_size must be positive");
        ensure!(!image_mean.is_empty(), "image_mean must not be empty");
        ensure!(
            image_mean.len() == image_std.len(),
            "image_mean and image_std must have the same length, but get {} and {}",
            image_mean.len(),
            image_std.len()
        );
        ensure!(
            image_std.iter().all(|std| std.raw() != 0.0),
            "image_std must be non-zero, but get {:?}",
            image_std
        );
        ensure!(*size_divisible > 0, "size_divisible must be positive");
        Ok(())
    }
}

/// The way images are packed into a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Copy each image into a slice of a zero tensor.
    Copy,
    /// Pad each image by explicit amounts and stack them. It avoids indexed
    /// in-place copies, which tracing-based exporters cannot record.
    Pad,
}

impl Default for BatchMode {
    fn default() -> Self {
        Self::Copy
    }
}

fn default_size_divisible() -> usize {
    32
}

fn deserialize_min_size<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    struct MinSizeVisitor;

    impl<'de> Visitor<'de> for MinSizeVisitor {
        type Value = Vec<usize>;

        fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a list of non-negative integers")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let value = usize::try_from(value)
                .map_err(|_| E::custom(format!("min_size {} is too large", value)))?;
            Ok(vec![value])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let value = usize::try_from(value)
                .map_err(|_| E::custom(format!("min_size must be non-negative, but get {}", value)))?;
            Ok(vec![value])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
                return Err(E::custom(format!(
                    "min_size must be a non-negative integer, but get {}",
                    value
                )));
            }
            Ok(vec![value as usize])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut sizes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(size) = seq.next_element::<usize>()? {
                sizes.push(size);
            }
            Ok(sizes)
        }
    }

    deserializer.deserialize_any(MinSizeVisitor)
}
