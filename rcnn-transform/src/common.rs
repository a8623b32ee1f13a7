pub use anyhow::{ensure, format_err, Context as _, Result};
pub use bbox::{Scale, Xyxy, HW};
pub use indexmap::IndexMap;
pub use itertools::{izip, Itertools as _};
pub use log::{debug, warn};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{
    de::{SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
pub use std::{
    borrow::Borrow,
    fmt::{self, Display, Formatter},
    fs,
    path::Path,
};
pub use tch::{Device, Kind, Tensor};
pub use tch_tensor_like::TensorLike;
