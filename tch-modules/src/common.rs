pub use anyhow::{ensure, Result};
pub use log::debug;
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::borrow::Borrow;
pub use tch::{
    nn::{self, Module as _, ModuleT as _},
    Tensor,
};
