pub use anyhow::{bail, ensure, Error, Result};
pub use serde::{Deserialize, Serialize};
pub use std::str::FromStr;
