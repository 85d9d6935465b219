pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use approx::{abs_diff_eq, AbsDiffEq};
pub use face_label::{AgeBand, ClassMode, FaceAttrs, Gender, MaskState, PartialFaceAttrs};
pub use futures::stream::{self, Stream, StreamExt as _, TryStreamExt as _};
pub use indexmap::IndexSet;
pub use itertools::{izip, Itertools as _};
pub use log::{info, warn};
pub use noisy_float::prelude::*;
pub use par_stream::prelude::*;
pub use rand::prelude::*;
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    cmp,
    collections::{HashMap, HashSet},
    fmt,
    fmt::Debug,
    future::Future,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    pin::Pin,
    str::FromStr,
    sync::Arc,
    time::Instant,
};
pub use tch::{vision, Device, IndexOp, Kind, Tensor};
pub use tch_tensor_like::TensorLike;
