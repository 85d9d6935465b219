use crate::{common::*, size::PixelSize};

/// The record with image path and labels, but without image pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: PixelSize,
    /// The labeled attributes, or `None` when the file carries no ground
    /// truth.
    pub attrs: Option<FaceAttrs>,
    /// The packed class id, or `-1` when the file carries no ground truth.
    pub class: i64,
    /// The index into the owning dataset's profile list, if the record
    /// belongs to a profile.
    pub profile_index: Option<usize>,
}

/// The identity a group of images was collected from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profile {
    pub id: String,
    pub gender: Gender,
    pub age_band: AgeBand,
    pub dir: PathBuf,
}

/// The record with image pixels and its class id.
#[derive(Debug, TensorLike)]
pub struct DataRecord {
    pub image: Tensor,
    #[tensor_like(copy)]
    pub class: i64,
}
