//! Dataset scanning and partitioning toolkit.

mod dataset_;
mod on_demand;
mod profile;
mod record;
mod split;
mod streaming;
mod subset;
mod unlabeled;
mod utils;

pub use dataset_::*;
pub use on_demand::*;
pub use profile::*;
pub use record::*;
pub use split::*;
pub use streaming::*;
pub use subset::*;
pub use unlabeled::*;
pub use utils::*;
