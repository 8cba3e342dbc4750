//! Region geometry: voxel clouds, principal axes, sign harmonization and
//! segmentation along an axis.

pub mod axes;
pub mod cloud;
pub mod eigen;
pub mod orient;
pub mod segment;

pub use axes::{AxisFrame, solve_axes};
pub use cloud::VoxelCloud;
pub use orient::{Confidence, DirectionTargets, DirectionalityPolicy, ImageAxis, harmonize};
pub use segment::{SegmentAssignment, SegmentPolicy, segment};
