pub mod aggregate;
pub mod cohort;
pub mod region;
pub mod subject;

pub use aggregate::{SegmentProfile, Statistic, aggregate_segments};
pub use cohort::{CohortProfile, combine_profiles};
pub use region::{RegionResult, SubjectOutcome, SubjectRecord, SubjectStatus, combine_region};
pub use subject::{AxisProfile, RegionProfiles, SubjectVolumes, load_subject, profile_region};
