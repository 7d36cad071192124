pub mod backward_pass;
pub mod cpm;
pub mod forward_pass;

pub use backward_pass::{BackwardPass, LateTimes};
pub use cpm::{
    CRITICAL_FLOAT_TOLERANCE, CpmResult, TaskTiming, critical_path, critical_path_analysis,
};
pub use forward_pass::{EarlyTimes, ForwardPass};
