pub mod complete;
pub mod due;
pub mod review;
pub mod show;
pub mod stats;
