pub mod defs;

pub use defs::{Assignment, CourseError, CourseKey, CourseRecord, FeedSnapshot, SourceResult};
