//! Plain data models shared by every planning stage: well coordinates, the
//! column-major well sequence and destination plate dimensions.

pub mod plate;
pub mod well;
