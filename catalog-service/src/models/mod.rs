pub mod reading;
pub mod responses;
pub mod storage;
