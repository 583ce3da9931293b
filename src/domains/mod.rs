pub mod donation;
pub mod donor;
pub mod export;
pub mod stats;
pub mod table;
