pub mod ingest;
pub mod list;
pub mod serve;
