pub mod analytics;
pub mod csv_parser;
pub mod date_range;
pub mod partition;
pub mod pipeline;
pub mod preprocess;
pub mod recurring;
pub mod sunburst;
