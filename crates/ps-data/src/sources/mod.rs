pub mod file_source;
pub mod http_source;
pub mod static_source;

pub use file_source::FileCsvSource;
pub use http_source::HttpCsvSource;
pub use static_source::StaticSource;
