pub mod extractor;
pub mod providers;
pub mod uploads;
pub mod weather;

pub use extractor::{DocumentTextExtractor, ExtractorRegistry};
pub use providers::TextProvider;
pub use uploads::{UploadStore, UploadedDocument};
pub use weather::WeatherProvider;
