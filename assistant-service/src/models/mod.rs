pub mod chat;
pub mod policy;
pub mod weather;

pub use chat::{CityExtraction, FormattedReply};
pub use policy::{PolicyAnswer, PolicyQuery};
pub use weather::WeatherSnapshot;
