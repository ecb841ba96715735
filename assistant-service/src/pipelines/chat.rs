//! Free text → city → current weather → friendly reply.

use super::{record_outcome, timed, PipelineError};
use crate::models::{CityExtraction, FormattedReply, WeatherSnapshot};
use crate::services::providers::{ChatMessage, TextProvider};
use crate::services::weather::WeatherProvider;
use std::sync::Arc;

const PIPELINE: &str = "chat";

/// Progress of one chat run. Any non-terminal stage may end in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStage {
    Received,
    CityExtracted,
    WeatherFetched,
    Formatted,
    Completed,
}

impl ChatStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStage::Received => "received",
            ChatStage::CityExtracted => "city_extracted",
            ChatStage::WeatherFetched => "weather_fetched",
            ChatStage::Formatted => "formatted",
            ChatStage::Completed => "completed",
        }
    }
}

pub fn city_extraction_prompt(input: &str) -> String {
    format!("Pick city name from the below sentence\n{}", input)
}

pub fn format_prompt(weather: &WeatherSnapshot) -> String {
    format!(
        "format this nicely and add some emoji also\nCity: {}\nTemperature: {}\nFeels like: {}\nDescription: {}",
        weather.city, weather.temperature_celsius, weather.feels_like_celsius, weather.description
    )
}

pub struct ChatPipeline {
    model: Arc<dyn TextProvider>,
    weather: Arc<dyn WeatherProvider>,
}

impl ChatPipeline {
    pub fn new(model: Arc<dyn TextProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { model, weather }
    }

    #[tracing::instrument(name = "chat_pipeline", skip_all, fields(input_len = input.len()))]
    pub async fn run(&self, input: &str) -> Result<FormattedReply, PipelineError> {
        let result = self.execute(input).await;
        record_outcome(PIPELINE, &result);
        result
    }

    async fn execute(&self, input: &str) -> Result<FormattedReply, PipelineError> {
        if input.trim().is_empty() {
            return Err(PipelineError::Validation("input is required".to_string()));
        }

        let city = timed(
            PIPELINE,
            ChatStage::CityExtracted.as_str(),
            self.extract_city(input),
        )
        .await?;
        tracing::info!(city = %city, "City extracted");

        let weather = timed(
            PIPELINE,
            ChatStage::WeatherFetched.as_str(),
            self.weather.lookup(city.as_str()),
        )
        .await?;
        tracing::info!(
            city = %weather.city,
            temperature = weather.temperature_celsius,
            "Weather fetched"
        );

        let reply = timed(
            PIPELINE,
            ChatStage::Formatted.as_str(),
            self.format_reply(&weather),
        )
        .await?;

        tracing::info!(stage = ChatStage::Completed.as_str(), "Chat pipeline completed");
        Ok(reply)
    }

    async fn extract_city(&self, input: &str) -> Result<CityExtraction, PipelineError> {
        let messages = [ChatMessage::user(city_extraction_prompt(input))];
        let text = self.model.generate(&messages).await?;
        Ok(CityExtraction(text))
    }

    async fn format_reply(&self, weather: &WeatherSnapshot) -> Result<FormattedReply, PipelineError> {
        let messages = [ChatMessage::user(format_prompt(weather))];
        let text = self.model.generate(&messages).await?;
        Ok(FormattedReply(text))
    }
}
