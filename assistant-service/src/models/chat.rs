use std::fmt;

/// Whatever the model answered when asked for a city name.
///
/// Not validated: it is handed to the weather lookup verbatim, so a chatty
/// model reply surfaces later as a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityExtraction(pub String);

impl CityExtraction {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final model output of the chat pipeline, returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReply(pub String);

impl FormattedReply {
    pub fn into_inner(self) -> String {
        self.0
    }
}
