/// A caller question paired with the text extracted from their document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyQuery {
    pub prompt: String,
    pub source_text: String,
}

impl PolicyQuery {
    pub fn new(prompt: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            source_text: source_text.into(),
        }
    }

    /// Single message body combining the question and the document text.
    pub fn to_message(&self) -> String {
        format!("{}\n\nDocument text:\n{}", self.prompt, self.source_text)
    }
}

/// The model's answer, returned verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyAnswer(pub String);

impl PolicyAnswer {
    pub fn into_inner(self) -> String {
        self.0
    }
}
