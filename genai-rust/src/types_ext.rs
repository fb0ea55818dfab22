use crate::{GenerateRequest, GenerateResponse, OutputFormat, Part};
use serde_json::Value;

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image { .. } => None,
        }
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl GenerateRequest {
    pub fn new<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Part>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Ask for a JSON reply, constrained by `schema` when given.
    #[must_use]
    pub fn json_output(mut self, schema: Option<Value>) -> Self {
        self.output = OutputFormat::Json { schema };
        self
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// The prompt text, every text part joined by newlines.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, Part::Image { .. }))
            .count()
    }
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Part::text(text)],
            ..Default::default()
        }
    }

    /// Concatenation of the reply's text parts, or `None` when it has none.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let mut texts = self.content.iter().filter_map(Part::as_text).peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}
