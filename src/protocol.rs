use serde::Serialize;

/// Uniform response envelope: `{success, message?, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type SimpleResponse = Envelope<()>;

impl SimpleResponse {
    pub fn ok<S: ToString>(message: S) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn err<S: ToString>(err: S) -> Self {
        Self {
            success: false,
            message: Some(err.to_string()),
            data: None,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn message<S: ToString>(mut self, message: S) -> Self {
        self.message = Some(message.to_string());
        self
    }
}
