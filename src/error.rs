//! Error types and handling for the country agent

use thiserror::Error;

/// Main error type for the country agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Configuration-related errors, including missing provider keys
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport or provider failures from an external data API
    #[error("API error: {message}")]
    Api { message: String },

    /// Failures talking to the language model
    #[error("LLM error: {message}")]
    Llm { message: String },

    /// Model output that could not be turned into structured data
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Rejected caller input; the message is already user-facing
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl AgentError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new LLM error
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Config { .. } => {
                "Dịch vụ chưa được cấu hình đầy đủ. Vui lòng kiểm tra khóa API.".to_string()
            }
            AgentError::Api { .. } => {
                "Không thể kết nối tới dịch vụ dữ liệu bên ngoài. Vui lòng thử lại sau.".to_string()
            }
            AgentError::Llm { .. } | AgentError::Parse { .. } => {
                "Trợ lý AI tạm thời không phản hồi. Vui lòng thử lại sau.".to_string()
            }
            AgentError::Validation { message } => message.clone(),
        }
    }
}
