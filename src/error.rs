//! Error types for the CSS property generator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid key for '{label}': {key}")]
    InvalidKey { label: String, key: String },

    #[error("Invalid keys for '{label}': {keys:?}")]
    InvalidKeys { label: String, keys: Vec<String> },

    #[error("Invalid type '{found}' for key '{key}' in '{label}'. Expected type in set {expected:?}")]
    InvalidType {
        label: String,
        key: String,
        found: String,
        expected: Vec<String>,
    },

    #[error("Missing required key '{key}' in '{label}'")]
    MissingKey { label: String, key: String },

    #[error("Invalid conditional definition for '{label}'. {message}")]
    Conditional { label: String, message: String },

    #[error("{key_path} {message}")]
    Semantic { key_path: String, message: String },

    #[error("Unrecognized resolver \"{resolver}\"")]
    UnrecognizedResolver { resolver: String },

    #[error("Property {property} {message}")]
    Link { property: String, message: String },

    #[error("Logical property group \"{group}\" {message}")]
    LogicalGroup { group: String, message: String },

    #[error("Logical property group \"{group}\" is missing a {logic} \"{resolver}\" property")]
    IncompleteLogicalGroup {
        group: String,
        logic: String,
        resolver: String,
    },

    #[error("No {destination} mapping for property {property}")]
    NoDirectionMapping { property: String, destination: String },

    #[error("Code generation error: {message}")]
    CodeGen { message: String },

    #[error("Error when running '{command}': {message}")]
    Tool { command: String, message: String },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

impl GeneratorError {
    pub fn semantic(key_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Semantic {
            key_path: key_path.into(),
            message: message.into(),
        }
    }

    pub fn link(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Link {
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn logical_group(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LogicalGroup {
            group: group.into(),
            message: message.into(),
        }
    }

    pub fn conditional(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conditional {
            label: label.into(),
            message: message.into(),
        }
    }

    pub fn missing_key(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey {
            label: label.into(),
            key: key.into(),
        }
    }

    pub fn tool(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            command: command.into(),
            message: message.into(),
        }
    }
}
