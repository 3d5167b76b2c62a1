pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid settings JSON: {message}")]
    InvalidSettingsJson { message: String },

    #[error("Invalid settings YAML: {message}")]
    InvalidSettingsYaml { message: String },

    #[error("Invalid callout node JSON: {message}")]
    InvalidNodeJson { message: String },
}
