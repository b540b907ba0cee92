pub type LogoResult<T> = Result<T, LogoError>;

#[derive(thiserror::Error, Debug)]
pub enum LogoError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LogoError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LogoError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            LogoError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            LogoError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(
            LogoError::evaluation("x")
                .to_string()
                .contains("evaluation error:")
        );
        assert!(
            LogoError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = LogoError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: LogoError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, LogoError::Serde(_)));
    }
}
