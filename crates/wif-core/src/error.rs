use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid update payload: {0}")]
    InvalidPayload(String),

    #[error("invalid project number {value:?}")]
    InvalidProjectNumber {
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Walk the full error chain and join all causes into one string.
///
/// `reqwest` and Tera both carry the useful detail (DNS, TLS, which template
/// variable) in the source chain rather than in their own `Display`.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_joins_every_cause() {
        let source = "12ab".parse::<i64>().unwrap_err();
        let err = CoreError::InvalidProjectNumber {
            value: "12ab".into(),
            source,
        };
        assert_eq!(
            format_err_chain(&err),
            "invalid project number \"12ab\": invalid digit found in string"
        );
    }
}
