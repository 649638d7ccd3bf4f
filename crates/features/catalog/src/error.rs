use std::borrow::Cow;

/// Any failed read against the catalog API.
///
/// Callers in the discovery slice never surface these to the user; they keep
/// the previous (or empty) state and log the failure.
#[eco_derive::eco_error]
pub enum FetchError {
    #[error("Transport error{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Unexpected status {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    #[error("Malformed payload{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid endpoint URL{}: {source}", format_context(.context))]
    InvalidUrl { source: url::ParseError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
