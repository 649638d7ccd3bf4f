use std::borrow::Cow;

/// Rejections raised at the boundary of the discovery flow.
///
/// Fetch failures are not errors here: controllers recover from them locally
/// and report [`crate::Refresh::Failed`].
#[eco_derive::eco_error]
pub enum DiscoveryError {
    /// Out-of-order step, e.g. opening the directory without a locality.
    #[error("Invalid transition{}: {message}", format_context(.context))]
    InvalidTransition { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A contact action without a usable address or handle.
    #[error("Contact unavailable{}: {message}", format_context(.context))]
    ContactUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DiscoveryError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidTransition { message: message.into(), context: None }
    }

    pub(crate) fn unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ContactUnavailable { message: message.into(), context: None }
    }
}
