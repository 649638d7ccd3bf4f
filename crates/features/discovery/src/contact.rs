use crate::error::DiscoveryError;
use url::{Url, form_urlencoded};

/// Mail composer payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDraft {
    pub recipients: Vec<String>,
    pub subject: String,
}

/// OS-level composers. Calls are fire-and-forget.
pub trait ContactDispatcher: Send + Sync {
    fn open_mail(&self, draft: MailDraft);

    fn open_link(&self, link: Url);
}

/// Builds `{base}?phone={handle}&text={message}` with both values percent-encoded.
///
/// # Errors
/// [`DiscoveryError::ContactUnavailable`] for a blank handle, a handle with
/// control characters, or an unusable link base.
pub fn chat_link(base: &str, handle: &str, message: &str) -> Result<Url, DiscoveryError> {
    if handle.trim().is_empty() {
        return Err(DiscoveryError::unavailable("point has no chat handle"));
    }
    if handle.chars().any(char::is_control) {
        return Err(DiscoveryError::unavailable("chat handle contains control characters"));
    }

    let mut link = Url::parse(base)
        .map_err(|err| DiscoveryError::unavailable(format!("invalid chat link base: {err}")))?;
    link.set_query(Some(&format!("phone={}&text={}", encode(handle), encode(message))));
    Ok(link)
}

// Form encoding writes spaces as '+'; deep-link handlers expect %20.
fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_carries_encoded_handle_and_message() {
        let link = chat_link("whatsapp://send", "+55 85 99999-0000", "Tenho interesse na coleta de resíduos")
            .expect("link");
        assert_eq!(
            link.as_str(),
            "whatsapp://send?phone=%2B55%2085%2099999-0000&text=Tenho%20interesse%20na%20coleta%20de%20res%C3%ADduos"
        );
    }

    #[test]
    fn query_injection_stays_inside_the_phone_value() {
        let link = chat_link("whatsapp://send", "5585&text=spam", "oi").expect("link");
        let pairs: Vec<_> = link.query_pairs().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1, "5585&text=spam");
    }

    #[test]
    fn unusable_handles_are_rejected() {
        for handle in ["", "   ", "5585\n9999", "55\u{0}85"] {
            let err = chat_link("whatsapp://send", handle, "oi").expect_err("must reject");
            assert!(matches!(err, DiscoveryError::ContactUnavailable { .. }), "{handle:?}");
        }
    }
}
