use eco_domain::config::{ContactConfig, EcoConfig, EmailFallback, MapConfig};
use serde_json::json;

#[test]
fn config_defaults_match_the_mobile_client() {
    let map = MapConfig::default();
    assert!((map.zoom_delta - 0.014).abs() < f64::EPSILON);
    assert!(map.fallback_anchor.is_valid());

    let contact = ContactConfig::default();
    assert_eq!(contact.email_fallback, EmailFallback::Placeholder);
    assert_eq!(contact.default_email, "default@email.com");
    assert_eq!(contact.chat_link_base, "whatsapp://send");

    let cfg = EcoConfig::default();
    assert_eq!(cfg.catalog.localities_path, "regions/{code}/localities");
    assert!(cfg.api.asset_host_rewrite.is_none());
}

#[test]
fn config_deserializes_partial_sections() {
    let raw = json!({
        "api": { "base_url": "http://10.0.0.2:3333", "asset_host_rewrite": { "from": "localhost", "to": "10.0.0.2" } },
        "catalog": {
            "base_url": "https://servicodados.ibge.gov.br/api/v1/localidades",
            "regions_path": "estados",
            "localities_path": "estados/{code}/municipios"
        },
        "contact": { "email_fallback": "disabled" }
    });

    let cfg: EcoConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.api.base_url, "http://10.0.0.2:3333");
    assert_eq!(cfg.api.timeout_seconds, 10);
    assert_eq!(cfg.api.asset_host_rewrite.as_ref().map(|r| r.to.as_str()), Some("10.0.0.2"));
    assert_eq!(cfg.catalog.regions_path, "estados");
    assert_eq!(cfg.contact.email_fallback, EmailFallback::Disabled);
    assert_eq!(cfg.contact.mail_subject, ContactConfig::default().mail_subject);
}

#[test]
fn config_is_cheap_to_clone_and_copy_on_write() {
    let base = EcoConfig::default();
    let mut tweaked = base.clone();
    tweaked.map.use_device_position = false;

    assert!(base.map.use_device_position);
    assert!(!tweaked.map.use_device_position);
}
