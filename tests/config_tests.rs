use rattestati::config::{Config, SmtpProvider};
use rattestati::models::TemplateVariant;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let cfg = Config::load_from(&dir.path().join("none.conf")).unwrap();
    assert_eq!(cfg.dispatch.block_size, 10);
    assert_eq!(cfg.dispatch.pause(), Duration::from_secs(5));
    assert_eq!(cfg.validation.institutional_domains, ["stud.uniroma3.it"]);
    assert_eq!(cfg.certificate.template, TemplateVariant::InPerson);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.conf");
    std::fs::write(
        &path,
        "dispatch:\n  block_size: 25\ncertificate:\n  template: telematico\n",
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.dispatch.block_size, 25);
    assert_eq!(cfg.dispatch.pause_seconds, 5);
    assert_eq!(cfg.certificate.template, TemplateVariant::Remote);
}

#[test]
fn corrupt_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.conf");
    std::fs::write(&path, "dispatch: [unterminated").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn environment_overrides_win_and_blanks_are_ignored() {
    let env: HashMap<&str, &str> = [
        ("SMTP_USERNAME", "ufficio@example.com"),
        ("SMTP_PASSWORD", "segreto"),
        ("SMTP_PORT", "465"),
        ("DIRETTORE_CAFIS", ""),
    ]
    .into_iter()
    .collect();

    let mut cfg = Config::default();
    let director = cfg.institution.director.clone();
    cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.smtp.username, "ufficio@example.com");
    assert_eq!(cfg.smtp.port, 465);
    assert!(cfg.smtp.has_credentials());
    assert_eq!(cfg.institution.director, director);
}

#[test]
fn retry_policy_grows_by_step() {
    let policy = Config::default().dispatch.retry_policy();
    assert_eq!(policy.retries, 2);
    assert_eq!(policy.delay_for(0), Duration::from_secs(3));
    assert_eq!(policy.delay_for(1), Duration::from_secs(5));
}

#[test]
fn provider_preset_and_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rt.conf");

    let mut cfg = Config::default();
    cfg.apply_provider(SmtpProvider::Gmail);
    cfg.save_to(&path).unwrap();

    let back = Config::load_from(&path).unwrap();
    assert_eq!(back.smtp.server, "smtp.gmail.com");
    assert_eq!(back.smtp.port, 587);
    assert!(back.smtp.use_tls);
}
