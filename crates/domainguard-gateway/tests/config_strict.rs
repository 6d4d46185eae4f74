#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use domainguard_gateway::config::{self, CredentialsSection, PolicySource};

const AUTH_ONLY: &str = r#"
version: 1
auth:
  listen: "127.0.0.1:8080"
  enforcer_url: "http://token-enforcer:8080"
  policy_source:
    remote: { url: "http://policy-service:50052" }
  credentials:
    static:
      users:
        - { username: admin, password: secret123, mfa: "123456" }
"#;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
auth:
  enforcer_url: "http://token-enforcer:8080"
  policy_source:
    remote: { url: "http://policy-service:50052" }
  credentials:
    static:
      users:
        - { username: admin, password: secret123, mfa: "123456" }
  rate_limt: { capacity: 5 } # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_auth_only_config_with_defaults() {
    let cfg = config::load_from_str(AUTH_ONLY).expect("must parse");
    assert_eq!(cfg.version, 1);
    let auth = cfg.auth.expect("auth role");
    assert_eq!(auth.timeout_ms, 5000);
    assert_eq!(auth.rate_limit.capacity, 10);
    assert_eq!(auth.rate_limit.window_secs, 60);
    assert!(matches!(auth.policy_source, PolicySource::Remote { .. }));
    assert!(matches!(
        auth.credentials,
        CredentialsSection::Static { ref users } if users.len() == 1
    ));
    assert!(cfg.enforcer.is_none());
}

#[test]
fn identity_provider_and_local_policy_variants() {
    let ok = r#"
version: 1
auth:
  enforcer_url: "http://token-enforcer:8080"
  policy_source:
    local: { file: "/policies/inter_domain_interactions.yaml" }
  credentials:
    identity_provider: { url: "https://idp.internal/verify" }
enforcer:
  reference_monitor_url: "http://refmon:50051"
  policy_source:
    local: { file: "/policies/inter_domain_interactions.yaml" }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let enforcer = cfg.enforcer.expect("enforcer role");
    assert_eq!(enforcer.token_ttl_secs, 60);
    assert!(matches!(
        cfg.auth.expect("auth role").credentials,
        CredentialsSection::IdentityProvider { .. }
    ));
}

#[test]
fn no_roles_is_rejected() {
    let err = config::load_from_str("version: 1\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_CONFIG");
}

#[test]
fn unsupported_version_is_rejected() {
    let err = config::load_from_str(&AUTH_ONLY.replace("version: 1", "version: 2"))
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_timeout_is_rejected() {
    let bad = AUTH_ONLY.replace(
        "  listen: \"127.0.0.1:8080\"",
        "  listen: \"127.0.0.1:8080\"\n  timeout_ms: 10",
    );
    let err = config::load_from_str(&bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_CONFIG");
}

#[test]
fn bad_listen_address_is_rejected() {
    let bad = AUTH_ONLY.replace("127.0.0.1:8080", "not-an-address");
    assert!(config::load_from_str(&bad).is_err());
}

#[test]
fn policy_file_parses_informational_fields() {
    let policy = config::load_policy_from_str(
        r#"
security_domains:
  domain2_authentication:
    allowed_interactions:
      - to: domain3_token_policy
        actions: [issue_token]
        port: 8080
        protocol: http
"#,
    )
    .expect("must parse");
    let it = &policy.security_domains["domain2_authentication"].allowed_interactions[0];
    assert_eq!(it.port, Some(8080));
    assert_eq!(it.protocol.as_deref(), Some("http"));
}

#[test]
fn informational_port_is_not_range_checked() {
    let policy = config::load_policy_from_str(
        r#"
security_domains:
  domain2_authentication:
    allowed_interactions:
      - to: domain3_token_policy
        actions: [issue_token]
        port: 70000
"#,
    )
    .expect("port is informational");
    let it = &policy.security_domains["domain2_authentication"].allowed_interactions[0];
    assert_eq!(it.port, Some(70_000));
}

#[test]
fn malformed_policy_is_fatal() {
    assert!(config::load_policy_from_str("security_domains: [not, a, map]").is_err());
    assert!(config::load_policy_from_str("other_root: {}").is_err());
    let empty_to = r#"
security_domains:
  a:
    allowed_interactions:
      - to: ""
        actions: [x]
"#;
    assert!(config::load_policy_from_str(empty_to).is_err());
}

#[test]
fn missing_policy_file_is_fatal() {
    let err = config::load_policy_from_file("/nonexistent/domainguard/policy.yaml")
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_CONFIG");
}

#[test]
fn shipped_deployment_files_load() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../deploy");

    let cfg = config::load_from_file(&format!("{root}/domainguard.yaml")).unwrap();
    assert!(cfg.auth.is_some() && cfg.enforcer.is_some());
    assert!(cfg.policy_service.is_some() && cfg.reference_monitor.is_some());

    let policy_path = format!("{root}/policies/inter_domain_interactions.yaml");
    let policy = config::load_policy_from_file(&policy_path).unwrap();
    let engine = domainguard_core::policy::PolicyEngine::new(policy);
    for hop in [
        domainguard_core::domain::LOGIN_ISSUE,
        domainguard_core::domain::ENFORCER_ISSUE,
        domainguard_core::domain::ENFORCER_VALIDATE,
    ] {
        assert!(engine.check_hop(&hop).allowed, "{hop:?}");
    }
}
