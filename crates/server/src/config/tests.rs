use super::*;

#[test]
fn empty_document_yields_defaults() {
    let config: FragmentaConfig = toml::from_str("").expect("empty config should parse");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.max_fragment_bytes, 10 * 1024 * 1024);
    assert!(config.server.external_url.is_none());

    assert_eq!(config.storage.backend, "memory");
    assert_eq!(config.storage.aws.table_name, "fragmenta_fragments");

    assert_eq!(config.auth.mode, AuthMode::Basic);
    assert!(config.auth.basic.users.is_empty());
}

#[test]
fn full_document_parses() {
    let toml_str = r#"
        [server]
        host = "0.0.0.0"
        port = 9000
        external_url = "https://fragments.example.com"
        max_fragment_bytes = 1048576

        [storage]
        backend = "aws"

        [storage.aws]
        table_name = "frags"
        bucket = "frags-data"
        region = "eu-west-1"
        endpoint_url = "http://localhost:4566"
        key_prefix = "staging"

        [auth]
        mode = "bearer"

        [auth.bearer]
        secret = "super-secret"
        issuer = "https://idp.example.com"
    "#;

    let config: FragmentaConfig = toml::from_str(toml_str).expect("config should parse");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(
        config.server.external_url.as_deref(),
        Some("https://fragments.example.com")
    );
    assert_eq!(config.server.max_fragment_bytes, 1_048_576);

    assert_eq!(config.storage.backend, "aws");
    assert_eq!(config.storage.aws.table_name, "frags");
    assert_eq!(config.storage.aws.region, "eu-west-1");
    assert_eq!(
        config.storage.aws.endpoint_url.as_deref(),
        Some("http://localhost:4566")
    );

    assert_eq!(config.auth.mode, AuthMode::Bearer);
    assert_eq!(config.auth.bearer.secret, "super-secret");
    assert_eq!(
        config.auth.bearer.issuer.as_deref(),
        Some("https://idp.example.com")
    );
}

#[test]
fn basic_users_parse() {
    let toml_str = r#"
        [auth]
        mode = "basic"

        [[auth.basic.users]]
        email = "user1@email.com"
        password_sha256 = "28fcdd1ddb919ab2226bbae0d7cec7863028b817451018673bd2f8ad84f23cb1"
    "#;

    let config: FragmentaConfig = toml::from_str(toml_str).expect("config should parse");
    assert_eq!(config.auth.basic.users.len(), 1);
    assert_eq!(config.auth.basic.users[0].email, "user1@email.com");
}

#[test]
fn static_mode_has_a_default_identity() {
    let config: FragmentaConfig = toml::from_str("[auth]\nmode = \"static\"\n").unwrap();
    assert_eq!(config.auth.mode, AuthMode::Static);
    assert_eq!(config.auth.static_identity.identity, "test-user@fragmenta.dev");
}

#[test]
fn unknown_auth_mode_is_rejected() {
    let result: Result<FragmentaConfig, _> = toml::from_str("[auth]\nmode = \"oauth\"\n");
    assert!(result.is_err());
}
