use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

fn full_env(name: &str) -> Option<String> {
    match name {
        PUBLIC_KEY_VAR => Some("env-public".to_string()),
        PRIVATE_KEY_VAR => Some("env-private".to_string()),
        _ => None,
    }
}

fn public_only_env(name: &str) -> Option<String> {
    (name == PUBLIC_KEY_VAR).then(|| "env-public".to_string())
}

fn write_secret_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join(".env.marvel");
    fs::write(&path, contents).expect("write secret file");
    path
}

#[test]
fn missing_keys_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let provider =
        EnvCredentialProvider::new(vec![dir.path().join("absent")]).with_env(no_env);
    let err = provider.credentials().expect_err("missing keys");
    assert!(err.to_string().contains(PUBLIC_KEY_VAR));
}

#[test]
fn environment_wins_over_secret_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_secret_file(
        dir.path(),
        "MARVEL_PUBLIC_KEY=file-public\nMARVEL_PRIVATE_KEY=file-private\n",
    );
    let provider = EnvCredentialProvider::new(vec![path]).with_env(full_env);
    let creds = provider.credentials().expect("credentials");
    assert_eq!(creds, MarvelCredentials::new("env-public", "env-private"));
}

#[test]
fn secret_file_fills_keys_missing_from_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_secret_file(
        dir.path(),
        "# marvel keys\nexport MARVEL_PRIVATE_KEY=\"file-private\"\n",
    );
    let provider = EnvCredentialProvider::new(vec![path]).with_env(public_only_env);
    let creds = provider.credentials().expect("credentials");
    assert_eq!(creds, MarvelCredentials::new("env-public", "file-private"));
}

#[test]
fn first_existing_secret_file_is_used() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_secret_file(
        dir.path(),
        "MARVEL_PUBLIC_KEY=a\nMARVEL_PRIVATE_KEY=b\n",
    );
    let provider =
        EnvCredentialProvider::new(vec![dir.path().join("missing"), path]).with_env(no_env);
    assert_eq!(
        provider.credentials().expect("credentials").public_key(),
        "a"
    );
}

#[test]
fn parses_secret_file_lines() {
    let values = parse_secret_file("A=1\n\n# comment\nB = 'two'\nnot a pair\nC=x=y\n");
    assert_eq!(values.get("A").map(String::as_str), Some("1"));
    assert_eq!(values.get("B").map(String::as_str), Some("two"));
    assert_eq!(values.get("C").map(String::as_str), Some("x=y"));
    assert_eq!(values.len(), 3);
}

#[test]
fn empty_config_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lookup.json");
    fs::write(&path, "{}").expect("write config");
    let config = load_config(Some(&path)).expect("load");
    assert_eq!(config, LookupConfig::default());
    assert_eq!(config.timeout_secs, 10);
    assert_eq!(config.page_size, 5);
}

#[test]
fn config_file_overrides_and_validates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lookup.json");
    fs::write(&path, r#"{"timeout_secs": 3, "base_url": "http://localhost:9/v1"}"#)
        .expect("write config");
    let config = load_config(Some(&path)).expect("load");
    assert_eq!(config.timeout_secs, 3);
    assert_eq!(config.base_url, "http://localhost:9/v1");

    fs::write(&path, r#"{"page_size": 0}"#).expect("write config");
    assert!(load_config(Some(&path)).is_err());
}

#[test]
fn no_config_path_means_defaults() {
    assert_eq!(load_config(None).expect("defaults"), LookupConfig::default());
}
