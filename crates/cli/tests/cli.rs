use assert_cmd::Command;

fn libris() -> Command {
    let mut cmd = Command::cargo_bin("libris-cli").unwrap();
    cmd.env("LIBRIS_CONFIG_DIR", "does-not-exist")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn routes_lists_every_entity() {
    let output = libris().arg("routes").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("/healthz"));
    for path in [
        "/catalog/authors",
        "/catalog/books",
        "/catalog/bookinstances",
        "/catalog/genres",
        "/catalog/genre/{id}/delete",
    ] {
        assert!(stdout.contains(path), "missing {path}");
    }
}

#[test]
fn seed_prints_counts() {
    let output = libris().arg("seed").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("authors:        5"));
    assert!(stdout.contains("genres:         3"));
}

#[test]
fn unknown_environment_is_rejected() {
    libris().env("LIBRIS_ENV", "moon").arg("routes").assert().failure();
}
