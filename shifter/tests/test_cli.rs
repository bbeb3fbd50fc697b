use assert_cmd::Command;

fn make_shifter() -> eyre::Result<Command> {
    let mut command = Command::cargo_bin("shifter")?;
    command.env("NO_COLOR", "1").env_remove("RUST_LOG");
    Ok(command)
}

#[test]
fn test_no_command_prints_lifecycle() -> eyre::Result<()> {
    let assert = make_shifter()?.assert().code(0);
    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    insta::assert_snapshot!(stdout, @r###"
    You can use the following commands (in the order of the lifecycle):

    shifter push (step 1)
    (do your shift now)
    (merge back)
    shifter show > my-shift.md (show the latest pull request, dump it to a file)
    shifter clean (remove the repository from GitHub)
    "###);
    Ok(())
}

#[test]
fn test_unknown_command_is_usage_error() -> eyre::Result<()> {
    let assert = make_shifter()?.arg("deploy").assert().code(2);
    let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
    assert!(stderr.contains("deploy"), "stderr was: {stderr}");
    Ok(())
}

#[test]
fn test_missing_token_prints_guidance() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    for verb in ["push", "show", "clean"] {
        let assert = make_shifter()?
            .arg(verb)
            .current_dir(dir.path())
            .assert()
            .code(1);
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(
            stdout.starts_with(
                "Go to https://github.com/settings/tokens, create a token with the \"repo\" and \"delete_repo\" scopes, and put it into "
            ),
            "stdout was: {stdout}"
        );
        assert!(stdout.trim_end().ends_with(".github_token"));
    }
    Ok(())
}
