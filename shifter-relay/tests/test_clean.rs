use lib::core::config::SENTINEL_DESCRIPTION;
use lib::github::testing::MockCall;
use lib::testing::{make_git_with_hosted_repos, make_test_effects, DUMMY_LOGIN};
use lib::util::ExitCode;
use shifter_relay::{clean, push};

#[test]
fn test_clean_after_push() -> eyre::Result<()> {
    let wrapper = make_git_with_hosted_repos()?;
    let git = &wrapper.repo;
    git.init_repo()?;
    git.run(&["config", "shifter.transport", "ssh"])?;
    git.checkout_new_branch("feature-a")?;
    git.commit_file("test1", 1)?;
    let session = wrapper.make_session(wrapper.make_github());

    {
        let (effects, _output) = make_test_effects();
        let result = push(&effects, &git.get_git_run_info(), &git.get_repo()?, &session)?;
        assert_eq!(result, Ok(()));
    }

    let (effects, output) = make_test_effects();
    let result = clean(&effects, &git.get_git_run_info(), &git.get_repo()?, &session)?;
    assert_eq!(result, Ok(()));

    let (stdout, _stderr) = output.get(git)?;
    insta::assert_snapshot!(stdout, @"GitHub temporary repository deleted");

    assert_eq!(session.github.get_repository("octocat/shift"), None);
    assert!(!session.github.get_remote_path(DUMMY_LOGIN, "shift").exists());
    let (remotes, _stderr) = git.run(&["remote"])?;
    insta::assert_snapshot!(remotes, @"");

    Ok(())
}

#[test]
fn test_clean_without_local_remote() -> eyre::Result<()> {
    let wrapper = make_git_with_hosted_repos()?;
    let git = &wrapper.repo;
    git.init_repo()?;
    let github = wrapper.make_github();
    github.add_repository("shift", true, Some(SENTINEL_DESCRIPTION))?;
    let session = wrapper.make_session(github);

    let (effects, output) = make_test_effects();
    let result = clean(&effects, &git.get_git_run_info(), &git.get_repo()?, &session)?;
    assert_eq!(result, Ok(()));

    let (stdout, _stderr) = output.get(git)?;
    insta::assert_snapshot!(stdout, @r###"
    GitHub temporary repository deleted
    Not necessary to remove remote
    "###);

    Ok(())
}

#[test]
fn test_clean_refuses_unrelated_repository() -> eyre::Result<()> {
    let wrapper = make_git_with_hosted_repos()?;
    let git = &wrapper.repo;
    git.init_repo()?;
    let github = wrapper.make_github();
    github.add_repository("shift", true, Some("unrelated repo"))?;
    let session = wrapper.make_session(github);

    let (effects, output) = make_test_effects();
    let result = clean(&effects, &git.get_git_run_info(), &git.get_repo()?, &session)?;
    assert_eq!(result, Err(ExitCode(1)));

    let (stdout, stderr) = output.get(git)?;
    insta::assert_snapshot!(stdout, @"");
    insta::assert_snapshot!(stderr, @r###"Error: refusing to work on repository octocat/shift: only repositories with the description "Shifter Temporary Repo, can be deleted after shifting" are used"###);

    assert_eq!(
        session
            .github
            .count_calls(|call| matches!(call, MockCall::DeleteRepository { .. })),
        0
    );
    assert!(session.github.get_repository("octocat/shift").is_some());

    Ok(())
}

#[test]
fn test_clean_missing_repository() -> eyre::Result<()> {
    let wrapper = make_git_with_hosted_repos()?;
    let git = &wrapper.repo;
    git.init_repo()?;
    let session = wrapper.make_session(wrapper.make_github());

    let (effects, output) = make_test_effects();
    let result = clean(&effects, &git.get_git_run_info(), &git.get_repo()?, &session)?;
    assert_eq!(result, Err(ExitCode(1)));

    let (_stdout, stderr) = output.get(git)?;
    insta::assert_snapshot!(stderr, @"Error: repository octocat/shift does not exist");

    Ok(())
}
