use shifter_lib::testing::{make_git, GitInitOptions};

#[test]
fn test_get_current_branch_name() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.checkout_new_branch("feature-a")?;

    let repo = git.get_repo()?;
    assert_eq!(repo.get_current_branch_name()?, Some("feature-a".to_owned()));

    git.detach_head()?;
    let repo = git.get_repo()?;
    assert_eq!(repo.get_current_branch_name()?, None);

    Ok(())
}

#[test]
fn test_get_current_branch_name_without_commits() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo_with_options(&GitInitOptions {
        make_initial_commit: false,
    })?;
    git.run(&["symbolic-ref", "HEAD", "refs/heads/unborn"])?;

    let repo = git.get_repo()?;
    assert_eq!(repo.get_current_branch_name()?, Some("unborn".to_owned()));

    Ok(())
}

#[test]
fn test_remote_names() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.run(&["remote", "add", "upstream", "https://example.com/upstream.git"])?;
    git.run(&["remote", "add", "origin", "https://example.com/origin.git"])?;

    let repo = git.get_repo()?;
    assert_eq!(repo.get_all_remote_names()?, vec!["origin", "upstream"]);
    assert!(repo.has_remote("origin")?);
    assert!(!repo.has_remote("shifter")?);
    assert_eq!(
        repo.get_remote_url("upstream")?,
        Some("https://example.com/upstream.git".to_owned())
    );
    assert_eq!(repo.get_remote_url("shifter")?, None);

    Ok(())
}

#[test]
fn test_working_copy_path() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let repo = git.get_repo()?;
    let working_copy_path = repo.get_working_copy_path().map(std::fs::canonicalize);
    assert_eq!(
        working_copy_path.transpose()?,
        Some(std::fs::canonicalize(&git.repo_path)?)
    );

    Ok(())
}
