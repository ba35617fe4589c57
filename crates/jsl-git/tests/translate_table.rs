//! Table-driven checks of the Sapling verb → git invocation mapping
//!
//! One row per verb: the Sapling arguments, the expected program and
//! arguments, whether a transform is installed, and whether the command
//! needs git-branchless.

use jsl_core::JslConfig;
use jsl_git::{
    translate, CommandRequest, GitOutput, MockGitExecutor, OutputTransform, RepositoryContext,
    COMMIT_END_MARK,
};

struct Case {
    argv: &'static [&'static str],
    program: &'static str,
    args: &'static [&'static str],
    transform: Option<OutputTransform>,
    extension: bool,
}

fn case(argv: &'static [&'static str], program: &'static str, args: &'static [&'static str]) -> Case {
    Case {
        argv,
        program,
        args,
        transform: None,
        extension: false,
    }
}

fn ctx() -> RepositoryContext {
    RepositoryContext::new("/repo", JslConfig::default())
}

#[test]
fn test_verb_table() {
    let cases = vec![
        case(&["root"], "git", &["rev-parse", "--show-toplevel"]),
        case(&["root", "--dotdir"], "git", &["rev-parse", "--git-dir"]),
        case(&["debugroots"], "git", &["rev-parse", "--show-toplevel"]),
        Case {
            transform: Some(OutputTransform::Status),
            ..case(
                &["status", "-Tjson", "--copies"],
                "git",
                &["-c", "core.quotePath=false", "status", "--porcelain=v2", "--untracked-files=all"],
            )
        },
        case(&["status", "--copies", "src"], "git", &["status", "src"]),
        case(&["goto", "--rev", "max(successors(abc123))"], "git", &["checkout", "abc123"]),
        case(&["goto", "def456"], "git", &["checkout", "def456"]),
        Case {
            extension: true,
            ..case(
                &["rebase", "-s", "abc", "-d", "main"],
                "git",
                &["branchless", "rebase", "-s", "abc", "-d", "main"],
            )
        },
        Case {
            extension: true,
            ..case(
                &["histedit"],
                "git",
                &["branchless", "rebase", "--interactive"],
            )
        },
        case(&["commit", "-m", "msg"], "git", &["commit", "-m", "msg"]),
        case(&["amend", "-m", "msg"], "git", &["commit", "--amend", "-m", "msg"]),
        case(&["pull", "--rebase"], "git", &["pull", "--rebase"]),
        case(&["push"], "git", &["push", "--set-upstream", "origin", "HEAD"]),
        case(&["diff", "--stat"], "git", &["diff", "--stat"]),
        case(&["show", "abc"], "git", &["show", "abc"]),
        case(&["cat", "README.md"], "git", &["show", "HEAD:README.md"]),
        case(&["cat", "README.md", "-r", "abc"], "git", &["show", "abc:README.md"]),
        Case {
            transform: Some(OutputTransform::Blame),
            ..case(
                &["blame", "-Tjson", "--change", "--rev", "abc", "a.rs"],
                "git",
                &["-c", "core.quotePath=false", "blame", "--line-porcelain", "abc", "--", "a.rs"],
            )
        },
        case(&["blame", "a.rs"], "git", &["blame", "a.rs"]),
        case(&["bookmark", "feature", "-r", "abc"], "git", &["branch", "feature", "abc"]),
        case(&["bookmarks", "-d", "feature"], "git", &["branch", "--delete", "feature"]),
        Case {
            transform: Some(OutputTransform::EmptyList),
            ..case(&["bookmarks", "--list-subscriptions"], "git", &["branch", "--list"])
        },
        Case {
            transform: Some(OutputTransform::Conflicts),
            ..case(
                &["resolve", "--tool", "internal:dumpjson", "--all"],
                "git",
                &["-c", "core.quotePath=false", "diff", "--name-only", "--diff-filter=U"],
            )
        },
        case(&["resolve", "--mark", "a.rs"], "git", &["add", "a.rs"]),
        case(&["resolve"], "git", &["merge", "--continue"]),
        Case {
            transform: Some(OutputTransform::Config {
                sections: vec!["user".to_string()],
            }),
            ..case(&["config", "-Tjson", "user"], "git", &["config", "--list"])
        },
        case(&["config", "user.name"], "git", &["config", "user.name"]),
        Case {
            extension: true,
            ..case(&["smartlog"], "git", &["branchless", "smartlog"])
        },
        Case {
            extension: true,
            ..case(&["sl", "--reverse"], "git", &["branchless", "smartlog", "--reverse"])
        },
        case(&["debuggitmodules"], "echo", &["[]"]),
        case(&["debugcommitmessage"], "echo", &[""]),
        case(&["unknownverb", "x"], "git", &["unknownverb", "x"]),
    ];

    let ctx = ctx();
    for case in cases {
        let request = CommandRequest::from_argv(case.argv.iter().copied()).unwrap();
        let translation = translate(&request.verb, &request.args, &ctx);

        assert_eq!(translation.program, case.program, "program for {:?}", case.argv);
        assert_eq!(translation.args, case.args, "args for {:?}", case.argv);
        assert_eq!(
            translation.output_transform, case.transform,
            "transform for {:?}",
            case.argv
        );
        assert_eq!(
            translation.uses_extension_subsystem, case.extension,
            "extension flag for {:?}",
            case.argv
        );
    }
}

#[test]
fn test_translation_is_pure() {
    let ctx = ctx();
    let args: Vec<String> = vec!["--rev".into(), "smartlog()".into()];
    assert_eq!(translate("log", &args, &ctx), translate("log", &args, &ctx));
}

#[tokio::test]
async fn test_log_request_end_to_end() {
    let ctx = ctx();
    let translation = translate("log", &[], &ctx);
    let transform = translation.output_transform.expect("log installs a transform");

    let head = "c0ffee0000000000000000000000000000000000";
    let captured = format!(
        "{head}\nsubject\nAlice\n2024-05-01T10:00:00+00:00\npublic\nHEAD -> main, origin/main\n\n\n\n\n\n0\n\n\n\n{{}}\n\nsubject\n\n{COMMIT_END_MARK}\n"
    );
    let executor = MockGitExecutor::new()
        .with_response("rev-parse HEAD", GitOutput::ok(format!("{}\n", head)))
        .with_response(
            &format!("show --format=%x00%H --name-only {}", head),
            GitOutput::ok(format!("\0{}\n\nREADME.md\n", head)),
        );

    let annotated = transform.apply(&captured, &executor).await;
    let fields: Vec<&str> = annotated
        .split(COMMIT_END_MARK)
        .next()
        .unwrap()
        .splitn(18, '\n')
        .collect();

    assert_eq!(fields[0], head);
    assert_eq!(fields[5], "main");
    assert_eq!(fields[6], "origin/main");
    assert_eq!(fields[9], "@");
    assert_eq!(fields[11], "1");
}
