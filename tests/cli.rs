mod common;

use assert_cmd::Command;
use common::{FULL_BUILD_COMMANDS, Project};
use predicates::prelude::*;

fn timingsrc_build(project: &Project) -> Command {
    let mut cmd = Command::cargo_bin("timingsrc_build").unwrap();
    cmd.arg("--root").arg(project.root());
    cmd
}

#[test]
fn dry_run_prints_every_command_in_order() {
    let project = Project::empty();
    let expected = FULL_BUILD_COMMANDS.join("\n") + "\n";

    timingsrc_build(&project)
        .args(["--dry-run", "--quiet"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn positional_version_builds_only_that_version() {
    let project = Project::empty();

    timingsrc_build(&project)
        .args(["v3", "-n", "-q"])
        .assert()
        .success()
        .stdout(format!("{}\n{}\n", FULL_BUILD_COMMANDS[8], FULL_BUILD_COMMANDS[9]));
}

#[test]
fn repeated_version_flags_select_several_versions() {
    let project = Project::empty();

    timingsrc_build(&project)
        .args(["--version", "v2", "--version", "v1", "-n", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(FULL_BUILD_COMMANDS[4]))
        .stdout(predicate::str::contains("baseUrl=./v1"))
        .stdout(predicate::str::contains("rollup").not());
}

#[test]
fn unknown_version_fails_fast() {
    let project = Project::empty();

    timingsrc_build(&project)
        .args(["v2.1", "--dry-run"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("node").not())
        .stderr(predicate::str::contains("unknown version `v2.1`"))
        .stderr(predicate::str::contains("hint: Pick one of: v1, v2, v3"));
}

#[test]
fn unknown_version_can_be_skipped() {
    let project = Project::empty();

    timingsrc_build(&project)
        .args(["v2.1", "--version", "v3", "--allow-unknown", "-n", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timingsrc-min-v3.js"))
        .stdout(predicate::str::contains("r.js").not());
}

#[test]
fn classic_flag_adds_iife_bundles() {
    let project = Project::empty();

    timingsrc_build(&project)
        .args(["v3", "--classic", "-n", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "rollup -m -f iife --name TIMINGSRC -o docs/lib/timingsrc-classic-v3.js ./v3/index.js",
        ));
}

#[test]
fn config_file_in_root_is_picked_up() {
    let project = Project::empty();
    project.write(
        "timingsrc-build.toml",
        "output_dir = \"dist\"\n\n[tools]\nrollup = [\"npx\", \"rollup\"]\n",
    );

    timingsrc_build(&project)
        .args(["v3", "-n", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-o dist/timingsrc-v3.js"))
        .stdout(predicate::str::starts_with("npx rollup"));
}

#[test]
fn invalid_config_file_is_reported() {
    let project = Project::empty();
    project.write("timingsrc-build.toml", "[policy]\njobs = \"many\"\n");

    timingsrc_build(&project)
        .arg("-n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn tool_name_with_spaces_is_rejected_with_a_hint() {
    let project = Project::empty();
    project.write("timingsrc-build.toml", "[tools]\nrollup = \"npx rollup\"\n");

    timingsrc_build(&project)
        .args(["v3", "-n"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("npx rollup").not())
        .stderr(predicate::str::contains(r#"write it as a list: ["npx", "rollup"]"#))
        .stderr(predicate::str::contains("hint: Check timingsrc-build.toml"));
}

#[test]
fn empty_registry_is_a_configuration_error() {
    let project = Project::empty();
    project.write("timingsrc-build.toml", "versions = []\n");

    timingsrc_build(&project)
        .arg("-n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration: no versions registered"))
        .stderr(predicate::str::contains("hint: Check timingsrc-build.toml"));
}

#[test]
fn missing_root_is_rejected() {
    Command::cargo_bin("timingsrc_build")
        .unwrap()
        .args(["--root", "/nonexistent/timingsrc", "-n"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
}

#[cfg(unix)]
mod with_fake_tools {
    use super::*;
    use super::common::FakeTool;

    fn configure(project: &Project, node: &FakeTool, rollup: &FakeTool) {
        project.write(
            "timingsrc-build.toml",
            &format!(
                "[tools]\nnode = {:?}\nrollup = {:?}\n",
                node.program(),
                rollup.program()
            ),
        );
    }

    #[test]
    fn failed_variant_makes_the_exit_code_non_zero() {
        let project = Project::complete();
        let node = FakeTool::new(&project, "node", Some("require-v2"), None);
        let rollup = FakeTool::new(&project, "rollup", None, None);
        configure(&project, &node, &rollup);
        let report = project.path("build-report.json");

        timingsrc_build(&project)
            .arg("--report")
            .arg(&report)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("9 succeeded, 1 failed, 0 skipped"));

        assert_eq!(node.calls().len(), 8);
        assert_eq!(rollup.calls().len(), 2);
        let json = std::fs::read_to_string(&report).unwrap();
        assert!(json.contains("\"status\": \"failed\""), "{json}");
    }

    #[test]
    fn allow_failures_restores_exit_zero() {
        let project = Project::complete();
        let node = FakeTool::new(&project, "node", Some("require-v2"), None);
        let rollup = FakeTool::new(&project, "rollup", None, None);
        configure(&project, &node, &rollup);

        timingsrc_build(&project)
            .arg("--allow-failures")
            .assert()
            .success();
    }

    #[test]
    fn successful_build_prints_commands_and_summary() {
        let project = Project::complete();
        let node = FakeTool::new(&project, "node", None, None);
        let rollup = FakeTool::new(&project, "rollup", None, None);
        configure(&project, &node, &rollup);

        timingsrc_build(&project)
            .args(["v1", "--jobs", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[v1 loader] "))
            .stdout(predicate::str::contains("[v1 global-min] "))
            .stdout(predicate::str::contains("4 succeeded, 0 failed, 0 skipped"));
    }

    #[test]
    fn status_lines_are_uncolored_when_piped() {
        let project = Project::complete();
        let node = FakeTool::new(&project, "node", None, None);
        let rollup = FakeTool::new(&project, "rollup", Some("timingsrc-min-v3"), None);
        configure(&project, &node, &rollup);

        timingsrc_build(&project)
            .arg("v3")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("== Summary =="))
            .stdout(predicate::str::contains("\u{1b}[").not())
            .stderr(predicate::str::contains("✗ 1 succeeded, 1 failed, 0 skipped"))
            .stderr(predicate::str::contains("\u{1b}[").not());
    }

    #[test]
    fn tools_do_not_read_the_operator_terminal() {
        let project = Project::complete();
        let node = FakeTool::reading_stdin(&project, "node");
        let rollup = FakeTool::new(&project, "rollup", None, None);
        configure(&project, &node, &rollup);

        timingsrc_build(&project)
            .arg("v1")
            .write_stdin("y\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("4 succeeded, 0 failed, 0 skipped"));

        assert_eq!(node.calls().len(), 4);
    }
}
