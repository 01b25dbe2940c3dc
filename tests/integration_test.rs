use assert_cmd::Command;
use predicates::prelude::*;
mod common {
    pub mod test_utils;
}
use common::test_utils::TestBuild;

#[test]
fn test_binary_writes_report_from_event_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut build = TestBuild::new()?;
    let sln = build.abs("App.sln");
    let proj = build.abs("App/App.csproj");
    let source = build.abs("App/Program.cs");
    build
        .start(&sln)
        .start(&proj)
        .error("CS1", "broken", &source, 10, 2)
        .warning("CS0168", "unused", &source, 3, 9)
        .finish()
        .finish();
    let events = build.write_events()?;

    Command::cargo_bin("buildlog-xml")?
        .arg("--events")
        .arg(&events)
        .arg("--logfile")
        .arg(build.report_path())
        .arg("--working-dir")
        .arg(build.path())
        .assert()
        .success();

    let xml = build.read_report()?;
    assert!(xml.contains(r#"solution_name="App.sln" solution_dir="""#));
    assert!(xml.contains(r#"project_count="2" warning_count="1" error_count="1""#));
    assert!(xml.contains(r#"name="Program.cs" pos="(10, 2)""#));
    assert!(!xml.contains("<warning"));
    Ok(())
}

#[test]
fn test_binary_reads_stdin_and_logger_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let mut build = TestBuild::new()?;
    build
        .start("Lib.csproj")
        .message("low detail", "low")
        .message("important", "high")
        .finish();
    let events = std::fs::read_to_string(build.write_events()?)?;
    let logfile = build.path().join("params.xml");

    Command::cargo_bin("buildlog-xml")?
        .arg("-p")
        .arg(format!("LogFile={};Verbosity=normal", logfile.display()))
        .write_stdin(events)
        .assert()
        .success();

    let xml = std::fs::read_to_string(&logfile)?;
    assert!(xml.contains(r#"<message importance="high">important</message>"#));
    assert!(!xml.contains("low detail"));
    Ok(())
}

#[test]
fn test_binary_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut build = TestBuild::new()?;
    build.start("Quiet.csproj").finish();
    let events = build.write_events()?;
    let config = build.path().join("buildlog.toml");
    std::fs::write(
        &config,
        format!(
            "[report]\nlogfile = {:?}\nverbosity = \"quiet\"\n",
            build.report_path().to_string_lossy()
        ),
    )?;

    Command::cargo_bin("buildlog-xml")?
        .arg("--config")
        .arg(&config)
        .arg("--events")
        .arg(&events)
        .assert()
        .success();

    let xml = build.read_report()?;
    assert!(xml.contains(r#"solution_name="Quiet.csproj""#));
    assert!(!xml.contains(r#"<project dir="" name="Quiet.csproj""#));
    assert!(xml.contains(r#"project_count="1""#));
    Ok(())
}

#[test]
fn test_binary_rejects_malformed_event() -> Result<(), Box<dyn std::error::Error>> {
    let build = TestBuild::new()?;
    let events = build.path().join("events.jsonl");
    std::fs::write(&events, "{\"event\":\"project_started\",\"project\":\"a.csproj\"}\nnot json\n")?;

    Command::cargo_bin("buildlog-xml")?
        .arg("--events")
        .arg(&events)
        .arg("-o")
        .arg(build.report_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
    assert!(!build.report_path().exists());
    Ok(())
}

#[test]
fn test_binary_rejects_unknown_verbosity() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("buildlog-xml")?
        .args(["--verbosity", "chatty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown verbosity"));
    Ok(())
}
