use anyhow::Result;

use crate::CliTest;

#[test]
fn silent_extraction_rewrites_source_and_bundle() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.js", "alert('Hello World');\n")?;

    let output = test
        .command()
        .args(["--bundle", "app.arb", "--code", "a.js", "--silent_mode"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(test.read_file("a.js")?, "alert(r$.MSG_00000);\n");
    // a backup of the original is kept next to it
    assert_eq!(test.read_file("a.js.bak")?, "alert('Hello World');\n");
    assert_eq!(
        test.read_file("app.arb")?,
        "{\n  \"MSG_00000\": \"Hello World\"\n}"
    );
    Ok(())
}

#[test]
fn existing_bundle_entries_are_kept() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("app.arb", "{\"MSG_00000\": \"kept\"}")?;
    test.write_file("a.js", "alert('New');")?;

    let output = test
        .command()
        .args(["--bundle", "app.arb", "--code", "a.js", "--silent_mode"])
        .output()?;
    assert!(output.status.success());

    assert_eq!(test.read_file("a.js")?, "alert(r$.MSG_00001);");
    assert_eq!(
        test.read_file("app.arb")?,
        "{\n  \"MSG_00000\": \"kept\",\n  \"MSG_00001\": \"New\"\n}"
    );
    Ok(())
}

#[test]
fn html_unit_gets_id_attribute() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "page.html",
        "<html><body><p>Hello</p></body></html>\n",
    )?;

    let output = test
        .command()
        .args(["--bundle", "app.arb", "--code", "page.html", "--silent_mode"])
        .output()?;
    assert!(output.status.success());

    assert_eq!(
        test.read_file("page.html")?,
        "<html><body><p arb:id=\"MSG_00000\">Hello</p></body></html>\n"
    );
    assert_eq!(
        test.read_file("app.arb")?,
        "{\n  \"MSG_00000\": \"Hello\"\n}"
    );
    Ok(())
}

#[test]
fn directory_argument_is_walked() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/a.js", "alert('One');")?;
    test.write_file("src/b.js", "alert('Two');")?;
    test.write_file("src/notes.txt", "not source")?;

    let output = test
        .command()
        .args(["--bundle", "app.arb", "--code", "src", "--silent_mode"])
        .output()?;
    assert!(output.status.success());

    assert_eq!(test.read_file("src/a.js")?, "alert(r$.MSG_00000);");
    assert_eq!(test.read_file("src/b.js")?, "alert(r$.MSG_00001);");
    assert_eq!(test.read_file("src/notes.txt")?, "not source");
    Ok(())
}

#[test]
fn parse_failure_skips_unit_and_exits_nonzero() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("bad.js", "var = (")?;
    test.write_file("good.js", "alert('Hi');")?;

    let output = test
        .command()
        .args([
            "--bundle",
            "app.arb",
            "--code",
            "bad.js",
            "--code",
            "good.js",
            "--silent_mode",
        ])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.js"));

    // the broken unit is untouched, the good one is rewritten
    assert_eq!(test.read_file("bad.js")?, "var = (");
    assert!(!test.has_file("bad.js.bak"));
    assert_eq!(test.read_file("good.js")?, "alert(r$.MSG_00000);");
    Ok(())
}

#[test]
fn namespace_flag_wraps_bundle() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.js", "alert('Hi');")?;

    let output = test
        .command()
        .args([
            "--bundle",
            "app.arb",
            "--code",
            "a.js",
            "--namespace",
            "myapp",
            "--silent_mode",
        ])
        .output()?;
    assert!(output.status.success());

    let bundle = test.read_file("app.arb")?;
    assert!(bundle.starts_with("arb.register(\"myapp\", {"));
    assert!(bundle.trim_end().ends_with("});"));
    Ok(())
}

#[test]
fn resource_var_flag_changes_generated_code() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.js", "alert('Hi');")?;

    let output = test
        .command()
        .args([
            "--bundle",
            "app.arb",
            "--code",
            "a.js",
            "--resource_var",
            "res",
            "--silent_mode",
        ])
        .output()?;
    assert!(output.status.success());
    assert_eq!(test.read_file("a.js")?, "alert(res.MSG_00000);");
    Ok(())
}

#[test]
fn interactive_reject_leaves_everything_untouched() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.js", "alert('Hello');")?;

    let mut cmd = test.command();
    cmd.args(["--bundle", "app.arb", "--code", "a.js"]);
    let output = test.run_with_input(cmd, "n\n")?;
    assert!(output.status.success());

    assert_eq!(test.read_file("a.js")?, "alert('Hello');");
    assert_eq!(test.read_file("app.arb")?, "{}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alert('Hello');"));
    assert!(stdout.contains("alert(r$.MSG_00000);"));
    Ok(())
}

#[test]
fn interactive_accept_takes_suggested_id() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.js", "alert('Hello');")?;

    let mut cmd = test.command();
    cmd.args(["--bundle", "app.arb", "--code", "a.js"]);
    // confirm the change, accept the suggested id
    let output = test.run_with_input(cmd, "y\n\n")?;
    assert!(output.status.success());

    assert_eq!(test.read_file("a.js")?, "alert(r$.MSG_00000);");
    assert_eq!(
        test.read_file("app.arb")?,
        "{\n  \"MSG_00000\": \"Hello\"\n}"
    );
    Ok(())
}

#[test]
fn config_file_supplies_defaults() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".arbexrc.json", "{\"resourceVar\": \"res\", \"backup\": false}")?;
    test.write_file("a.js", "alert('Hi');")?;

    let output = test
        .command()
        .args(["--bundle", "app.arb", "--code", "a.js", "--silent_mode"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(test.read_file("a.js")?, "alert(res.MSG_00000);");
    assert!(!test.has_file("a.js.bak"));
    Ok(())
}
