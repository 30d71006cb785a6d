use anyhow::Result;

use crate::CliTest;

#[test]
fn output_to_console_prints_instead_of_writing() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.js", "alert('Hello World');")?;

    let output = test
        .command()
        .args([
            "--bundle",
            "app.arb",
            "--code",
            "a.js",
            "--silent_mode",
            "--output_to_console",
        ])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alert(r$.MSG_00000);"));
    assert!(stdout.contains("\"MSG_00000\": \"Hello World\""));

    // nothing was written to disk
    assert_eq!(test.read_file("a.js")?, "alert('Hello World');");
    assert!(!test.has_file("a.js.bak"));
    assert!(!test.has_file("app.arb"));
    Ok(())
}

#[test]
fn help_lists_all_flags() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--bundle",
        "--code",
        "--namespace",
        "--resource_var",
        "--output_to_console",
        "--silent_mode",
    ] {
        assert!(stdout.contains(flag), "missing {} in help output", flag);
    }
    Ok(())
}
