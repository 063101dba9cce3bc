use anyhow::Context;
use std::process::Command;

/// Launch the external `knbn-web` server and wait for it to exit.
pub fn run(port: u16) -> anyhow::Result<()> {
    println!("Starting knbn-web server on port {port}...");

    let binary = match which::which("knbn-web") {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Make sure knbn-web is installed and available in your PATH");
            return Err(e).context("Failed to start knbn-web server");
        }
    };
    tracing::debug!(binary = %binary.display(), port, "launching web server");

    let status = Command::new(&binary)
        .args(["--port", &port.to_string()])
        .status()
        .context("Failed to start knbn-web server")?;
    if !status.success() {
        let code = status.code().unwrap_or(1);
        eprintln!("knbn-web server exited with code {code}");
        std::process::exit(code);
    }
    Ok(())
}
