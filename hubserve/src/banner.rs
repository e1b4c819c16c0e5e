//! Startup banner and browser launch

use hubserve_server::Server;
use std::net::{IpAddr, UdpSocket};
use std::process::{Command, Stdio};

/// Print where the server can be reached
pub fn print(server: &Server) {
    let port = server.local_addr().port();
    let rule = "=".repeat(60);

    println!("\n{}", rule);
    println!("🚀 Hubserve v{} starting...", hubserve_core::VERSION);
    println!("{}", rule);
    println!("📁 Serving directory: {}", server.root().display());
    println!("🌐 Server running at:");
    println!("   Local:   http://localhost:{}", port);
    println!("   Local:   http://127.0.0.1:{}", port);
    if let Some(ip) = local_ip() {
        println!("   Network: http://{}:{}", ip, port);
    }
    println!("{}", rule);
    println!("\n💡 Press Ctrl+C to stop the server\n");
}

/// LAN address of the default route. Connecting a UDP socket sends nothing.
fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

/// Best effort; a missing opener is not an error
pub fn open_browser(url: &str) {
    match browser_command(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => tracing::debug!("Opened browser at {}", url),
        Err(e) => tracing::debug!("Could not open browser: {}", e),
    }
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
