use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mwd::core::output::{Mode, OutputInfo};
use mwd::core::{Compositor, CompositorConfig, HostEvent, Runtime};
use mwd::platform::api::OutputId;
use mwd::platform::{HeadlessHost, HeadlessRenderer};
use mwd::util::logging::MAIN;
use mwd::util::process;

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(author, about, version, max_term_width = 80)]
struct Options {
    /// Shell command to run once the compositor is up.
    #[clap(short = 's', value_name = "COMMAND")]
    startup: Option<String>,

    /// Give keyboard focus to the window under the pointer.
    #[clap(long)]
    focus_follows_pointer: bool,
}

fn main() -> Result<()> {
    let options = Options::parse();

    // Initialize logging with standardized format
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,mwd=debug".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().parse_lossy(directives))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_ansi(false)
        .init();

    let config = CompositorConfig {
        focus_follows_pointer: options.focus_follows_pointer,
        startup_command: options.startup,
        ..CompositorConfig::default()
    };

    // Without a display backend, run on the recording host with one
    // virtual output so clients have somewhere to go.
    let (events, receiver) = mpsc::channel();
    let mut compositor = Compositor::new(HeadlessHost::new(), config.clone())
        .with_renderer(Box::new(HeadlessRenderer::new()));
    events
        .send(HostEvent::OutputAdded {
            info: OutputInfo {
                id: OutputId(1),
                name: "HEADLESS-1".to_string(),
                description: "Headless output".to_string(),
                modes: vec![Mode::new(1920, 1080, 60_000).preferred()],
            },
        })
        .context("event channel closed before startup")?;

    if let Some(command) = &config.startup_command {
        process::spawn_shell(command)?;
    }

    mwd::wlog!(MAIN, "mwd running");
    let mut runtime = Runtime::new(receiver);
    let reason = runtime.run(&mut compositor);
    mwd::wlog!(MAIN, "mwd exiting ({:?})", reason);

    drop(events);
    Ok(())
}
