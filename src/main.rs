use anyhow::Context;
use handoff_queue::{Handoff, RunConfig};

fn main() -> anyhow::Result<()> {
    // diagnostics go to stderr; stdout carries only the Produced/Consumed lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .without_time()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let handoff = Handoff::new(RunConfig::default(), Box::new(std::io::stdout()))
        .context("failed to set up hand-off")?;
    handoff.run().context("hand-off run failed")?;
    Ok(())
}
