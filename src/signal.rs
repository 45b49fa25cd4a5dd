use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled on the first interrupt (Ctrl-C).
pub fn install_interrupt_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if matches!(tokio::signal::ctrl_c().await, Ok(())) {
            tracing::info!("received interrupt, cancelling run");
            trigger.cancel();
        }
    });
    token
}
