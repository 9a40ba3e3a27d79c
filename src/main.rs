mod host;

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (config, cache_path) = pushpipe_service::config::load_config().await?;
        let channels = pushpipe_bridge::HostChannels::default();
        let authority = host::SimulatedAuthority::default();

        let app = pushpipe_app::run(authority.clone(), channels.app_rx);
        let host = host::run(authority, channels.host_tx, config, cache_path);
        let ((), host_result) = tokio::join!(app, host);
        host_result
    })
}
