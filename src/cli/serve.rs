use crate::{config::Config, error, info, server, success, warning};

/// Runs the authorization server until it is shut down.
///
/// # Arguments
///
/// * `addr` - Overrides `SERVER_ADDRESS` when given
/// * `open` - Opens the login page in the default browser once the server
///   task has been started
pub async fn serve(addr: Option<String>, open: bool) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    if let Some(addr) = addr {
        config.server_addr = addr;
    }

    let login_url = format!("http://{}/login", config.server_addr);
    info!("Starting server on {}", config.server_addr);

    let server = tokio::spawn(server::start_api_server(config));

    if open && webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        );
    }

    match server.await {
        Ok(Ok(())) => success!("Server stopped."),
        Ok(Err(e)) => error!("Server error: {}", e),
        Err(e) => error!("Server task failed: {}", e),
    }
}
