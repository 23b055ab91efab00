use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use poi_hours::{config::Config, server::server::Server, upstream::poi_client::PoiClient};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(err) = run().await {
        error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = Config::load()?;

    let poi_client = PoiClient::new(&config.poi_api_url, &config.user_agent);
    let server = Server::setup(poi_client, config.timezone)?;

    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|err| format!("Could not bind to {}.\n{}", address, err))?;
    info!("Serving open hours on {}, POI API at {}", address, config.poi_api_url);

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(connection) => connection,
            Err(err) => {
                warn!("Could not accept connection: {}", err);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server_clone = server.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, server_clone)
                .await
            {
                warn!("Connection error: {}", err);
            }
        });
    }
}
