use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use cities_server::geonames::load_cities;
use cities_server::quadtree::{DEFAULT_NODE_CAPACITY, QuadTree};
use cities_server::{AppState, DEFAULT_MAX_POINTS, router};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "City label tile server over a GeoNames dump")]
struct Args {
    /// GeoNames cities file (default: $CITIES_DATA or data/cities500.txt)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Listen address (default: $CITIES_ADDR or 127.0.0.1:48088)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Cities returned per tile
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    max_points: usize,

    /// Cities kept per quadtree node before spilling into children
    #[arg(long, default_value_t = DEFAULT_NODE_CAPACITY)]
    node_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let data = args.data.unwrap_or_else(|| {
        PathBuf::from(env::var("CITIES_DATA").unwrap_or_else(|_| "data/cities500.txt".to_string()))
    });
    let addr: SocketAddr = match args.addr {
        Some(addr) => addr,
        None => env::var("CITIES_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:48088".to_string())
            .parse()?,
    };

    info!("loading cities from {}", data.display());
    let cities = load_cities(&data)?;

    let mut tree = QuadTree::new(args.node_capacity);
    for city in cities {
        tree.insert(city);
    }
    let (max_z, count) = tree.stats();
    info!("maximum depth: {max_z}, total count: {count}");

    let app = router(AppState::new(tree, args.max_points));

    info!("cities server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
