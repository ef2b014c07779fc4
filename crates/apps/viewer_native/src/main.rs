use std::env;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use foundation::GeoRectangle;
use layers::{HeadlessViewer, mixin_cities_data_source};
use streaming::{DEFAULT_TILE_SERVER, HttpTileFetcher};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless city labels overlay")]
struct Args {
    /// Tile server base URL (default: $CITIES_SERVER_URL or localhost:48088)
    #[arg(long)]
    server: Option<String>,

    /// Tile level the camera renders at
    #[arg(long, default_value_t = 3)]
    level: u32,

    /// Number of camera moves
    #[arg(long, default_value_t = 8)]
    frames: u32,

    /// Pause between frames, in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let server = args.server.unwrap_or_else(|| {
        env::var("CITIES_SERVER_URL").unwrap_or_else(|_| DEFAULT_TILE_SERVER.to_string())
    });
    info!("fetching city tiles from {server}");

    let mut viewer = HeadlessViewer::new();
    let entities = mixin_cities_data_source(&mut viewer, Arc::new(HttpTileFetcher::new(server)))?;

    // Pan eastwards over Europe, a 30° by 20° window.
    for frame in 0..args.frames {
        let west = -10.0 + f64::from(frame) * 10.0;
        viewer.look_at(GeoRectangle::from_degrees(west, 35.0, west + 30.0, 55.0), args.level);
        viewer.fire_camera_changed();

        tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        info!(
            "frame {frame}: {} tiles rendered, {} cities shown",
            viewer.tiles_to_render().len(),
            entities.len()
        );
    }
    Ok(())
}
