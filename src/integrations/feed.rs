//! Tab label feed: nearby bike-share stations from a GBFS endpoint, or a
//! fixed list for offline use.

use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::config::{FeedConfig, FeedKind};
use crate::integrations::clock::Coordinates;

/// One full replacement set of tab labels.
pub type Batch = Vec<String>;

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("station request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed station information: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A pull-style source of label batches.
#[async_trait]
pub trait FeedSource: Send + 'static {
    /// Wait for the next batch. `None` means the source is closed for good.
    async fn next_batch(&mut self) -> Option<Batch>;
}

#[async_trait]
impl FeedSource for mpsc::Receiver<Batch> {
    async fn next_batch(&mut self) -> Option<Batch> {
        self.recv().await
    }
}

/// Start the producer described by `config` and hand back its receiving end.
///
/// The channel holds a single batch so a slow consumer never falls more than
/// one batch behind.
pub fn spawn(config: &FeedConfig, origin: Coordinates) -> mpsc::Receiver<Batch> {
    let (tx, rx) = mpsc::channel(1);
    match config.kind {
        FeedKind::Gbfs => {
            tokio::spawn(poll_gbfs(
                tx,
                config.url.clone(),
                origin,
                config.station_count,
                config.poll_interval(),
            ));
        }
        FeedKind::Static => {
            tokio::spawn(emit_static(tx, config.labels.clone()));
        }
    }
    rx
}

async fn emit_static(tx: mpsc::Sender<Batch>, labels: Batch) {
    if tx.send(labels).await.is_err() {
        tracing::debug!("static feed receiver dropped before first batch");
    }
}

async fn poll_gbfs(
    tx: mpsc::Sender<Batch>,
    url: String,
    origin: Coordinates,
    count: usize,
    interval: Duration,
) {
    let span = tracing::info_span!("gbfs", url = %url);
    let client = reqwest::Client::new();
    let fetch = move || {
        let client = client.clone();
        let url = url.clone();
        async move { fetch_stations(&client, &url).await }
    };
    poll_stations(tx, fetch, origin, count, interval)
        .instrument(span)
        .await
}

/// Fetch on every tick of `interval` and forward the nearest `count` names.
/// A failed fetch is logged and retried on the next tick; the loop ends once
/// the receiver is gone.
async fn poll_stations<F, Fut>(
    tx: mpsc::Sender<Batch>,
    mut fetch: F,
    origin: Coordinates,
    count: usize,
    interval: Duration,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<Station>, FeedError>>,
{
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        match fetch().await {
            Ok(stations) => {
                let batch = nearest_stations(&stations, origin, count);
                tracing::debug!(stations = stations.len(), kept = batch.len(), "station poll");
                if tx.send(batch).await.is_err() {
                    tracing::debug!("station receiver dropped, stopping poll");
                    break;
                }
            }
            Err(e) => tracing::warn!(error = %e, "station poll failed"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StationInformation {
    data: StationData,
}

#[derive(Debug, Deserialize)]
struct StationData {
    stations: Vec<Station>,
}

/// The subset of a GBFS station record the dashboard needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Station {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

async fn fetch_stations(client: &reqwest::Client, url: &str) -> Result<Vec<Station>, FeedError> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    parse_stations(&body)
}

fn parse_stations(body: &str) -> Result<Vec<Station>, FeedError> {
    let info: StationInformation = serde_json::from_str(body)?;
    Ok(info.data.stations)
}

/// Names of the `count` stations closest to `origin`, nearest first.
pub fn nearest_stations(stations: &[Station], origin: Coordinates, count: usize) -> Batch {
    let mut ranked: Vec<(f64, &Station)> = stations
        .iter()
        .map(|s| (distance_km(origin, Coordinates::new(s.lat, s.lon)), s))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked
        .into_iter()
        .take(count)
        .map(|(_, s)| s.name.clone())
        .collect()
}

/// Haversine distance.
fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SAMPLE: &str = r#"{
        "last_updated": 1700000000,
        "ttl": 5,
        "data": {
            "stations": [
                {"station_id": "1", "name": "Far Away", "lat": 40.80, "lon": -73.95, "capacity": 30},
                {"station_id": "2", "name": "Next Door", "lat": 40.6885, "lon": -73.9180},
                {"station_id": "3", "name": "Down The Block", "lat": 40.6920, "lon": -73.9200}
            ]
        }
    }"#;

    fn brooklyn() -> Coordinates {
        Coordinates::new(40.688265, -73.9184594)
    }

    #[test]
    fn parses_station_information_ignoring_extra_fields() {
        let stations = parse_stations(SAMPLE).unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[1].name, "Next Door");
    }

    #[test]
    fn rejects_malformed_payload() {
        let err = parse_stations(r#"{"data": {}}"#).unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[test]
    fn ranks_stations_by_distance() {
        let stations = parse_stations(SAMPLE).unwrap();
        let names = nearest_stations(&stations, brooklyn(), 2);
        assert_eq!(names, vec!["Next Door", "Down The Block"]);
    }

    #[test]
    fn count_larger_than_list_returns_everything() {
        let stations = parse_stations(SAMPLE).unwrap();
        assert_eq!(nearest_stations(&stations, brooklyn(), 10).len(), 3);
        assert!(nearest_stations(&[], brooklyn(), 10).is_empty());
    }

    #[test]
    fn distance_between_known_points() {
        // One degree of latitude along a meridian.
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[tokio::test]
    async fn static_feed_emits_once_then_closes() {
        let config = FeedConfig {
            kind: FeedKind::Static,
            labels: vec!["Blush".to_string(), "Mascara".to_string()],
            ..FeedConfig::default()
        };
        let mut rx = spawn(&config, brooklyn());

        assert_eq!(
            rx.next_batch().await,
            Some(vec!["Blush".to_string(), "Mascara".to_string()])
        );
        assert_eq!(rx.next_batch().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_is_retried_on_the_next_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(parse_stations("not json").unwrap_err())
                } else {
                    parse_stations(SAMPLE)
                }
            }
        };
        let interval = Duration::from_secs(30);
        let (tx, mut rx) = mpsc::channel(1);
        let start = tokio::time::Instant::now();
        let poller = tokio::spawn(poll_stations(tx, fetch, brooklyn(), 1, interval));

        assert_eq!(rx.recv().await, Some(vec!["Next Door".to_string()]));
        assert!(start.elapsed() >= interval);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        poller.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn poll_stops_once_the_receiver_is_dropped() {
        let fetch = || async { parse_stations(SAMPLE) };
        let (tx, mut rx) = mpsc::channel(1);
        let poller = tokio::spawn(poll_stations(
            tx,
            fetch,
            brooklyn(),
            2,
            Duration::from_secs(30),
        ));

        assert_eq!(
            rx.recv().await,
            Some(vec!["Next Door".to_string(), "Down The Block".to_string()])
        );
        drop(rx);

        let finished = tokio::time::timeout(Duration::from_secs(120), poller).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}
