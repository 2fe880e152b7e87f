//! Single-shot commands: organic rank, local pack, and geocoding.

use rankgrid_core::AppConfig;
use rankgrid_search::{
    track_local_pack, track_ranking, Coordinates, RankQuery, RankedSearch, SearchMode,
    TrackerSettings,
};

use crate::{geocoder, search_client};

fn tracker_settings(config: &AppConfig) -> TrackerSettings {
    TrackerSettings {
        max_pages: config.max_pages,
        top_results_limit: config.top_results_limit,
    }
}

pub(crate) async fn run_rank(
    config: &AppConfig,
    keyword: &str,
    target: &str,
    country: Option<&str>,
    language: Option<&str>,
) -> anyhow::Result<()> {
    let client = search_client(config)?;
    client.ensure_configured()?;

    let query = RankQuery {
        keyword: keyword.to_owned(),
        target_domain: target.to_owned(),
        mode: SearchMode::Organic,
        country: country.unwrap_or(&config.default_country).to_owned(),
        language: language.unwrap_or(&config.default_language).to_owned(),
        location: None,
        zoom: config.places_zoom,
    };
    let result = track_ranking(&client, &query, tracker_settings(config)).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(error) = result.error {
        anyhow::bail!(error);
    }
    Ok(())
}

pub(crate) async fn run_local(
    config: &AppConfig,
    keyword: &str,
    target: &str,
    at: Option<(f64, f64)>,
) -> anyhow::Result<()> {
    let location = at
        .map(|(lat, lng)| Coordinates::checked(lat, lng))
        .transpose()?;
    let client = search_client(config)?;
    client.ensure_configured()?;

    let query = RankQuery {
        keyword: keyword.to_owned(),
        target_domain: target.to_owned(),
        mode: SearchMode::Local,
        country: config.default_country.clone(),
        language: config.default_language.clone(),
        location,
        zoom: config.places_zoom,
    };
    let result = track_local_pack(&client, &query, tracker_settings(config)).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(error) = result.error {
        anyhow::bail!(error);
    }
    Ok(())
}

pub(crate) async fn run_geocode(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let results = geocoder(config)?.geocode(query).await?;
    if results.is_empty() {
        tracing::warn!(query, "no geocoding results");
    }
    for r in &results {
        println!("{:.6}, {:.6}  {}", r.latitude, r.longitude, r.display_name);
    }
    Ok(())
}
