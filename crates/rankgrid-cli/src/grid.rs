//! `grid` command: resolve a center, lay out the grid, and rank every point.

use rankgrid_core::AppConfig;
use rankgrid_search::{
    domains_overlap, generate_grid, run_grid_report, Coordinates, DistanceUnit, GridConfig,
    GridReport, GridSearchSettings, SearchMode,
};
use serde::Serialize;

use crate::{geocoder, search_client};

/// Where the grid is centered, before any geocoding.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CenterArg {
    Coordinates { lat: f64, lng: f64 },
    Address(String),
}

impl CenterArg {
    pub(crate) fn from_args(
        lat: Option<f64>,
        lng: Option<f64>,
        address: Option<String>,
    ) -> anyhow::Result<Self> {
        match (lat, lng, address) {
            (_, _, Some(address)) if !address.trim().is_empty() => Ok(Self::Address(address)),
            (Some(lat), Some(lng), _) => Ok(Self::Coordinates { lat, lng }),
            _ => anyhow::bail!("provide --lat and --lng, or --address"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct GridArgs {
    pub spacing: f64,
    pub unit: DistanceUnit,
    pub size: u32,
    pub mode: SearchMode,
    pub keyword: String,
    pub target: String,
    pub show_matches: bool,
}

/// A top result whose host loosely overlaps the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LooseMatch {
    pub point_id: String,
    /// 1-based position among the point's scanned results.
    pub position: usize,
    pub title: String,
    pub link: String,
}

/// Every top result, across all points, whose link overlaps `target` under
/// the loose containment rule.
pub(crate) fn loose_matches(report: &GridReport, target: &str) -> Vec<LooseMatch> {
    report
        .results
        .iter()
        .flat_map(|outcome| {
            outcome
                .top_results
                .iter()
                .enumerate()
                .filter_map(move |(index, item)| {
                    let link = item.link.as_deref()?;
                    domains_overlap(link, target).then(|| LooseMatch {
                        point_id: outcome.point_id.clone(),
                        position: index + 1,
                        title: item.title.clone(),
                        link: link.to_owned(),
                    })
                })
        })
        .collect()
}

async fn resolve_center(config: &AppConfig, center: CenterArg) -> anyhow::Result<Coordinates> {
    let (lat, lng) = match center {
        CenterArg::Coordinates { lat, lng } => (lat, lng),
        CenterArg::Address(address) => {
            let best = geocoder(config)?
                .geocode(&address)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("no geocoding result for \"{address}\""))?;
            tracing::info!(
                address = %address,
                resolved = %best.display_name,
                latitude = best.latitude,
                longitude = best.longitude,
                "geocoded grid center"
            );
            (best.latitude, best.longitude)
        }
    };
    Ok(Coordinates::checked(lat, lng)?)
}

pub(crate) async fn run_grid(
    config: &AppConfig,
    center: CenterArg,
    args: GridArgs,
) -> anyhow::Result<()> {
    let grid_config = GridConfig::new(args.unit, args.spacing, args.size)?;
    let center = resolve_center(config, center).await?;
    let points = generate_grid(center, &grid_config);

    let client = search_client(config)?;
    let settings = GridSearchSettings {
        mode: args.mode,
        ..GridSearchSettings::from_app_config(config)
    };

    let report = run_grid_report(&client, &points, &args.keyword, &args.target, &settings).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if args.show_matches {
        let matches = loose_matches(&report, &args.target);
        println!("\nloose matches for {} ({}):", args.target, matches.len());
        for m in &matches {
            println!("  [{}] #{} {} <{}>", m.point_id, m.position, m.title, m.link);
        }
    }

    Ok(())
}
