use anyhow::{anyhow, Result};
use clap::{App, Arg};
use nft_lens::alchemy::snapshot::SnapshotSource;
use nft_lens::analyzers::prices::estimate_value;
use nft_lens::analyzers::scores::aggregate_score;
use nft_lens::analyzers::Trait;
use nft_lens::config::Settings;
use nft_lens::profiles::token_profile::NftProfile;
use nft_lens::storage::FrequencyCache;
use tracing_subscriber::EnvFilter;

fn parse_f64(value: &str, name: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| anyhow!("{} was not a number: {}", name, value))
}

fn app() -> App<'static, 'static> {
    App::new("nft-lens")
        .version("0.1")
        .about("Scores NFT rarity and estimates value against the collection floor")
        .arg(
            Arg::with_name("profile")
                .short("p")
                .long("profile")
                .value_names(&["SNAPSHOT", "CONTRACT", "TOKEN_ID"])
                .help("Builds a full token profile from a provider snapshot")
                .takes_value(true)
                .number_of_values(3),
        )
        .arg(
            Arg::with_name("value")
                .short("v")
                .long("value")
                .value_names(&["SCORE", "FLOOR"])
                .help("Estimates value from a rarity score and floor price")
                .takes_value(true)
                .number_of_values(2),
        )
        .arg(
            Arg::with_name("score")
                .short("s")
                .long("score")
                .value_name("FLOOR RARITY...")
                .help("Aggregates trait prevalences (percent) into a rarity score")
                .takes_value(true)
                .multiple(true)
                .min_values(2),
        )
}

#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = app().get_matches();

    if let Some(c) = matches.values_of("profile") {
        let params = c.into_iter().collect::<Vec<_>>();
        let settings = Settings::from_env()?;
        let cache = FrequencyCache::from_settings(&settings);
        let source = SnapshotSource::from_file(params[0])?;

        println!("Building NFT Profile...");
        let profile = NftProfile::make(&source, &cache, &settings, params[1], params[2]).await?;

        println!("{}", serde_json::to_string_pretty(&profile)?);
    }

    if let Some(c) = matches.values_of("value") {
        let params = c.into_iter().collect::<Vec<_>>();
        let valuation = estimate_value(
            parse_f64(params[0], "SCORE")?,
            parse_f64(params[1], "FLOOR")?,
        );

        println!("{}", serde_json::to_string_pretty(&valuation)?);
    }

    if let Some(c) = matches.values_of("score") {
        let params = c.into_iter().collect::<Vec<_>>();
        let floor = parse_f64(params[0], "FLOOR")?;
        let traits = params[1..]
            .iter()
            .enumerate()
            .map(|(i, r)| -> Result<Trait> {
                Ok(Trait {
                    trait_type: format!("trait_{}", i),
                    value: r.to_string(),
                    rarity: Some(parse_f64(r, "RARITY")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        println!("{}", serde_json::to_string_pretty(&aggregate_score(&traits, floor))?);
    }

    Ok(())
}
