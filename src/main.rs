//! Energy Dashboard - CLI entry point
//!
//! Loads the month's daily consumption (from cache or the Elering API) and
//! prints the dashboard summary with labels in the selected language.
//!
//! Options:
//!   --lang <code>   language code ("en", "et" or "auto"), overrides config
//!   --refresh       clear the cache before loading
//!   --json          print labels and data as JSON

use anyhow::Context;
use chrono::{Local, Utc};
use energy_dashboard_lib::cache::ApiCache;
use energy_dashboard_lib::core::{Config, Credentials, DashboardData};
use energy_dashboard_lib::dashboard;
use energy_dashboard_lib::fetch;
use energy_dashboard_lib::i18n::{I18n, StringSet};

/// Command-line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    lang: Option<String>,
    refresh: bool,
    json: bool,
}

fn parse_args(mut args: pico_args::Arguments) -> anyhow::Result<Options> {
    let options = Options {
        lang: args.opt_value_from_str("--lang")?,
        refresh: args.contains("--refresh"),
        json: args.contains("--json"),
    };

    let unused = args.finish();
    if !unused.is_empty() {
        anyhow::bail!("Unknown arguments: {:?}", unused);
    }

    Ok(options)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Options { lang, refresh, json } = parse_args(pico_args::Arguments::from_env())?;

    let config = Config::load().context("loading configuration")?;
    let i18n = I18n::new(lang.as_deref().unwrap_or(&config.general.language));

    if refresh {
        let cache = ApiCache::new(config.cache_file()?, config.data.cache_ttl_secs);
        if cache.clear() {
            log::info!("Cleared cache {}", cache.path().display());
        }
    }

    let loaded = fetch::load_data(&config, Credentials::from_env(), Utc::now()).await?;
    let today = Local::now().format("%Y-%m-%d").to_string();
    let data = dashboard::build(&loaded.data, loaded.cached_at, &config.eic_nicknames, &today)
        .context("reading metering data")?;

    if json {
        let out = serde_json::json!({
            "language": i18n.current_language(),
            "labels": i18n.strings(),
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(i18n.strings(), &data);
    }

    Ok(())
}

fn print_summary(labels: &StringSet, data: &DashboardData) {
    println!("==============================================");
    println!("   {}", labels.title);
    println!("==============================================\n");

    println!("{}", labels.plot_title);
    println!("----------------------------------------------");
    println!("  {:<12} | {:>10}", labels.x_axis, labels.legend_total);
    for (date, total) in data.dates.iter().zip(&data.total) {
        println!("  {:<12} | {:>10.3}", date, total);
    }
    println!("----------------------------------------------\n");

    let summary = &data.summary;
    println!("  {:<24} {:.3}", labels.summary_total, summary.total_kwh);
    println!("  {:<24} {:.3}", labels.summary_avg, summary.avg_per_day_kwh);
    println!("  {:<24} {:.3}", labels.summary_min, summary.min_day_kwh);
    println!("  {:<24} {:.3}", labels.summary_max, summary.max_day_kwh);
    match summary.today_kwh {
        Some(today) => println!("  {:<24} {:.3}", labels.summary_today, today),
        None => println!("  {:<24} -", labels.summary_today),
    }

    if let Some(fetched_at) = &data.fetched_at {
        println!("\n{} {}", labels.data_updated, fetched_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(list: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(list.iter().map(OsString::from).collect())
    }

    #[test]
    fn test_parse_known_flags() {
        let options = parse_args(args(&["--json", "--lang", "et", "--refresh"])).unwrap();
        assert_eq!(
            options,
            Options { lang: Some("et".to_string()), refresh: true, json: true }
        );
        assert_eq!(parse_args(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        let err = parse_args(args(&["--jsn"])).unwrap_err();
        assert!(err.to_string().contains("--jsn"));
        assert!(parse_args(args(&["--json", "extra"])).is_err());
    }
}
