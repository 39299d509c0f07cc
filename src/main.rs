#![deny(clippy::unwrap_used)]

use actix::prelude::*;
use anyhow::Context as AnyhowContext;
use clap::{Parser, Subcommand};
use cruise_mall::client::{MallClient, ProductSource};
use cruise_mall::query::build_inventory_params;
use cruise_mall::recipient::search_recipients;
use cruise_mall::search::{CatalogSearch, LoadInventory, SelectCruise, SelectRegion, SetRawSearch};
use cruise_mall::types::recipient::{RecipientCategory, SendMethod};
use cruise_mall::types::ALL;
use cruise_mall::{cruise_catalog, region, region_catalog, theme};
use serde::Serialize;
use serde_json::json;
use std::env;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cruise-mall", about = "Cruise mall catalog search and recipient lookup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Region dropdown options
    Regions {
        /// Only options whose label or value contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Cruise dropdown options
    Cruises {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Ships of one cruise line, by its short name
    Ships { line: String },
    /// Region code the product API expects for a picker value
    Normalize { region: String },
    /// Related search chips derived from the current inventory
    Related,
    /// Run the search block query
    Search {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        cruise: Option<String>,
        /// Free text typed into the cruise box
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Enabled theme sections of the main page with their products
    Themes,
    /// Region menu filters that have products on sale
    Menu,
    /// Message recipients for a send method (cruise-guide, email, sms, kakao)
    Recipients {
        method: String,
        term: Option<String>,
        /// all, cruise-guide, mall, test or prospect
        #[arg(long)]
        category: Option<String>,
    },
}

fn print<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn client() -> Result<MallClient, anyhow::Error> {
    let client = MallClient::new(cruise_mall::API_BASE.as_str())?;
    let cookie = envmnt::get_or("MALL_SESSION_COOKIE", "");
    if !cookie.trim().is_empty() {
        client.add_cookie(cookie.trim());
    }
    Ok(client)
}

#[actix_rt::main]
async fn main() -> Result<(), anyhow::Error> {
    if let Err(env::VarError::NotPresent) = env::var("RUST_LOG") {
        env::set_var("RUST_LOG", "INFO");
    }
    pretty_env_logger::formatted_timed_builder()
        .parse_default_env()
        .init();

    match std::fs::File::open(".env") {
        Ok(_) => envmnt::load_file(".env")?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::File::create(".env")?;
            envmnt::load_file(".env")?;
        }
        Err(err) => {
            return Err(anyhow::anyhow!("Unable to open .env file: {err}"));
        }
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Regions { filter } => {
            let options = region_catalog::build_region_options();
            match filter {
                Some(term) => print(&region_catalog::filter_region_options(&options, &term)),
                None => print(&options),
            }
        }
        Command::Cruises { filter } => {
            let options = cruise_catalog::build_cruise_options();
            match filter {
                Some(term) => print(&cruise_catalog::filter_cruise_options(&options, &term)),
                None => print(&options),
            }
        }
        Command::Ships { line } => print(&cruise_catalog::ship_names_for_line(&line)),
        Command::Normalize { region } => print(&json!({
            "input": region,
            "region": region::convert_region_to_api_format(&region),
        })),
        Command::Related => {
            let addr = CatalogSearch::new(Arc::new(client()?)).start();
            print(&addr.send(LoadInventory).await?)
        }
        Command::Search {
            region,
            cruise,
            keyword,
        } => {
            let addr = CatalogSearch::new(Arc::new(client()?)).start();
            addr.send(SetRawSearch {
                cruise: keyword,
                region: None,
            })
            .await?;
            if let Some(cruise) = cruise {
                addr.send(SelectCruise(cruise)).await?;
            }
            let state = addr
                .send(SelectRegion(region.unwrap_or_else(|| ALL.to_string())))
                .await?;
            print(&state)
        }
        Command::Themes => {
            let client = client()?;
            let config = client
                .page_config()
                .await
                .context("Unable to load page config")?;
            let sections = futures::future::join_all(
                config
                    .enabled_theme_sections()
                    .map(|section| theme::load_theme_section(&client, section)),
            )
            .await;
            print(&sections)
        }
        Command::Menu => {
            let client = client()?;
            let settings = client
                .mall_settings()
                .await
                .context("Unable to load mall settings")?;
            let inventory = client
                .search_products(&build_inventory_params(cruise_mall::inventory_limit()))
                .await
                .context("Unable to load inventory")?;
            let available = region::available_regions(&inventory.products);
            let below = match &settings.recommended_below {
                Some(below) => theme::load_below_products(&client, below).await,
                None => vec![],
            };
            print(&json!({
                "filters": theme::region_menu_filters(&settings, &available),
                "sections": theme::classify(&inventory.products),
                "below": below,
            }))
        }
        Command::Recipients {
            method,
            term,
            category,
        } => {
            let method = SendMethod::parse(&method)
                .with_context(|| format!("Unknown send method {method}"))?;
            let category = match category {
                Some(c) => serde_json::from_value::<RecipientCategory>(json!(c.as_str()))
                    .with_context(|| format!("Unknown recipient category {c}"))?,
                None => method.default_category(),
            };
            let client = client()?;
            let recipients =
                search_recipients(&client, method, category, term.as_deref().unwrap_or_default())
                    .await;
            print(&recipients)
        }
    }
}
