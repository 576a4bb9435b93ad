#![allow(missing_docs)]
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail, ensure};
use http::StatusCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use booking_harness::assertions::{BookingUpdates, assert_booking_fields, assert_booking_matches};
use booking_harness::auth::Auth;
use booking_harness::config::{DEFAULT_CONFIG_PATH, HarnessConfig};
use booking_harness::dates::{adjust_date_to_local_date, today};
use booking_harness::endpoints::{BOOKING_BASE, BOOKING_BY_ID, PARAM_ID, PING};
use booking_harness::{Booking, BookingDates, CreatedBooking, RestClient, SecureString};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let CliArgs {
        config,
        participants,
        command,
    } = CliArgs::parse().context("parsing arguments")?;

    let mut config = HarnessConfig::load(&config)
        .with_context(|| format!("loading configuration {}", config.display()))?;
    if let Some(participants) = participants {
        config.race.participants = participants;
    }

    let mut client = config
        .client_builder()
        .context("configuring client")?
        .build()
        .context("building client")?;
    info!(base_uri = %client.base_uri(), ?command, "running");

    client
        .get(PING)
        .expect_status(StatusCode::CREATED)
        .await
        .context("pinging the booking API")?;

    let token = Auth::new(&client)
        .login(&config.username, config.password.as_str())
        .await
        .context("login")?;

    match command {
        Command::Smoke => smoke(&mut client, &token).await?,
        Command::Race => race(&config, &mut client, &token).await?,
    }

    info!("done");
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Smoke,
    Race,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "smoke" => Ok(Self::Smoke),
            "race" => Ok(Self::Race),
            other => bail!("unknown command '{other}', expected 'smoke' or 'race'"),
        }
    }
}

#[derive(Debug)]
struct CliArgs {
    config: PathBuf,
    participants: Option<usize>,
    command: Command,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let config = pargs
            .opt_value_from_str(["-c", "--config"])
            .context("parsing config argument")?;

        let participants = pargs
            .opt_value_from_str(["-n", "--participants"])
            .context("parsing participants argument")?;

        let command = pargs
            .free_from_str()
            .context("expected a command: smoke or race")?;

        let result = Self {
            config: config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            participants,
            command,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "ignoring unknown arguments");
        }
        Ok(result)
    }
}

fn sample_booking() -> Booking {
    let checkin = today();
    Booking {
        firstname: "Jim".to_string(),
        lastname: "Brown".to_string(),
        totalprice: 111,
        depositpaid: true,
        bookingdates: BookingDates {
            checkin,
            checkout: adjust_date_to_local_date(checkin, 3),
        },
        additionalneeds: Some("Breakfast".to_string()),
    }
}

async fn create_booking(client: &mut RestClient, booking: &Booking) -> Result<CreatedBooking> {
    let created: CreatedBooking = client
        .with_json_body(booking)?
        .post(BOOKING_BASE)
        .await
        .context("creating booking")?
        .as_json()?;
    assert_booking_matches(booking, &created.booking).context("created booking")?;
    info!(id = created.bookingid, "booking created");
    Ok(created)
}

/// Create, read, update, patch and delete one booking.
async fn smoke(client: &mut RestClient, token: &SecureString) -> Result<()> {
    let booking = sample_booking();
    let CreatedBooking { bookingid, .. } = create_booking(client, &booking).await?;

    let read: Booking = client
        .with_path_param(PARAM_ID, bookingid)
        .get(BOOKING_BY_ID)
        .await
        .context("reading booking")?
        .as_json()?;
    assert_booking_matches(&booking, &read).context("read booking")?;

    let mut updated = booking.clone();
    updated.firstname = "James".to_string();
    updated.totalprice = 222;
    let replaced: Booking = client
        .with_token(token)
        .with_path_param(PARAM_ID, bookingid)
        .with_json_body(&updated)?
        .put(BOOKING_BY_ID)
        .await
        .context("updating booking")?
        .as_json()?;
    assert_booking_matches(&updated, &replaced).context("updated booking")?;

    let patched: Booking = client
        .with_token(token)
        .with_path_param(PARAM_ID, bookingid)
        .with_body(r#"{"lastname":"Bond"}"#)
        .patch(BOOKING_BY_ID)
        .await
        .context("patching booking")?
        .as_json()?;
    assert_booking_fields(
        &patched,
        &replaced,
        &BookingUpdates::default().with_lastname("Bond"),
    )
    .context("patched booking")?;

    client
        .with_token(token)
        .with_path_param(PARAM_ID, bookingid)
        .delete(BOOKING_BY_ID)
        .await
        .context("deleting booking")?;
    client
        .with_path_param(PARAM_ID, bookingid)
        .get(BOOKING_BY_ID)
        .expect_status(StatusCode::NOT_FOUND)
        .await
        .context("booking still readable after delete")?;

    info!(id = bookingid, "smoke test passed");
    Ok(())
}

/// Create one booking, then delete it from several tasks at once.
async fn race(config: &HarnessConfig, client: &mut RestClient, token: &SecureString) -> Result<()> {
    let CreatedBooking { bookingid, .. } = create_booking(client, &sample_booking()).await?;

    let token = token.clone();
    let report = config
        .race_harness(client)
        .run_and_confirm(
            move |mut client| {
                client
                    .with_token(&token)
                    .with_path_param(PARAM_ID, bookingid)
                    .delete(BOOKING_BY_ID)
                    .expect_any_status()
                    .into_future()
            },
            move |mut client| {
                client
                    .with_path_param(PARAM_ID, bookingid)
                    .get(BOOKING_BY_ID)
                    .expect_status(StatusCode::NOT_FOUND)
                    .into_future()
            },
        )
        .await
        .with_context(|| format!("delete race on booking {bookingid}"))?;

    ensure!(
        report.tally.total() == config.race.participants,
        "{} outcomes for {} participants",
        report.tally.total(),
        config.race.participants
    );
    info!(id = bookingid, tally = %report.tally, elapsed = ?report.elapsed, "race held");
    Ok(())
}
