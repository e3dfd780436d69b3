//! Probable Markets order-book scanner entry point.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use probable_book::alert::{self, TelegramNotifier};
use probable_book::config::{ScanConfig, TelegramConfig, WatchConfig};
use probable_book::error::{ConfigError, MarketError};
use probable_book::market::{self, BookClient, Side};
use probable_book::orderbook::{aggregate_bids, BestQuote};
use probable_book::output::{self, JsonlWriter};
use probable_book::scan;
use probable_book::watch::{CompareOp, WatchObservation, WatchState, WatchTrigger};

/// Probable Markets order-book scanner.
#[derive(Parser, Debug)]
#[command(name = "probable-book")]
#[command(about = "Order-book scanner and alert monitor for Probable Markets")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan all open markets and report the best opportunity (default).
    Scan(ScanArgs),

    /// Watch one market's best bid against a price threshold.
    Watch(WatchArgs),

    /// List discovered markets with stable indices and exit.
    ListMarkets {
        /// Cap the number of markets discovered.
        #[arg(long)]
        max_markets: Option<usize>,
    },

    /// Send a test Telegram message and exit.
    TestTelegram {
        /// Telegram bot token (overrides TG_BOT_TOKEN).
        #[arg(long)]
        tg_token: Option<String>,

        /// Telegram chat ID (overrides TG_CHAT_ID).
        #[arg(long)]
        tg_chat_id: Option<String>,
    },
}

/// Flags shared by the polling commands.
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Polling interval in seconds.
    #[arg(long, default_value_t = 60)]
    interval: u64,

    /// Run a single round and exit.
    #[arg(long)]
    once: bool,

    /// Print human-readable output to stdout.
    #[arg(long)]
    pretty: bool,

    /// Cap the number of markets discovered.
    #[arg(long)]
    max_markets: Option<usize>,

    /// Telegram bot token (overrides TG_BOT_TOKEN).
    #[arg(long)]
    tg_token: Option<String>,

    /// Telegram chat ID (overrides TG_CHAT_ID).
    #[arg(long)]
    tg_chat_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct ScanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Append per-round records to this JSONL file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fire a Telegram alert when the best sum drops below this value.
    #[arg(long)]
    alert_sum_threshold: Option<Decimal>,
}

#[derive(Args, Debug, Clone)]
struct WatchArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Market index from `list-markets`.
    #[arg(long)]
    index: usize,

    /// Side whose bid book to watch (YES or NO).
    #[arg(long)]
    side: Side,

    /// Bid price threshold.
    #[arg(long)]
    trigger_price: Decimal,

    /// Trigger operator (one of >=, >, <=, <).
    #[arg(long, default_value = ">=")]
    trigger_op: CompareOp,

    /// Seconds between alerts (0 alerts on every qualifying round).
    #[arg(long, default_value_t = 300)]
    cooldown: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("probable_book=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let run = async {
        match cli.command {
            Some(Command::Scan(args)) => cmd_scan(args).await,
            Some(Command::Watch(args)) => cmd_watch(args).await,
            Some(Command::ListMarkets { max_markets }) => cmd_list_markets(max_markets).await,
            Some(Command::TestTelegram {
                tg_token,
                tg_chat_id,
            }) => cmd_test_telegram(tg_token, tg_chat_id).await,
            None => cmd_scan(cli.scan).await,
        }
    };

    tokio::select! {
        result = run => result,
        _ = tokio::signal::ctrl_c() => {
            info!("stopped by user");
            Ok(())
        }
    }
}

/// Scan all open markets each round, reporting the lowest-sum market.
async fn cmd_scan(args: ScanArgs) -> anyhow::Result<()> {
    let telegram = TelegramConfig::load()?
        .with_overrides(args.common.tg_token.clone(), args.common.tg_chat_id.clone());
    info!(
        tg_configured = telegram.is_configured(),
        alert_sum_threshold = ?args.alert_sum_threshold,
        "configuration loaded"
    );

    let config = ScanConfig {
        interval: Duration::from_secs(args.common.interval),
        once: args.common.once,
        pretty: args.common.pretty,
        out: args.out,
        max_markets: args.common.max_markets,
        alert_sum_threshold: args.alert_sum_threshold,
        telegram,
    };
    config.validate()?;

    let client = BookClient::new();
    let mut markets = market::discover_markets(client.http(), config.max_markets).await?;
    if markets.is_empty() {
        return Err(MarketError::NoMarketsFound.into());
    }
    market::sort_markets(&mut markets);

    let notifier = TelegramNotifier::from_config(&config.telegram);
    let writer = config.out.clone().map(JsonlWriter::new);

    info!(markets = markets.len(), "starting scan loop");
    let mut round: u64 = 0;

    loop {
        let started = Instant::now();
        round += 1;

        let signals = scan::scan_markets(&client, &markets).await;
        let best = scan::select_best(&signals);

        match best {
            Some(best) => {
                info!(
                    round,
                    scanned = signals.len(),
                    market = %best.market.market_slug,
                    sum = ?best.sum,
                    state = %best.sum_state,
                    "best opportunity"
                );
                if config.pretty {
                    output::print_best_opportunity(best);
                }
            }
            None => info!(round, scanned = signals.len(), "no opportunity this round"),
        }

        if let Some(writer) = &writer {
            match writer.append_round(round, &signals, best) {
                Ok(records) => info!(round, records, "appended round to jsonl"),
                Err(err) => warn!(error = %err, "failed to write jsonl output"),
            }
        }

        // Full-scan alerting is stateless by design: every qualifying
        // round fires, with no cooldown and no memory between rounds.
        if let (Some(threshold), Some(best)) = (config.alert_sum_threshold, best) {
            match best.sum {
                Some(sum) if sum < threshold => match &notifier {
                    Some(notifier) => {
                        info!(sum = %sum, threshold = %threshold, "sum alert triggered");
                        notifier.send(&alert::format_scan_alert(best)).await;
                    }
                    None => warn!("sum alert threshold met but telegram is not configured"),
                },
                Some(sum) => debug!(sum = %sum, threshold = %threshold, "sum alert skipped"),
                None => {}
            }
        }

        if config.once {
            break;
        }
        sleep_remaining(started, config.interval).await;
    }

    Ok(())
}

/// Watch one market's best bid against a threshold, with cooldown-gated alerts.
async fn cmd_watch(args: WatchArgs) -> anyhow::Result<()> {
    let telegram = TelegramConfig::load()?
        .with_overrides(args.common.tg_token.clone(), args.common.tg_chat_id.clone());

    let config = WatchConfig {
        index: args.index,
        side: args.side,
        trigger_price: args.trigger_price,
        op: args.trigger_op,
        cooldown: Duration::from_secs(args.cooldown),
        interval: Duration::from_secs(args.common.interval),
        once: args.common.once,
        pretty: args.common.pretty,
        max_markets: args.common.max_markets,
        telegram,
    };
    config.validate()?;

    let client = BookClient::new();
    let mut markets = market::discover_markets(client.http(), config.max_markets).await?;
    if markets.is_empty() {
        return Err(MarketError::NoMarketsFound.into());
    }
    market::sort_markets(&mut markets);

    let target = markets
        .get(config.index)
        .cloned()
        .ok_or(ConfigError::InvalidWatchIndex {
            index: config.index,
            count: markets.len(),
        })?;

    info!("========================================");
    info!("WATCH MODE STARTED");
    info!("Market:  {}", target.title);
    info!("ID:      {}", target.market_slug);
    info!("Side:    {}", config.side);
    info!("Trigger: BUY1 {} {}", config.op, config.trigger_price);
    info!("Cooldown: {}s", config.cooldown.as_secs());
    info!("========================================");

    let token_id = target.token_id(config.side).to_string();
    let cooldown_secs = i64::try_from(config.cooldown.as_secs()).unwrap_or(i64::MAX);
    let trigger = WatchTrigger::new(
        config.op,
        config.trigger_price,
        time::Duration::seconds(cooldown_secs),
    );
    let mut state = WatchState::new();
    let notifier = TelegramNotifier::from_config(&config.telegram);
    let clock_format = time::macros::format_description!("[hour]:[minute]:[second]");

    loop {
        let started = Instant::now();
        let now = OffsetDateTime::now_utc();

        let bid = match client.get_order_book(&token_id).await {
            Ok(book) => aggregate_bids(&book.bids).best(),
            Err(err) => {
                warn!(error = %err, "book fetch failed, treating side as empty this round");
                BestQuote::empty()
            }
        };

        let outcome = trigger.evaluate(&mut state, bid.price, now);
        let observation = WatchObservation { bid, outcome };

        let timestamp = now.format(&clock_format).unwrap_or_default();
        let row = output::format_watch_row(&timestamp, &observation, config.trigger_price);
        if config.pretty {
            println!("{}", row);
        } else {
            info!("{}", row);
        }

        if outcome.condition_held() && !outcome.should_alert() {
            debug!("condition holds but alert is withheld by cooldown");
        }

        if outcome.should_alert() {
            // Triggered implies a quoted bid; an empty side never triggers.
            if let (Some(notifier), Some(price)) = (&notifier, bid.price) {
                let msg = alert::format_watch_alert(
                    &target,
                    config.side,
                    price,
                    config.op,
                    config.trigger_price,
                    observation.notional_usd(),
                );
                notifier.send(&msg).await;
            } else {
                warn!("trigger fired but telegram is not configured");
            }
        }

        if config.once {
            break;
        }
        sleep_remaining(started, config.interval).await;
    }

    Ok(())
}

/// List discovered markets with their stable watch indices.
async fn cmd_list_markets(max_markets: Option<usize>) -> anyhow::Result<()> {
    let client = BookClient::new();
    let mut markets = market::discover_markets(client.http(), max_markets).await?;
    if markets.is_empty() {
        error!("no markets found");
        return Err(MarketError::NoMarketsFound.into());
    }
    market::sort_markets(&mut markets);

    output::print_market_list(&markets);
    Ok(())
}

/// Send a test Telegram message with the configured credentials.
async fn cmd_test_telegram(
    tg_token: Option<String>,
    tg_chat_id: Option<String>,
) -> anyhow::Result<()> {
    let telegram = TelegramConfig::load()?.with_overrides(tg_token, tg_chat_id);
    println!("TG_BOT_TOKEN detected: {}", telegram.tg_bot_token.is_some());
    println!("TG_CHAT_ID detected: {}", telegram.tg_chat_id.is_some());

    let Some(notifier) = TelegramNotifier::from_config(&telegram) else {
        error!("cannot run test: missing TG_BOT_TOKEN or TG_CHAT_ID");
        anyhow::bail!("telegram credentials missing");
    };

    info!("sending test message to telegram...");
    notifier
        .try_send("probable-book telegram test message")
        .await?;
    println!("Test message sent.");
    Ok(())
}

/// Sleep out the remainder of the polling interval.
async fn sleep_remaining(started: Instant, interval: Duration) {
    if let Some(remaining) = interval.checked_sub(started.elapsed()) {
        debug!(seconds = remaining.as_secs_f64(), "sleeping until next round");
        tokio::time::sleep(remaining).await;
    }
}
