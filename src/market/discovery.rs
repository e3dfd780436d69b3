//! Market discovery against the Probable Markets events API.

use tracing::{debug, info, instrument, warn};
use url::Url;

use super::types::{EventData, EventMarketData, Market};
use crate::error::MarketError;

/// Events listing endpoint.
const DISCOVERY_API_URL: &str = "https://market-api.probable.markets/public/api/v1/events";

/// Web event page base URL.
const EVENT_PAGE_URL: &str = "https://probable.markets/event";

/// Page size for event pagination.
const PAGE_LIMIT: usize = 100;

/// Discover open Yes/No markets, paging through the events API.
///
/// Stops at a short page or once `max_markets` markets are collected.
/// A page failure after the first ends discovery with whatever was
/// collected so far; a failure on the first page is an error.
#[instrument(skip(client))]
pub async fn discover_markets(
    client: &reqwest::Client,
    max_markets: Option<usize>,
) -> Result<Vec<Market>, MarketError> {
    info!("starting market discovery");
    let mut markets: Vec<Market> = Vec::new();
    let mut offset = 0usize;

    loop {
        if max_markets.is_some_and(|cap| markets.len() >= cap) {
            break;
        }

        debug!(offset, limit = PAGE_LIMIT, "fetching events page");
        let events = match fetch_event_page(client, offset).await {
            Ok(events) => events,
            Err(err) if offset == 0 => return Err(err),
            Err(err) => {
                warn!(offset, error = %err, "events page failed, stopping discovery");
                break;
            }
        };

        if events.is_empty() {
            debug!("no more events returned");
            break;
        }
        let page_len = events.len();

        for event in &events {
            if max_markets.is_some_and(|cap| markets.len() >= cap) {
                break;
            }
            for market_data in &event.markets {
                if let Some(market) = parse_market(event, market_data) {
                    markets.push(market);
                }
            }
        }

        // A short page means the listing is exhausted.
        if page_len < PAGE_LIMIT {
            break;
        }
        offset += PAGE_LIMIT;
    }

    if let Some(cap) = max_markets {
        markets.truncate(cap);
    }

    info!(count = markets.len(), "market discovery finished");
    Ok(markets)
}

/// Fetch one page of events from the discovery API.
async fn fetch_event_page(
    client: &reqwest::Client,
    offset: usize,
) -> Result<Vec<EventData>, MarketError> {
    let url = Url::parse_with_params(
        DISCOVERY_API_URL,
        &[
            ("closed", "false"),
            ("related_tags", "true"),
            ("sort", "volume"),
            ("order", "desc"),
            ("limit", &PAGE_LIMIT.to_string()),
            ("offset", &offset.to_string()),
        ],
    )
    .map_err(|e| MarketError::ParseError(format!("invalid discovery URL: {}", e)))?;

    let response = client
        .get(url)
        .header("User-Agent", "Mozilla/5.0")
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(MarketError::FetchFailed {
            what: format!("events page at offset {}", offset),
            reason: format!("HTTP {}", response.status()),
        });
    }

    response
        .json()
        .await
        .map_err(|e| MarketError::ParseError(format!("failed to parse events page: {}", e)))
}

/// Build a [`Market`] from one raw event market, or skip it.
///
/// Markets are skipped when closed, when token IDs or outcomes are
/// missing or malformed, or when there are not exactly two of each.
fn parse_market(event: &EventData, data: &EventMarketData) -> Option<Market> {
    if data.closed == Some(true) {
        return None;
    }

    let token_ids: Vec<String> = serde_json::from_str(data.clob_token_ids.as_deref()?).ok()?;
    let outcomes: Vec<String> = serde_json::from_str(data.outcomes.as_deref()?).ok()?;
    if token_ids.len() != 2 || outcomes.len() != 2 {
        return None;
    }

    // Map the "yes"-labelled outcome to the Yes token. Markets without a
    // literal Yes/No pair (e.g. "A" vs "B") treat index 0 as Yes for display.
    let (yes_idx, no_idx) = if outcomes[0].eq_ignore_ascii_case("yes") {
        (0, 1)
    } else if outcomes[1].eq_ignore_ascii_case("yes") {
        (1, 0)
    } else {
        (0, 1)
    };

    let event_slug = event.slug.clone().unwrap_or_default();
    Some(Market {
        title: event.title.clone().unwrap_or_default(),
        url: format!("{}/{}", EVENT_PAGE_URL, event_slug),
        event_slug,
        market_slug: data
            .market_slug
            .clone()
            .unwrap_or_else(|| "unknown-slug".to_string()),
        yes_token_id: token_ids[yes_idx].clone(),
        no_token_id: token_ids[no_idx].clone(),
        yes_outcome: outcomes[yes_idx].clone(),
        no_outcome: outcomes[no_idx].clone(),
    })
}

/// Sort markets by (title, market slug) so watch indices stay stable
/// across runs.
pub fn sort_markets(markets: &mut [Market]) {
    markets.sort_by(|a, b| {
        (&a.title, &a.market_slug).cmp(&(&b.title, &b.market_slug))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_market(outcomes: &str, token_ids: &str) -> (EventData, EventMarketData) {
        let market = EventMarketData {
            market_slug: Some("rain-tomorrow".to_string()),
            clob_token_ids: Some(token_ids.to_string()),
            outcomes: Some(outcomes.to_string()),
            closed: Some(false),
        };
        let event = EventData {
            title: Some("Will it rain?".to_string()),
            slug: Some("will-it-rain".to_string()),
            markets: vec![market.clone()],
        };
        (event, market)
    }

    #[test]
    fn parse_market_maps_yes_label_to_yes_token() {
        let (event, market) = event_with_market(r#"["No","Yes"]"#, r#"["tok-no","tok-yes"]"#);

        let parsed = parse_market(&event, &market).unwrap();

        assert_eq!(parsed.yes_token_id, "tok-yes");
        assert_eq!(parsed.no_token_id, "tok-no");
        assert_eq!(parsed.yes_outcome, "Yes");
        assert_eq!(parsed.no_outcome, "No");
        assert_eq!(parsed.url, "https://probable.markets/event/will-it-rain");
    }

    #[test]
    fn parse_market_falls_back_to_positional_order() {
        let (event, market) = event_with_market(r#"["Chiefs","Eagles"]"#, r#"["tok-a","tok-b"]"#);

        let parsed = parse_market(&event, &market).unwrap();

        assert_eq!(parsed.yes_token_id, "tok-a");
        assert_eq!(parsed.yes_outcome, "Chiefs");
        assert_eq!(parsed.no_outcome, "Eagles");
    }

    #[test]
    fn parse_market_skips_malformed_entries() {
        let (event, closed) = event_with_market(r#"["Yes","No"]"#, r#"["a","b"]"#);
        let closed = EventMarketData {
            closed: Some(true),
            ..closed
        };
        assert!(parse_market(&event, &closed).is_none());

        let (event, three_tokens) = event_with_market(r#"["Yes","No"]"#, r#"["a","b","c"]"#);
        assert!(parse_market(&event, &three_tokens).is_none());

        let (event, bad_json) = event_with_market("not-json", r#"["a","b"]"#);
        assert!(parse_market(&event, &bad_json).is_none());

        let (event, missing) = event_with_market(r#"["Yes","No"]"#, r#"["a","b"]"#);
        let missing = EventMarketData {
            clob_token_ids: None,
            ..missing
        };
        assert!(parse_market(&event, &missing).is_none());
    }

    #[test]
    fn sort_markets_is_deterministic_by_title_then_slug() {
        let mk = |title: &str, slug: &str| Market {
            title: title.to_string(),
            event_slug: String::new(),
            market_slug: slug.to_string(),
            url: String::new(),
            yes_token_id: String::new(),
            no_token_id: String::new(),
            yes_outcome: "Yes".to_string(),
            no_outcome: "No".to_string(),
        };

        let mut markets = vec![mk("B", "x"), mk("A", "z"), mk("A", "a")];
        sort_markets(&mut markets);

        let order: Vec<(&str, &str)> = markets
            .iter()
            .map(|m| (m.title.as_str(), m.market_slug.as_str()))
            .collect();
        assert_eq!(order, vec![("A", "a"), ("A", "z"), ("B", "x")]);
    }
}
