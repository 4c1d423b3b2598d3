use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::{Tz, US::Eastern};
use regex::Regex;

use super::{HandParseError, Stakes};

static STAKES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([$€£]?(\d+(?:\.\d+)?)/[$€£]?(\d+(?:\.\d+)?) ([A-Z]{3})\)").expect("stakes regex")
});

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Everything the first line of a hand tells us.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub hand_no: u64,
    pub game: String,
    pub stakes: Stakes,
    pub timestamp: DateTime<Tz>,
}

/// Parse a header line such as
///
/// ```text
/// PokerStars Hand #208155133012:  Hold'em No Limit ($0.05/$0.10 USD) - 2020/01/19 18:51:10 CET [2020/01/19 12:51:10 ET]
/// ```
///
/// Time stamps are always read as US Eastern local time. When the site
/// prints the time in two zones the bracketed ET time is the one used.
pub fn parse_header(line: &str) -> Result<Header, HandParseError> {
    let hash = line.find('#').ok_or(HandParseError::IncompleteHeader("hand number"))?;
    let colon = line.find(':').ok_or(HandParseError::IncompleteHeader("hand number"))?;
    let hand_no = line
        .get(hash + 1..colon)
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or(HandParseError::IncompleteHeader("hand number"))?;

    let paren = line.find('(').ok_or(HandParseError::IncompleteHeader("game"))?;
    let game = line
        .get(colon + 1..paren)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .ok_or(HandParseError::IncompleteHeader("game"))?
        .to_string();

    let caps = STAKES
        .captures(line)
        .ok_or(HandParseError::IncompleteHeader("stakes"))?;
    let blind = |idx: usize| -> Result<f64, HandParseError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or(HandParseError::IncompleteHeader("stakes"))
    };
    let stakes = Stakes {
        small_blind: blind(1)?,
        big_blind: blind(2)?,
        currency: caps[3].to_string(),
    };

    let timestamp = parse_timestamp(line).ok_or(HandParseError::IncompleteHeader("timestamp"))?;

    Ok(Header {
        hand_no,
        game,
        stakes,
        timestamp,
    })
}

fn parse_timestamp(line: &str) -> Option<DateTime<Tz>> {
    let (_, rest) = line.rsplit_once(" - ")?;
    let local = match (rest.find('['), rest.rfind(']')) {
        (Some(open), Some(close)) if open < close => &rest[open + 1..close],
        _ => rest,
    };
    // Keep the date and the time, drop the zone abbreviation.
    let mut parts = local.split_whitespace();
    let stamp = format!("{} {}", parts.next()?, parts.next()?);
    let naive = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).ok()?;
    Eastern.from_local_datetime(&naive).earliest()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_dual_zone_header_uses_eastern() {
        let header = parse_header(
            "PokerStars Hand #208155133012:  Hold'em No Limit ($0.05/$0.10 USD) - 2020/01/19 18:51:10 CET [2020/01/19 12:51:10 ET]",
        )
        .unwrap();
        assert_eq!(header.hand_no, 208155133012);
        assert_eq!(header.game, "Hold'em No Limit");
        assert_eq!(header.stakes.small_blind, 0.05);
        assert_eq!(header.stakes.big_blind, 0.10);
        assert_eq!(header.stakes.currency, "USD");
        assert_eq!(header.timestamp.hour(), 12);
        assert_eq!(header.timestamp.minute(), 51);
        assert_eq!(header.timestamp.timezone(), Eastern);
        // January is standard time: five hours behind UTC.
        assert_eq!(header.timestamp.naive_utc().hour(), 17);
    }

    #[test]
    fn test_single_zone_header_with_short_hour() {
        let header = parse_header(
            "PokerStars Hand #300000000003:  Hold'em No Limit (€0.01/€0.02 EUR) - 2022/03/01 8:05:09 ET",
        )
        .unwrap();
        assert_eq!(header.stakes.currency, "EUR");
        assert_eq!(header.timestamp.day(), 1);
        assert_eq!(header.timestamp.hour(), 8);
    }

    #[test]
    fn test_missing_tokens() {
        assert_eq!(
            parse_header("PokerStars Hand #abc: Hold'em No Limit ($1/$2 USD) - 2020/01/01 1:00:00 ET"),
            Err(HandParseError::IncompleteHeader("hand number"))
        );
        assert_eq!(
            parse_header("PokerStars Hand #1: Hold'em No Limit ($1/$2) - 2020/01/01 1:00:00 ET"),
            Err(HandParseError::IncompleteHeader("stakes"))
        );
        assert_eq!(
            parse_header("PokerStars Hand #1: Hold'em No Limit ($1/$2 USD) - yesterday"),
            Err(HandParseError::IncompleteHeader("timestamp"))
        );
    }
}
