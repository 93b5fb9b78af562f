//! Utility functions for Wi-Fi data conversion and display.
//!
//! Provides helpers for converting between Wi-Fi data representations:
//! frequency to channel, signal strength to visual bars, SSID bytes to strings.
//! Also holds the stable-id sequencing rule.

use log::warn;
use std::borrow::Cow;
use zbus::Connection;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::AccessPointInfo;
use crate::dbus::NMAccessPointProxy;
use crate::types::constants::{frequency, signal_strength, wifi_mode};
use crate::types::flags::{ApFlags, ApSecurityFlags};

/// Converts a Wi-Fi frequency in MHz to a channel number.
///
/// Supports 2.4GHz (channels 1-14), 5GHz, and 6GHz bands.
/// Returns `None` for frequencies outside known Wi-Fi bands.
pub(crate) fn channel_from_freq(mhz: u32) -> Option<u16> {
    match mhz {
        frequency::BAND_2_4_START..=frequency::BAND_2_4_END => {
            Some(((mhz - frequency::BAND_2_4_START) / frequency::CHANNEL_SPACING + 1) as u16)
        }
        frequency::BAND_2_4_CH14 => Some(14),
        frequency::BAND_5_START..=frequency::BAND_5_END => {
            Some(((mhz - 5000) / frequency::CHANNEL_SPACING) as u16)
        }
        frequency::BAND_6_START..=frequency::BAND_6_END => {
            Some(((mhz - frequency::BAND_6_START) / frequency::CHANNEL_SPACING + 1) as u16)
        }
        _ => None,
    }
}

/// Converts signal strength (0-100) to a visual bar representation.
///
/// Returns a 4-character string using Unicode block characters:
/// - 0-5:    `____`
/// - 6-30:   `▂___`
/// - 31-55:  `▂▄__`
/// - 56-80:  `▂▄▆_`
/// - 81-100: `▂▄▆█`
pub(crate) fn bars_from_strength(s: u8) -> &'static str {
    if s > signal_strength::BAR_4_ABOVE {
        "▂▄▆█"
    } else if s > signal_strength::BAR_3_ABOVE {
        "▂▄▆_"
    } else if s > signal_strength::BAR_2_ABOVE {
        "▂▄__"
    } else if s > signal_strength::BAR_1_ABOVE {
        "▂___"
    } else {
        "____"
    }
}

/// Converts a Wi-Fi mode code to its display label.
///
/// Mode codes: 1 = Ad-hoc, 2 = Infrastructure, 3 = Access Point.
pub(crate) fn mode_to_string(m: u32) -> &'static str {
    match m {
        wifi_mode::INFRA => "INFRA",
        wifi_mode::ADHOC => "ADHOC",
        wifi_mode::AP => "AP",
        _ => "UNKNOWN",
    }
}

/// Decodes SSID bytes as UTF-8.
///
/// Invalid sequences are replaced with U+FFFD rather than mapping bytes to
/// code points one by one, which would mangle every non-ASCII SSID.
pub(crate) fn decode_ssid(bytes: &[u8]) -> Cow<'_, str> {
    let decoded = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = decoded {
        warn!("SSID {bytes:02x?} is not valid UTF-8, using replacement characters");
    }
    decoded
}

/// Reads every property of one access point.
pub(crate) async fn read_access_point(
    conn: &Connection,
    path: OwnedObjectPath,
) -> Result<AccessPointInfo> {
    let ap = NMAccessPointProxy::builder(conn).path(path)?.build().await?;

    Ok(AccessPointInfo {
        ssid_bytes: ap.ssid().await?,
        bssid: ap.hw_address().await?,
        frequency: ap.frequency().await?,
        mode: ap.mode().await?,
        flags: ApFlags::from_bits_retain(ap.flags().await?),
        wpa_flags: ApSecurityFlags::from_bits_retain(ap.wpa_flags().await?),
        rsn_flags: ApSecurityFlags::from_bits_retain(ap.rsn_flags().await?),
        strength: ap.strength().await?,
    })
}

/// Adds one to a string of ASCII decimal digits.
///
/// Leading zeros are dropped, so `"007"` becomes `"8"`. Works on any length.
fn increment_decimal(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut out: Vec<u8> = trimmed.bytes().collect();

    let mut i = out.len();
    loop {
        if i == 0 {
            out.insert(0, b'1');
            break;
        }
        i -= 1;
        if out[i] == b'9' {
            out[i] = b'0';
        } else {
            out[i] += 1;
            break;
        }
    }

    out.into_iter().map(char::from).collect()
}

/// Computes the next stable-id in the `<prefix>-<n>` sequence.
///
/// If `current` ends in `-` followed by one or more ASCII digits (and the
/// prefix holds no line break), the number is incremented and the prefix
/// kept. Anything else gets `-1` appended. Never fails.
pub fn next_stable_id(current: &str) -> String {
    if let Some((prefix, digits)) = current.rsplit_once('-')
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !prefix.contains('\n')
    {
        return format!("{prefix}-{}", increment_decimal(digits));
    }

    format!("{current}-1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_freq_2_4ghz() {
        assert_eq!(channel_from_freq(2412), Some(1));
        assert_eq!(channel_from_freq(2437), Some(6));
        assert_eq!(channel_from_freq(2472), Some(13));
        assert_eq!(channel_from_freq(2484), Some(14));
    }

    #[test]
    fn test_channel_from_freq_5ghz() {
        assert_eq!(channel_from_freq(5180), Some(36));
        assert_eq!(channel_from_freq(5220), Some(44));
        assert_eq!(channel_from_freq(5500), Some(100));
    }

    #[test]
    fn test_channel_from_freq_6ghz() {
        assert_eq!(channel_from_freq(5955), Some(1));
        assert_eq!(channel_from_freq(6115), Some(33));
    }

    #[test]
    fn test_channel_from_freq_invalid() {
        assert_eq!(channel_from_freq(1000), None);
        assert_eq!(channel_from_freq(9999), None);
    }

    #[test]
    fn test_bars_from_strength() {
        assert_eq!(bars_from_strength(0), "____");
        assert_eq!(bars_from_strength(5), "____");
        assert_eq!(bars_from_strength(6), "▂___");
        assert_eq!(bars_from_strength(30), "▂___");
        assert_eq!(bars_from_strength(31), "▂▄__");
        assert_eq!(bars_from_strength(55), "▂▄__");
        assert_eq!(bars_from_strength(56), "▂▄▆_");
        assert_eq!(bars_from_strength(80), "▂▄▆_");
        assert_eq!(bars_from_strength(81), "▂▄▆█");
        assert_eq!(bars_from_strength(100), "▂▄▆█");
    }

    #[test]
    fn test_mode_to_string() {
        assert_eq!(mode_to_string(1), "ADHOC");
        assert_eq!(mode_to_string(2), "INFRA");
        assert_eq!(mode_to_string(3), "AP");
        assert_eq!(mode_to_string(0), "UNKNOWN");
        assert_eq!(mode_to_string(99), "UNKNOWN");
    }

    #[test]
    fn test_decode_ssid() {
        assert_eq!(decode_ssid(b"MyNetwork"), "MyNetwork");
        assert_eq!(decode_ssid(b""), "");
        assert_eq!(decode_ssid("café".as_bytes()), "café");
        assert_eq!(decode_ssid(&[b'a', 0xff, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn test_increment_decimal() {
        assert_eq!(increment_decimal("0"), "1");
        assert_eq!(increment_decimal("9"), "10");
        assert_eq!(increment_decimal("199"), "200");
        assert_eq!(increment_decimal("007"), "8");
        assert_eq!(increment_decimal("000"), "1");
    }

    #[test]
    fn test_next_stable_id() {
        assert_eq!(next_stable_id("foo-3"), "foo-4");
        assert_eq!(next_stable_id("foo"), "foo-1");
        assert_eq!(next_stable_id("foo-bar-2"), "foo-bar-3");
        assert_eq!(next_stable_id(""), "-1");
    }

    #[test]
    fn test_next_stable_id_edges() {
        assert_eq!(next_stable_id("x-9"), "x-10");
        assert_eq!(next_stable_id("-5"), "-6");
        assert_eq!(next_stable_id("foo-"), "foo--1");
        assert_eq!(next_stable_id("foo-1a"), "foo-1a-1");
        assert_eq!(next_stable_id("foo-٣"), "foo-٣-1");
        assert_eq!(next_stable_id("a\nb-2"), "a\nb-2-1");
        assert_eq!(
            next_stable_id("a-99999999999999999999"),
            "a-100000000000000000000"
        );
    }
}
