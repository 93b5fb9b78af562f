//! NetworkManager flag types.

use bitflags::bitflags;

bitflags! {
    /// Access point capability flags (`NM80211ApFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ApFlags: u32 {
        /// Access point supports privacy/encryption.
        const PRIVACY = 0x0000_0001;
        /// Access point supports Wi-Fi Protected Setup.
        const WPS = 0x0000_0002;
        /// Access point supports push-button WPS.
        const WPS_PBC = 0x0000_0004;
        /// Access point supports PIN-based WPS.
        const WPS_PIN = 0x0000_0008;
    }

    /// Access point WPA/RSN security flags (`NM80211ApSecurityFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ApSecurityFlags: u32 {
        /// Pairwise 40-bit WEP encryption.
        const PAIR_WEP40 = 0x0000_0001;
        /// Pairwise 104-bit WEP encryption.
        const PAIR_WEP104 = 0x0000_0002;
        /// Pairwise TKIP encryption.
        const PAIR_TKIP = 0x0000_0004;
        /// Pairwise CCMP encryption.
        const PAIR_CCMP = 0x0000_0008;
        /// Group 40-bit WEP encryption.
        const GROUP_WEP40 = 0x0000_0010;
        /// Group 104-bit WEP encryption.
        const GROUP_WEP104 = 0x0000_0020;
        /// Group TKIP encryption.
        const GROUP_TKIP = 0x0000_0040;
        /// Group CCMP encryption.
        const GROUP_CCMP = 0x0000_0080;
        /// Pre-shared key authentication.
        const KEY_MGMT_PSK = 0x0000_0100;
        /// 802.1X authentication.
        const KEY_MGMT_802_1X = 0x0000_0200;
        /// Simultaneous Authentication of Equals.
        const KEY_MGMT_SAE = 0x0000_0400;
        /// Opportunistic Wireless Encryption.
        const KEY_MGMT_OWE = 0x0000_0800;
    }

    /// Flags accepted by `Settings.Connection.Update2` (`NMSettingsUpdate2Flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Update2Flags: u32 {
        /// Persist the change to disk.
        const TO_DISK = 0x0000_0001;
        /// Keep the change in memory only.
        const IN_MEMORY = 0x0000_0002;
        /// Detach the in-memory profile from its file on disk.
        const IN_MEMORY_DETACHED = 0x0000_0004;
        /// Only update in-memory configuration.
        const IN_MEMORY_ONLY = 0x0000_0008;
        /// Mark the profile as volatile.
        const VOLATILE = 0x0000_0010;
        /// Block autoconnect of the profile until it is activated manually.
        const BLOCK_AUTOCONNECT = 0x0000_0020;
        /// Don't reapply the profile to devices it is active on.
        const NO_REAPPLY = 0x0000_0040;
    }
}

/// Labels reported for each WPA/RSN security bit, in display order.
const SECURITY_LABELS: [(ApSecurityFlags, &str); 10] = [
    (ApSecurityFlags::PAIR_WEP40, "PAIR_WEP40"),
    (ApSecurityFlags::PAIR_WEP104, "PAIR_WEP104"),
    (ApSecurityFlags::PAIR_TKIP, "PAIR_TKIP"),
    (ApSecurityFlags::PAIR_CCMP, "PAIR_CCMP"),
    (ApSecurityFlags::GROUP_WEP40, "GROUP_WEP40"),
    (ApSecurityFlags::GROUP_WEP104, "GROUP_WEP104"),
    (ApSecurityFlags::GROUP_TKIP, "GROUP_TKIP"),
    (ApSecurityFlags::GROUP_CCMP, "GROUP_CCMP"),
    (ApSecurityFlags::KEY_MGMT_PSK, "KEY_MGMT_PSK"),
    (ApSecurityFlags::KEY_MGMT_802_1X, "KEY_MGMT_802_1X"),
];

impl ApFlags {
    /// `"PRIVACY"` when the privacy bit is set, `"NONE"` otherwise.
    pub fn label(self) -> &'static str {
        if self.contains(Self::PRIVACY) {
            "PRIVACY"
        } else {
            "NONE"
        }
    }
}

impl ApSecurityFlags {
    /// Space-separated labels of the ten cipher/key-management bits.
    ///
    /// Returns `"NONE"` when none of them are set. Bits outside the ten
    /// reported ones (SAE, OWE, ...) are ignored.
    pub fn labels(self) -> String {
        let labels: Vec<&str> = SECURITY_LABELS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect();

        if labels.is_empty() {
            "NONE".to_string()
        } else {
            labels.join(" ")
        }
    }
}

/// Summarizes an access point's security as `WEP`, `WPA1`, `WPA2`, `802.1X`.
///
/// - `WEP` only when privacy is set and both WPA and RSN flag sets are empty
/// - `WPA1` when the WPA flag set is non-empty
/// - `WPA2` when the RSN flag set is non-empty
/// - `802.1X` when either set advertises 802.1X key management
///
/// The parts always appear in that order; an open network yields `""`.
pub fn security_summary(flags: ApFlags, wpa: ApSecurityFlags, rsn: ApSecurityFlags) -> String {
    let mut parts = Vec::with_capacity(4);

    if flags.contains(ApFlags::PRIVACY) && wpa.is_empty() && rsn.is_empty() {
        parts.push("WEP");
    }
    if !wpa.is_empty() {
        parts.push("WPA1");
    }
    if !rsn.is_empty() {
        parts.push("WPA2");
    }
    if wpa.contains(ApSecurityFlags::KEY_MGMT_802_1X)
        || rsn.contains(ApSecurityFlags::KEY_MGMT_802_1X)
    {
        parts.push("802.1X");
    }

    parts.join(" ")
}
