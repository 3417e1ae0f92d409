//! IANA protocol number to name resolution.
//!
//! Flow logs carry the transport protocol as a decimal IANA number, while the
//! lookup table names protocols by their keyword. Every protocol used as a
//! matching key goes through [`resolve_protocol`] so both sides meet in the
//! same lowercase form.
//!
//! Source: <https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml>

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Registered protocol numbers and their lowercase keywords.
pub const IANA_PROTOCOLS: &[(u8, &str)] = &[
    (0, "hopopt"),      // IPv6 Hop-by-Hop Option
    (1, "icmp"),        // Internet Control Message
    (2, "igmp"),        // Internet Group Management
    (3, "ggp"),         // Gateway-to-Gateway
    (4, "ipv4"),        // IPv4 encapsulation
    (5, "st"),          // Stream
    (6, "tcp"),         // Transmission Control
    (17, "udp"),        // User Datagram
    (41, "ipv6"),       // IPv6 encapsulation
    (43, "ipv6-route"), // Routing Header for IPv6
    (44, "ipv6-frag"),  // Fragment Header for IPv6
    (47, "gre"),        // Generic Routing Encapsulation
    (50, "esp"),        // Encap Security Payload
    (51, "ah"),         // Authentication Header
    (58, "ipv6-icmp"),  // ICMP for IPv6
    (89, "ospf"),       // OSPF IGP
    (103, "pim"),       // Protocol Independent Multicast
    (132, "sctp"),      // Stream Control Transmission
];

/// Decimal text form of each registered number, as it appears in flow logs.
static PROTOCOL_BY_TOKEN: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    IANA_PROTOCOLS
        .iter()
        .map(|(number, name)| (number.to_string(), *name))
        .collect()
});

/// Normalizes a protocol token to its canonical lowercase name.
///
/// A token that is exactly the decimal form of a registered number resolves
/// to that protocol's keyword (`"6"` → `"tcp"`). Anything else, including
/// unregistered numbers and zero-padded forms like `"06"`, is returned
/// lowercased.
pub fn resolve_protocol(token: &str) -> String {
    match PROTOCOL_BY_TOKEN.get(token) {
        Some(name) => (*name).to_string(),
        None => token.to_lowercase(),
    }
}
