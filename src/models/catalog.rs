//! Notable IPv4 ranges and classful labels.

use super::ipv4::serialize_address;
use serde::Serialize;
use std::fmt;

/// Broad kind of a catalogued range.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AddressCategory {
    Public,
    Private,
    SpecialUse,
    Documentation,
    Loopback,
    LinkLocal,
    Multicast,
    Reserved,
    Broadcast,
}

/// A notable address range, both ends inclusive.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AddressRange {
    pub id: &'static str,
    #[serde(serialize_with = "serialize_address")]
    pub start: u32,
    #[serde(serialize_with = "serialize_address")]
    pub end: u32,
    pub label: &'static str,
    pub category: AddressCategory,
    /// Well-known service using the range, if any.
    pub service: Option<&'static str>,
}

impl AddressRange {
    pub fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr <= self.end
    }
}

const fn octets(a: u8, b: u8, c: u8, d: u8) -> u32 {
    u32::from_be_bytes([a, b, c, d])
}

const fn range(
    id: &'static str,
    start: u32,
    end: u32,
    label: &'static str,
    category: AddressCategory,
    service: Option<&'static str>,
) -> AddressRange {
    AddressRange {
        id,
        start,
        end,
        label,
        category,
        service,
    }
}

/// Returned for addresses outside every catalogued range.
pub const PUBLIC: AddressRange = range(
    "public",
    0,
    u32::MAX,
    "Public",
    AddressCategory::Public,
    None,
);

use AddressCategory::*;

/// Catalogue of notable ranges. Lookup takes the first match, so single
/// multicast services come before the blocks that contain them.
pub static IPV4_ADDRESS_CATALOG: &[AddressRange] = &[
    range("private-a", octets(10, 0, 0, 0), octets(10, 255, 255, 255), "Private (RFC1918)", Private, None),
    range("private-b", octets(172, 16, 0, 0), octets(172, 31, 255, 255), "Private (RFC1918)", Private, None),
    range("private-c", octets(192, 168, 0, 0), octets(192, 168, 255, 255), "Private (RFC1918)", Private, None),
    range("cgnat", octets(100, 64, 0, 0), octets(100, 127, 255, 255), "Carrier-Grade NAT (RFC6598)", SpecialUse, None),
    range("doc-net-1", octets(192, 0, 2, 0), octets(192, 0, 2, 255), "Documentation (TEST-NET-1)", Documentation, None),
    range("doc-net-2", octets(198, 51, 100, 0), octets(198, 51, 100, 255), "Documentation (TEST-NET-2)", Documentation, None),
    range("doc-net-3", octets(203, 0, 113, 0), octets(203, 0, 113, 255), "Documentation (TEST-NET-3)", Documentation, None),
    range("loopback", octets(127, 0, 0, 0), octets(127, 255, 255, 255), "Loopback", Loopback, None),
    range("link-local", octets(169, 254, 0, 0), octets(169, 254, 255, 255), "Link-Local (APIPA)", LinkLocal, None),
    range("multicast-all-systems", octets(224, 0, 0, 1), octets(224, 0, 0, 1), "Multicast", Multicast, Some("All systems on this subnet")),
    range("multicast-all-routers", octets(224, 0, 0, 2), octets(224, 0, 0, 2), "Multicast", Multicast, Some("All routers on this subnet")),
    range("multicast-ospf-routers", octets(224, 0, 0, 5), octets(224, 0, 0, 6), "Multicast", Multicast, Some("OSPF designated routers")),
    range("multicast-ripv2", octets(224, 0, 0, 9), octets(224, 0, 0, 9), "Multicast", Multicast, Some("RIPv2 routers")),
    range("multicast-eigrp", octets(224, 0, 0, 10), octets(224, 0, 0, 10), "Multicast", Multicast, Some("EIGRP routers")),
    range("multicast-mdns", octets(224, 0, 0, 251), octets(224, 0, 0, 251), "Multicast", Multicast, Some("Multicast DNS (mDNS)")),
    range("multicast-dns-sd", octets(224, 0, 0, 252), octets(224, 0, 0, 252), "Multicast", Multicast, Some("DNS Service Discovery")),
    range("multicast-local-control", octets(224, 0, 0, 0), octets(224, 0, 0, 255), "Multicast", Multicast, Some("Local network control block (RFC 5771)")),
    range("multicast-internet-control", octets(224, 0, 1, 0), octets(224, 0, 1, 255), "Multicast", Multicast, Some("Internetwork control block (RFC 5771)")),
    range("multicast-global", octets(224, 1, 0, 0), octets(238, 255, 255, 255), "Multicast", Multicast, Some("Globally scoped multicast range")),
    range("multicast-administratively-scoped", octets(239, 0, 0, 0), octets(239, 255, 255, 255), "Multicast", Multicast, Some("Administratively scoped multicast")),
    range("reserved", octets(240, 0, 0, 0), octets(255, 255, 255, 254), "Reserved", Reserved, None),
    range("limited-broadcast", octets(255, 255, 255, 255), octets(255, 255, 255, 255), "Broadcast", Broadcast, None),
];

/// Look up the catalogue entry for an address, [`PUBLIC`] when none matches.
pub fn classify(addr: u32) -> AddressRange {
    IPV4_ADDRESS_CATALOG
        .iter()
        .find(|entry| entry.contains(addr))
        .copied()
        .unwrap_or(PUBLIC)
}

/// Classful label derived from the first octet.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Ipv4Class {
    A,
    B,
    C,
    D,
    E,
}

pub fn address_class(addr: u32) -> Ipv4Class {
    match addr >> 24 {
        0..=127 => Ipv4Class::A,
        128..=191 => Ipv4Class::B,
        192..=223 => Ipv4Class::C,
        224..=239 => Ipv4Class::D,
        _ => Ipv4Class::E,
    }
}

impl fmt::Display for Ipv4Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Ipv4Class::A => "Class A",
            Ipv4Class::B => "Class B",
            Ipv4Class::C => "Class C",
            Ipv4Class::D => "Class D (Multicast)",
            Ipv4Class::E => "Class E (Experimental)",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_address;

    fn lookup(text: &str) -> AddressRange {
        classify(parse_address(text).unwrap())
    }

    #[test]
    fn test_classify_private_and_public() {
        assert_eq!(lookup("10.1.2.3").id, "private-a");
        assert_eq!(lookup("172.31.255.255").id, "private-b");
        assert_eq!(lookup("172.32.0.0").category, AddressCategory::Public);
        assert_eq!(lookup("192.168.0.1").label, "Private (RFC1918)");
        assert_eq!(lookup("8.8.8.8"), PUBLIC);
        assert_eq!(lookup("100.64.0.1").category, AddressCategory::SpecialUse);
    }

    #[test]
    fn test_classify_multicast_services() {
        assert_eq!(lookup("224.0.0.5").id, "multicast-ospf-routers");
        assert_eq!(lookup("224.0.0.6").service, Some("OSPF designated routers"));
        assert_eq!(lookup("224.0.0.251").id, "multicast-mdns");
        assert_eq!(lookup("224.0.0.100").id, "multicast-local-control");
        assert_eq!(lookup("224.0.1.1").id, "multicast-internet-control");
        assert_eq!(lookup("239.1.1.1").id, "multicast-administratively-scoped");
    }

    #[test]
    fn test_classify_edges() {
        assert_eq!(lookup("255.255.255.255").category, AddressCategory::Broadcast);
        assert_eq!(lookup("255.255.255.254").category, AddressCategory::Reserved);
        assert_eq!(lookup("127.0.0.1").category, AddressCategory::Loopback);
        assert_eq!(lookup("169.254.10.10").category, AddressCategory::LinkLocal);
        assert_eq!(lookup("198.51.100.7").id, "doc-net-2");
    }

    #[test]
    fn test_address_class() {
        assert_eq!(address_class(parse_address("0.0.0.0").unwrap()), Ipv4Class::A);
        assert_eq!(address_class(parse_address("127.255.0.1").unwrap()), Ipv4Class::A);
        assert_eq!(address_class(parse_address("128.0.0.1").unwrap()), Ipv4Class::B);
        assert_eq!(address_class(parse_address("223.1.1.1").unwrap()), Ipv4Class::C);
        assert_eq!(address_class(parse_address("224.0.0.1").unwrap()), Ipv4Class::D);
        assert_eq!(address_class(parse_address("240.0.0.1").unwrap()), Ipv4Class::E);
        assert_eq!(Ipv4Class::D.to_string(), "Class D (Multicast)");
    }
}
