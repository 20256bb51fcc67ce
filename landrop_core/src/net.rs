use std::net::{IpAddr, Ipv4Addr};

/// Best routable IPv4 address of this host, preferring LAN ranges
/// (192.168.x.x, then 10.x.x.x, then 172.16-31.x.x).
///
/// The result is advisory, for display and for the discovery reply payload.
/// When nothing can be determined this falls back to 127.0.0.1 rather than
/// failing.
pub fn local_ipv4() -> Ipv4Addr {
    let Ok(interfaces) = local_ip_address::list_afinet_netifas() else {
        return Ipv4Addr::LOCALHOST;
    };

    let mut best: Option<(u8, Ipv4Addr)> = None;
    for (_name, ip) in interfaces {
        let IpAddr::V4(v4) = ip else { continue };
        if v4.is_loopback() {
            continue;
        }
        let rank = match v4.octets() {
            [192, 168, ..] => return v4,
            [10, ..] => 1,
            [172, b, ..] if (16..=31).contains(&b) => 2,
            _ => 3,
        };
        if best.is_none_or(|(r, _)| rank < r) {
            best = Some((rank, v4));
        }
    }

    best.map(|(_, ip)| ip).unwrap_or(Ipv4Addr::LOCALHOST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ipv4_is_a_plausible_host_address() {
        let ip = local_ipv4();
        assert!(!ip.is_unspecified());
        assert!(!ip.is_multicast());
        assert!(!ip.is_broadcast());
    }
}
