//! Internal utilities.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Bind an ephemeral UDP socket in the address family of `target`.
///
/// IPv6 sockets are created with `IPV6_V6ONLY = true`, so an IPv6 target
/// never receives IPv4-mapped traffic.
pub(crate) fn bind_ephemeral_udp_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, bind_addr) = if target.is_ipv6() {
        (Domain::IPV6, SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)))
    } else {
        (Domain::IPV4, SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if target.is_ipv6() {
        socket.set_only_v6(true)?;
    }

    // Set non-blocking before converting to tokio socket
    socket.set_nonblocking(true)?;
    socket.bind(&bind_addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Starting point for a client's request ids.
///
/// Random so that two clients talking to one agent from the same port range
/// are unlikely to collide. Falls back to the clock if the OS RNG is unavailable.
pub(crate) fn initial_request_id() -> i32 {
    let mut buf = [0u8; 4];
    let seed = match getrandom::fill(&mut buf) {
        Ok(()) => u32::from_ne_bytes(buf),
        Err(err) => {
            tracing::debug!(target: "snmpy::client", error = %err, "OS RNG unavailable, seeding request ids from clock");
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        }
    };
    positive_id(seed as i32)
}

/// Take the next request id from `counter`. Ids are always in `1..=i32::MAX`.
pub(crate) fn next_request_id(counter: &AtomicI32) -> i32 {
    loop {
        // 0 and i32::MIN both mask to 0; skip them rather than repeat 1
        let id = counter.fetch_add(1, Ordering::Relaxed) & i32::MAX;
        if id != 0 {
            return id;
        }
    }
}

fn positive_id(raw: i32) -> i32 {
    match raw & i32::MAX {
        0 => 1,
        id => id,
    }
}
