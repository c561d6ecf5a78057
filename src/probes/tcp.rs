// src/probes/tcp.rs
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

/// Blocking connect probe: resolves `address` and passes if any resolved
/// socket address accepts a connection within `connect_timeout`.
///
/// Registered as a sync check so it runs on the worker pool.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            address: address.into(),
            connect_timeout,
        }
    }

    pub fn check(&self) -> bool {
        let addrs = match self.address.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("TCP probe could not resolve {}: {}", self.address, e);
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(_) => return true,
                Err(e) => debug!("TCP probe {} ({}) failed: {}", self.address, addr, e),
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_probe_open_and_closed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let open = listener.local_addr().unwrap().to_string();
        assert!(TcpProbe::new(open, Duration::from_millis(500)).check());

        drop(listener);
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let closed_addr = closed.local_addr().unwrap().to_string();
        drop(closed);
        assert!(!TcpProbe::new(closed_addr, Duration::from_millis(500)).check());
    }
}
