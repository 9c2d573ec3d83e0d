use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;

#[derive(Debug, Deserialize)]
pub struct Http {
    /// **Environment variables**:
    /// - `PICTOGRAM_HTTP_ADDRESS`
    #[serde(default = "Http::default_address")]
    pub address: IpAddr,
    /// **Environment variables**:
    /// - `PICTOGRAM_HTTP_PORT`
    #[serde(default = "Http::default_port")]
    pub port: u16,
    /// Amount of actix-web workers serving requests.
    ///
    /// **Environment variables**:
    /// - `PICTOGRAM_HTTP_WORKERS`
    #[serde(default = "Http::default_workers")]
    pub workers: NonZeroUsize,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
            workers: Self::default_workers(),
        }
    }
}

impl Http {
    const DEFAULT_PORT: u16 = 3000;

    const fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    const fn default_workers() -> NonZeroUsize {
        NonZeroUsize::MIN
    }
}
