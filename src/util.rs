use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

const DATABASE: &str = "HOSTCHECK_DATABASE";

pub const DEFAULT_DATABASE_PATH: &str = "./monitoring.db";

pub fn get_database_path() -> PathBuf {
    std::env::var(DATABASE).map_or(PathBuf::from(DEFAULT_DATABASE_PATH), PathBuf::from)
}

const DASHBOARD_ADDR: &str = "HOSTCHECK_DASHBOARD_ADDR";

const DEFAULT_DASHBOARD_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), 3000));

pub fn get_dashboard_addr() -> SocketAddr {
    let addr_from_env = std::env::var(DASHBOARD_ADDR);
    addr_from_env.map_or(DEFAULT_DASHBOARD_ADDR, |res| {
        res.parse().unwrap_or(DEFAULT_DASHBOARD_ADDR)
    })
}
