use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use clap::Parser;

/// A personal to-do list: JSON API plus an htmx page, in one process.
#[derive(Debug, Clone, Parser)]
#[command(name = "mortodo", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:5000")]
    pub addr: SocketAddr,

    /// Directory of the sled database
    #[arg(long, default_value = "db")]
    pub db_path: String,

    /// Keep todos in memory only; nothing survives a restart
    #[arg(long)]
    pub in_memory: bool,

    /// Base URL the page uses to reach the todo API [default: this server]
    #[arg(long)]
    pub api_url: Option<String>,
}

impl Config {
    /// The explicit `--api-url`, or this server's own listen address.
    /// A wildcard address is reached through loopback.
    pub fn api_url(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.clone();
        }
        let ip = match self.addr.ip() {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };
        format!("http://{}", SocketAddr::new(ip, self.addr.port()))
    }
}
