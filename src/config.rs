use log::warn;

pub const DEFAULT_SRV_ADDRESS: &str = "0.0.0.0:8080";

lazy_static::lazy_static! {
    /// Address the HTTP server binds to, from `SRV_ADDRESS`.
    pub static ref SRV_ADDRESS: String = std::env::var("SRV_ADDRESS").unwrap_or_else(|_| {
        warn!("SRV_ADDRESS env variable not set, using {}", DEFAULT_SRV_ADDRESS);
        DEFAULT_SRV_ADDRESS.to_string()
    });
}
