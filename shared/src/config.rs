use dotenv::dotenv;

pub struct Config {
    pub influxdb_server: String,
    pub influxdb_port: u16,
    pub influxdb_user: Option<String>,
    pub influxdb_password: Option<String>,
    pub coinbase_api_url: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            influxdb_server: std::env::var("INFLUXDB_SERVER")
                .unwrap_or_else(|_| "localhost".to_string()),
            influxdb_port: std::env::var("INFLUXDB_PORT")
                .unwrap_or_else(|_| "8086".to_string())
                .parse()?,
            influxdb_user: std::env::var("INFLUXDB_USER").ok().filter(|s| !s.is_empty()),
            influxdb_password: std::env::var("INFLUXDB_PWD").ok().filter(|s| !s.is_empty()),
            coinbase_api_url: std::env::var("COINBASE_API_URL")
                .unwrap_or_else(|_| "https://api.exchange.coinbase.com".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
        })
    }

    /// Base URL of the InfluxDB HTTP API
    pub fn influxdb_url(&self) -> String {
        let server = self.influxdb_server.trim_end_matches('/');
        if server.starts_with("http://") || server.starts_with("https://") {
            format!("{}:{}", server, self.influxdb_port)
        } else {
            format!("http://{}:{}", server, self.influxdb_port)
        }
    }
}
