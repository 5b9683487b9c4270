#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which transport delivers completion notices and admin reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    Smtp,
    SendGrid,
}

impl std::fmt::Display for EmailProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailProvider::Smtp => write!(f, "smtp"),
            EmailProvider::SendGrid => write!(f, "sendgrid"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Total attempts per page request, including the first one.
    pub scraper_max_attempts: u32,
    pub scraper_backoff_min_secs: u64,
    pub scraper_backoff_max_secs: u64,
    pub scraper_inter_request_delay_ms: u64,
    pub max_concurrent_sources: usize,
    /// Source names enabled for crawl runs, in registration order.
    pub sources: Vec<String>,
    pub naver_api_url: String,
    pub kakaopage_graphql_url: String,
    pub email_provider: EmailProvider,
    pub email_address: Option<String>,
    pub email_password: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub admin_email: Option<String>,
    pub crawl_cron: String,
    pub report_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_max_attempts", &self.scraper_max_attempts)
            .field("scraper_backoff_min_secs", &self.scraper_backoff_min_secs)
            .field("scraper_backoff_max_secs", &self.scraper_backoff_max_secs)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("max_concurrent_sources", &self.max_concurrent_sources)
            .field("sources", &self.sources)
            .field("naver_api_url", &self.naver_api_url)
            .field("kakaopage_graphql_url", &self.kakaopage_graphql_url)
            .field("email_provider", &self.email_provider)
            .field("email_address", &self.email_address)
            .field(
                "email_password",
                &self.email_password.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "sendgrid_api_key",
                &self.sendgrid_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("admin_email", &self.admin_email)
            .field("crawl_cron", &self.crawl_cron)
            .field("report_cron", &self.report_cron)
            .finish()
    }
}
