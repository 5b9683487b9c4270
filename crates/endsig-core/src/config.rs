use crate::app_config::{AppConfig, EmailProvider, Environment};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";
pub const DEFAULT_NAVER_API_URL: &str = "https://comic.naver.com/api/webtoon/titlelist";
pub const DEFAULT_KAKAOPAGE_GRAPHQL_URL: &str = "https://page.kakao.com/graphql";
pub const DEFAULT_SOURCES: &str = "naver_webtoon,kakaopage";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("ENDSIG_ENV", "development"));
    let log_level = or_default("ENDSIG_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("ENDSIG_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("ENDSIG_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ENDSIG_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("ENDSIG_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("ENDSIG_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_max_attempts = parse_u32("ENDSIG_SCRAPER_MAX_ATTEMPTS", "3")?;
    if scraper_max_attempts == 0 {
        return Err(invalid(
            "ENDSIG_SCRAPER_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let scraper_backoff_min_secs = parse_u64("ENDSIG_SCRAPER_BACKOFF_MIN_SECS", "2")?;
    let scraper_backoff_max_secs = parse_u64("ENDSIG_SCRAPER_BACKOFF_MAX_SECS", "10")?;
    if scraper_backoff_max_secs < scraper_backoff_min_secs {
        return Err(invalid(
            "ENDSIG_SCRAPER_BACKOFF_MAX_SECS",
            format!("must be >= ENDSIG_SCRAPER_BACKOFF_MIN_SECS ({scraper_backoff_min_secs})"),
        ));
    }
    let scraper_inter_request_delay_ms =
        parse_u64("ENDSIG_SCRAPER_INTER_REQUEST_DELAY_MS", "100")?;
    let max_concurrent_sources = parse_usize("ENDSIG_MAX_CONCURRENT_SOURCES", "2")?;

    let sources = parse_sources(&or_default("ENDSIG_SOURCES", DEFAULT_SOURCES));
    if sources.is_empty() {
        return Err(invalid(
            "ENDSIG_SOURCES",
            "at least one source must be enabled".to_string(),
        ));
    }
    let naver_api_url = or_default("ENDSIG_NAVER_API_URL", DEFAULT_NAVER_API_URL);
    let kakaopage_graphql_url =
        or_default("ENDSIG_KAKAOPAGE_GRAPHQL_URL", DEFAULT_KAKAOPAGE_GRAPHQL_URL);

    let email_provider = parse_email_provider(&or_default("ENDSIG_EMAIL_PROVIDER", "smtp"))
        .ok_or_else(|| {
            invalid(
                "ENDSIG_EMAIL_PROVIDER",
                "expected `smtp` or `sendgrid`".to_string(),
            )
        })?;
    let email_address = optional("EMAIL_ADDRESS");
    let email_password = optional("EMAIL_PASSWORD");
    let sendgrid_api_key = optional("SENDGRID_API_KEY");
    let smtp_server = or_default("ENDSIG_SMTP_SERVER", "smtp.gmail.com");
    let smtp_port = parse_u16("ENDSIG_SMTP_PORT", "587")?;
    let admin_email = optional("ADMIN_EMAIL");

    let crawl_cron = or_default("ENDSIG_CRAWL_CRON", "0 0 3 * * *");
    let report_cron = or_default("ENDSIG_REPORT_CRON", "0 30 3 * * *");

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_attempts,
        scraper_backoff_min_secs,
        scraper_backoff_max_secs,
        scraper_inter_request_delay_ms,
        max_concurrent_sources,
        sources,
        naver_api_url,
        kakaopage_graphql_url,
        email_provider,
        email_address,
        email_password,
        sendgrid_api_key,
        smtp_server,
        smtp_port,
        admin_email,
        crawl_cron,
        report_cron,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_email_provider(s: &str) -> Option<EmailProvider> {
    match s.trim().to_ascii_lowercase().as_str() {
        "smtp" => Some(EmailProvider::Smtp),
        "sendgrid" => Some(EmailProvider::SendGrid),
        _ => None,
    }
}

/// Splits a comma-separated source list, dropping blanks and repeats while
/// keeping first-seen order.
fn parse_sources(raw: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !sources.iter().any(|s| s == name) {
            sources.push(name.to_string());
        }
    }
    sources
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
