use campus_scheduler_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret expected in the `campus-api-key` header on trigger
    /// and admin routes
    pub api_secret_code: String,
    /// Port for the application to run on
    pub port: usize,
    pub scheduling: SchedulingConfig,
    pub reminders: ReminderConfig,
}

#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Minimum days of buffered future sessions a class must have before
    /// the generator skips it
    pub low_water_mark_days: usize,
    /// Number of calendar days appended per extension batch
    pub extension_length_days: usize,
    /// Lower bound on the rotation cycle, pads standalone playlists
    pub min_cycle_length: usize,
    /// Upper bound on the rotation cycle. This cap bounds how much of a
    /// long course is exposed per rotation.
    pub max_cycle_length: usize,
    /// Catalog positions before this ordinal produce free sessions
    pub free_threshold: usize,
    /// Seat limit applied to newly generated sessions, if any
    pub default_capacity: Option<i64>,
    /// How often the in-process extension job runs
    pub extension_job_interval_millis: u64,
}

#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Forward window the scanner inspects per run
    pub lookahead_horizon_millis: i64,
    /// Half-width of the window around each reminder offset. Must exceed
    /// the scan interval or reminders can be silently missed.
    pub tolerance_millis: i64,
    /// How often the in-process scan job runs
    pub scan_job_interval_millis: u64,
}

fn env_or_default(env_key: &str, default: usize) -> usize {
    let value = match std::env::var(env_key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<usize>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                env_key, value, default
            );
            default
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let api_secret_code = match std::env::var("API_SECRET_CODE") {
            Ok(code) => code,
            Err(_) => {
                info!("Did not find API_SECRET_CODE environment variable. Going to create one.");
                let code = create_random_secret(16);
                info!(
                    "Secret code for api and trigger routes was generated and set to: {}",
                    code
                );
                code
            }
        };
        let port = env_or_default("PORT", 5000);

        let scheduling = SchedulingConfig {
            low_water_mark_days: env_or_default("LOW_WATER_MARK_DAYS", 7),
            extension_length_days: env_or_default("EXTENSION_LENGTH_DAYS", 30),
            min_cycle_length: env_or_default("MIN_CYCLE_LENGTH", 1),
            max_cycle_length: env_or_default("MAX_CYCLE_LENGTH", 30),
            free_threshold: env_or_default("FREE_THRESHOLD", 2),
            default_capacity: std::env::var("DEFAULT_SESSION_CAPACITY")
                .ok()
                .and_then(|c| c.parse::<i64>().ok()),
            extension_job_interval_millis: 1000 * 60 * 60 * 6, // 6 hours
        };
        let reminders = ReminderConfig {
            lookahead_horizon_millis: 1000 * 60 * 60 * 25, // 25 hours
            tolerance_millis: 1000 * 60 * 5,               // 5 minutes
            scan_job_interval_millis: 1000 * 60,           // 1 minute
        };

        Self {
            api_secret_code,
            port,
            scheduling,
            reminders,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
