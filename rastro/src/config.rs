use std::path::PathBuf;

/// Default capacity of a write buffer in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 102_400;

/// Environment variable overriding the buffer capacity, in bytes.
pub const BUFFER_SIZE_ENV: &str = "RST_BUFFER_SIZE";

/// Settings used when a write buffer is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Capacity of the in-memory arena in bytes.
    pub capacity: usize,
    /// Directory the trace file is created in.
    pub directory: PathBuf,
    /// Host name recorded in the INIT record of the trace file.
    pub hostname: String,
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig {
            capacity: DEFAULT_BUFFER_SIZE,
            directory: PathBuf::from("."),
            hostname: "localhost".to_string(),
        }
    }
}

impl BufferConfig {
    /// The default configuration with the capacity taken from
    /// `RST_BUFFER_SIZE` and the host name from `HOSTNAME`, when set.
    pub fn from_env() -> Self {
        let capacity = parse_capacity(std::env::var(BUFFER_SIZE_ENV).ok().as_deref());
        let hostname = std::env::var("HOSTNAME")
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "localhost".to_string());

        BufferConfig {
            capacity,
            hostname,
            ..BufferConfig::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_hostname<S: Into<String>>(mut self, hostname: S) -> Self {
        self.hostname = hostname.into();
        self
    }
}

/// Interprets the value of `RST_BUFFER_SIZE`. Anything that is not a
/// positive number of bytes falls back to the default.
pub fn parse_capacity(value: Option<&str>) -> usize {
    let value = match value {
        Some(value) => value,
        None => return DEFAULT_BUFFER_SIZE,
    };

    match value.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => capacity,
        _ => {
            really_warn!(
                "could not read {}={:?}, using default value: {}",
                BUFFER_SIZE_ENV, value, DEFAULT_BUFFER_SIZE
            );
            DEFAULT_BUFFER_SIZE
        }
    }
}
