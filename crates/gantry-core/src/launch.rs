use crate::config::ServeConfig;

/// Environment contract for the launched process: stdout/stderr must not be
/// buffered, so logs are observable in real time.
pub const UNBUFFERED_ENV: (&str, &str) = ("PYTHONUNBUFFERED", "1");

/// The fixed tuple read once by the entry process at startup: bind host,
/// bind port, entry point reference, and log verbosity.
///
/// [`LaunchDescriptor::argv`] is an external compatibility surface — with
/// defaults it is exactly
/// `uvicorn app:app --host 0.0.0.0 --port 8000 --log-level info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDescriptor {
    pub host: String,
    pub port: u16,
    pub entry: String,
    pub log_level: String,
}

impl LaunchDescriptor {
    /// Build the descriptor from the `[serve]` config section, validating
    /// the entry point shape.
    pub fn from_serve(serve: &ServeConfig) -> crate::Result<Self> {
        validate_entry(&serve.entry)?;
        Ok(Self {
            host: serve.host.clone(),
            port: serve.port,
            entry: serve.entry.clone(),
            log_level: serve.log_level.clone(),
        })
    }

    /// The exact process launch command, one element per argument.
    pub fn argv(&self) -> Vec<String> {
        vec![
            "uvicorn".to_owned(),
            self.entry.clone(),
            "--host".to_owned(),
            self.host.clone(),
            "--port".to_owned(),
            self.port.to_string(),
            "--log-level".to_owned(),
            self.log_level.clone(),
        ]
    }

    /// Shell-style rendering of [`argv`](Self::argv), for display.
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

impl Default for LaunchDescriptor {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
            entry: "app:app".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

/// Entry points are `module:symbol`, both sides nonempty identifiers
/// (dots allowed on the module side for packages).
fn validate_entry(entry: &str) -> crate::Result<()> {
    let invalid = || crate::Error::InvalidEntryPoint {
        entry: entry.to_owned(),
    };

    let Some((module, symbol)) = entry.split_once(':') else {
        return Err(invalid());
    };

    let module_ok = !module.is_empty()
        && module
            .split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    let symbol_ok =
        !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if module_ok && symbol_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}
