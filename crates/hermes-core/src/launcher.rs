//! Opening a button's link: either in the configured browser executable or
//! with the system's default handler.

use std::process::Command;

use crate::config::HermesConfig;
use crate::error::{HermesError, HermesResult};

#[derive(Debug)]
pub enum BrowserLaunch {
    /// Spawn the configured executable with `chromeArgs` followed by the URL.
    Executable(Command),
    /// Hand the URL to the desktop's default handler.
    SystemDefault(String),
}

impl BrowserLaunch {
    pub fn from_config(settings: &HermesConfig, url: &str) -> HermesResult<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(HermesError::EmptyLink);
        }
        let exe = settings.chrome_executable_path.trim();
        if exe.is_empty() {
            return Ok(BrowserLaunch::SystemDefault(url.to_string()));
        }
        let mut cmd = Command::new(exe);
        cmd.args(settings.chrome_arg_tokens()).arg(url);
        Ok(BrowserLaunch::Executable(cmd))
    }

    /// Starts the browser without waiting for it to exit.
    pub fn launch(self) -> HermesResult<()> {
        match self {
            BrowserLaunch::Executable(mut cmd) => {
                let child = cmd.spawn().map_err(|e| {
                    HermesError::Launch(format!("{}: {}", cmd.get_program().to_string_lossy(), e))
                })?;
                log::info!("Started browser (pid {})", child.id());
                Ok(())
            }
            BrowserLaunch::SystemDefault(url) => {
                opener::open(&url).map_err(|e| HermesError::Launch(e.to_string()))?;
                log::info!("Opened {} with the default handler", url);
                Ok(())
            }
        }
    }
}

/// Opens `url` according to the browser settings in `settings`.
pub fn open_link(settings: &HermesConfig, url: &str) -> HermesResult<()> {
    BrowserLaunch::from_config(settings, url)?.launch()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_empty_link_is_rejected() {
        let settings = HermesConfig::default();
        assert!(matches!(
            BrowserLaunch::from_config(&settings, "   "),
            Err(HermesError::EmptyLink)
        ));
    }

    #[test]
    fn test_without_executable_uses_system_default() {
        let settings = HermesConfig::default();
        match BrowserLaunch::from_config(&settings, "https://intranet.example").unwrap() {
            BrowserLaunch::SystemDefault(url) => assert_eq!(url, "https://intranet.example"),
            other => panic!("unexpected launch: {other:?}"),
        }
    }

    #[test]
    fn test_executable_gets_args_then_url() {
        let settings = HermesConfig {
            chrome_executable_path: "/opt/google/chrome/chrome".to_string(),
            chrome_args: "--kiosk  --incognito".to_string(),
            ..HermesConfig::default()
        };
        let launch = BrowserLaunch::from_config(&settings, "https://intranet.example").unwrap();
        let BrowserLaunch::Executable(cmd) = launch else {
            panic!("expected an executable launch");
        };
        assert_eq!(cmd.get_program(), OsStr::new("/opt/google/chrome/chrome"));
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, ["--kiosk", "--incognito", "https://intranet.example"]);
    }

    #[test]
    fn test_missing_executable_reports_launch_error() {
        let settings = HermesConfig {
            chrome_executable_path: "/nonexistent/hermes-test-browser".to_string(),
            ..HermesConfig::default()
        };
        let err = open_link(&settings, "https://intranet.example").unwrap_err();
        assert!(matches!(err, HermesError::Launch(_)));
    }
}
