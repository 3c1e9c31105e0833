// src/listings/renderer.rs
use crate::errors::RenderError;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

/// Turns a URL into the markup a browser ends up showing for it
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Wait after navigation so script-driven content can populate
    pub settle_delay_secs: u64,
    /// Upper bound for launch + navigation + settle
    pub timeout_secs: u64,
    pub window_width: u32,
    pub window_height: u32,
    /// Browser instances allowed to run at the same time, process-wide
    pub max_concurrent: usize,
    pub chrome_path: Option<PathBuf>,
    pub sandbox: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            settle_delay_secs: 10,
            timeout_secs: 60,
            window_width: 1920,
            window_height: 1080,
            max_concurrent: 2,
            chrome_path: None,
            sandbox: true,
        }
    }
}

impl RenderSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn launch_options(&self) -> Result<LaunchOptions<'static>, RenderError> {
        LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.sandbox)
            .window_size(Some((self.window_width, self.window_height)))
            .path(self.chrome_path.clone())
            .args(vec![OsStr::new("--disable-gpu")])
            // the connection stays quiet during the settle wait
            .idle_browser_timeout(self.timeout() + self.settle_delay())
            .build()
            .map_err(|e| RenderError::Options(e.to_string()))
    }
}

/// Headless Chrome renderer; one browser per call, capped by a shared semaphore
#[derive(Clone)]
pub struct ChromeRenderer {
    settings: Arc<RenderSettings>,
    permits: Arc<Semaphore>,
}

impl ChromeRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        let permits = Arc::new(Semaphore::new(settings.max_concurrent.max(1)));
        Self {
            settings: Arc::new(settings),
            permits,
        }
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| RenderError::Worker(e.to_string()))?;

        let settings = Arc::clone(&self.settings);
        let target = url.to_string();
        let timeout = settings.timeout();

        info!("Rendering {}", url);
        run_blocking(timeout, move || render_page(&settings, &target, permit)).await
    }
}

/// Run `job` on the blocking pool and give up waiting after `timeout`. The job
/// itself keeps running to completion, so whatever it owns is released then.
async fn run_blocking<F>(timeout: Duration, job: F) -> Result<String, RenderError>
where
    F: FnOnce() -> Result<String, RenderError> + Send + 'static,
{
    let worker = tokio::task::spawn_blocking(job);
    match tokio::time::timeout(timeout, worker).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(RenderError::Worker(join_error.to_string())),
        Err(_) => {
            warn!("Render gave up after {:?}", timeout);
            Err(RenderError::Timeout(timeout))
        }
    }
}

/// Runs on a blocking thread. The browser process and the permit are released
/// when this returns, whichever path it takes.
fn render_page(
    settings: &RenderSettings,
    url: &str,
    _permit: OwnedSemaphorePermit,
) -> Result<String, RenderError> {
    let options = settings.launch_options()?;
    let browser = Browser::new(options).map_err(|e| RenderError::Launch(format!("{:#}", e)))?;
    let tab = browser
        .new_tab()
        .map_err(|e| RenderError::Launch(format!("{:#}", e)))?;

    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            reason: format!("{:#}", e),
        })?;

    std::thread::sleep(settings.settle_delay());

    let markup = tab
        .get_content()
        .map_err(|e| RenderError::Capture(format!("{:#}", e)))?;

    debug!("Captured {} bytes of markup from {}", markup.len(), url);
    Ok(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RenderSettings::default();
        assert_eq!(settings.settle_delay(), Duration::from_secs(10));
        assert_eq!((settings.window_width, settings.window_height), (1920, 1080));
        assert!(settings.timeout() > settings.settle_delay());
    }

    #[test]
    fn test_launch_options_build() {
        let settings = RenderSettings {
            chrome_path: Some(PathBuf::from("/opt/chrome/chrome")),
            ..RenderSettings::default()
        };
        assert!(settings.launch_options().is_ok());
    }

    #[test]
    fn test_zero_concurrency_still_allows_one_browser() {
        let renderer = ChromeRenderer::new(RenderSettings {
            max_concurrent: 0,
            ..RenderSettings::default()
        });
        assert_eq!(renderer.permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_slow_render_times_out_and_permit_outlives_wait() {
        let permits = Arc::new(Semaphore::new(1));
        let permit = permits.clone().acquire_owned().await.unwrap();

        let err = run_blocking(Duration::from_millis(50), move || {
            let _permit = permit;
            std::thread::sleep(Duration::from_millis(300));
            Ok("<html></html>".to_string())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, RenderError::Timeout(d) if d == Duration::from_millis(50)));
        assert_eq!(permits.available_permits(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_fast_render_returns_markup() {
        let markup = run_blocking(Duration::from_secs(5), || Ok("<p>ok</p>".to_string()))
            .await
            .unwrap();
        assert_eq!(markup, "<p>ok</p>");
    }

    #[tokio::test]
    async fn test_panicking_worker_is_reported() {
        let err = run_blocking(Duration::from_secs(5), || panic!("browser crashed"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Worker(_)));
    }

    #[tokio::test]
    async fn test_missing_browser_binary_is_a_launch_error() {
        let renderer = ChromeRenderer::new(RenderSettings {
            chrome_path: Some(PathBuf::from("/nonexistent/jobs-bot/chrome")),
            settle_delay_secs: 0,
            ..RenderSettings::default()
        });

        let err = renderer.render("https://example.com").await.unwrap_err();
        assert!(matches!(err, RenderError::Launch(_)), "got {:?}", err);
        assert_eq!(renderer.permits.available_permits(), 2);
    }
}
