use crate::core::DriverTrait;
use crate::errors::{E2eError, Result};
use crate::utils::javascript::{self, READY_STATE_SCRIPT};
use crate::utils::poll::{poll_until, PollOptions, Probe};
use std::time::Instant;

pub struct NavigationManager;

impl NavigationManager {
    /// Poll `document.readyState` until the page reports `complete`.
    pub async fn wait_for_document_ready<D: DriverTrait + ?Sized>(
        driver: &D,
        options: PollOptions,
    ) -> Result<NavigationResult> {
        let start_time = Instant::now();

        let outcome = poll_until(options, move || async move {
            let state: Option<String> =
                javascript::decode(driver.execute_script(READY_STATE_SCRIPT).await?)?;
            Ok(match state {
                Some(state) if state == "complete" => Probe::Ready(state),
                Some(state) => Probe::Pending(Some(state)),
                None => Probe::Pending(None),
            })
        })
        .await?;

        let ready_state = outcome.map_err(|timeout| {
            E2eError::NavigationFailed(format!(
                "document not ready after {}ms (last readyState: {})",
                timeout.elapsed.as_millis(),
                timeout.last_observed.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(NavigationResult {
            url: driver.current_url().await?,
            ready_state,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub ready_state: String,
    pub duration_ms: u64,
}
