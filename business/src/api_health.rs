//! Directory API health probe.
//!
//! `ApiHealth` is a command-fed cache summarizing the last `/health` probe.
//! The app shell asks [`ApiHealth::should_refresh`] once per frame and
//! dispatches [`CheckApiHealthCommand`] when the answer is yes, which keeps
//! probes down to one every five minutes.

use std::any::{Any, TypeId};

use chrono::{DateTime, Utc};
use log::{error, info};
use roster_states::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater, Time, Updater,
    compute_assign_impl,
};

use crate::config::AppConfig;
use crate::directory::api;

const HEALTH_REFRESH_MINUTES: i64 = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiHealth {
    last_checked: Option<DateTime<Utc>>,
    // set when the last probe failed
    last_error: Option<String>,
    in_flight: bool,
}

pub enum ApiAvailability<'a> {
    Available(DateTime<Utc>),
    Unavailable((DateTime<Utc>, &'a str)),
    Unknown,
}

impl ApiHealth {
    pub fn api_availability(&self) -> ApiAvailability<'_> {
        match (self.last_checked, &self.last_error) {
            (Some(time), None) => ApiAvailability::Available(time),
            (Some(time), Some(err)) => ApiAvailability::Unavailable((time, err.as_str())),
            _ => ApiAvailability::Unknown,
        }
    }

    /// Frame gate: true when a probe should be dispatched now. At most one
    /// probe runs at a time, and results are kept for five minutes.
    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.in_flight {
            return false;
        }
        match self.last_checked {
            Some(last) => {
                now.signed_duration_since(last).num_minutes() >= HEALTH_REFRESH_MINUTES
            }
            None => true,
        }
    }
}

impl Compute for ApiHealth {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [TypeId; 0] = [];
        const COMPUTE_IDS: [TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op.
        //
        // Side effects (network) must not run inside a Compute due to implicit
        // execution. Dispatch `CheckApiHealthCommand` to update this cache.
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        compute_assign_impl(self, new_self);
    }
}

/// Probes `{base}/health` and records the outcome in [`ApiHealth`].
#[derive(Default, Debug)]
pub struct CheckApiHealthCommand;

impl Command for CheckApiHealthCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let config: AppConfig = snap.state::<AppConfig>().clone();
        let now = *snap.state::<Time>().as_ref();
        let prev: ApiHealth = snap.compute::<ApiHealth>().clone();

        // Published before the future runs so the frame gate closes on the
        // next sync instead of dispatching again.
        updater.set(ApiHealth {
            in_flight: true,
            ..prev
        });

        Box::pin(async move {
            info!("checking directory health at {now:?}");

            match api::check_health(&config.api_base_url, config.service_key()).await {
                Ok(()) => {
                    updater.set(ApiHealth {
                        last_checked: Some(now),
                        last_error: None,
                        in_flight: false,
                    });
                }
                Err(err) => {
                    error!("directory health check failed: {err}");
                    updater.set(ApiHealth {
                        last_checked: Some(now),
                        last_error: Some(err.to_string()),
                        in_flight: false,
                    });
                }
            }
        })
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod server_tests {
    use super::*;
    use crate::test_utils::TestContext;

    #[tokio::test]
    async fn test_probe_records_availability() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_health(200).await;

        test_ctx.ctx.dispatch::<CheckApiHealthCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<ApiHealth>().map(ApiHealth::api_availability),
                    Some(ApiAvailability::Available(_))
                )
            })
            .await;
    }

    #[tokio::test]
    async fn test_probe_failure_is_unavailable() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_health(503).await;

        test_ctx.ctx.dispatch::<CheckApiHealthCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<ApiHealth>().map(ApiHealth::api_availability),
                    Some(ApiAvailability::Unavailable(_))
                )
            })
            .await;

        let health = test_ctx.ctx.cached::<ApiHealth>().unwrap();
        assert!(!health.should_refresh(*test_ctx.ctx.state::<roster_states::Time>().as_ref()));
    }
}
