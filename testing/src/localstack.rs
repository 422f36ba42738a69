//! # Shared LocalStack Container
//!
//! One LocalStack container per test process, emulating Kinesis, DynamoDB
//! and CloudWatch.
//!
//! The handle is created lazily on first access to [`localstack()`] and
//! started by the first [`LocalstackContainer::start`] call. Every later
//! `start()` from any test returns the already running container. The
//! container is not stopped when tests finish: statics are never dropped,
//! and the testcontainers watchdog removes it on SIGINT/SIGTERM. Call
//! [`LocalstackContainer::stop`] for explicit teardown.

use crate::settings::{EDGE_PORT, LOCALSTACK_TAG, LocalstackSettings};
use kinesis_errors::{FixtureError, FixtureResult};
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use testcontainers::bollard::errors::Error as BollardError;
use testcontainers::core::ExecCommand;
use testcontainers::core::error::ClientError;
use testcontainers::{ContainerAsync, ImageExt, TestcontainersError, runners::AsyncRunner};
use testcontainers_modules::localstack::LocalStack;
use tokio::sync::{Mutex, OnceCell};

static LOCALSTACK: LazyLock<LocalstackContainer> =
    LazyLock::new(|| LocalstackContainer::new(LocalstackSettings::from_env()));

/// The process-wide LocalStack handle.
///
/// Always returns the same instance. The handle is not started yet; call
/// [`LocalstackContainer::start`] before reading its coordinates.
pub fn localstack() -> &'static LocalstackContainer {
    &LOCALSTACK
}

struct RunningLocalstack {
    endpoint: String,
    container: Mutex<Option<ContainerAsync<LocalStack>>>
}

/// Handle to the LocalStack container.
pub struct LocalstackContainer {
    settings: LocalstackSettings,
    env: BTreeMap<String, String>,
    running: OnceCell<RunningLocalstack>,
    stopped: AtomicBool
}

impl LocalstackContainer {
    /// Creates an unstarted handle. The container environment, including
    /// passthrough variables, is captured now.
    pub fn new(settings: LocalstackSettings) -> Self {
        let env = settings.container_env();
        Self {
            settings,
            env,
            running: OnceCell::new(),
            stopped: AtomicBool::new(false)
        }
    }

    pub fn image(&self) -> String {
        self.settings.image()
    }

    pub fn settings(&self) -> &LocalstackSettings {
        &self.settings
    }

    /// Environment the container is (or will be) started with.
    pub fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn is_started(&self) -> bool {
        self.running.initialized() && !self.stopped.load(Ordering::SeqCst)
    }

    /// Starts the container and waits until LocalStack reports ready.
    ///
    /// Idempotent: once a start has succeeded, later calls return
    /// immediately with the same coordinates. Concurrent first calls wait on
    /// a single launch. A failed launch is not cached, so the next call tries
    /// again. After [`stop`](Self::stop) this returns
    /// [`FixtureError::Terminated`].
    pub async fn start(&self) -> FixtureResult<StartedLocalstack<'_>> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(FixtureError::Terminated { image: self.image() });
        }

        if self.running.initialized() {
            tracing::debug!(image = %self.image(), "LocalStack already running");
        }

        self.running.get_or_try_init(|| self.launch()).await?;
        self.finish_start().await
    }

    /// A `stop()` that ran while the launch was in flight saw no container
    /// to remove, so the freshly launched one is removed here.
    async fn finish_start(&self) -> FixtureResult<StartedLocalstack<'_>> {
        if self.stopped.load(Ordering::SeqCst) {
            self.remove_container().await?;
            return Err(FixtureError::Terminated { image: self.image() });
        }

        Ok(StartedLocalstack { container: self })
    }

    async fn launch(&self) -> FixtureResult<RunningLocalstack> {
        let image = self.image();
        tracing::info!(image = %image, "Starting LocalStack container");

        let mut request = LocalStack::default()
            .with_tag(LOCALSTACK_TAG)
            .with_startup_timeout(self.settings.startup_timeout);
        for (name, value) in &self.env {
            request = request.with_env_var(name.clone(), value.clone());
        }

        let container = request
            .start()
            .await
            .map_err(|e| start_error(&image, &e))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| FixtureError::PortMapping {
                image: image.clone(),
                port: EDGE_PORT,
                reason: e.to_string()
            })?;
        let port = container
            .get_host_port_ipv4(EDGE_PORT)
            .await
            .map_err(|e| FixtureError::PortMapping {
                image: image.clone(),
                port: EDGE_PORT,
                reason: e.to_string()
            })?;

        let endpoint = format!("http://{}:{}", host, port);
        tracing::info!(
            image = %image,
            endpoint = %endpoint,
            region = %self.settings.region,
            "LocalStack fixture started"
        );

        Ok(RunningLocalstack {
            endpoint,
            container: Mutex::new(Some(container))
        })
    }

    /// Removes the container. The handle can never be started again in
    /// this process; coordinates read after this point are stale.
    pub async fn stop(&self) -> FixtureResult<()> {
        self.stopped.store(true, Ordering::SeqCst);
        self.remove_container().await
    }

    async fn remove_container(&self) -> FixtureResult<()> {
        let Some(running) = self.running.get() else {
            return Ok(());
        };

        let container = running.container.lock().await.take();
        if let Some(container) = container {
            let id = container.id().to_string();
            container.rm().await.map_err(|e| {
                tracing::warn!(container_id = %id, "Failed to remove LocalStack container: {}", e);
                FixtureError::Teardown {
                    image: self.image(),
                    reason: e.to_string()
                }
            })?;
            tracing::info!(container_id = %id, "LocalStack container removed");
        }

        Ok(())
    }

    /// Environment of the running container as reported by `printenv`.
    pub async fn running_env(&self) -> FixtureResult<BTreeMap<String, String>> {
        let image = self.image();
        let exec_error = |reason: String| FixtureError::Exec {
            image: image.clone(),
            command: "printenv".to_string(),
            reason
        };

        let guard = self.running().container.lock().await;
        let Some(container) = guard.as_ref() else {
            return Err(FixtureError::Terminated { image: image.clone() });
        };

        let mut result = container
            .exec(ExecCommand::new(["printenv"]))
            .await
            .map_err(|e| exec_error(e.to_string()))?;
        let stdout = result
            .stdout_to_vec()
            .await
            .map_err(|e| exec_error(e.to_string()))?;

        Ok(parse_env_output(&String::from_utf8_lossy(&stdout)))
    }

    fn running(&self) -> &RunningLocalstack {
        match self.running.get() {
            Some(running) => running,
            None => panic!(
                "LocalStack container {} accessed before start() completed",
                self.image()
            )
        }
    }

    /// Endpoint URI of the LocalStack edge port, e.g. `http://localhost:32771`.
    ///
    /// # Panics
    /// If [`start`](Self::start) has not completed.
    pub fn endpoint(&self) -> &str {
        &self.running().endpoint
    }

    /// # Panics
    /// If [`start`](Self::start) has not completed.
    pub fn region(&self) -> &str {
        self.running();
        &self.settings.region
    }

    /// # Panics
    /// If [`start`](Self::start) has not completed.
    pub fn access_key(&self) -> &str {
        self.running();
        &self.settings.access_key
    }

    /// # Panics
    /// If [`start`](Self::start) has not completed.
    pub fn secret_key(&self) -> &str {
        self.running();
        &self.settings.secret_key
    }

    /// Handle whose coordinates are already known, with no container behind
    /// it. Lets unit tests exercise the bridge and clients without Docker.
    #[cfg(test)]
    pub(crate) fn started_for_tests(
        settings: LocalstackSettings,
        endpoint: &str
    ) -> &'static LocalstackContainer {
        let handle = Self::new(settings);
        let _ = handle.running.set(RunningLocalstack {
            endpoint: endpoint.to_string(),
            container: Mutex::new(None)
        });
        Box::leak(Box::new(handle))
    }
}

fn parse_env_output(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Maps a launch failure, separating "no Docker daemon to talk to" from
/// failures a reachable daemon reported.
fn start_error(image: &str, err: &TestcontainersError) -> FixtureError {
    let image = image.to_string();
    let reason = err.to_string();
    if is_runtime_unreachable(err) {
        FixtureError::DockerUnavailable { image, reason }
    } else {
        FixtureError::ContainerStart { image, reason }
    }
}

fn is_runtime_unreachable(err: &TestcontainersError) -> bool {
    match err {
        TestcontainersError::Client(ClientError::Init(_)) => true,
        TestcontainersError::Client(
            ClientError::PullImage { err, .. }
            | ClientError::ListContainers(err)
            | ClientError::CreateContainer(err)
            | ClientError::StartContainer(err)
            | ClientError::InspectContainer(err)
        ) => is_transport_unreachable(err),
        TestcontainersError::Io(err) => is_io_unreachable(err),
        _ => false
    }
}

fn is_transport_unreachable(err: &BollardError) -> bool {
    match err {
        BollardError::SocketNotFoundError(_) => true,
        BollardError::IOError { err } => is_io_unreachable(err),
        BollardError::HyperLegacyError { err } => err.is_connect(),
        _ => false
    }
}

fn is_io_unreachable(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
    )
}

/// Proof that a [`LocalstackContainer`] has been started.
///
/// Only [`LocalstackContainer::start`] creates one, so anything taking it
/// (property registration in particular) cannot run before provisioning.
#[derive(Clone, Copy)]
pub struct StartedLocalstack<'a> {
    container: &'a LocalstackContainer
}

impl<'a> StartedLocalstack<'a> {
    pub fn handle(&self) -> &'a LocalstackContainer {
        self.container
    }
}

impl Deref for StartedLocalstack<'_> {
    type Target = LocalstackContainer;

    fn deref(&self) -> &Self::Target {
        self.container
    }
}
