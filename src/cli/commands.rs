//! Resource command handlers

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use provider_nop::config::{Config, OutputFormat};
use provider_nop::controller::{Clock, FixedClock, ManagedResource, NopConnector, SystemClock};
use provider_nop::duration::format_duration;
use provider_nop::host::{Manager, ReconcileEvent, Reconciler, ResourceStore};
use provider_nop::{NopResource, Observation, manifest, printer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One resource after a reconcile, as printed by `reconcile -o yaml|json`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileReport<'a> {
    resource: &'a NopResource,
    evaluated_at: DateTime<Utc>,
    resource_exists: bool,
    resource_up_to_date: bool,
    requeue_after: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    connection_details: BTreeMap<String, String>,
}

/// The instant a resource is evaluated at: `creation + age` when an age is given
fn evaluation_time(
    resource: &NopResource,
    age: Option<Duration>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    match (age, resource.creation_timestamp()) {
        (Some(age), Some(created)) => {
            let age = chrono::Duration::from_std(age).context("--age is out of range")?;
            Ok(created + age)
        }
        _ => Ok(now),
    }
}

/// Run one host reconcile per resource in the file
///
/// Each resource goes through the same cycle `run` uses, with the clock
/// stopped at its evaluation time, so the Synced bookkeeping matches.
async fn reconcile_all(
    file: &Path,
    age: Option<Duration>,
    poll_interval: Duration,
) -> Result<Vec<(NopResource, DateTime<Utc>, Observation)>> {
    let now = Utc::now();
    let objects = manifest::load_file(file, now)
        .with_context(|| format!("Failed to load manifest: {}", file.display()))?;
    let resources = manifest::into_resources(objects.clone())
        .with_context(|| format!("Invalid manifest: {}", file.display()))?;

    let mut results = Vec::with_capacity(resources.len());
    for (object, resource) in objects.into_iter().zip(resources) {
        let at = evaluation_time(&resource, age, now)?;
        let name = resource.metadata.name.clone();

        let store = ResourceStore::new();
        store.upsert(name.as_str(), object);
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(at));
        let connector = Arc::new(NopConnector::new(clock.clone(), poll_interval));
        let (reconciler, _events) =
            Reconciler::new(store.clone(), connector, clock, poll_interval);

        let observation = reconciler
            .reconcile_once(&name)
            .await
            .with_context(|| format!("Failed to reconcile {}", name))?;

        // A deleted resource is gone from the store; report it as loaded
        let reconciled = match store.get(&name) {
            Some(object) => NopResource::try_from(object)?,
            None => resource,
        };
        results.push((reconciled, at, observation));
    }
    Ok(results)
}

/// `reconcile`: one cycle, printing resources, observations and connection details
pub async fn reconcile(
    file: &Path,
    age: Option<Duration>,
    output: OutputFormat,
    config: &Config,
) -> Result<()> {
    let results = reconcile_all(file, age, config.poll_interval).await?;

    match output {
        OutputFormat::Table => {
            print!("{}", render_results(&results));
            for (resource, _, observation) in &results {
                for (key, value) in &observation.connection_details {
                    println!(
                        "{}: {}={}",
                        resource.metadata.name,
                        key,
                        String::from_utf8_lossy(value)
                    );
                }
            }
        }
        OutputFormat::Yaml | OutputFormat::Json => {
            let reports: Vec<ReconcileReport<'_>> = results
                .iter()
                .map(|(resource, at, observation)| ReconcileReport {
                    resource,
                    evaluated_at: *at,
                    resource_exists: observation.resource_exists,
                    resource_up_to_date: observation.resource_up_to_date,
                    requeue_after: format_duration(observation.requeue_after),
                    connection_details: observation
                        .connection_details
                        .iter()
                        .map(|(k, v)| (k.clone(), String::from_utf8_lossy(v).into_owned()))
                        .collect(),
                })
                .collect();

            if output == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&reports).context("Failed to encode JSON")?
                );
            } else {
                print!(
                    "{}",
                    serde_yaml::to_string(&reports).context("Failed to encode YAML")?
                );
            }
        }
    }

    Ok(())
}

/// `get`: printer-column table after one cycle
pub async fn get(file: &Path, age: Option<Duration>, config: &Config) -> Result<()> {
    let results = reconcile_all(file, age, config.poll_interval).await?;
    print!("{}", render_results(&results));
    Ok(())
}

fn render_results(results: &[(NopResource, DateTime<Utc>, Observation)]) -> String {
    let resources: Vec<NopResource> = results.iter().map(|(r, _, _)| r.clone()).collect();
    let at: BTreeMap<&str, DateTime<Utc>> = results
        .iter()
        .map(|(r, at, _)| (r.metadata.name.as_str(), *at))
        .collect();
    let fallback = Utc::now();
    printer::render_table_at(&resources, |resource| {
        at.get(resource.name()).copied().unwrap_or(fallback)
    })
}

/// `validate`: report every problem in the manifest
pub fn validate(file: &Path) -> Result<()> {
    let objects = manifest::load_file(file, Utc::now())
        .with_context(|| format!("Failed to load manifest: {}", file.display()))?;
    let problems = manifest::validate(&objects);

    if problems.is_empty() {
        println!("{}: {} resource(s) valid", file.display(), objects.len());
        return Ok(());
    }

    for problem in &problems {
        eprintln!("{}", problem);
    }
    Err(anyhow::anyhow!(
        "{} problem(s) found in {}",
        problems.len(),
        file.display()
    ))
}

/// `run`: reconcile every resource on the poll interval until done or interrupted
pub async fn run(
    file: &Path,
    poll_interval: Option<Duration>,
    cycles: Option<u32>,
    config: &Config,
) -> Result<()> {
    let poll_interval = poll_interval.unwrap_or(config.poll_interval);
    if poll_interval.is_zero() {
        return Err(anyhow::anyhow!("--poll-interval must be greater than zero"));
    }

    let objects = manifest::load_file(file, Utc::now())
        .with_context(|| format!("Failed to load manifest: {}", file.display()))?;

    let store = ResourceStore::new();
    for object in objects {
        let name = object
            .name()
            .map(str::to_string)
            .context("Every resource needs metadata.name")?;
        store.upsert(name, object);
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let connector = Arc::new(NopConnector::new(clock.clone(), poll_interval));
    let (reconciler, mut events) = Reconciler::new(store.clone(), connector, clock, poll_interval);
    let mut manager = Manager::new(reconciler, cycles);

    tracing::info!(
        resources = store.len(),
        poll_interval = %format_duration(poll_interval),
        "Starting reconcile loops"
    );
    manager.start_all();

    {
        let done = manager.join();
        tokio::pin!(done);
        loop {
            tokio::select! {
                Some(event) = events.recv() => print_event(&event),
                _ = &mut done => break,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping reconcile loops");
                    break;
                }
            }
        }
    }
    manager.stop();

    // Events sent after the last loop finished
    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }

    Ok(())
}

fn print_event(event: &ReconcileEvent) {
    match event {
        ReconcileEvent::Observed {
            name,
            conditions,
            connection_details,
        } => {
            let summary: Vec<String> = conditions
                .iter()
                .map(|c| format!("{}={}", c.condition_type, c.status))
                .collect();
            println!(
                "{} {}: {} ({} connection detail(s))",
                Utc::now().format("%H:%M:%S"),
                name,
                summary.join(", "),
                connection_details.len()
            );
        }
        ReconcileEvent::Deleted { name } => {
            println!("{} {}: deleted", Utc::now().format("%H:%M:%S"), name);
        }
        ReconcileEvent::Error { name, message } => {
            println!(
                "{} {}: reconcile error: {}",
                Utc::now().format("%H:%M:%S"),
                name,
                message
            );
        }
    }
}
