use crate::{
    admission::Admission,
    authorizer::SubjectAccessReviews,
    index::{self, Index, Reader},
    k8s::{garden, Secret},
    metrics::AdmissionMetrics,
};
use anyhow::{bail, Result};
use clap::Parser;
use kube::runtime::watcher;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{info, info_span, warn, Instrument};

#[derive(Debug, Parser)]
#[clap(
    name = "reference-controller",
    about = "Rejects garden resources that reference unknown or unreadable resources"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "reference_controller=info,warn",
        env = "REFERENCE_CONTROLLER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    server: kubert::ServerArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// Disables the admission controller server.
    #[clap(long)]
    admission_controller_disabled: bool,

    /// How long an admission request may wait for the index to sync before it is rejected.
    ///
    /// This must stay well below the webhook's `timeoutSeconds` (10s by default) so that the
    /// API server receives a 503 rather than timing out the call.
    #[clap(long, default_value = "2000")]
    cache_sync_timeout_ms: u64,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            admin,
            client,
            log_level,
            log_format,
            server,
            admission_controller_disabled,
            cache_sync_timeout_ms,
        } = self;

        let server = if admission_controller_disabled {
            None
        } else {
            Some(server)
        };

        // Build the index of referenceable resources. Admission requests are checked against
        // this index rather than against the API server.
        let (index, synced) = Index::shared();

        let mut prom = <Registry>::default();
        index::metrics::register(prom.sub_registry_with_prefix("index"), index.clone());
        let admission_metrics =
            AdmissionMetrics::register(prom.sub_registry_with_prefix("reference_admission"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let mut runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .with_optional_server(server)
            .build()
            .await?;

        // Spawn resource watches.

        // The secret watch receives full objects, data included, from the API server. The index
        // keeps only each secret's identity and drops the rest as each event is applied.
        let secrets = runtime.watch_all::<Secret>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(index.clone(), secrets).instrument(info_span!("secrets")),
        );

        let quotas = runtime.watch_all::<garden::Quota>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(index.clone(), quotas).instrument(info_span!("quotas")),
        );

        let secret_bindings =
            runtime.watch_all::<garden::SecretBinding>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(index.clone(), secret_bindings)
                .instrument(info_span!("secretbindings")),
        );

        let private_secret_bindings =
            runtime.watch_all::<garden::PrivateSecretBinding>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(index.clone(), private_secret_bindings)
                .instrument(info_span!("privatesecretbindings")),
        );

        let cross_secret_bindings =
            runtime.watch_all::<garden::CrossSecretBinding>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(index.clone(), cross_secret_bindings)
                .instrument(info_span!("crosssecretbindings")),
        );

        let cloud_profiles = runtime.watch_all::<garden::CloudProfile>(watcher::Config::default());
        tokio::spawn(
            kubert::index::cluster(index.clone(), cloud_profiles)
                .instrument(info_span!("cloudprofiles")),
        );

        let seeds = runtime.watch_all::<garden::Seed>(watcher::Config::default());
        tokio::spawn(kubert::index::cluster(index.clone(), seeds).instrument(info_span!("seeds")));

        // The admin server does not report ready until every watch has completed its initial
        // listing.
        let initialized = runtime.initialized_handle();
        tokio::spawn(
            {
                let synced = synced.clone();
                async move {
                    if synced.synced().await {
                        info!("Ready");
                        drop(initialized);
                    } else {
                        warn!("Index dropped before syncing");
                    }
                }
            }
            .instrument(info_span!("index")),
        );

        let admission = Admission::new(
            Reader::new(index),
            synced,
            Duration::from_millis(cache_sync_timeout_ms),
            Arc::new(SubjectAccessReviews::new(runtime.client())),
            admission_metrics,
        );
        let runtime = runtime.spawn_server(move || admission.clone());

        // Serve until a shutdown signal is received.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
