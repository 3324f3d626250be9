//! Backend dispatch
//!
//! Validation, name resolution and ordering run first and gate every write.
//! The enabled backends then run concurrently; every failure is collected.

use crate::backend::{BackendId, ConfigBackend, DhcpcdBackend, InterfacesDBackend, NetplanBackend};
use crate::config::NetcfgConfig;
use crate::error::{BackendFailure, NetcfgError, NetcfgResult};
use crate::intent::{IntentSet, InterfaceConfig};
use crate::order::application_order;
use crate::resolver::resolve_names;
use crate::validation::validate_intents;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

/// One implementation slot per backend identifier
pub struct BackendRegistry {
    dhcpcd: Arc<dyn ConfigBackend>,
    interfaces_d: Arc<dyn ConfigBackend>,
    netplan: Arc<dyn ConfigBackend>,
}

impl BackendRegistry {
    pub fn from_config(config: &NetcfgConfig) -> Self {
        Self {
            dhcpcd: Arc::new(DhcpcdBackend::new(config.paths.dhcpcd_conf.clone())),
            interfaces_d: Arc::new(InterfacesDBackend::new(config.paths.interfaces_dir.clone())),
            netplan: Arc::new(NetplanBackend::new(config.paths.netplan_file.clone())),
        }
    }

    pub fn get(&self, id: BackendId) -> Arc<dyn ConfigBackend> {
        match id {
            BackendId::Dhcpcd => self.dhcpcd.clone(),
            BackendId::InterfacesD => self.interfaces_d.clone(),
            BackendId::Netplan => self.netplan.clone(),
        }
    }

    /// Replace the implementation behind `id`
    pub fn set(&mut self, id: BackendId, backend: Arc<dyn ConfigBackend>) {
        match id {
            BackendId::Dhcpcd => self.dhcpcd = backend,
            BackendId::InterfacesD => self.interfaces_d = backend,
            BackendId::Netplan => self.netplan = backend,
        }
    }
}

/// Validates, orders and fans an intent set out to the backends
pub struct Configurator {
    registry: BackendRegistry,
    default_backends: Vec<BackendId>,
}

impl Configurator {
    pub fn new(config: &NetcfgConfig) -> Self {
        Self {
            registry: BackendRegistry::from_config(config),
            default_backends: config.backends.enabled.clone(),
        }
    }

    pub fn with_backend(mut self, id: BackendId, backend: Arc<dyn ConfigBackend>) -> Self {
        self.registry.set(id, backend);
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Configure the default backend set
    pub async fn configure_default(&self, intents: impl Into<IntentSet>) -> NetcfgResult<()> {
        self.configure(intents, &self.default_backends).await
    }

    /// Validate, resolve, order and write `intents` with every backend in `enabled`
    pub async fn configure(&self, intents: impl Into<IntentSet>, enabled: &[BackendId]) -> NetcfgResult<()> {
        let ordered = prepare(intents)?;
        dispatch(&self.registry, &ordered, enabled).await
    }
}

/// Everything that has to succeed before a single file is written
pub fn prepare(intents: impl Into<IntentSet>) -> NetcfgResult<Vec<InterfaceConfig>> {
    let mut configs = intents.into().into_inner();

    validate_intents(&configs)?;
    resolve_names(&mut configs)?;
    let ordered = application_order(configs);

    debug!(
        "Application order: {:?}",
        ordered.iter().map(|c| c.os_name()).collect::<Vec<_>>()
    );
    Ok(ordered)
}

/// Run the enabled backends concurrently and wait for all of them
pub async fn dispatch(
    registry: &BackendRegistry,
    configs: &[InterfaceConfig],
    enabled: &[BackendId],
) -> NetcfgResult<()> {
    let mut ids: Vec<BackendId> = Vec::new();
    for id in enabled {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }

    info!("Configuring {} interface(s) with backends {:?}", configs.len(), ids);

    let runs = ids.into_iter().map(|id| {
        let backend = registry.get(id);
        async move { (backend.id(), backend.configure(configs).await) }
    });

    let failures: Vec<BackendFailure> = join_all(runs)
        .await
        .into_iter()
        .filter_map(|(backend, result)| match result {
            Ok(()) => {
                debug!("Backend {} finished", backend);
                None
            }
            Err(err) => {
                error!("Backend {} failed: {}", backend, err);
                Some(BackendFailure { backend, error: err })
            }
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(NetcfgError::BackendFailures(failures))
    }
}
