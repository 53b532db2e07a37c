// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only collaborators shared by every build of a specification.

use std::sync::Arc;

use bon::Builder;

use crate::config::types::ResolutionConfig;
use crate::package::{PackageRegistry, StaticRegistry};
use crate::spec::record::BuilderRegistry;

/// Package registry, builder contracts and resolution settings.
///
/// Cheap to clone; safe to share between threads.
#[derive(Debug, Clone, Builder)]
pub struct SpecContext {
    #[builder(setters(name = with_registry), default = empty_registry())]
    registry: Arc<dyn PackageRegistry>,
    #[builder(setters(name = with_builders), default)]
    builders: Arc<BuilderRegistry>,
    #[builder(setters(name = with_resolution), default)]
    resolution: ResolutionConfig,
}

fn empty_registry() -> Arc<dyn PackageRegistry> {
    Arc::new(StaticRegistry::new())
}

impl Default for SpecContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SpecContext {
    #[must_use]
    pub fn registry(&self) -> &dyn PackageRegistry {
        self.registry.as_ref()
    }

    #[must_use]
    pub fn builders(&self) -> &BuilderRegistry {
        &self.builders
    }

    #[must_use]
    pub const fn resolution(&self) -> ResolutionConfig {
        self.resolution
    }
}
