use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cairn_blocks::{Blockstore, Verification};
use cairn_dag::{LinkSource, StoreLinkSource};
use cairn_pin::Pinner;

use crate::error::{ProvideError, ProvideResult};
use crate::provider::{BlockstoreProvider, KeyProvider, PinnedProvider};
use crate::strategy::Strategy;

/// Default time between reprovide rounds.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprovideConfig {
    pub strategy: Strategy,
    #[serde(rename = "interval_secs", with = "secs")]
    pub interval: Duration,
    /// Recompute digests when blocks are built from stored bytes.
    pub verify_block_hashes: bool,
    pub enabled: bool,
}

impl Default for ReprovideConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::All,
            interval: DEFAULT_INTERVAL,
            verify_block_hashes: true,
            enabled: true,
        }
    }
}

impl ReprovideConfig {
    pub fn from_toml_str(s: &str) -> ProvideResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ProvideError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ProvideResult<String> {
        toml::to_string(self).map_err(|e| ProvideError::Config(e.to_string()))
    }

    /// An enabled reprovider needs a non-zero interval.
    pub fn validate(&self) -> ProvideResult<()> {
        if self.enabled && self.interval.is_zero() {
            return Err(ProvideError::Config(
                "interval must be non-zero when reproviding is enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn verification(&self) -> Verification {
        Verification::from_config(self.verify_block_hashes)
    }

    /// Links read straight from `store`, re-hashed first when
    /// `verify_block_hashes` is set.
    pub fn link_source(&self, store: Arc<dyn Blockstore>) -> Arc<dyn LinkSource> {
        Arc::new(StoreLinkSource::new(store).with_verification(self.verification()))
    }

    /// [`build_provider`](Self::build_provider) walking the blocks in `store`.
    pub fn build_store_provider(
        &self,
        store: Arc<dyn Blockstore>,
        pinner: Arc<dyn Pinner>,
    ) -> Arc<dyn KeyProvider> {
        let links = self.link_source(store.clone());
        self.build_provider(store, pinner, links)
    }

    /// The key provider for the configured strategy.
    pub fn build_provider(
        &self,
        store: Arc<dyn Blockstore>,
        pinner: Arc<dyn Pinner>,
        links: Arc<dyn LinkSource>,
    ) -> Arc<dyn KeyProvider> {
        match self.strategy {
            Strategy::All => Arc::new(BlockstoreProvider::new(store)),
            Strategy::Pinned => Arc::new(PinnedProvider::new(pinner, links, false)),
            Strategy::Roots => Arc::new(PinnedProvider::new(pinner, links, true)),
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
