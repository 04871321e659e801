//! The edit loop: raw text in, accepted configuration and fresh invoice out.

use crate::error::Result;
use crate::invoice::{self, ResolvedInvoice};
use crate::model::Configuration;
use crate::store::{self, ConfigStore};

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Accepted(ResolvedInvoice),
    /// The text did not parse; the previous configuration stays in effect.
    Rejected { reason: String },
}

type Listener = Box<dyn FnMut(&ResolvedInvoice)>;

pub struct EditSession<S: ConfigStore> {
    store: S,
    config: Configuration,
    raw: String,
    listeners: Vec<Listener>,
}

impl<S: ConfigStore> EditSession<S> {
    /// Start from the stored configuration, or the sample when there is none.
    pub fn open(store: S) -> Self {
        let (raw, config) = match store::load_raw(&store) {
            Some(loaded) => loaded,
            None => {
                let config = Configuration::sample();
                (config.to_text(), config)
            }
        };

        Self {
            store,
            config,
            raw,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The latest edit text, which may not parse.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn invoice(&self) -> ResolvedInvoice {
        invoice::assemble(&self.config)
    }

    /// Called with the new invoice after every accepted edit.
    pub fn subscribe(&mut self, listener: impl FnMut(&ResolvedInvoice) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply edited text. Only a storage failure is an error; text that does
    /// not parse is reported as [`EditOutcome::Rejected`].
    pub fn apply_edit(&mut self, raw: impl Into<String>) -> Result<EditOutcome> {
        self.raw = raw.into();

        let config = match Configuration::from_text(&self.raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "edit rejected, keeping previous configuration");
                return Ok(EditOutcome::Rejected {
                    reason: e.to_string(),
                });
            }
        };

        store::save(&mut self.store, &self.raw)?;
        self.config = config;
        Ok(EditOutcome::Accepted(self.publish()))
    }

    /// Replace the configuration with the sample and persist it.
    pub fn reset(&mut self) -> Result<ResolvedInvoice> {
        let raw = Configuration::sample().to_text();
        self.config = store::save(&mut self.store, &raw)?;
        self.raw = raw;
        Ok(self.publish())
    }

    fn publish(&mut self) -> ResolvedInvoice {
        let invoice = self.invoice();
        for listener in &mut self.listeners {
            listener(&invoice);
        }
        invoice
    }
}
