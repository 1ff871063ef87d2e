use std::fmt;
use std::sync::Arc;

use crate::core::FieldMap;
use crate::modules::accounts::PaymentModel;
use crate::modules::orders::TransactionType;

/// What a hook is told about the form being built
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub bank: &'a str,
    pub tx_type: TransactionType,
    pub model: PaymentModel,
}

pub type PreHashHook = Arc<dyn Fn(&HookContext<'_>, FieldMap) -> FieldMap + Send + Sync>;

/// Ordered field-map transforms run on 3-D form inputs before the hash is
/// computed. Integrations use them for bank quirks; the hash always covers
/// their output.
#[derive(Clone, Default)]
pub struct PreHashHooks {
    hooks: Vec<PreHashHook>,
}

impl PreHashHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HookContext<'_>, FieldMap) -> FieldMap + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn apply(&self, ctx: &HookContext<'_>, fields: FieldMap) -> FieldMap {
        self.hooks.iter().fold(fields, |fields, hook| hook(ctx, fields))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for PreHashHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreHashHooks").field("len", &self.hooks.len()).finish()
    }
}
