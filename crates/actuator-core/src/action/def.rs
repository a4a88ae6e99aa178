//! ActionDef - a callable together with its identity before registration.

use super::Action;
use crate::domain::ActionMeta;

/// A function or class as seen by the registry: the callable, its intrinsic
/// identifier and the metadata record attached by the tagging capability.
#[derive(Debug, Clone)]
pub struct ActionDef {
    ident: String,
    meta: Option<ActionMeta>,
    action: Action,
}

impl ActionDef {
    /// Untagged callable; registered under `ident` unless a name is given.
    pub fn new(ident: impl Into<String>, action: Action) -> Self {
        Self {
            ident: ident.into(),
            meta: None,
            action,
        }
    }

    /// Callable tagged as an action named `name`.
    pub fn tagged(name: impl Into<String>, action: Action) -> Self {
        let name = name.into();
        Self {
            meta: Some(ActionMeta::new(name.clone())),
            ident: name,
            action,
        }
    }

    pub fn with_meta(mut self, meta: ActionMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn meta(&self) -> Option<&ActionMeta> {
        self.meta.as_ref()
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn is_tagged(&self) -> bool {
        self.meta.is_some()
    }

    /// Name taken from the metadata, falling back to the intrinsic identifier.
    pub fn action_name(&self) -> &str {
        self.meta.as_ref().map_or(&self.ident, |m| &m.name)
    }

    pub(crate) fn into_parts(self) -> (Option<ActionMeta>, Action) {
        (self.meta, self.action)
    }
}

/// An object exposing several members, some of them tagged as actions.
pub trait ActionSource {
    fn members(&self) -> Vec<ActionDef>;
}

impl ActionSource for Vec<ActionDef> {
    fn members(&self) -> Vec<ActionDef> {
        self.clone()
    }
}

impl ActionSource for [ActionDef] {
    fn members(&self) -> Vec<ActionDef> {
        self.to_vec()
    }
}
