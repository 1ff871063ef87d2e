use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::FieldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMethod {
    Get,
    Post,
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormMethod::Get => write!(f, "GET"),
            FormMethod::Post => write!(f, "POST"),
        }
    }
}

/// Redirect payload for 3-D authentication, rendered by the caller as an
/// auto-submitting HTML form.
///
/// Inputs of 3D_PAY forms carry card data, so `Debug` lists input names only.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub gateway: String,
    pub method: FormMethod,
    pub inputs: FieldMap,
}

impl FormData {
    pub fn post(gateway: impl Into<String>, inputs: FieldMap) -> Self {
        Self {
            gateway: gateway.into(),
            method: FormMethod::Post,
            inputs,
        }
    }

    pub fn get(gateway: impl Into<String>, inputs: FieldMap) -> Self {
        Self {
            gateway: gateway.into(),
            method: FormMethod::Get,
            inputs,
        }
    }
}

impl fmt::Debug for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormData")
            .field("gateway", &self.gateway)
            .field("method", &self.method)
            .field("inputs", &self.inputs.keys().collect::<Vec<_>>())
            .finish()
    }
}
