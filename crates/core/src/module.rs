//! System module records.

use serde::{Deserialize, Serialize};

use crate::wire::null_as_empty;
use crate::{ModuleId, Resource, Status};

/// A named system area that can be granted to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    #[serde(rename = "idModulo")]
    pub id: ModuleId,
    #[serde(rename = "nombreModulo", default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Display order; absent values sort as `0`.
    #[serde(rename = "orden", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(rename = "estado", default = "Status::absent")]
    pub status: Status,
}

impl Module {
    pub fn sort_key(&self) -> i32 {
        self.order.unwrap_or(0)
    }
}

/// Sort modules by display order. Stable, so ties keep backend order.
pub fn sort_by_order(modules: &mut [Module]) {
    modules.sort_by_key(Module::sort_key);
}

/// Create/update body for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDraft {
    #[serde(rename = "nombreModulo")]
    pub name: String,
    #[serde(rename = "orden", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(rename = "estado")]
    pub status: Status,
}

impl ModuleDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: None,
            status: Status::Active,
        }
    }
}

impl From<&Module> for ModuleDraft {
    fn from(module: &Module) -> Self {
        Self {
            name: module.name.clone(),
            order: module.order,
            status: module.status,
        }
    }
}

impl Resource for Module {
    type Id = ModuleId;
    type Draft = ModuleDraft;

    const COLLECTION: &'static str = "/modulos";
    const ID_FIELD: &'static str = "idModulo";
    const KIND: &'static str = "module";

    fn id(&self) -> ModuleId {
        self.id
    }

    fn status(&self) -> Status {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: i64, order: Option<i32>) -> Module {
        Module {
            id: ModuleId::new(id),
            name: format!("m{id}"),
            order,
            status: Status::Active,
        }
    }

    #[test]
    fn missing_order_sorts_first() {
        let mut modules = vec![module(1, Some(2)), module(2, None), module(3, Some(1))];
        sort_by_order(&mut modules);
        let ids: Vec<i64> = modules.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn decodes_wire_shape() {
        let json = r#"{"idModulo": 4, "nombreModulo": "Ventas", "orden": 3, "estado": 1}"#;
        let m: Module = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, ModuleId::new(4));
        assert_eq!(m.order, Some(3));
        assert!(m.status.is_active());
    }
}
