//! Modules page. Modules are kept in display order.

use adminconsole_client::AdminApi;
use adminconsole_core::{DomainError, Module, ModuleDraft, ModuleId, sort_by_order};

use crate::AdminResult;
use crate::validation::{check_unique_name, require};

pub struct ModulesView<'a, A> {
    api: &'a A,
    modules: Vec<Module>,
}

impl<'a, A: AdminApi> ModulesView<'a, A> {
    pub async fn load(api: &'a A) -> AdminResult<Self> {
        let mut view = Self {
            api,
            modules: Vec::new(),
        };
        view.refresh().await?;
        Ok(view)
    }

    pub async fn refresh(&mut self) -> AdminResult<()> {
        let mut modules = self.api.list::<Module>().await?;
        sort_by_order(&mut modules);
        self.modules = modules;
        Ok(())
    }

    /// All modules, sorted by order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn find(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Order given to the next module created: one past the highest, and
    /// never below 1.
    pub fn next_order(&self) -> i32 {
        next_order(&self.modules)
    }

    /// Validate a form against a fresh list of modules, which is returned
    /// for further checks.
    async fn prepare(
        &self,
        mut draft: ModuleDraft,
        editing: Option<ModuleId>,
    ) -> AdminResult<(ModuleDraft, Vec<Module>)> {
        require("module name", &draft.name)?;
        draft.name = draft.name.trim().to_string();
        let current = self.api.list::<Module>().await?;
        check_unique_name(&current, |m| m.name.as_str(), &draft.name, editing)?;
        Ok((draft, current))
    }

    /// Re-read after a mutation that already succeeded; a failed read is
    /// only logged.
    async fn settle(&mut self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "could not refresh modules after saving");
        }
    }

    /// Create a module at the end of the list.
    pub async fn create(&mut self, draft: ModuleDraft) -> AdminResult<()> {
        let (mut draft, current) = self.prepare(draft, None).await?;
        draft.order = Some(next_order(&current));
        self.api.create::<Module>(&draft).await?;
        tracing::info!(name = %draft.name, order = ?draft.order, "module created");
        self.settle().await;
        Ok(())
    }

    /// Rename or (de)activate a module. Its position is left alone.
    pub async fn update(&mut self, id: ModuleId, draft: ModuleDraft) -> AdminResult<()> {
        let (mut draft, current) = self.prepare(draft, Some(id)).await?;
        draft.order = current
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::not_found(format!("module {id} not found")))?
            .order;
        self.api.update::<Module>(id, &draft).await?;
        tracing::info!(%id, name = %draft.name, "module updated");
        self.settle().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: ModuleId) -> AdminResult<()> {
        self.api.delete::<Module>(id).await?;
        tracing::info!(%id, "module deleted");
        self.settle().await;
        Ok(())
    }

    /// Move the module at position `from` to position `to` (0-based) and
    /// renumber the list `1..=n`.
    ///
    /// Only modules whose order changed are sent. Updates go out one by one;
    /// on failure the snapshot is left as it was and the caller should
    /// refresh. Returns the number of modules updated.
    pub async fn move_module(&mut self, from: usize, to: usize) -> AdminResult<usize> {
        let len = self.modules.len();
        if from >= len || to >= len {
            return Err(DomainError::validation(format!(
                "position out of range (1 to {len})"
            ))
            .into());
        }

        let mut reordered = self.modules.clone();
        let moved = reordered.remove(from);
        reordered.insert(to, moved);

        let mut updated = 0;
        for (position, module) in reordered.iter().enumerate() {
            let order = i32::try_from(position + 1)
                .map_err(|_| DomainError::validation("too many modules to renumber"))?;
            if module.order == Some(order) {
                continue;
            }
            let mut draft = ModuleDraft::from(module);
            draft.order = Some(order);
            self.api.update::<Module>(module.id, &draft).await?;
            updated += 1;
        }

        tracing::info!(from, to, updated, "modules reordered");
        self.settle().await;
        Ok(updated)
    }
}

fn next_order(modules: &[Module]) -> i32 {
    modules.iter().map(Module::sort_key).fold(0, i32::max) + 1
}
