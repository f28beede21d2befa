//! Selection engine for optional and grouped installs
//!
//! Pure in-memory logic: [`InstallSelector::accept`] turns the resolution
//! results into single toggle options and mutually exclusive groups, and
//! [`InstallSelector::compute_mods_to_install`] reduces the final `selected`
//! flags back into install and disable lists. The prompting itself happens
//! in the command layer; this module only provides the option collections
//! and reads back their selection state.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ModDescriptor;
use crate::install::InstallableMod;
use crate::install::resolver::Resolution;

/// One user-choosable install, wrapping its resolved installable unit
#[derive(Debug, Clone)]
pub struct SelectableInstallOption {
    pub name: String,
    pub description: Option<String>,
    pub selected: bool,
    mod_item: InstallableMod,
}

impl SelectableInstallOption {
    fn new(descriptor: &ModDescriptor, mod_item: InstallableMod) -> Self {
        let policy = descriptor.policy.as_ref();
        let name = policy
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| mod_item.information.display_name.clone());
        let description = policy.and_then(|p| p.description.clone());
        let selected = policy.is_none_or(|p| p.is_selected_by_default());

        Self {
            name,
            description,
            selected,
            mod_item,
        }
    }

    /// Prompt label: the name, with the description appended when present
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) => format!("{} ({})", self.name, description),
            None => self.name.clone(),
        }
    }

    pub fn mod_item(&self) -> &InstallableMod {
        &self.mod_item
    }
}

/// Reduces resolution results into choices and back into install decisions
#[derive(Debug, Default)]
pub struct InstallSelector {
    always_install: Vec<InstallableMod>,
    single_options: Vec<SelectableInstallOption>,
    groups: BTreeMap<String, Vec<SelectableInstallOption>>,
}

impl InstallSelector {
    /// Build the option set from the resolution results.
    ///
    /// Any group with a member classified excluded or reinstall is treated as
    /// already decided: reinstall members install unconditionally and the
    /// group's remaining fresh members are dropped without being offered.
    pub fn accept(descriptors: &[ModDescriptor], resolution: Resolution) -> Self {
        let mut ignored_groups = BTreeSet::new();
        for &id in &resolution.excluded {
            if let Some(key) = descriptors[id].group_key() {
                ignored_groups.insert(key.to_string());
            }
        }
        for item in &resolution.reinstall {
            if let Some(key) = descriptors[item.descriptor_id].group_key() {
                ignored_groups.insert(key.to_string());
            }
        }

        let mut selector = Self {
            always_install: resolution.reinstall,
            ..Self::default()
        };

        for item in resolution.fresh {
            let descriptor = &descriptors[item.descriptor_id];
            match descriptor.group_key() {
                None => selector
                    .single_options
                    .push(SelectableInstallOption::new(descriptor, item)),
                Some(key) if ignored_groups.contains(key) => {}
                Some(key) => selector
                    .groups
                    .entry(key.to_string())
                    .or_default()
                    .push(SelectableInstallOption::new(descriptor, item)),
            }
        }

        selector
    }

    /// Whether there is anything for the user to choose
    pub fn has_selectable_options(&self) -> bool {
        !self.single_options.is_empty() || !self.groups.is_empty()
    }

    /// Single toggle options, for the presentation layer to mutate
    pub fn single_options_mut(&mut self) -> &mut [SelectableInstallOption] {
        &mut self.single_options
    }

    /// Mutually exclusive groups keyed by group name, for the presentation
    /// layer to mutate
    pub fn groups_mut(&mut self) -> &mut BTreeMap<String, Vec<SelectableInstallOption>> {
        &mut self.groups
    }

    fn options(&self) -> impl Iterator<Item = &SelectableInstallOption> {
        self.single_options
            .iter()
            .chain(self.groups.values().flatten())
    }

    /// Everything to install: reinstall items plus every selected option
    pub fn compute_mods_to_install(&self) -> Vec<InstallableMod> {
        let mut mods: Vec<_> = self.always_install.clone();
        mods.extend(
            self.options()
                .filter(|o| o.selected)
                .map(|o| o.mod_item.clone()),
        );
        mods.sort_by_key(|m| m.descriptor_id);
        mods
    }

    /// Every unselected option's item, for disabled-marker writing
    pub fn compute_disabled_mods(&self) -> Vec<InstallableMod> {
        let mut mods: Vec<_> = self
            .options()
            .filter(|o| !o.selected)
            .map(|o| o.mod_item.clone())
            .collect();
        mods.sort_by_key(|m| m.descriptor_id);
        mods
    }
}
