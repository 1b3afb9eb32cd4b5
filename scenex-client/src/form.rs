//! Form holder for the scenario draft.
//!
//! Owns the one mutable [`ScenarioDraft`]; the gateway reads it but
//! never mutates it. No side effects beyond the in-memory draft.

use scenex_model::draft::{
    AnalyticalScenario, FactorSlider, ModelToggle, ModelYear,
    ScenarioDraft, TransitMode, Violation,
};

/// Mutable holder for the scenario under construction.
#[derive(Debug, Clone, Default)]
pub struct ScenarioForm {
    draft: ScenarioDraft,
}

impl ScenarioForm {
    pub fn new() -> Self {
        ScenarioForm::default()
    }

    /// Read-only view of the current draft.
    pub fn draft(&self) -> &ScenarioDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.draft.description = description;
    }

    pub fn set_created_by(&mut self, created_by: impl Into<String>) {
        self.draft.created_by = created_by.into();
    }

    pub fn set_model_year(&mut self, year: ModelYear) {
        self.draft.model_year = year;
    }

    pub fn set_archetype(&mut self, archetype: AnalyticalScenario) {
        self.draft.archetype = archetype;
    }

    /// Set one percentage-style factor weight.
    pub fn set_factor(
        &mut self,
        mode: TransitMode,
        slider: FactorSlider,
        value: f64,
    ) {
        self.draft.weights_mut(mode).set(slider, value);
    }

    pub fn set_toggle(&mut self, toggle: ModelToggle, on: bool) {
        self.draft.toggles.set(toggle, on);
    }

    /// Add a tag; duplicates are ignored, insertion order kept.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.draft.tags.contains(&tag) {
            self.draft.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.draft.tags.retain(|t| t != tag);
    }

    /// Current required-field violations.
    pub fn validate(&self) -> Vec<Violation> {
        self.draft.validate()
    }

    /// Restore the documented defaults.
    pub fn reset(&mut self) {
        self.draft = ScenarioDraft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_stay_unique_and_ordered() {
        let mut form = ScenarioForm::new();
        form.add_tag("baseline");
        form.add_tag("2030");
        form.add_tag("baseline");
        assert_eq!(form.draft().tags, vec!["baseline", "2030"]);

        form.remove_tag("baseline");
        assert_eq!(form.draft().tags, vec!["2030"]);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = ScenarioForm::new();
        form.set_name("Core 2040");
        form.set_created_by("bob");
        form.set_model_year(ModelYear::Y2040);
        form.set_factor(TransitMode::Bus, FactorSlider::Fare, 15.0);
        form.set_toggle(ModelToggle::Air, true);
        form.add_tag("draft");
        assert!(form.validate().is_empty());

        form.reset();
        assert_eq!(form.draft(), &ScenarioDraft::default());
        assert_eq!(form.validate().len(), 2);
    }

    #[test]
    fn factor_edits_address_the_right_mode() {
        let mut form = ScenarioForm::new();
        form.set_factor(TransitMode::Rail, FactorSlider::WaitTime, 40.0);
        assert_eq!(
            form.draft().rail_weights.get(FactorSlider::WaitTime),
            40.0
        );
        assert_eq!(
            form.draft().bus_weights.get(FactorSlider::WaitTime),
            0.0
        );
    }
}
