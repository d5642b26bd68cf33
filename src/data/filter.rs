use std::collections::BTreeSet;

use super::model::{Island, PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Species selection
// ---------------------------------------------------------------------------

/// What an empty species selection means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptySelectionPolicy {
    /// Nothing ticked → no constraint, every species passes.
    #[default]
    ShowAll,
    /// Nothing ticked → nothing passes.
    ShowNone,
}

/// The set of species a user opted to include, plus how to read an empty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesSelection {
    pub species: BTreeSet<Species>,
    pub empty_policy: EmptySelectionPolicy,
}

impl Default for SpeciesSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl SpeciesSelection {
    /// Every species selected (i.e., show everything).
    pub fn all() -> Self {
        Self::from_species(Species::ALL)
    }

    /// Nothing selected; the outcome depends on `empty_policy`.
    pub fn none() -> Self {
        Self::from_species(std::iter::empty())
    }

    pub fn from_species(species: impl IntoIterator<Item = Species>) -> Self {
        SpeciesSelection {
            species: species.into_iter().collect(),
            empty_policy: EmptySelectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: EmptySelectionPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    /// Parse user-facing labels, rejecting unknown ones.
    pub fn parse<S: AsRef<str>>(labels: &[S]) -> Result<Self, super::error::ViewError> {
        let species = labels
            .iter()
            .map(|l| l.as_ref().parse::<Species>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self::from_species(species))
    }

    pub fn toggle(&mut self, species: Species) {
        if !self.species.remove(&species) {
            self.species.insert(species);
        }
    }

    pub fn contains(&self, species: Species) -> bool {
        self.species.contains(&species)
    }

    /// The species that actually pass, after applying the empty policy.
    pub fn effective_species(&self) -> Vec<Species> {
        if self.species.is_empty() {
            match self.empty_policy {
                EmptySelectionPolicy::ShowAll => Species::ALL.to_vec(),
                EmptySelectionPolicy::ShowNone => Vec::new(),
            }
        } else {
            self.species.iter().copied().collect()
        }
    }

    pub fn matches(&self, species: Species) -> bool {
        if self.species.is_empty() {
            self.empty_policy == EmptySelectionPolicy::ShowAll
        } else {
            self.species.contains(&species)
        }
    }
}

// ---------------------------------------------------------------------------
// Row filter: species selection plus an optional island
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub species: SpeciesSelection,
    /// `None` means every island.
    pub island: Option<Island>,
}

/// Return indices of penguins that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &PenguinDataset, filter: &RowFilter) -> Vec<usize> {
    dataset
        .penguins()
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            filter.species.matches(p.species)
                && filter.island.map_or(true, |isl| p.island == isl)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::ViewError;
    use crate::data::model::tests::penguin;

    fn dataset() -> PenguinDataset {
        let mut gentoo = penguin(Species::Gentoo, Some(220.0));
        gentoo.island = Island::Dream;
        PenguinDataset::from_penguins(vec![
            penguin(Species::Adelie, Some(190.0)),
            gentoo,
            penguin(Species::Chinstrap, None),
        ])
    }

    #[test]
    fn default_policy_is_show_all() {
        assert_eq!(EmptySelectionPolicy::default(), EmptySelectionPolicy::ShowAll);
        assert_eq!(SpeciesSelection::none().effective_species(), Species::ALL.to_vec());
    }

    #[test]
    fn empty_selection_follows_policy() {
        let ds = dataset();
        let show_all = RowFilter {
            species: SpeciesSelection::none(),
            island: None,
        };
        assert_eq!(filtered_indices(&ds, &show_all), vec![0, 1, 2]);

        let show_none = RowFilter {
            species: SpeciesSelection::none().with_policy(EmptySelectionPolicy::ShowNone),
            island: None,
        };
        assert!(filtered_indices(&ds, &show_none).is_empty());
    }

    #[test]
    fn species_and_island_combine() {
        let ds = dataset();
        let filter = RowFilter {
            species: SpeciesSelection::from_species([Species::Adelie, Species::Gentoo]),
            island: Some(Island::Dream),
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![1]);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = SpeciesSelection::all();
        sel.toggle(Species::Chinstrap);
        assert!(!sel.contains(Species::Chinstrap));
        sel.toggle(Species::Chinstrap);
        assert!(sel.contains(Species::Chinstrap));
    }

    #[test]
    fn parse_rejects_unknown_species() {
        let sel = SpeciesSelection::parse(&["Adelie", "gentoo"]).unwrap();
        assert_eq!(sel.effective_species(), vec![Species::Adelie, Species::Gentoo]);
        assert_eq!(
            SpeciesSelection::parse(&["Adelie", "Macaroni"]),
            Err(ViewError::UnknownSpecies("Macaroni".into()))
        );
    }
}
