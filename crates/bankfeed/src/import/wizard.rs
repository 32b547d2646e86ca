use crate::import::mapping::{AmountInterpretation, ColumnMapping};
use crate::{ImportError, ImportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    ColumnSelection,
    AmountInterpretation,
    Confirmation,
}

impl WizardStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColumnSelection => "column_selection",
            Self::AmountInterpretation => "amount_interpretation",
            Self::Confirmation => "confirmation",
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::ColumnSelection => Some(Self::AmountInterpretation),
            Self::AmountInterpretation => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::ColumnSelection => None,
            Self::AmountInterpretation => Some(Self::ColumnSelection),
            Self::Confirmation => Some(Self::AmountInterpretation),
        }
    }
}

/// Step-gated mapping wizard, held as a plain value rather than shared
/// state. Navigation never advances past an unmet gate; stepping beyond
/// either end is a no-op. `confirm_mapping` is the terminal, idempotent
/// commit after which the mapping is frozen.
#[derive(Debug, Clone)]
pub struct MappingWizard {
    step: WizardStep,
    mapping: ColumnMapping,
    confirmed: bool,
}

impl MappingWizard {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            step: WizardStep::ColumnSelection,
            mapping,
            confirmed: false,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Mutable access while the wizard is still open; None once confirmed.
    pub fn mapping_mut(&mut self) -> Option<&mut ColumnMapping> {
        if self.confirmed {
            return None;
        }
        Some(&mut self.mapping)
    }

    /// Whether the current step's gate is satisfied.
    pub fn gate_satisfied(&self) -> bool {
        match self.step {
            WizardStep::ColumnSelection => self.mapping.is_complete(),
            WizardStep::AmountInterpretation => match self.mapping.interpretation {
                AmountInterpretation::SeparateColumns => {
                    self.mapping.income_column.is_some() && self.mapping.expense_column.is_some()
                }
                AmountInterpretation::Standard | AmountInterpretation::Inverted => true,
            },
            WizardStep::Confirmation => true,
        }
    }

    /// Move forward if the gate allows it; returns the step actually reached.
    pub fn advance(&mut self) -> WizardStep {
        if self.gate_satisfied()
            && let Some(next) = self.step.next()
        {
            self.step = next;
        }
        self.step
    }

    /// Move back one step, or stay at the first; never an error.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn confirm_mapping(&mut self) -> ImportResult<()> {
        if self.confirmed {
            return Ok(());
        }
        if self.step != WizardStep::Confirmation {
            return Err(ImportError::MappingIncomplete(
                "confirmation step not reached".to_string(),
            ));
        }
        if !self.mapping.is_complete() {
            return Err(ImportError::MappingIncomplete(self.mapping.missing_pieces()));
        }
        self.confirmed = true;
        Ok(())
    }

    pub fn is_mapping_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Hand the frozen mapping to the classifier.
    pub fn into_mapping(self) -> ColumnMapping {
        self.mapping
    }
}
